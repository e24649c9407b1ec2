//! Aggregates over enriched match records: the numbers behind the overview, team, match and
//! weather-comparison views.

use crate::error::CupWeatherError;
use crate::types::match_record::{MatchOutcome, MatchRecord};
use crate::types::tournament::TournamentRecord;
use crate::types::weather::WeatherWindowStats;
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Headline numbers for a set of matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overview {
    pub total_matches: usize,
    pub unique_cities: usize,
    pub unique_teams: usize,
    pub total_goals: u64,
}

pub fn overview(records: &[MatchRecord]) -> Overview {
    let cities: HashSet<&str> = records.iter().map(|r| r.city.as_str()).collect();
    let teams: HashSet<&str> = records
        .iter()
        .flat_map(|r| [r.home_team.as_str(), r.away_team.as_str()])
        .collect();
    let total_goals = records
        .iter()
        .flat_map(|r| [r.home_goals, r.away_goals])
        .flatten()
        .map(u64::from)
        .sum();

    Overview {
        total_matches: records.len(),
        unique_cities: cities.len(),
        unique_teams: teams.len(),
        total_goals,
    }
}

/// Number of matches per tournament year, in year order.
pub fn matches_per_year(records: &[MatchRecord]) -> BTreeMap<i32, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.year).or_insert(0) += 1;
    }
    counts
}

/// Number of matches per raw city label, most matches first; ties are ordered by name.
pub fn matches_per_city(records: &[MatchRecord]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        *counts.entry(record.city.as_str()).or_insert(0) += 1;
    }
    let mut sorted: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(city, count)| (city.to_string(), count))
        .collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted
}

/// Distinct teams taking part in each tournament.
pub fn teams_per_year(records: &[MatchRecord]) -> BTreeMap<i32, BTreeSet<String>> {
    let mut teams: BTreeMap<i32, BTreeSet<String>> = BTreeMap::new();
    for record in records {
        let entry = teams.entry(record.year).or_default();
        entry.insert(record.home_team.clone());
        entry.insert(record.away_team.clone());
    }
    teams
}

/// `(year, participations so far)` for every tournament `team` played in.
pub fn cumulative_participations(records: &[MatchRecord], team: &str) -> Vec<(i32, usize)> {
    let years: BTreeSet<i32> = records
        .iter()
        .filter(|r| r.home_team == team || r.away_team == team)
        .map(|r| r.year)
        .collect();
    years
        .into_iter()
        .enumerate()
        .map(|(i, year)| (year, i + 1))
        .collect()
}

/// First and last calendar day on which any of the matches was being played.
pub fn tournament_period(records: &[MatchRecord]) -> Option<(NaiveDate, NaiveDate)> {
    let windows = records.iter().filter_map(|r| r.window);
    let first = windows.clone().map(|w| w.start().date()).min()?;
    let last = windows.map(|w| w.end().date()).max()?;
    Some((first, last))
}

/// `(year, winner, titles up to and including that year)` in year order.
pub fn wins_to_date(tournaments: &[TournamentRecord]) -> Vec<(i32, String, usize)> {
    let mut ordered: Vec<&TournamentRecord> = tournaments.iter().collect();
    ordered.sort_by_key(|t| t.year);

    let mut titles: HashMap<&str, usize> = HashMap::new();
    ordered
        .into_iter()
        .map(|t| {
            let count = titles.entry(t.winner.as_str()).or_insert(0);
            *count += 1;
            (t.year, t.winner.clone(), *count)
        })
        .collect()
}

/// Mean of each weather statistic per match outcome, skipping absent values.
pub fn weather_by_outcome(records: &[MatchRecord]) -> Vec<(MatchOutcome, WeatherWindowStats)> {
    let mut grouped: BTreeMap<MatchOutcome, Vec<&WeatherWindowStats>> = BTreeMap::new();
    for record in records {
        if let Some(outcome) = record.outcome() {
            grouped.entry(outcome).or_default().push(&record.weather);
        }
    }

    grouped
        .into_iter()
        .map(|(outcome, stats)| {
            let summary = WeatherWindowStats {
                temperature_mean: mean(stats.iter().filter_map(|s| s.temperature_mean)),
                rain_total: mean(stats.iter().filter_map(|s| s.rain_total)),
                wind_speed_mean: mean(stats.iter().filter_map(|s| s.wind_speed_mean)),
            };
            (outcome, summary)
        })
        .collect()
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Variables compared in [`correlation_matrix`], in row/column order.
pub const CORRELATION_VARIABLES: [&str; 7] = [
    "Home Team Goals",
    "Away Team Goals",
    "Total Goals",
    "GoalDiff",
    "temp_mean_c",
    "rain_total_mm",
    "wind_mean_ms",
];

/// Pearson correlations between match and weather variables.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub variables: Vec<&'static str>,
    /// `values[i][j]` correlates `variables[i]` with `variables[j]`; `None` when it is undefined.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.variables.iter().position(|v| *v == a)?;
        let j = self.variables.iter().position(|v| *v == b)?;
        self.values[i][j]
    }
}

fn correlation_columns(record: &MatchRecord) -> [Option<f64>; 7] {
    [
        record.home_goals.map(f64::from),
        record.away_goals.map(f64::from),
        record.total_goals().map(f64::from),
        record.goal_difference().map(|d| d as f64),
        record.weather.temperature_mean,
        record.weather.rain_total,
        record.weather.wind_speed_mean,
    ]
}

/// Correlates every pair of [`CORRELATION_VARIABLES`] using only the records where both
/// values are present.
pub fn correlation_matrix(records: &[MatchRecord]) -> CorrelationMatrix {
    let rows: Vec<[Option<f64>; 7]> = records.iter().map(correlation_columns).collect();
    let n = CORRELATION_VARIABLES.len();

    let values = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| {
                    let pairs: Vec<(f64, f64)> = rows
                        .iter()
                        .filter_map(|row| Some((row[i]?, row[j]?)))
                        .collect();
                    pearson(&pairs)
                })
                .collect()
        })
        .collect();

    CorrelationMatrix {
        variables: CORRELATION_VARIABLES.to_vec(),
        values,
    }
}

/// Pearson's r; `None` for fewer than two pairs or a constant variable.
pub fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut covariance, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(covariance / (var_x.sqrt() * var_y.sqrt()))
}

fn float_column(
    records: &[MatchRecord],
    value: impl Fn(&MatchRecord) -> Option<f64>,
) -> Vec<Option<f64>> {
    records.iter().map(value).collect()
}

/// The joined table: one row per match, absent values as nulls.
///
/// # Errors
///
/// Returns [`CupWeatherError::Polars`] if the frame cannot be assembled.
pub fn enriched_frame(records: &[MatchRecord]) -> Result<DataFrame, CupWeatherError> {
    let years: Vec<i32> = records.iter().map(|r| r.year).collect();
    let dates: Vec<Option<NaiveDate>> = records
        .iter()
        .map(|r| r.window.map(|w| w.start().date()))
        .collect();
    let starts: Vec<Option<NaiveDateTime>> =
        records.iter().map(|r| r.window.map(|w| w.start())).collect();
    let ends: Vec<Option<NaiveDateTime>> =
        records.iter().map(|r| r.window.map(|w| w.end())).collect();
    let cities: Vec<&str> = records.iter().map(|r| r.city.as_str()).collect();
    let home_teams: Vec<&str> = records.iter().map(|r| r.home_team.as_str()).collect();
    let away_teams: Vec<&str> = records.iter().map(|r| r.away_team.as_str()).collect();
    let home_goals: Vec<Option<u32>> = records.iter().map(|r| r.home_goals).collect();
    let away_goals: Vec<Option<u32>> = records.iter().map(|r| r.away_goals).collect();
    let total_goals: Vec<Option<u32>> = records.iter().map(|r| r.total_goals()).collect();
    let goal_diff: Vec<Option<i64>> = records.iter().map(|r| r.goal_difference()).collect();
    let outcomes: Vec<Option<String>> = records
        .iter()
        .map(|r| r.outcome().map(|o| o.to_string()))
        .collect();

    let frame = df!(
        "Year" => years,
        "Date" => dates,
        "Start" => starts,
        "End" => ends,
        "City" => cities,
        "Home Team Name" => home_teams,
        "Away Team Name" => away_teams,
        "Home Team Goals" => home_goals,
        "Away Team Goals" => away_goals,
        "Total Goals" => total_goals,
        "GoalDiff" => goal_diff,
        "Outcome" => outcomes,
        "lat" => float_column(records, |r| r.location.map(|l| l.lat())),
        "lon" => float_column(records, |r| r.location.map(|l| l.lon())),
        "temp_mean_c" => float_column(records, |r| r.weather.temperature_mean),
        "rain_total_mm" => float_column(records, |r| r.weather.rain_total),
        "wind_mean_ms" => float_column(records, |r| r.weather.wind_speed_mean)
    )?;
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::location::LatLon;

    fn record(year: i32, city: &str, home: &str, away: &str, goals: (u32, u32)) -> MatchRecord {
        let kickoff = NaiveDate::from_ymd_opt(year, 6, 10)
            .unwrap()
            .and_hms_opt(16, 0, 0)
            .unwrap();
        MatchRecord::builder()
            .year(year)
            .city(city)
            .home_team(home)
            .away_team(away)
            .kickoff(kickoff)
            .home_goals(goals.0)
            .away_goals(goals.1)
            .build()
    }

    fn with_weather(mut r: MatchRecord, temp: f64, rain: f64, wind: f64) -> MatchRecord {
        r.location = Some(LatLon(1.0, 2.0));
        r.weather = WeatherWindowStats {
            temperature_mean: Some(temp),
            rain_total: Some(rain),
            wind_speed_mean: Some(wind),
        };
        r
    }

    fn sample_records() -> Vec<MatchRecord> {
        vec![
            record(1990, "Rome", "Italy", "Austria", (1, 0)),
            record(1990, "Milan", "Argentina", "Cameroon", (0, 1)),
            record(1990, "Rome", "Italy", "USA", (1, 0)),
            record(1994, "Pasadena", "Brazil", "Italy", (0, 0)),
        ]
    }

    #[test]
    fn test_overview() {
        let summary = overview(&sample_records());
        assert_eq!(
            summary,
            Overview {
                total_matches: 4,
                unique_cities: 3,
                unique_teams: 6,
                total_goals: 3,
            }
        );
    }

    #[test]
    fn test_counts_per_year_and_city() {
        let records = sample_records();
        let per_year = matches_per_year(&records);
        assert_eq!(per_year.get(&1990), Some(&3));
        assert_eq!(per_year.get(&1994), Some(&1));

        let per_city = matches_per_city(&records);
        assert_eq!(
            per_city,
            vec![
                ("Rome".to_string(), 2),
                ("Milan".to_string(), 1),
                ("Pasadena".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_teams_and_participations() {
        let records = sample_records();
        let teams = teams_per_year(&records);
        assert_eq!(teams[&1990].len(), 5);
        assert!(teams[&1994].contains("Brazil"));

        assert_eq!(
            cumulative_participations(&records, "Italy"),
            vec![(1990, 1), (1994, 2)]
        );
        assert!(cumulative_participations(&records, "Scotland").is_empty());
    }

    #[test]
    fn test_tournament_period_includes_rollover() {
        let late = NaiveDate::from_ymd_opt(1990, 7, 8)
            .unwrap()
            .and_hms_opt(23, 0, 0)
            .unwrap();
        let mut records = sample_records();
        records.truncate(3);
        records.push(
            MatchRecord::builder()
                .year(1990)
                .city("Rome")
                .home_team("Germany FR")
                .away_team("Argentina")
                .kickoff(late)
                .build(),
        );

        let (first, last) = tournament_period(&records).unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(1990, 6, 10).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(1990, 7, 9).unwrap());
        assert_eq!(tournament_period(&[]), None);
    }

    #[test]
    fn test_wins_to_date() {
        let tournament = |year: i32, winner: &str| TournamentRecord {
            year,
            country: "Somewhere".to_string(),
            winner: winner.to_string(),
            runners_up: String::new(),
            third: String::new(),
            fourth: String::new(),
            goals_scored: None,
            qualified_teams: None,
            matches_played: None,
        };
        let tournaments = vec![
            tournament(1938, "Italy"),
            tournament(1930, "Uruguay"),
            tournament(1934, "Italy"),
        ];
        assert_eq!(
            wins_to_date(&tournaments),
            vec![
                (1930, "Uruguay".to_string(), 1),
                (1934, "Italy".to_string(), 1),
                (1938, "Italy".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_pearson() {
        let positive = pearson(&[(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)]).unwrap();
        assert!((positive - 1.0).abs() < 1e-12);
        let negative = pearson(&[(1.0, 3.0), (2.0, 2.0), (3.0, 1.0)]).unwrap();
        assert!((negative + 1.0).abs() < 1e-12);
        assert_eq!(pearson(&[(1.0, 1.0)]), None);
        assert_eq!(pearson(&[(1.0, 1.0), (2.0, 1.0)]), None);
    }

    #[test]
    fn test_correlation_matrix_uses_pairwise_complete_rows() {
        let records = vec![
            with_weather(record(1990, "Rome", "A", "B", (1, 0)), 20.0, 0.0, 2.0),
            with_weather(record(1990, "Rome", "C", "D", (2, 0)), 25.0, 1.0, 4.0),
            with_weather(record(1990, "Rome", "E", "F", (3, 0)), 30.0, 0.0, 6.0),
            // No weather: only contributes to goal-only pairs.
            record(1990, "Atlantis", "G", "H", (4, 0)),
        ];
        let matrix = correlation_matrix(&records);

        assert_eq!(matrix.variables.len(), 7);
        let r = matrix.get("temp_mean_c", "Total Goals").unwrap();
        assert!((r - 1.0).abs() < 1e-12);
        let r = matrix.get("wind_mean_ms", "GoalDiff").unwrap();
        assert!((r - 1.0).abs() < 1e-12);
        // Away goals are constant.
        assert_eq!(matrix.get("Away Team Goals", "Total Goals"), None);
        assert_eq!(matrix.get("nonsense", "Total Goals"), None);
    }

    #[test]
    fn test_weather_by_outcome() {
        let records = vec![
            with_weather(record(1990, "Rome", "A", "B", (1, 0)), 20.0, 1.0, 2.0),
            with_weather(record(1990, "Rome", "C", "D", (2, 0)), 30.0, 3.0, 4.0),
            with_weather(record(1990, "Rome", "E", "F", (0, 0)), 15.0, 0.0, 1.0),
            record(1990, "Atlantis", "G", "H", (0, 0)),
        ];
        let summary = weather_by_outcome(&records);
        assert_eq!(summary.len(), 2);

        let (outcome, home) = summary[0];
        assert_eq!(outcome, MatchOutcome::Home);
        assert_eq!(home.temperature_mean, Some(25.0));
        assert_eq!(home.rain_total, Some(2.0));
        assert_eq!(home.wind_speed_mean, Some(3.0));

        let (outcome, draw) = summary[1];
        assert_eq!(outcome, MatchOutcome::Draw);
        assert_eq!(draw.temperature_mean, Some(15.0));
    }

    #[test]
    fn test_enriched_frame() {
        let records = vec![
            with_weather(record(1990, "Rome", "Italy", "Austria", (1, 0)), 24.5, 0.0, 3.0),
            record(1990, "Atlantis", "Nowhere", "Elsewhere", (2, 2)),
        ];
        let frame = enriched_frame(&records).unwrap();

        assert_eq!(frame.shape(), (2, 17));
        let temps = frame.column("temp_mean_c").unwrap().f64().unwrap();
        assert_eq!(temps.get(0), Some(24.5));
        assert_eq!(temps.get(1), None);
        let outcomes = frame.column("Outcome").unwrap().str().unwrap();
        assert_eq!(outcomes.get(0), Some("Home"));
        assert_eq!(outcomes.get(1), Some("Draw"));
        let lat = frame.column("lat").unwrap().f64().unwrap();
        assert_eq!(lat.get(1), None);
    }
}
