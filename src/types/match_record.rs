use crate::geo::normalize::clean_team_name;
use crate::types::location::LatLon;
use crate::types::match_window::MatchWindow;
use crate::types::weather::WeatherWindowStats;
use bon::bon;
use chrono::NaiveDateTime;
use std::fmt;

/// Result of a match from the home side's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MatchOutcome {
    Home,
    Away,
    Draw,
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MatchOutcome::Home => "Home",
            MatchOutcome::Away => "Away",
            MatchOutcome::Draw => "Draw",
        };
        f.write_str(label)
    }
}

/// A single match as recorded in the match dataset.
///
/// `window` is derived from `kickoff` on construction. `location` and `weather` stay empty
/// until the record passes through [`crate::MatchEnricher::enrich`].
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    pub year: i32,
    pub kickoff: Option<NaiveDateTime>,
    pub stage: Option<String>,
    pub stadium: Option<String>,
    /// City exactly as recorded; see [`crate::normalize_city`] for the geocodable form.
    pub city: String,
    pub home_team: String,
    pub away_team: String,
    pub home_goals: Option<u32>,
    pub away_goals: Option<u32>,
    pub window: Option<MatchWindow>,
    pub location: Option<LatLon>,
    pub weather: WeatherWindowStats,
}

#[bon]
impl MatchRecord {
    /// Creates an unenriched record. Team names are cleaned of scraping artefacts.
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use cupweather::MatchRecord;
    ///
    /// let kickoff = NaiveDate::from_ymd_opt(1990, 6, 8).unwrap().and_hms_opt(17, 0, 0).unwrap();
    /// let record = MatchRecord::builder()
    ///     .year(1990)
    ///     .city("Milan")
    ///     .home_team("Argentina")
    ///     .away_team("Cameroon")
    ///     .kickoff(kickoff)
    ///     .home_goals(0)
    ///     .away_goals(1)
    ///     .build();
    /// assert!(record.window.is_some());
    /// assert!(record.location.is_none());
    /// ```
    #[builder]
    pub fn new(
        year: i32,
        #[builder(into)] city: String,
        #[builder(into)] home_team: String,
        #[builder(into)] away_team: String,
        kickoff: Option<NaiveDateTime>,
        home_goals: Option<u32>,
        away_goals: Option<u32>,
        #[builder(into)] stage: Option<String>,
        #[builder(into)] stadium: Option<String>,
    ) -> Self {
        Self {
            year,
            kickoff,
            stage,
            stadium,
            city,
            home_team: clean_team_name(&home_team),
            away_team: clean_team_name(&away_team),
            home_goals,
            away_goals,
            window: kickoff.map(MatchWindow::from_kickoff),
            location: None,
            weather: WeatherWindowStats::ABSENT,
        }
    }

    pub fn total_goals(&self) -> Option<u32> {
        Some(self.home_goals? + self.away_goals?)
    }

    pub fn goal_difference(&self) -> Option<i64> {
        Some(i64::from(self.home_goals?) - i64::from(self.away_goals?))
    }

    pub fn outcome(&self) -> Option<MatchOutcome> {
        let difference = self.goal_difference()?;
        Some(match difference {
            d if d > 0 => MatchOutcome::Home,
            d if d < 0 => MatchOutcome::Away,
            _ => MatchOutcome::Draw,
        })
    }

    /// Name of the winning team, or `"Draw"`.
    pub fn winner(&self) -> Option<&str> {
        Some(match self.outcome()? {
            MatchOutcome::Home => &self.home_team,
            MatchOutcome::Away => &self.away_team,
            MatchOutcome::Draw => "Draw",
        })
    }
}
