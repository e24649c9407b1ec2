//! Reads the match and tournament CSV files into records.

use crate::geo::normalize::normalize_city;
use crate::matches::error::MatchDataError;
use crate::types::match_record::MatchRecord;
use crate::types::tournament::TournamentRecord;
use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, info};
use polars::prelude::*;
use std::path::Path;

const DATETIME_FORMATS: &[&str] = &[
    "%d %b %Y - %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Parses a kickoff as written in the match dataset, e.g. `"13 Jul 1930 - 15:00 "`.
///
/// Returns `None` for anything unrecognised; a bare date is read as midnight.
pub fn parse_match_datetime(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

// Quoting is disabled: the scraped `rn">` fragment puts a bare `"` in the middle of a field.
fn read_csv(path: &Path) -> Result<DataFrame, MatchDataError> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(None))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| MatchDataError::CsvRead(path.to_path_buf(), e))?
        .finish()
        .map_err(|e| MatchDataError::CsvRead(path.to_path_buf(), e))
}

fn required_column<'a>(
    df: &'a DataFrame,
    path: &Path,
    name: &str,
) -> Result<&'a Column, MatchDataError> {
    df.column(name).map_err(|e| MatchDataError::MissingColumn {
        path: path.to_path_buf(),
        column: name.to_string(),
        source: e,
    })
}

fn string_values(column: &Column) -> Result<Vec<Option<String>>, MatchDataError> {
    let operation = |e| MatchDataError::ColumnOperation {
        column: column.name().to_string(),
        source: e,
    };
    let cast = column.cast(&DataType::String).map_err(operation)?;
    let values = cast.str().map_err(operation)?;
    Ok(values
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect())
}

fn int_values(column: &Column) -> Result<Vec<Option<i64>>, MatchDataError> {
    let operation = |e| MatchDataError::ColumnOperation {
        column: column.name().to_string(),
        source: e,
    };
    let cast = column.cast(&DataType::Int64).map_err(operation)?;
    let values = cast.i64().map_err(operation)?;
    Ok(values.into_iter().collect())
}

fn required_strings(
    df: &DataFrame,
    path: &Path,
    name: &str,
) -> Result<Vec<Option<String>>, MatchDataError> {
    string_values(required_column(df, path, name)?)
}

fn required_ints(df: &DataFrame, path: &Path, name: &str) -> Result<Vec<Option<i64>>, MatchDataError> {
    int_values(required_column(df, path, name)?)
}

// Columns some dataset revisions leave out read as all-null.
fn optional_strings(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, MatchDataError> {
    match df.column(name) {
        Ok(column) => string_values(column),
        Err(_) => Ok(vec![None; df.height()]),
    }
}

fn optional_ints(df: &DataFrame, name: &str) -> Result<Vec<Option<i64>>, MatchDataError> {
    match df.column(name) {
        Ok(column) => int_values(column),
        Err(_) => Ok(vec![None; df.height()]),
    }
}

fn to_u32(value: Option<i64>) -> Option<u32> {
    value.and_then(|v| u32::try_from(v).ok())
}

fn to_year(value: Option<i64>) -> Option<i32> {
    value.and_then(|v| i32::try_from(v).ok())
}

/// Loads the match dataset.
///
/// Required columns: `Year`, `Datetime`, `City`, `Home Team Name`, `Away Team Name`,
/// `Home Team Goals`, `Away Team Goals`. `Stage` and `Stadium` are read when present.
/// Rows without a `Year` are the blank padding rows at the end of the published file and
/// are skipped; every other row yields a record, even if its kickoff cannot be parsed.
///
/// # Errors
///
/// [`MatchDataError::CsvRead`] if the file cannot be read, [`MatchDataError::MissingColumn`]
/// if a required column is absent.
pub fn load_matches(path: impl AsRef<Path>) -> Result<Vec<MatchRecord>, MatchDataError> {
    let path = path.as_ref();
    let df = read_csv(path)?;

    let years = required_ints(&df, path, "Year")?;
    let datetimes = required_strings(&df, path, "Datetime")?;
    let cities = required_strings(&df, path, "City")?;
    let home_teams = required_strings(&df, path, "Home Team Name")?;
    let away_teams = required_strings(&df, path, "Away Team Name")?;
    let home_goals = required_ints(&df, path, "Home Team Goals")?;
    let away_goals = required_ints(&df, path, "Away Team Goals")?;
    let stages = optional_strings(&df, "Stage")?;
    let stadiums = optional_strings(&df, "Stadium")?;

    let mut records = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let Some(year) = to_year(years[i]) else {
            debug!("Skipping row {} of {:?}: no year", i, path);
            continue;
        };
        let kickoff = datetimes[i].as_deref().and_then(parse_match_datetime);
        if kickoff.is_none() {
            debug!("Row {} of {:?} has no parseable kickoff", i, path);
        }

        records.push(
            MatchRecord::builder()
                .year(year)
                .city(cities[i].clone().unwrap_or_default())
                .home_team(home_teams[i].clone().unwrap_or_default())
                .away_team(away_teams[i].clone().unwrap_or_default())
                .maybe_kickoff(kickoff)
                .maybe_home_goals(to_u32(home_goals[i]))
                .maybe_away_goals(to_u32(away_goals[i]))
                .maybe_stage(stages[i].clone())
                .maybe_stadium(stadiums[i].clone())
                .build(),
        );
    }

    info!("Loaded {} matches from {:?}", records.len(), path);
    Ok(records)
}

/// Loads the tournament-winners dataset.
///
/// Country and placing columns are passed through [`normalize_city`], which also folds
/// `Germany FR` into `Germany` and `IR Iran` into `Iran`.
///
/// # Errors
///
/// [`MatchDataError::CsvRead`] if the file cannot be read, [`MatchDataError::MissingColumn`]
/// if one of `Year`, `Country`, `Winner`, `Runners-Up`, `Third`, `Fourth` is absent.
pub fn load_tournaments(path: impl AsRef<Path>) -> Result<Vec<TournamentRecord>, MatchDataError> {
    let path = path.as_ref();
    let df = read_csv(path)?;

    let years = required_ints(&df, path, "Year")?;
    let countries = required_strings(&df, path, "Country")?;
    let winners = required_strings(&df, path, "Winner")?;
    let runners_up = required_strings(&df, path, "Runners-Up")?;
    let thirds = required_strings(&df, path, "Third")?;
    let fourths = required_strings(&df, path, "Fourth")?;
    let goals_scored = optional_ints(&df, "GoalsScored")?;
    let qualified_teams = optional_ints(&df, "QualifiedTeams")?;
    let matches_played = optional_ints(&df, "MatchesPlayed")?;

    let clean = |value: &Option<String>| value.as_deref().map(normalize_city).unwrap_or_default();

    let records: Vec<TournamentRecord> = (0..df.height())
        .filter_map(|i| {
            Some(TournamentRecord {
                year: to_year(years[i])?,
                country: clean(&countries[i]),
                winner: clean(&winners[i]),
                runners_up: clean(&runners_up[i]),
                third: clean(&thirds[i]),
                fourth: clean(&fourths[i]),
                goals_scored: to_u32(goals_scored[i]),
                qualified_teams: to_u32(qualified_teams[i]),
                matches_played: to_u32(matches_played[i]),
            })
        })
        .collect();

    info!("Loaded {} tournaments from {:?}", records.len(), path);
    Ok(records)
}
