//! Polars view over hourly samples and the reduction to window statistics.

use crate::types::weather::{WeatherSample, WeatherWindowStats};
use crate::weather_data::error::WeatherDataError;
use chrono::NaiveDateTime;
use polars::prelude::*;

pub const TIME_COLUMN: &str = "time";
pub const RAIN_COLUMN: &str = "rain";
pub const TEMPERATURE_COLUMN: &str = "temperature_2m";
pub const WIND_SPEED_COLUMN: &str = "wind_speed_10m";
pub const SNOWFALL_COLUMN: &str = "snowfall";

/// Lays the samples out as a frame with one column per archive variable.
pub fn samples_to_frame(samples: &[WeatherSample]) -> PolarsResult<DataFrame> {
    let times: Vec<NaiveDateTime> = samples.iter().map(|s| s.time).collect();
    let rain: Vec<Option<f64>> = samples.iter().map(|s| s.rain).collect();
    let temperature: Vec<Option<f64>> = samples.iter().map(|s| s.temperature).collect();
    let wind_speed: Vec<Option<f64>> = samples.iter().map(|s| s.wind_speed).collect();
    let snowfall: Vec<Option<f64>> = samples.iter().map(|s| s.snowfall).collect();

    df!(
        TIME_COLUMN => times,
        RAIN_COLUMN => rain,
        TEMPERATURE_COLUMN => temperature,
        WIND_SPEED_COLUMN => wind_speed,
        SNOWFALL_COLUMN => snowfall
    )
}

/// Keeps the rows with `start <= time < end`.
pub fn filter_window(frame: LazyFrame, start: NaiveDateTime, end: NaiveDateTime) -> LazyFrame {
    frame.filter(
        col(TIME_COLUMN)
            .gt_eq(lit(start))
            .and(col(TIME_COLUMN).lt(lit(end))),
    )
}

/// Mean temperature, total rain and mean wind speed over `[start, end)`.
///
/// Returns [`WeatherWindowStats::ABSENT`] when no sample falls in the window. Within a
/// non-empty window, nulls are skipped; a window whose samples all lack temperature
/// still has an absent mean temperature.
pub fn window_stats(
    samples: &[WeatherSample],
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<WeatherWindowStats, WeatherDataError> {
    let in_window = filter_window(samples_to_frame(samples)?.lazy(), start, end).collect()?;
    if in_window.height() == 0 {
        return Ok(WeatherWindowStats::ABSENT);
    }

    let reduced = in_window
        .lazy()
        .select([
            col(TEMPERATURE_COLUMN).mean(),
            col(RAIN_COLUMN).sum(),
            col(WIND_SPEED_COLUMN).mean(),
        ])
        .collect()?;

    let first = |name: &str| -> Result<Option<f64>, WeatherDataError> {
        Ok(reduced.column(name)?.f64()?.get(0))
    };

    Ok(WeatherWindowStats {
        temperature_mean: first(TEMPERATURE_COLUMN)?,
        rain_total: first(RAIN_COLUMN)?,
        wind_speed_mean: first(WIND_SPEED_COLUMN)?,
    })
}
