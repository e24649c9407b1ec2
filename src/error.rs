use crate::geo::error::GeocodeError;
use crate::matches::error::MatchDataError;
use crate::weather_data::error::WeatherDataError;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CupWeatherError {
    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    #[error(transparent)]
    WeatherData(#[from] WeatherDataError),

    #[error(transparent)]
    MatchData(#[from] MatchDataError),

    #[error("Failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed processing DataFrame: {0}")]
    Polars(#[from] PolarsError),
}
