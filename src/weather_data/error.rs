use chrono::NaiveDate;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherDataError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("Error fetching data from the weather API ({status}) for {url}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Failed to decode weather archive response from {url}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // The archive answered 200 but without an `hourly` block.
    #[error("Weather archive response for ({lat}, {lon}) {start}..{end} has no hourly section")]
    MalformedPayload {
        lat: f64,
        lon: f64,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),
}
