use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("Error fetching data from the geocoding API ({status}) for {url}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Failed to decode geocoding response for '{city}'")]
    Decode {
        city: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("City not found: {raw} (searched as '{normalized}')")]
    CityNotFound { raw: String, normalized: String },
}
