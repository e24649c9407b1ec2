//! Endpoint, timeout, retry and concurrency settings shared by the HTTP clients.

use crate::error::CupWeatherError;
use crate::retry::RetryPolicy;
use bon::bon;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const DEFAULT_ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for [`crate::MatchEnricher`] and the clients it owns.
///
/// `ClientConfig::default()` targets the public Open-Meteo endpoints, sends one request at a
/// time and retries transient failures three times. Use the builder to point at another
/// deployment (or a mock server) or to tune the retry policy.
///
/// # Examples
///
/// ```
/// use cupweather::{ClientConfig, RetryPolicy};
/// use std::time::Duration;
///
/// let config = ClientConfig::builder()
///     .timeout(Duration::from_secs(10))
///     .retry(RetryPolicy::none())
///     .concurrency(4)
///     .build()
///     .unwrap();
/// assert_eq!(config.concurrency, 4);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub geocoding_url: String,
    pub archive_url: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
    /// How many match records are enriched at the same time.
    pub concurrency: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            archive_url: DEFAULT_ARCHIVE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            concurrency: 1,
        }
    }
}

#[bon]
impl ClientConfig {
    /// Builds a validated config; every unset field keeps its default.
    ///
    /// # Errors
    ///
    /// Returns [`CupWeatherError::InvalidConfig`] for a zero concurrency or a zero timeout.
    #[builder]
    pub fn new(
        #[builder(into)] geocoding_url: Option<String>,
        #[builder(into)] archive_url: Option<String>,
        timeout: Option<Duration>,
        retry: Option<RetryPolicy>,
        concurrency: Option<usize>,
    ) -> Result<Self, CupWeatherError> {
        let defaults = Self::default();
        let config = Self {
            geocoding_url: geocoding_url.unwrap_or(defaults.geocoding_url),
            archive_url: archive_url.unwrap_or(defaults.archive_url),
            timeout: timeout.unwrap_or(defaults.timeout),
            retry: retry.unwrap_or(defaults.retry),
            concurrency: concurrency.unwrap_or(defaults.concurrency),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CupWeatherError> {
        if self.concurrency == 0 {
            return Err(CupWeatherError::InvalidConfig(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(CupWeatherError::InvalidConfig(
                "request timeout must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn http_client(&self) -> Result<Client, CupWeatherError> {
        Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(CupWeatherError::HttpClient)
    }
}
