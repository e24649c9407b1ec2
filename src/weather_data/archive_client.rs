use crate::config::ClientConfig;
use crate::retry::{send_with_retry, RetryPolicy};
use crate::types::weather::WeatherSample;
use crate::weather_data::error::WeatherDataError;
use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Hourly variables requested from the archive, in the order the service documents them.
pub const HOURLY_FIELDS: &str = "rain,temperature_2m,wind_speed_10m,snowfall";
const ARCHIVE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Serialize)]
struct ArchiveQuery<'a> {
    latitude: f64,
    longitude: f64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    hourly: &'a str,
    timezone: &'a str,
}

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    hourly: Option<HourlyBlock>,
}

// Parallel arrays: `time[i]` belongs to `rain[i]`, `temperature_2m[i]`, ...
#[derive(Debug, Deserialize)]
struct HourlyBlock {
    time: Vec<String>,
    #[serde(default)]
    rain: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    wind_speed_10m: Vec<Option<f64>>,
    #[serde(default)]
    snowfall: Vec<Option<f64>>,
}

impl HourlyBlock {
    fn into_samples(self) -> Vec<WeatherSample> {
        let at = |values: &[Option<f64>], i: usize| values.get(i).copied().flatten();

        self.time
            .iter()
            .enumerate()
            .filter_map(|(i, raw_time)| {
                let Ok(time) = NaiveDateTime::parse_from_str(raw_time, ARCHIVE_TIME_FORMAT) else {
                    debug!("Skipping archive row with unparseable time '{}'", raw_time);
                    return None;
                };
                Some(WeatherSample {
                    time,
                    rain: at(&self.rain, i),
                    temperature: at(&self.temperature_2m, i),
                    wind_speed: at(&self.wind_speed_10m, i),
                    snowfall: at(&self.snowfall, i),
                })
            })
            .collect()
    }
}

/// Thin client for the historical weather archive.
pub struct ArchiveClient {
    client: Client,
    endpoint: String,
    retry: RetryPolicy,
}

impl ArchiveClient {
    pub fn new(client: Client, config: &ClientConfig) -> Self {
        Self {
            client,
            endpoint: config.archive_url.clone(),
            retry: config.retry,
        }
    }

    /// Downloads hourly samples for every hour of `start_date..=end_date` at the given location.
    ///
    /// Times are local to the location (`timezone=auto`), matching the local kickoff times in
    /// the match dataset.
    ///
    /// # Errors
    ///
    /// [`WeatherDataError::HttpStatus`] for a non-success answer,
    /// [`WeatherDataError::MalformedPayload`] if the answer has no `hourly` block, and
    /// [`WeatherDataError::NetworkRequest`] / [`WeatherDataError::Decode`] for transport and
    /// JSON failures.
    pub async fn fetch_hourly(
        &self,
        lat: f64,
        lon: f64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<WeatherSample>, WeatherDataError> {
        let query = ArchiveQuery {
            latitude: lat,
            longitude: lon,
            start_date,
            end_date,
            hourly: HOURLY_FIELDS,
            timezone: "auto",
        };
        info!(
            "Fetching hourly weather for ({}, {}) from {} to {}",
            lat, lon, start_date, end_date
        );

        let response = send_with_retry(&self.retry, &self.endpoint, || {
            self.client.get(&self.endpoint).query(&query).send()
        })
        .await
        .map_err(|e| WeatherDataError::NetworkRequest(self.endpoint.clone(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherDataError::HttpStatus {
                url: self.endpoint.clone(),
                status,
            });
        }

        let body: ArchiveResponse =
            response.json().await.map_err(|e| WeatherDataError::Decode {
                url: self.endpoint.clone(),
                source: e,
            })?;

        let hourly = body.hourly.ok_or(WeatherDataError::MalformedPayload {
            lat,
            lon,
            start: start_date,
            end: end_date,
        })?;

        let samples = hourly.into_samples();
        debug!(
            "Loaded {} hourly samples for ({}, {}) {}..{}",
            samples.len(),
            lat,
            lon,
            start_date,
            end_date
        );
        Ok(samples)
    }
}
