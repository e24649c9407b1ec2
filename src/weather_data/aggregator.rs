use crate::cache::KeyedCache;
use crate::types::weather::{WeatherSample, WeatherWindowStats};
use crate::weather_data::archive_client::ArchiveClient;
use crate::weather_data::window_frame::window_stats;
use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, warn};
use ordered_float::OrderedFloat;
use std::sync::Arc;

/// Cache key for one archive download: location plus the inclusive date range.
type SampleKey = (OrderedFloat<f64>, OrderedFloat<f64>, NaiveDate, NaiveDate);

/// Reduces archive samples to per-window statistics.
///
/// Downloads are memoised by `(lat, lon, start_date, end_date)` rather than by the exact
/// window, so every window inside the same date range reuses one fetch.
pub struct WeatherWindowAggregator {
    archive: ArchiveClient,
    sample_cache: KeyedCache<SampleKey, Arc<Vec<WeatherSample>>>,
}

impl WeatherWindowAggregator {
    pub fn new(archive: ArchiveClient) -> Self {
        Self {
            archive,
            sample_cache: KeyedCache::new(),
        }
    }

    /// Hourly samples for `start_date..=end_date`, fetched at most once per key.
    ///
    /// A failed or malformed download yields an empty set, which is cached like any other.
    pub async fn hourly_samples(
        &self,
        lat: f64,
        lon: f64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Arc<Vec<WeatherSample>> {
        let key = (OrderedFloat(lat), OrderedFloat(lon), start_date, end_date);
        self.sample_cache
            .get_or_init(key, || async {
                match self
                    .archive
                    .fetch_hourly(lat, lon, start_date, end_date)
                    .await
                {
                    Ok(samples) => Arc::new(samples),
                    Err(e) => {
                        warn!("{}", e);
                        Arc::new(Vec::new())
                    }
                }
            })
            .await
    }

    /// Weather statistics for `[window_start, window_end)` at `(lat, lon)`.
    ///
    /// Never fails: any download or processing problem yields [`WeatherWindowStats::ABSENT`].
    pub async fn aggregate(
        &self,
        lat: f64,
        lon: f64,
        window_start: NaiveDateTime,
        window_end: NaiveDateTime,
    ) -> WeatherWindowStats {
        let samples = self
            .hourly_samples(lat, lon, window_start.date(), window_end.date())
            .await;

        match window_stats(&samples, window_start, window_end) {
            Ok(stats) => {
                debug!(
                    "Window {}..{} at ({}, {}): {:?}",
                    window_start, window_end, lat, lon, stats
                );
                stats
            }
            Err(e) => {
                warn!(
                    "Failed to aggregate weather for {}..{} at ({}, {}): {}",
                    window_start, window_end, lat, lon, e
                );
                WeatherWindowStats::ABSENT
            }
        }
    }

    /// Number of cached date-range downloads.
    pub async fn cached_ranges(&self) -> usize {
        self.sample_cache.len().await
    }
}
