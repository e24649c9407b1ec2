use crate::cache::KeyedCache;
use crate::config::ClientConfig;
use crate::geo::error::GeocodeError;
use crate::geo::normalize::normalize_city;
use crate::retry::{send_with_retry, RetryPolicy};
use crate::types::location::LatLon;
use log::{debug, info, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Serialize)]
struct GeocodeQuery<'a> {
    name: &'a str,
    count: u8,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    // Omitted entirely by the service when nothing matches.
    results: Option<Vec<GeocodeResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    latitude: f64,
    longitude: f64,
}

/// Resolves city labels to coordinates through the geocoding service.
///
/// Every answer, including "not found", is remembered per raw label for the lifetime of
/// the resolver.
pub struct GeoResolver {
    client: Client,
    endpoint: String,
    retry: RetryPolicy,
    cache: KeyedCache<String, Option<LatLon>>,
}

impl GeoResolver {
    pub fn new(client: Client, config: &ClientConfig) -> Self {
        Self {
            client,
            endpoint: config.geocoding_url.clone(),
            retry: config.retry,
            cache: KeyedCache::new(),
        }
    }

    /// Coordinates for `raw_label`, or `None` if the city could not be resolved.
    ///
    /// Failures are logged as warnings and cached like any other answer, so a label is
    /// looked up over the network at most once.
    pub async fn resolve(&self, raw_label: &str) -> Option<LatLon> {
        if normalize_city(raw_label).is_empty() {
            debug!("Skipping empty city label {:?}", raw_label);
            return None;
        }
        self.cache
            .get_or_init(raw_label.to_string(), || async {
                match self.lookup(raw_label).await {
                    Ok(location) => Some(location),
                    Err(e) => {
                        warn!("{}", e);
                        None
                    }
                }
            })
            .await
    }

    /// Resolves every distinct label in `labels`.
    pub async fn resolve_all<'a, I>(&self, labels: I) -> HashMap<String, Option<LatLon>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut resolved = HashMap::new();
        for label in labels {
            if !resolved.contains_key(label) {
                let location = self.resolve(label).await;
                resolved.insert(label.to_string(), location);
            }
        }
        resolved
    }

    /// Queries the geocoding service for the best match of `raw_label`, bypassing the cache.
    ///
    /// # Errors
    ///
    /// [`GeocodeError::CityNotFound`] when the service has no match,
    /// [`GeocodeError::HttpStatus`] for a non-success answer, and
    /// [`GeocodeError::NetworkRequest`] / [`GeocodeError::Decode`] for transport and payload
    /// failures.
    pub async fn lookup(&self, raw_label: &str) -> Result<LatLon, GeocodeError> {
        let name = normalize_city(raw_label);
        if name.is_empty() {
            return Err(GeocodeError::CityNotFound {
                raw: raw_label.to_string(),
                normalized: name,
            });
        }
        debug!("Geocoding '{}' as '{}'", raw_label, name);

        let query = GeocodeQuery {
            name: &name,
            count: 1,
        };
        let response = send_with_retry(&self.retry, &self.endpoint, || {
            self.client.get(&self.endpoint).query(&query).send()
        })
        .await
        .map_err(|e| GeocodeError::NetworkRequest(self.endpoint.clone(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::HttpStatus {
                url: self.endpoint.clone(),
                status,
            });
        }

        let body: GeocodeResponse = response.json().await.map_err(|e| GeocodeError::Decode {
            city: name.clone(),
            source: e,
        })?;

        let first = body
            .results
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| GeocodeError::CityNotFound {
                raw: raw_label.to_string(),
                normalized: name.clone(),
            })?;

        info!(
            "Geocoded '{}' to ({}, {})",
            name, first.latitude, first.longitude
        );
        Ok(LatLon(first.latitude, first.longitude))
    }

    /// Number of labels with a cached answer.
    pub async fn cached_labels(&self) -> usize {
        self.cache.len().await
    }
}
