//! Entry point that joins match records with geocoded locations and window weather.

use crate::config::ClientConfig;
use crate::error::CupWeatherError;
use crate::geo::resolver::GeoResolver;
use crate::types::match_record::MatchRecord;
use crate::types::match_window::MatchWindow;
use crate::weather_data::aggregator::WeatherWindowAggregator;
use crate::weather_data::archive_client::ArchiveClient;
use bon::bon;
use futures_util::{stream, StreamExt};
use log::{debug, info};

/// Attaches a location and weather statistics to match records.
///
/// Holds one [`GeoResolver`] and one [`WeatherWindowAggregator`], so repeated enrichment
/// passes share their caches.
///
/// # Examples
///
/// ```no_run
/// # use cupweather::{load_matches, CupWeatherError, MatchEnricher};
/// # #[tokio::main]
/// # async fn main() -> Result<(), CupWeatherError> {
/// let enricher = MatchEnricher::new()?;
/// let matches = load_matches("data/WorldCupMatches.csv")?;
///
/// let enriched = enricher.enrich(matches).await;
/// for m in enriched.iter().take(5) {
///     println!("{} - {}: {:?}", m.home_team, m.away_team, m.weather);
/// }
/// # Ok(())
/// # }
/// ```
pub struct MatchEnricher {
    geo: GeoResolver,
    weather: WeatherWindowAggregator,
    concurrency: usize,
}

#[bon]
impl MatchEnricher {
    /// Creates an enricher for the public Open-Meteo endpoints with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`CupWeatherError::HttpClient`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self, CupWeatherError> {
        Self::from_config(ClientConfig::default())
    }

    /// # Errors
    ///
    /// Returns [`CupWeatherError::InvalidConfig`] for an invalid `config` and
    /// [`CupWeatherError::HttpClient`] if the HTTP client cannot be built.
    pub fn from_config(config: ClientConfig) -> Result<Self, CupWeatherError> {
        config.validate()?;
        let client = config.http_client()?;
        Ok(Self {
            geo: GeoResolver::new(client.clone(), &config),
            weather: WeatherWindowAggregator::new(ArchiveClient::new(client, &config)),
            concurrency: config.concurrency,
        })
    }

    pub fn geo(&self) -> &GeoResolver {
        &self.geo
    }

    pub fn weather(&self) -> &WeatherWindowAggregator {
        &self.weather
    }

    /// Enriches every record, returning them in input order.
    ///
    /// A record whose city or weather cannot be resolved comes back with `location` and/or
    /// `weather` absent; nothing is dropped and one failure never affects another record.
    pub async fn enrich(&self, records: Vec<MatchRecord>) -> Vec<MatchRecord> {
        let total = records.len();
        let enriched: Vec<MatchRecord> = stream::iter(records)
            .map(|record| self.enrich_one(record))
            .buffered(self.concurrency)
            .collect()
            .await;

        let located = enriched.iter().filter(|r| r.location.is_some()).count();
        let with_weather = enriched.iter().filter(|r| !r.weather.is_absent()).count();
        info!(
            "Enriched {} matches: {} located, {} with weather",
            total, located, with_weather
        );
        enriched
    }

    /// Enriches a single record.
    pub async fn enrich_one(&self, mut record: MatchRecord) -> MatchRecord {
        let window = record
            .window
            .or_else(|| record.kickoff.map(MatchWindow::from_kickoff));
        record.window = window;
        record.location = self.geo.resolve(&record.city).await;

        match (record.location, window) {
            (Some(location), Some(window)) => {
                record.weather = self
                    .weather
                    .aggregate(location.lat(), location.lon(), window.start(), window.end())
                    .await;
            }
            (_, None) => debug!(
                "{} - {} ({}) has no kickoff, skipping weather",
                record.home_team, record.away_team, record.year
            ),
            (None, _) => debug!(
                "{} - {} ({}) has no location, skipping weather",
                record.home_team, record.away_team, record.year
            ),
        }
        record
    }

    /// Enriches the records of one tournament, or of every tournament from `min_year` on.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.records(Vec<MatchRecord>)`: **Required.** The records to select from.
    /// * `.year(i32)`: Optional. Keep only this tournament.
    /// * `.min_year(i32)`: Optional. Drop tournaments before this year.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use cupweather::{load_matches, CupWeatherError, MatchEnricher};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), CupWeatherError> {
    /// let enricher = MatchEnricher::new()?;
    /// let matches = load_matches("data/WorldCupMatches.csv")?;
    ///
    /// let brazil_2014 = enricher
    ///     .enrich_selection()
    ///     .records(matches)
    ///     .year(2014)
    ///     .call()
    ///     .await;
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn enrich_selection(
        &self,
        records: Vec<MatchRecord>,
        year: Option<i32>,
        min_year: Option<i32>,
    ) -> Vec<MatchRecord> {
        let selected: Vec<MatchRecord> = records
            .into_iter()
            .filter(|r| year.map_or(true, |y| r.year == y))
            .filter(|r| min_year.map_or(true, |y| r.year >= y))
            .collect();
        self.enrich(selected).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::RetryPolicy;
    use crate::types::location::LatLon;
    use chrono::{NaiveDate, NaiveDateTime};
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn kickoff(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn record(year: i32, city: &str, home: &str, away: &str, at: NaiveDateTime) -> MatchRecord {
        MatchRecord::builder()
            .year(year)
            .city(city)
            .home_team(home)
            .away_team(away)
            .kickoff(at)
            .home_goals(1)
            .away_goals(0)
            .build()
    }

    async fn mount_geocoding(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("name", "Milan"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"latitude": 45.46, "longitude": 9.19}]
            })))
            .expect(1)
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("name", "Atlantis"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(server)
            .await;
    }

    async fn mount_archive(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/v1/archive"))
            .and(query_param("start_date", "1990-06-08"))
            .and(query_param("end_date", "1990-06-08"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "hourly": {
                    "time": ["1990-06-08T17:00", "1990-06-08T18:00", "1990-06-08T19:00"],
                    "rain": [0.1, 0.3, 5.0],
                    "temperature_2m": [26.0, 24.0, 10.0],
                    "wind_speed_10m": [8.0, 10.0, 50.0],
                    "snowfall": [0.0, 0.0, 0.0]
                }
            })))
            .expect(1)
            .mount(server)
            .await;
    }

    fn enricher_for(server: &MockServer, concurrency: usize) -> MatchEnricher {
        let config = ClientConfig::builder()
            .geocoding_url(format!("{}/v1/search", server.uri()))
            .archive_url(format!("{}/v1/archive", server.uri()))
            .retry(RetryPolicy::none())
            .concurrency(concurrency)
            .build()
            .unwrap();
        MatchEnricher::from_config(config).unwrap()
    }

    #[tokio::test]
    async fn test_enrich_preserves_order_and_absents() {
        let server = MockServer::start().await;
        mount_geocoding(&server).await;
        mount_archive(&server).await;

        let records = vec![
            record(1990, "Milan ", "Argentina", "Cameroon", kickoff(1990, 6, 8, 17)),
            record(1990, "Atlantis", "Nowhere", "Elsewhere", kickoff(1990, 6, 9, 17)),
            record(1990, "Milan ", "Germany FR", "Yugoslavia", kickoff(1990, 6, 8, 17)),
        ];

        let enriched = enricher_for(&server, 1).enrich(records).await;

        assert_eq!(enriched.len(), 3);
        assert_eq!(enriched[0].home_team, "Argentina");
        assert_eq!(enriched[1].home_team, "Nowhere");
        assert_eq!(enriched[2].home_team, "Germany FR");

        assert_eq!(enriched[0].location, Some(LatLon(45.46, 9.19)));
        assert_eq!(enriched[0].weather.temperature_mean, Some(25.0));
        assert_eq!(enriched[0].weather.rain_total, Some(0.4));
        assert_eq!(enriched[0].weather.wind_speed_mean, Some(9.0));

        assert_eq!(enriched[1].location, None);
        assert!(enriched[1].weather.is_absent());

        // Processing carried on after the failed record.
        assert_eq!(enriched[2].weather, enriched[0].weather);
    }

    #[tokio::test]
    async fn test_concurrent_enrichment_collapses_lookups() {
        let server = MockServer::start().await;
        mount_geocoding(&server).await;
        mount_archive(&server).await;

        let records: Vec<MatchRecord> = (0..12)
            .map(|i| {
                let city = if i % 4 == 3 { "Atlantis" } else { "Milan" };
                record(1990, city, &format!("Home {i}"), "Away", kickoff(1990, 6, 8, 17))
            })
            .collect();

        let enriched = enricher_for(&server, 6).enrich(records).await;

        assert_eq!(enriched.len(), 12);
        for (i, r) in enriched.iter().enumerate() {
            assert_eq!(r.home_team, format!("Home {i}"));
            assert_eq!(r.location.is_some(), i % 4 != 3);
        }
        // `expect(1)` on every mock verifies one call per distinct key when the server drops.
    }

    #[tokio::test]
    async fn test_record_without_kickoff_keeps_location() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"latitude": 45.46, "longitude": 9.19}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/archive"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let undated = MatchRecord::builder()
            .year(1934)
            .city("Milan")
            .home_team("Switzerland")
            .away_team("Netherlands")
            .build();
        let enriched = enricher_for(&server, 1).enrich_one(undated).await;

        assert_eq!(enriched.location, Some(LatLon(45.46, 9.19)));
        assert!(enriched.window.is_none());
        assert!(enriched.weather.is_absent());
    }

    #[tokio::test]
    async fn test_enrich_selection_filters_years() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let enricher = enricher_for(&server, 1);
        let records = vec![
            record(1930, "Montevideo", "France", "Mexico", kickoff(1930, 7, 13, 15)),
            record(1990, "Milan", "Argentina", "Cameroon", kickoff(1990, 6, 8, 17)),
            record(2014, "Recife", "Ivory Coast", "Japan", kickoff(2014, 6, 14, 22)),
        ];

        let only_1990 = enricher
            .enrich_selection()
            .records(records.clone())
            .year(1990)
            .call()
            .await;
        assert_eq!(only_1990.len(), 1);
        assert_eq!(only_1990[0].home_team, "Argentina");

        let post_war = enricher
            .enrich_selection()
            .records(records)
            .min_year(1940)
            .call()
            .await;
        assert_eq!(
            post_war.iter().map(|r| r.year).collect::<Vec<_>>(),
            vec![1990, 2014]
        );
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ClientConfig {
            concurrency: 0,
            ..ClientConfig::default()
        };
        assert!(matches!(
            MatchEnricher::from_config(config),
            Err(CupWeatherError::InvalidConfig(_))
        ));
    }
}
