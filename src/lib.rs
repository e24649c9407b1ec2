mod analysis;
mod cache;
mod config;
mod enricher;
mod error;
mod geo;
mod matches;
mod retry;
mod types;
mod weather_data;

pub use error::CupWeatherError;
pub use enricher::*;

pub use config::*;
pub use retry::RetryPolicy;
pub use cache::KeyedCache;

pub use types::location::LatLon;
pub use types::match_record::*;
pub use types::match_window::*;
pub use types::tournament::TournamentRecord;
pub use types::weather::*;

pub use geo::normalize::*;
pub use geo::resolver::GeoResolver;
pub use matches::loader::*;
pub use weather_data::aggregator::WeatherWindowAggregator;
pub use weather_data::archive_client::{ArchiveClient, HOURLY_FIELDS};
pub use weather_data::window_frame::*;

pub use analysis::*;

pub use geo::error::GeocodeError;
pub use matches::error::MatchDataError;
pub use weather_data::error::WeatherDataError;
