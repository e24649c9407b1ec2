pub mod aggregator;
pub mod archive_client;
pub mod error;
pub mod window_frame;
