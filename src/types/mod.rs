pub mod location;
pub mod match_record;
pub mod match_window;
pub mod tournament;
pub mod weather;
