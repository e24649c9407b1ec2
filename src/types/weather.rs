use chrono::NaiveDateTime;

/// One hourly row from the weather archive, in the location's local time.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSample {
    pub time: NaiveDateTime,
    /// mm
    pub rain: Option<f64>,
    /// °C at 2 m
    pub temperature: Option<f64>,
    /// km/h at 10 m
    pub wind_speed: Option<f64>,
    /// cm
    pub snowfall: Option<f64>,
}

/// Weather reduced over a match window.
///
/// A `None` statistic means no sample fell inside the window (or the fetch failed); it is
/// never replaced by zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WeatherWindowStats {
    pub temperature_mean: Option<f64>,
    pub rain_total: Option<f64>,
    pub wind_speed_mean: Option<f64>,
}

impl WeatherWindowStats {
    pub const ABSENT: WeatherWindowStats = WeatherWindowStats {
        temperature_mean: None,
        rain_total: None,
        wind_speed_mean: None,
    };

    pub fn is_absent(&self) -> bool {
        *self == Self::ABSENT
    }
}
