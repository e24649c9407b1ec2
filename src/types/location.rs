/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
///
/// # Examples
///
/// ```
/// use cupweather::LatLon;
///
/// let rome = LatLon(41.89193, 12.51133);
/// assert_eq!(rome.lat(), 41.89193);
/// assert_eq!(rome.lon(), 12.51133);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

impl LatLon {
    pub fn lat(&self) -> f64 {
        self.0
    }

    pub fn lon(&self) -> f64 {
        self.1
    }
}
