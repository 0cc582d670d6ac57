use std::fmt;

/// Geographic coordinate in degrees, longitude first.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    pub fn is_valid(&self) -> bool {
        self.lng.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lng)
            && (-90.0..=90.0).contains(&self.lat)
    }

    /// Folds longitude into [-180, 180). Leaflet reports unwrapped values
    /// when the map is panned onto a repeated copy of the world.
    pub fn wrapped(&self) -> Self {
        if !self.lng.is_finite() || (-180.0..180.0).contains(&self.lng) {
            return *self;
        }
        Self {
            lng: (self.lng + 180.0).rem_euclid(360.0) - 180.0,
            lat: self.lat,
        }
    }

    /// Order expected by Leaflet style APIs.
    pub fn lat_lng(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

impl From<(f64, f64)> for LngLat {
    fn from((lng, lat): (f64, f64)) -> Self {
        Self { lng, lat }
    }
}

impl fmt::Display for LngLat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lng, self.lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_five_decimals() {
        let point = LngLat::new(-46.63, -23.55);
        assert_eq!(point.to_string(), "-46.63000, -23.55000");
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(LngLat::new(0.0, 20.0).is_valid());
        assert!(!LngLat::new(181.0, 0.0).is_valid());
        assert!(!LngLat::new(0.0, f64::NAN).is_valid());
    }

    #[test]
    fn wrapping_folds_repeated_worlds() {
        let wrapped = LngLat::new(313.37, -23.55).wrapped();
        assert!((wrapped.lng - -46.63).abs() < 1e-9);
        assert_eq!(wrapped.lat, -23.55);
        assert!(wrapped.is_valid());

        let west = LngLat::new(-406.63, 10.0).wrapped();
        assert!((west.lng - -46.63).abs() < 1e-9);
        assert_eq!(LngLat::new(180.0, 0.0).wrapped().lng, -180.0);
        assert_eq!(LngLat::new(12.5, 0.0).wrapped(), LngLat::new(12.5, 0.0));
        assert!(!LngLat::new(f64::INFINITY, 0.0).wrapped().is_valid());
    }
}
