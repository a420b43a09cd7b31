use serde::Serialize;

/// One point of the aurora probability field.
///
/// Only constructible through [`AuroraSample::new`], which rejects
/// non-finite values, latitudes outside ±90, longitudes outside ±180 and
/// negative probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AuroraSample {
    lat: f64,
    lon: f64,
    value: f64,
}

impl AuroraSample {
    #[must_use]
    pub fn new(lat: f64, lon: f64, value: f64) -> Option<Self> {
        let valid = lat.is_finite()
            && lon.is_finite()
            && value.is_finite()
            && lat.abs() <= 90.0
            && lon.abs() <= 180.0
            && value >= 0.0;
        valid.then_some(Self { lat, lon, value })
    }

    #[must_use]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    #[must_use]
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Probability in percent.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }
}
