//! Shared trait abstractions for common patterns

/// Configuration preset selector shared by configurable components
#[derive(Debug, Clone)]
pub enum ConfigPreset<T> {
    /// Use default configuration
    Default,
    /// Low resource usage configuration
    LowResource,
    /// High performance configuration
    HighPerformance,
    /// Custom configuration
    Custom(T),
}

/// Linear interpolation between two values of the same kind
pub trait Lerp {
    fn lerp(&self, other: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for crate::core::geo::Point {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        use crate::core::geo::Point;
        Point::new(self.x.lerp(&other.x, t), self.y.lerp(&other.y, t))
    }
}

impl Lerp for crate::core::geo::LatLng {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        use crate::core::geo::LatLng;
        LatLng::new(self.lat.lerp(&other.lat, t), self.lng.lerp(&other.lng, t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::LatLng;

    #[test]
    fn test_lerp_midpoint() {
        let a = LatLng::new(0.0, 0.0);
        let b = LatLng::new(10.0, -20.0);
        assert_eq!(a.lerp(&b, 0.5), LatLng::new(5.0, -10.0));
        assert_eq!(2.0_f64.lerp(&4.0, 0.25), 2.5);
    }
}
