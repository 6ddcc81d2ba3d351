//! 2D geometry primitives: points, sources and receivers.
//!
//! Conventions
//! - Units are **feet**, matching the speed of sound in [`crate::acoustics`].
//! - All types are small `Copy` values; nothing here allocates.

use serde::{Deserialize, Serialize};

/// A point in the room plane.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in feet.
    #[inline]
    pub fn distance_to(&self, other: &Point2) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx.hypot(dy)
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point2 {
    #[inline]
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// A point source (e.g. a loudspeaker).
///
/// `power_db` is only consulted by [`crate::spl::level_db_at_point`]; the
/// image-source model ignores it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub position: Point2,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_db: Option<f64>,
}

impl Source {
    #[inline]
    pub fn new(position: impl Into<Point2>) -> Self {
        Self { position: position.into(), power_db: None }
    }

    #[inline]
    pub fn with_power(position: impl Into<Point2>, power_db: f64) -> Self {
        Self { position: position.into(), power_db: Some(power_db) }
    }
}

/// A listener position.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Receiver {
    pub position: Point2,
}

impl Receiver {
    #[inline]
    pub fn new(position: impl Into<Point2>) -> Self {
        Self { position: position.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_symmetric() {
        let a = Point2::new(-1.0, -2.0);
        let b = Point2::new(1.0, -1.0);
        assert!((a.distance_to(&b) - 5.0_f64.sqrt()).abs() < 1e-12);
        assert_eq!(a.distance_to(&b), b.distance_to(&a));
        assert_eq!(a.distance_to(&a), 0.0);
    }

    #[test]
    fn source_power_is_optional() {
        let s = Source::new((0.0, -1.0));
        assert!(s.power_db.is_none());
        let s = Source::with_power((0.0, -1.0), 100.0);
        assert_eq!(s.power_db, Some(100.0));
    }
}
