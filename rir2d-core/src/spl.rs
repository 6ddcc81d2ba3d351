//! Free-field sound pressure level of a point source.

use crate::error::{Result, RoomError};
use crate::geometry::{Point2, Source};

/// Closest distance used in the level formula, feet.
pub const MIN_DISTANCE_FT: f64 = 1.0e-6;

/// Inverse-square correction between source power and SPL, dB.
pub const SPL_OFFSET_DB: f64 = 0.68;

/// Level in dB at `point`: `power − 20·log10(d) − 0.68`, with `d` clamped to
/// [`MIN_DISTANCE_FT`].
pub fn level_db_at_point(point: Point2, source: &Source) -> Result<f64> {
    let power = source.power_db.ok_or(RoomError::MissingPower)?;
    let d = point.distance_to(&source.position).max(MIN_DISTANCE_FT);
    Ok(power - 20.0 * d.log10() - SPL_OFFSET_DB)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nine_feet_from_a_hundred_db_source() {
        let s = Source::with_power((0.0, 1.0), 100.0);
        let l = level_db_at_point(Point2::new(0.0, 10.0), &s).unwrap();
        assert!((l - (100.0 - 20.0 * 9.0_f64.log10() - 0.68)).abs() < 1e-12);
        assert!((l - 80.2351).abs() < 1e-3, "l={l}");
    }

    #[test]
    fn doubling_distance_loses_six_db() {
        let s = Source::with_power((0.0, 0.0), 90.0);
        let a = level_db_at_point(Point2::new(2.0, 0.0), &s).unwrap();
        let b = level_db_at_point(Point2::new(4.0, 0.0), &s).unwrap();
        assert!((a - b - 6.0206).abs() < 1e-3);
    }

    #[test]
    fn coincident_point_is_clamped() {
        let s = Source::with_power((1.0, 1.0), 0.0);
        let l = level_db_at_point(Point2::new(1.0, 1.0), &s).unwrap();
        assert!((l - (120.0 - 0.68)).abs() < 1e-9);
    }

    #[test]
    fn missing_power_is_an_error() {
        let s = Source::new((0.0, 0.0));
        assert_eq!(level_db_at_point(Point2::new(1.0, 0.0), &s), Err(RoomError::MissingPower));
    }
}
