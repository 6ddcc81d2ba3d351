//! Physical constants for the geometric model.
//!
//! Room dimensions and path lengths are in feet, so the speed of sound is in
//! feet per second. The constants are the defaults of [`Acoustics`]; callers
//! that need different air or wall properties pass their own instance.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RoomError};

// --------------------------------- Constants -------------------------------------

/// Speed of sound in air, feet per second.
pub const SPEED_OF_SOUND: f64 = 1125.0;

/// Added to path lengths before inverting them into gains.
pub const EPSILON: f64 = 1.0e-6;

/// Fraction of amplitude kept per wall bounce (0 = absorb, 1 = reflect).
pub const REFLECTION_COEFFICIENT: f64 = 0.7;

// --------------------------------- Config ----------------------------------------

/// Propagation parameters used by the path deriver.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Acoustics {
    /// Feet per second.
    pub speed_of_sound: f64,
    /// Denominator guard for `1 / (d + epsilon)`; must be > 0.
    pub epsilon: f64,
    /// Per-bounce amplitude factor in [0, 1].
    pub reflection_coefficient: f64,
}

impl Default for Acoustics {
    fn default() -> Self {
        Self {
            speed_of_sound: SPEED_OF_SOUND,
            epsilon: EPSILON,
            reflection_coefficient: REFLECTION_COEFFICIENT,
        }
    }
}

impl Acoustics {
    /// Check every field against its admissible range.
    pub fn validate(&self) -> Result<()> {
        if !(self.speed_of_sound.is_finite() && self.speed_of_sound > 0.0) {
            return Err(RoomError::InvalidAcoustics {
                message: format!("speed of sound must be finite and > 0, got {}", self.speed_of_sound),
            });
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(RoomError::InvalidAcoustics {
                message: format!("epsilon must be finite and > 0, got {}", self.epsilon),
            });
        }
        if !(0.0..=1.0).contains(&self.reflection_coefficient) {
            return Err(RoomError::InvalidAcoustics {
                message: format!(
                    "reflection coefficient must be within [0, 1], got {}",
                    self.reflection_coefficient
                ),
            });
        }
        Ok(())
    }

    /// Seconds needed to travel `distance_ft`.
    #[inline]
    pub fn delay_for(&self, distance_ft: f64) -> f64 {
        distance_ft / self.speed_of_sound
    }

    /// Inverse-distance amplitude after `bounces` reflections.
    ///
    /// The coefficient is applied once as `r^bounces`; intermediate wall hits
    /// are not re-derived.
    #[inline]
    pub fn gain_for(&self, distance_ft: f64, bounces: u32) -> f64 {
        let spreading = 1.0 / (distance_ft + self.epsilon);
        if bounces == 0 {
            spreading
        } else {
            spreading * self.reflection_coefficient.powi(bounces as i32)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(Acoustics::default().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_values() {
        let bad = Acoustics { reflection_coefficient: 1.2, ..Acoustics::default() };
        assert!(matches!(bad.validate(), Err(RoomError::InvalidAcoustics { .. })));
        let bad = Acoustics { speed_of_sound: 0.0, ..Acoustics::default() };
        assert!(bad.validate().is_err());
        let bad = Acoustics { epsilon: f64::NAN, ..Acoustics::default() };
        assert!(bad.validate().is_err());
        let bad = Acoustics { epsilon: 0.0, ..Acoustics::default() };
        assert!(matches!(bad.validate(), Err(RoomError::InvalidAcoustics { .. })));
    }

    #[test]
    fn gain_applies_coefficient_per_bounce() {
        let a = Acoustics::default();
        let g0 = a.gain_for(10.0, 0);
        let g2 = a.gain_for(10.0, 2);
        assert!((g2 - g0 * 0.49).abs() < 1e-12, "g0={g0} g2={g2}");
    }

    #[test]
    fn zero_distance_gain_is_finite() {
        let g = Acoustics::default().gain_for(0.0, 0);
        assert!(g.is_finite());
        assert!((g - 1.0e6).abs() < 1e-3);
    }
}
