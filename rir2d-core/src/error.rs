//! Error type for room construction and RIR queries.
//!
//! Every failure here is an input-validation failure: the core performs no
//! I/O, so a call either succeeds with a fully-formed value or fails before
//! any state is created.

use thiserror::Error;

/// Which of the two room occupants a geometry error refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Occupant {
    Source,
    Receiver,
}

impl core::fmt::Display for Occupant {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Occupant::Source => f.write_str("source"),
            Occupant::Receiver => f.write_str("receiver"),
        }
    }
}

/// Error type for `rir2d-core` operations.
#[derive(Debug, Error, PartialEq)]
pub enum RoomError {
    /// Width or length is not a finite, strictly positive number.
    #[error("invalid room dimensions: width={width}, length={length} (both must be finite and > 0)")]
    InvalidDimensions {
        /// Requested width in feet.
        width: f64,
        /// Requested length in feet.
        length: f64,
    },

    /// Source or receiver lies on a wall, outside the room, or is not finite.
    #[error("{occupant} position ({x}, {y}) is outside of the room")]
    PointOutsideRoom {
        /// Which point failed the interior check.
        occupant: Occupant,
        /// Offending x coordinate.
        x: f64,
        /// Offending y coordinate.
        y: f64,
    },

    /// Reflection order below 1.
    #[error("invalid reflection order {order}: must be >= 1")]
    InvalidOrder {
        /// Requested order.
        order: u32,
    },

    /// Reflection order above the supported cap.
    #[error("reflection order {order} exceeds the maximum of {max}")]
    OrderTooLarge {
        /// Requested order.
        order: u32,
        /// Largest accepted order.
        max: u32,
    },

    /// Sample rate of zero.
    #[error("invalid sample rate {sample_rate}: must be > 0")]
    InvalidSampleRate {
        /// Requested sample rate in Hz.
        sample_rate: u32,
    },

    /// Buffer duration not finite/positive, or rounding to zero samples.
    #[error("invalid RIR length {length_sec}s: must be finite and cover at least one sample")]
    InvalidLength {
        /// Requested duration in seconds.
        length_sec: f64,
    },

    /// Physical constants outside their admissible ranges.
    #[error("invalid acoustics: {message}")]
    InvalidAcoustics {
        /// What was wrong.
        message: String,
    },

    /// SPL evaluation needs a source emission power.
    #[error("source has no emission power; cannot evaluate sound pressure level")]
    MissingPower,
}

/// Result type alias for `rir2d-core` operations.
pub type Result<T> = core::result::Result<T, RoomError>;

impl RoomError {
    /// Returns true if the error comes from room geometry (dimensions or occupant placement).
    pub fn is_geometry_error(&self) -> bool {
        matches!(
            self,
            RoomError::InvalidDimensions { .. } | RoomError::PointOutsideRoom { .. }
        )
    }

    /// Returns true if the error comes from query arguments (order, rate, length).
    pub fn is_query_error(&self) -> bool {
        matches!(
            self,
            RoomError::InvalidOrder { .. }
                | RoomError::OrderTooLarge { .. }
                | RoomError::InvalidSampleRate { .. }
                | RoomError::InvalidLength { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offender() {
        let e = RoomError::PointOutsideRoom { occupant: Occupant::Source, x: 3.0, y: 0.0 };
        assert_eq!(e.to_string(), "source position (3, 0) is outside of the room");
        assert!(e.is_geometry_error());
        assert!(!e.is_query_error());
    }

    #[test]
    fn query_errors_are_classified() {
        assert!(RoomError::InvalidOrder { order: 0 }.is_query_error());
        assert!(RoomError::InvalidSampleRate { sample_rate: 0 }.is_query_error());
        assert!(!RoomError::MissingPower.is_query_error());
    }
}
