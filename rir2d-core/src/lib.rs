//! rir2d Core: image-source room impulse responses for rectangular 2D rooms.
//!
//! Features
//! - `parallel` : mirror each reflection order's images on the rayon pool
//!
//! Modules
//! - [`geometry`]  : `Point2`, `Source`, `Receiver`
//! - [`acoustics`] : speed of sound, epsilon, reflection coefficient (`Acoustics`)
//! - [`room`]      : `Room`, `Wall`, recursive image-source generation
//! - [`paths`]     : (delay, gain) derivation for direct + reflected paths
//! - [`rir`]       : binning into a sampled buffer, peak normalization
//! - [`spl`]       : free-field point-source level formula
//! - [`error`]     : `RoomError`
//!
//! Design
//! - Pure, synchronous computations; no I/O and no shared state
//! - `Room` is immutable; every query recomputes from the stored positions
//! - Image sources of order `k` come from mirroring all order `k-1` images
//!   across all four walls, without deduplication
//!
//! ```
//! use rir2d_core::prelude::*;
//!
//! let room = Room::new(5.0, 4.0, Source::new((-1.0, -2.0)), Receiver::new((1.0, -1.0)))?;
//! let paths = room.reflection_paths_for_order(1)?;
//! assert_eq!(paths.len(), 5);
//! let rir = build_rir(&paths, DEFAULT_SAMPLE_RATE, DEFAULT_LENGTH_SEC)?;
//! assert_eq!(rir.len(), 24_000);
//! # Ok::<(), rir2d_core::RoomError>(())
//! ```

pub mod acoustics;
pub mod error;
pub mod geometry;
pub mod paths;
pub mod rir;
pub mod room;
pub mod spl;

pub use error::{Occupant, Result, RoomError};

/// Commonly used types/functions for convenience:
pub mod prelude {
    pub use crate::acoustics::{Acoustics, EPSILON, REFLECTION_COEFFICIENT, SPEED_OF_SOUND};
    pub use crate::error::{Occupant, RoomError};
    pub use crate::geometry::{Point2, Receiver, Source};
    pub use crate::paths::{path_count, ReflectionPath};
    pub use crate::rir::{
        build_rir, build_rir_with_report, sample_index, DEFAULT_LENGTH_SEC, DEFAULT_SAMPLE_RATE,
        MAX_RIR_SAMPLES,
    };
    pub use crate::room::{Room, Wall, MAX_REFLECTION_ORDER};
    pub use crate::spl::level_db_at_point;
}

#[cfg(test)]
mod smoke {

    #[test]
    fn prelude_exists() {
        use crate::prelude::*;
        let room = Room::new(5.0, 4.0, Source::new((0.0, -1.0)), Receiver::new((1.0, -3.0))).unwrap();
        let paths = room.reflection_paths_for_order(2).unwrap();
        let _ = build_rir(&paths, DEFAULT_SAMPLE_RATE, DEFAULT_LENGTH_SEC).unwrap();
    }
}
