//! Path deriver: image-source positions → (delay, gain) pairs.
//!
//! The direct path always comes first, followed by order 1, order 2, …,
//! each order in the wall enumeration order of the image generator.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::acoustics::Acoustics;
use crate::geometry::Point2;
use crate::room::{Room, WALL_COUNT};

/// One propagation path from the source to the receiver.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReflectionPath {
    /// Seconds, >= 0.
    pub delay: f64,
    /// Linear amplitude.
    pub gain: f64,
    /// Number of wall bounces (0 = direct).
    #[serde(default)]
    pub order: u32,
}

impl ReflectionPath {
    #[inline]
    pub const fn new(delay: f64, gain: f64) -> Self {
        Self { delay, gain, order: 0 }
    }

    #[inline]
    pub fn is_direct(&self) -> bool {
        self.order == 0
    }
}

/// Total paths returned for `order`: `1 + 4 + … + 4^order`.
///
/// `None` once the count no longer fits in a `u64` (order 32 and up).
#[inline]
pub fn path_count(order: u32) -> Option<u64> {
    // 1 + 4 (4^n - 1) / 3
    let walls = WALL_COUNT as u64;
    let images = (walls.checked_pow(order)? - 1).checked_mul(walls)?;
    Some(1 + images / (walls - 1))
}

#[inline]
fn path_from(point: &Point2, receiver: &Point2, bounces: u32, acoustics: &Acoustics) -> ReflectionPath {
    let d = point.distance_to(receiver);
    ReflectionPath {
        delay: acoustics.delay_for(d),
        gain: acoustics.gain_for(d, bounces),
        order: bounces,
    }
}

/// `orders[k - 1]` must hold the order-`k` images of `room`.
pub(crate) fn derive_paths(room: &Room, orders: &[Vec<Point2>], acoustics: &Acoustics) -> Vec<ReflectionPath> {
    let rx = room.receiver().position;
    let total: usize = 1 + orders.iter().map(Vec::len).sum::<usize>();
    let mut paths = Vec::with_capacity(total);

    paths.push(path_from(&room.source().position, &rx, 0, acoustics));
    for (k, images) in orders.iter().enumerate() {
        let bounces = k as u32 + 1;
        paths.extend(images.iter().map(|img| path_from(img, &rx, bounces, acoustics)));
    }

    debug!("derived {} reflection paths up to order {}", paths.len(), orders.len());
    paths
}
