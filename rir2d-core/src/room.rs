//! Rectangular room, its walls and the recursive image-source generator.
//!
//! Frame
//! - The room's horizontal center sits at `x = 0` and its top edge at `y = 0`,
//!   so the interior is `x ∈ (-width/2, width/2)`, `y ∈ (-length, 0)`.
//! - Walls are enumerated in the fixed order **left, bottom, right, top**;
//!   every image list produced here follows that order.
//!
//! Image sources at order `k` are built by mirroring every order `k-1` image
//! across all four walls again, including the wall it was just produced by.
//! No images are merged or discarded, so order `k` always holds `4^k` points.

use cfg_if::cfg_if;
use log::trace;

use crate::acoustics::Acoustics;
use crate::error::{Occupant, Result, RoomError};
use crate::geometry::{Point2, Receiver, Source};
use crate::paths::ReflectionPath;

/// Highest reflection order accepted by the generator (`4^10` images).
pub const MAX_REFLECTION_ORDER: u32 = 10;

/// Number of walls of a rectangular room.
pub const WALL_COUNT: usize = 4;

/// One room boundary, carrying its fixed coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Wall {
    /// `x = value`
    Left(f64),
    /// `y = value`
    Bottom(f64),
    /// `x = value`
    Right(f64),
    /// `y = value`
    Top(f64),
}

/// Reflect a single coordinate across the line `fixed`.
#[inline]
fn reflect(fixed: f64, coord: f64) -> f64 {
    let dist = (fixed - coord).abs();
    if fixed > coord { fixed + dist } else { fixed - dist }
}

impl Wall {
    /// Mirror `p` across this wall. The coordinate parallel to the wall is kept.
    #[inline]
    pub fn mirror(&self, p: Point2) -> Point2 {
        match *self {
            Wall::Left(x) | Wall::Right(x) => Point2::new(reflect(x, p.x), p.y),
            Wall::Bottom(y) | Wall::Top(y) => Point2::new(p.x, reflect(y, p.y)),
        }
    }

    /// The wall's fixed coordinate.
    #[inline]
    pub fn coordinate(&self) -> f64 {
        match *self {
            Wall::Left(v) | Wall::Bottom(v) | Wall::Right(v) | Wall::Top(v) => v,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Wall::Left(_) => "left",
            Wall::Bottom(_) => "bottom",
            Wall::Right(_) => "right",
            Wall::Top(_) => "top",
        }
    }
}

/// Axis-aligned rectangular room holding one source and one receiver.
///
/// Immutable after construction; every query recomputes from the stored
/// positions.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Room {
    width: f64,
    length: f64,
    // anchor: left edge x, top edge y
    x: f64,
    y: f64,
    source: Source,
    receiver: Receiver,
}

impl Room {
    /// Build a room, failing if either point is not strictly inside it.
    pub fn new(width: f64, length: f64, source: Source, receiver: Receiver) -> Result<Self> {
        if !(width.is_finite() && width > 0.0 && length.is_finite() && length > 0.0) {
            return Err(RoomError::InvalidDimensions { width, length });
        }
        let room = Self {
            width,
            length,
            x: -width / 2.0,
            y: 0.0,
            source,
            receiver,
        };
        room.check_inside(Occupant::Source, source.position)?;
        room.check_inside(Occupant::Receiver, receiver.position)?;
        Ok(room)
    }

    fn check_inside(&self, occupant: Occupant, p: Point2) -> Result<()> {
        if self.contains(p) {
            Ok(())
        } else {
            Err(RoomError::PointOutsideRoom { occupant, x: p.x, y: p.y })
        }
    }

    /// Strict interior test; points on a wall are outside.
    #[inline]
    pub fn contains(&self, p: Point2) -> bool {
        p.x > self.x && p.x < self.x + self.width && p.y < self.y && p.y > self.y - self.length
    }

    #[inline] pub fn width(&self) -> f64 { self.width }
    #[inline] pub fn length(&self) -> f64 { self.length }
    #[inline] pub fn source(&self) -> &Source { &self.source }
    #[inline] pub fn receiver(&self) -> &Receiver { &self.receiver }

    /// Left edge x and top edge y.
    #[inline]
    pub fn anchor(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    /// The four walls in generation order: left, bottom, right, top.
    #[inline]
    pub fn walls(&self) -> [Wall; WALL_COUNT] {
        [
            Wall::Left(self.x),
            Wall::Bottom(self.y - self.length),
            Wall::Right(self.x + self.width),
            Wall::Top(self.y),
        ]
    }

    /// Straight-line source → receiver distance in feet.
    #[inline]
    pub fn direct_path_length(&self) -> f64 {
        self.source.position.distance_to(&self.receiver.position)
    }

    /// Image sources at exactly `order` reflections (`4^order` points).
    pub fn image_sources_for_order(&self, order: u32) -> Result<Vec<Point2>> {
        check_order(order)?;
        let mut images = vec![self.source.position];
        for _ in 0..order {
            images = self.mirror_all(&images);
        }
        Ok(images)
    }

    /// Image sources for every order `1..=max_order`, index `k - 1` holding order `k`.
    ///
    /// Each order is derived from the previous one in a single pass, so the
    /// result equals calling [`Room::image_sources_for_order`] per order.
    pub fn image_sources_by_order(&self, max_order: u32) -> Result<Vec<Vec<Point2>>> {
        check_order(max_order)?;
        let mut orders: Vec<Vec<Point2>> = Vec::with_capacity(max_order as usize);
        let mut prev = vec![self.source.position];
        for _ in 0..max_order {
            let next = self.mirror_all(&prev);
            orders.push(next.clone());
            prev = next;
        }
        Ok(orders)
    }

    /// Direct path plus all reflections up to `order`, using the default acoustics.
    pub fn reflection_paths_for_order(&self, order: u32) -> Result<Vec<ReflectionPath>> {
        self.reflection_paths_with(order, &Acoustics::default())
    }

    /// Direct path plus all reflections up to `order`.
    pub fn reflection_paths_with(&self, order: u32, acoustics: &Acoustics) -> Result<Vec<ReflectionPath>> {
        acoustics.validate()?;
        let orders = self.image_sources_by_order(order)?;
        Ok(crate::paths::derive_paths(self, &orders, acoustics))
    }

    fn mirror_all(&self, prev: &[Point2]) -> Vec<Point2> {
        let walls = self.walls();
        trace!("mirroring {} images across {} walls", prev.len(), WALL_COUNT);
        cfg_if! {
            if #[cfg(feature = "parallel")] {
                use rayon::prelude::*;
                prev.par_iter()
                    .flat_map_iter(|p| walls.iter().map(move |w| w.mirror(*p)))
                    .collect()
            } else {
                let mut next = Vec::with_capacity(prev.len() * WALL_COUNT);
                for p in prev {
                    next.extend(walls.iter().map(|w| w.mirror(*p)));
                }
                next
            }
        }
    }
}

fn check_order(order: u32) -> Result<()> {
    if order < 1 {
        return Err(RoomError::InvalidOrder { order });
    }
    if order > MAX_REFLECTION_ORDER {
        return Err(RoomError::OrderTooLarge { order, max: MAX_REFLECTION_ORDER });
    }
    Ok(())
}
