//! SPL coverage map: free-field level of the room's source on a grid of
//! interior points.
//!
//! Cells are at most `resolution_ft` wide, sized evenly so they tile the
//! room exactly. Levels are sampled at cell centers, so every sample point is
//! strictly inside the room.

use log::debug;
use rir2d_core::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Upper bound on grid points per axis.
pub const MAX_CELLS_PER_AXIS: usize = 4096;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageGrid {
    /// Cell-center x coordinates, left to right.
    pub xs: Vec<f64>,
    /// Cell-center y coordinates, top to bottom.
    pub ys: Vec<f64>,
    /// `levels_db[row][col]` is the level at `(xs[col], ys[row])`.
    pub levels_db: Vec<Vec<f64>>,
}

impl CoverageGrid {
    /// (min, max) level over the grid.
    pub fn range_db(&self) -> (f64, f64) {
        self.levels_db
            .iter()
            .flatten()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &l| (lo.min(l), hi.max(l)))
    }

    /// Level at the grid cell nearest to `p`.
    pub fn nearest(&self, p: Point2) -> Option<f64> {
        let col = nearest_index(&self.xs, p.x)?;
        let row = nearest_index(&self.ys, p.y)?;
        self.levels_db.get(row).and_then(|r| r.get(col)).copied()
    }
}

fn nearest_index(axis: &[f64], v: f64) -> Option<usize> {
    axis.iter()
        .enumerate()
        .min_by(|a, b| (a.1 - v).abs().total_cmp(&(b.1 - v).abs()))
        .map(|(i, _)| i)
}

fn cell_centers(start: f64, span: f64, resolution: f64, descending: bool) -> Result<Vec<f64>> {
    let cells = (span / resolution).ceil().max(1.0);
    if cells > MAX_CELLS_PER_AXIS as f64 {
        return Err(EngineError::config(format!(
            "resolution {resolution} ft gives more than {MAX_CELLS_PER_AXIS} cells per axis"
        )));
    }
    let n = cells as usize;
    let step = span / n as f64;
    Ok((0..n)
        .map(|i| {
            let offset = (i as f64 + 0.5) * step;
            if descending { start - offset } else { start + offset }
        })
        .collect())
}

/// Evaluate the source level over the room interior.
pub fn coverage_grid(room: &Room, resolution_ft: f64) -> Result<CoverageGrid> {
    if !(resolution_ft.is_finite() && resolution_ft > 0.0) {
        return Err(EngineError::config(format!("grid resolution must be > 0 ft, got {resolution_ft}")));
    }
    let source = room.source();
    if source.power_db.is_none() {
        return Err(RoomError::MissingPower.into());
    }
    let anchor = room.anchor();
    let xs = cell_centers(anchor.x, room.width(), resolution_ft, false)?;
    let ys = cell_centers(anchor.y, room.length(), resolution_ft, true)?;

    let mut levels_db = Vec::with_capacity(ys.len());
    for &y in &ys {
        let row = xs
            .iter()
            .map(|&x| level_db_at_point(Point2::new(x, y), source))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        levels_db.push(row);
    }
    debug!("coverage grid {}x{} at {resolution_ft} ft", xs.len(), ys.len());
    Ok(CoverageGrid { xs, ys, levels_db })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room_with_power() -> Room {
        Room::new(5.0, 4.0, Source::with_power((-1.0, -2.0), 100.0), Receiver::new((1.0, -1.0))).unwrap()
    }

    #[test]
    fn grid_is_strictly_inside() {
        let room = room_with_power();
        let g = coverage_grid(&room, 1.0).unwrap();
        assert_eq!(g.xs.len(), 5);
        assert_eq!(g.ys.len(), 4);
        assert_eq!(g.levels_db.len(), 4);
        for &y in &g.ys {
            for &x in &g.xs {
                assert!(room.contains(Point2::new(x, y)), "({x}, {y})");
            }
        }
        assert_eq!(g.xs[0], -2.0);
        assert_eq!(g.ys[0], -0.5);
    }

    #[test]
    fn loudest_cell_is_next_to_the_source() {
        let g = coverage_grid(&room_with_power(), 0.5).unwrap();
        let (lo, hi) = g.range_db();
        assert!(hi > lo);
        let near = g.nearest(Point2::new(-1.0, -2.0)).unwrap();
        assert!((near - hi).abs() < 1e-9, "near={near} hi={hi}");
    }

    #[test]
    fn uneven_resolution_stretches_cells() {
        let g = coverage_grid(&room_with_power(), 1.5).unwrap();
        // 5 ft / 1.5 → 4 cells of 1.25 ft
        assert_eq!(g.xs.len(), 4);
        assert!((g.xs[1] - g.xs[0] - 1.25).abs() < 1e-12);
    }

    #[test]
    fn rejects_bad_inputs() {
        assert!(coverage_grid(&room_with_power(), 0.0).is_err());
        assert!(coverage_grid(&room_with_power(), 1e-9).is_err());
        let silent = Room::new(5.0, 4.0, Source::new((-1.0, -2.0)), Receiver::new((1.0, -1.0))).unwrap();
        assert!(matches!(
            coverage_grid(&silent, 1.0),
            Err(EngineError::Room(RoomError::MissingPower))
        ));
    }
}
