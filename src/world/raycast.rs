//! Ray / grid intersection.
//!
//! For a ray the engine computes the nearest horizontal-grid-line crossing
//! and the nearest vertical-grid-line crossing independently, each from the
//! closed-form position of the next boundary in the direction of travel,
//! then keeps whichever surface lies closer.  A candidate that lands on a
//! non-blocking cell extends the ray from that crossing to the next
//! boundary; the extension is a plain loop with a step cap instead of the
//! obvious self-recursion, so the bound is an auditable invariant.
//!
//! Angles are degrees, 0-360; a ray exactly parallel to an axis never
//! crosses that axis's grid lines and yields no candidate there rather than
//! dividing by zero.

use glam::{Vec2, vec2};
use thiserror::Error;

use crate::world::grid::{CELL_SIZE, Grid, HALF_CELL, Orientation};

#[derive(Debug, Error)]
pub enum CastError {
    /// The walk crossed more grid lines than the map has on either axis.
    /// Only a malformed, effectively unbounded map can get here; rays on any
    /// enclosed grid terminate at a solid cell or the map edge first.
    #[error("ray walk exceeded {steps} grid lines at angle {angle}")]
    StepLimit { angle: f32, steps: usize },

    /// Neither axis produced a crossing.  Unreachable for real headings
    /// (no angle is parallel to both axes); kept so the degenerate case is
    /// reported instead of invented.
    #[error("no grid line crossing at angle {angle}")]
    NoCrossing { angle: f32 },
}

/// Nearest surface along a ray.
#[derive(Clone, Copy, Debug)]
pub struct Intersection {
    pub orientation: Orientation,
    /// Euclidean distance from the ray origin (not fisheye-corrected).
    pub distance: f32,
    /// World point of the hit; for doors, the recessed leaf surface.
    pub hit: Vec2,
}

impl Grid {
    /// Defensive cap on grid lines crossed per axis scan.
    #[inline]
    fn step_limit(&self) -> usize {
        self.width().max(self.height())
    }

    /// Nearest wall or door surface along the ray from `origin` at `angle`.
    pub fn find_nearest_intersection(
        &self,
        origin: Vec2,
        angle: f32,
    ) -> Result<Intersection, CastError> {
        let hor = self
            .find_horizontal_intersection(origin, angle)?
            .map(|p| (p, origin.distance(p)));
        let ver = self
            .find_vertical_intersection(origin, angle)?
            .map(|p| (p, origin.distance(p)));

        let pick = |orientation, (hit, distance)| Intersection {
            orientation,
            distance,
            hit,
        };

        match (hor, ver) {
            (Some(h), Some(v)) if h.1 < v.1 => Ok(pick(Orientation::Horizontal, h)),
            (_, Some(v)) => Ok(pick(Orientation::Vertical, v)),
            (Some(h), None) => Ok(pick(Orientation::Horizontal, h)),
            (None, None) => Err(CastError::NoCrossing { angle }),
        }
    }

    /// Where the ray first blocks on a horizontal grid line, or `None` for
    /// rays parallel to them (angle exactly 0 or 180).
    pub fn find_horizontal_intersection(
        &self,
        origin: Vec2,
        angle: f32,
    ) -> Result<Option<Vec2>, CastError> {
        if angle == 0.0 || angle == 180.0 {
            return Ok(None);
        }
        let tan = angle.to_radians().tan();
        let up = angle > 0.0 && angle < 180.0;

        let mut from = origin;
        for _ in 0..self.step_limit() {
            let grid_y = (from.y / CELL_SIZE).floor();
            // Crossing into the next row: one unit shy of the boundary when
            // heading up so the point lands inside the cell being entered.
            let ay = if up {
                grid_y * CELL_SIZE - 1.0
            } else {
                (grid_y + 1.0) * CELL_SIZE
            };
            let ax = from.x + (from.y - ay) / tan;
            let p = vec2(ax, ay);

            if self.is_blocking(p, angle, Orientation::Horizontal) {
                return Ok(Some(self.recess_horizontal_hit(p, angle, tan, up)));
            }
            from = p;
        }
        Err(CastError::StepLimit {
            angle,
            steps: self.step_limit(),
        })
    }

    /// Where the ray first blocks on a vertical grid line, or `None` for
    /// rays parallel to them (angle exactly 90 or 270).
    pub fn find_vertical_intersection(
        &self,
        origin: Vec2,
        angle: f32,
    ) -> Result<Option<Vec2>, CastError> {
        if angle == 90.0 || angle == 270.0 {
            return Ok(None);
        }
        let tan = angle.to_radians().tan();
        let left = angle > 90.0 && angle < 270.0;

        let mut from = origin;
        for _ in 0..self.step_limit() {
            let grid_x = (from.x / CELL_SIZE).floor();
            let bx = if left {
                grid_x * CELL_SIZE - 1.0
            } else {
                (grid_x + 1.0) * CELL_SIZE
            };
            let by = from.y + (from.x - bx) * tan;
            let p = vec2(bx, by);

            if self.is_blocking(p, angle, Orientation::Vertical) {
                return Ok(Some(self.recess_vertical_hit(p, angle, tan, left)));
            }
            from = p;
        }
        Err(CastError::StepLimit {
            angle,
            steps: self.step_limit(),
        })
    }

    /// Door cells are hit on the leaf recessed half a cell behind the
    /// boundary: push the crossing half a cell along the travel direction.
    /// The sign conventions here are load-bearing; they pair with the offset
    /// projection in [`Grid::is_blocking`].
    fn recess_horizontal_hit(&self, p: Vec2, angle: f32, tan: f32, up: bool) -> Vec2 {
        let (row, col) = Self::cell_of(p);
        if !self.is_door(row, col) {
            return p;
        }
        let dy = if up { -HALF_CELL } else { HALF_CELL };
        let mut off = HALF_CELL / tan.abs();
        if angle > 90.0 && angle < 270.0 {
            off = -off;
        }
        vec2(p.x + off, p.y + dy)
    }

    fn recess_vertical_hit(&self, p: Vec2, angle: f32, tan: f32, left: bool) -> Vec2 {
        let (row, col) = Self::cell_of(p);
        if !self.is_door(row, col) {
            return p;
        }
        let dx = if left { -HALF_CELL } else { HALF_CELL };
        let mut off = HALF_CELL * tan.abs();
        if angle > 0.0 && angle < 180.0 {
            off = -off;
        }
        vec2(p.x + dx, p.y + off)
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
