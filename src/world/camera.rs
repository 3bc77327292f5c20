use glam::{Vec2, vec2};

use crate::world::grid::Grid;

/// Horizontal field of view in degrees.
pub const FOV: f32 = 60.0;

/// Degrees turned per second; 6 degrees per classic 60 Hz frame.
pub const TURN_SPEED: f32 = 360.0;

/// World units walked per second; 12 units per classic 60 Hz frame.
pub const MOVE_SPEED: f32 = 720.0;

/// Speed multiplier while the run modifier is held.
pub const RUN_FACTOR: f32 = 1.5;

/// How far ahead of the eye the blocking probe is placed, in multiples of
/// the displacement being attempted.
const LOOKAHEAD: f32 = 4.0;

/// Player view-point in world space.
///
/// * Heading is stored in **degrees**, 0-360, 0 = +x (east), increasing
///   counter-clockwise; with +y pointing down the grid this makes 90 point
///   "up" the map.  Conversion to radians happens only at trig call sites.
/// * `height` is the eye height as a 0-1 fraction of the view; walking eyes
///   sit at 0.5, crouching and bobbing move it.
#[derive(Clone, Copy, Debug)]
pub struct Viewpoint {
    pub pos: Vec2,
    pub angle: f32,
    pub height: f32,
    pub fov: f32,
}

impl Viewpoint {
    pub fn new(pos: Vec2, angle: f32) -> Self {
        Self {
            pos,
            angle: angle.rem_euclid(360.0),
            height: 0.5,
            fov: FOV,
        }
    }

    /*──────────────────────── derived vectors ───────────────────────*/

    /// Unit vector pointing where the viewer looks.
    #[inline]
    pub fn forward(&self) -> Vec2 {
        let r = self.angle.to_radians();
        vec2(r.cos(), -r.sin())
    }

    /// Unit vector pointing to the viewer's left.
    #[inline]
    pub fn left(&self) -> Vec2 {
        let r = (self.angle + 90.0).to_radians();
        vec2(r.cos(), -r.sin())
    }

    /// Rotate by `delta` degrees (positive = counter-clockwise).
    pub fn turn(&mut self, delta: f32) {
        self.angle = (self.angle + delta).rem_euclid(360.0);
    }

    /*──────────────────────── movement ──────────────────────────────*/

    /// Attempt a displacement, blocking each axis independently so the
    /// viewer slides along walls instead of sticking to them.  The probe
    /// tests the grid a few steps ahead of the eye to keep it out of
    /// texture-clipping range.
    pub fn advance(&mut self, grid: &Grid, d: Vec2) {
        let ahead_x = vec2(self.pos.x + LOOKAHEAD * d.x, self.pos.y);
        let ahead_y = vec2(self.pos.x, self.pos.y + LOOKAHEAD * d.y);
        let hor_hit = grid.is_solid_at(ahead_x);
        let vert_hit = grid.is_solid_at(ahead_y);
        if hor_hit && vert_hit && grid.is_solid_at(self.pos + LOOKAHEAD * d) {
            return;
        }
        if !hor_hit {
            self.pos.x += d.x;
        }
        if !vert_hit {
            self.pos.y += d.y;
        }
    }

    /*───────────────── projection / ray-fan helpers ─────────────────*/

    /// Distance from the eye to the projection plane for a viewport
    /// `w` pixels wide:
    ///
    /// ```text
    /// proj = (w / 2) / tan(fov / 2)
    /// ```
    #[inline]
    pub fn projection_distance(&self, w: usize) -> f32 {
        (w as f32 * 0.5) / (self.fov * 0.5).to_radians().tan()
    }

    /// The fan of ray headings covering the view, one per screen column,
    /// sweeping left to right.
    #[inline]
    pub fn ray_fan(&self, w: usize) -> RayFan {
        RayFan {
            leftmost: (self.angle + self.fov * 0.5).rem_euclid(360.0),
            delta: self.fov / w as f32,
        }
    }
}

/// See [`Viewpoint::ray_fan`].
#[derive(Clone, Copy, Debug)]
pub struct RayFan {
    leftmost: f32,
    delta: f32,
}

impl RayFan {
    /// Heading of the ray through screen column `x`, in degrees 0-360.
    #[inline]
    pub fn angle_at(&self, x: usize) -> f32 {
        (self.leftmost - self.delta * x as f32).rem_euclid(360.0)
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
