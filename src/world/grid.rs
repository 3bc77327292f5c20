//! Tile world model.
//!
//! The map is a fixed-size, row-major grid of integer cell codes with a
//! parallel overlay of [`Door`] leaves for every door cell.  All world
//! coordinates are continuous (`glam::Vec2`, +y pointing *down* the grid);
//! one cell spans [`CELL_SIZE`] world units on each axis.
//!
//! Every query fails safe on out-of-bounds input: an off-map cell is not
//! walkable, not a door, and blocks rays, so a cast can never escape the
//! map.

use glam::Vec2;
use thiserror::Error;

use crate::world::door::Door;

/// World-unit width/height of one grid tile; also the texture size.
pub const CELL_SIZE: f32 = 64.0;
pub const HALF_CELL: f32 = CELL_SIZE / 2.0;

/// Cell code for open floor.
pub const FLOOR: i32 = 0;
/// Cell code marking a door cell.
pub const DOOR: i32 = -1;

/// Half of the 60 degree view cone; a neighbour door counts as "faced"
/// when the approach angle is within this many degrees of its normal.
const FACING_TOLERANCE: f32 = 30.0;

/// Which family of grid lines a ray crossing belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// Crossing of a horizontal grid line (a north/south facing surface).
    Horizontal,
    /// Crossing of a vertical grid line (an east/west facing surface).
    Vertical,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("grid has no rows or zero-width rows")]
    Empty,

    #[error("row {row} has {got} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        got: usize,
    },
}

/// The tile grid plus its door overlay.
#[derive(Debug)]
pub struct Grid {
    cells: Vec<i32>,
    doors: Vec<Option<Door>>,
    width: usize,
    height: usize,
}

impl Grid {
    /// Build a grid from row-major cell codes.  Every `-1` cell receives a
    /// closed [`Door`].  Ragged or empty input is a construction error.
    pub fn from_rows(rows: Vec<Vec<i32>>) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(GridError::Empty);
        }
        for (row, r) in rows.iter().enumerate() {
            if r.len() != width {
                return Err(GridError::Ragged {
                    row,
                    expected: width,
                    got: r.len(),
                });
            }
        }

        let cells: Vec<i32> = rows.into_iter().flatten().collect();
        let doors = cells
            .iter()
            .map(|&code| (code == DOOR).then(Door::new))
            .collect();

        Ok(Self {
            cells,
            doors,
            width,
            height,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell indices (row, col) containing the world point.
    #[inline]
    pub fn cell_of(p: Vec2) -> (i32, i32) {
        (
            (p.y / CELL_SIZE).floor() as i32,
            (p.x / CELL_SIZE).floor() as i32,
        )
    }

    /// World coordinates of a cell's top-left corner.
    #[inline]
    pub fn cell_origin(row: i32, col: i32) -> Vec2 {
        Vec2::new(col as f32 * CELL_SIZE, row as f32 * CELL_SIZE)
    }

    #[inline]
    pub fn in_bounds(&self, row: i32, col: i32) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.height && (col as usize) < self.width
    }

    /// Cell code, or `None` off-map.
    #[inline]
    pub fn code(&self, row: i32, col: i32) -> Option<i32> {
        self.in_bounds(row, col)
            .then(|| self.cells[row as usize * self.width + col as usize])
    }

    #[inline]
    fn idx(&self, row: i32, col: i32) -> Option<usize> {
        self.in_bounds(row, col)
            .then(|| row as usize * self.width + col as usize)
    }

    /// True iff the cell is in bounds and either floor or a fully open door.
    pub fn is_walkable(&self, row: i32, col: i32) -> bool {
        match self.code(row, col) {
            Some(FLOOR) => true,
            Some(DOOR) => self.door(row, col).is_some_and(Door::is_open),
            _ => false,
        }
    }

    pub fn is_door(&self, row: i32, col: i32) -> bool {
        self.code(row, col) == Some(DOOR)
    }

    pub fn door(&self, row: i32, col: i32) -> Option<&Door> {
        self.idx(row, col).and_then(|i| self.doors[i].as_ref())
    }

    pub fn door_mut(&mut self, row: i32, col: i32) -> Option<&mut Door> {
        self.idx(row, col).and_then(|i| self.doors[i].as_mut())
    }

    /// Iterate every door leaf with its (row, col) cell.
    pub fn doors_mut(&mut self) -> impl Iterator<Item = ((usize, usize), &mut Door)> {
        let width = self.width;
        self.doors
            .iter_mut()
            .enumerate()
            .filter_map(move |(i, d)| d.as_mut().map(|d| ((i / width, i % width), d)))
    }

    /// Orientation-free blocking query used by movement: is the cell under
    /// `p` impassable right now?  A door blocks unless fully open.
    #[inline]
    pub fn is_solid_at(&self, p: Vec2) -> bool {
        let (row, col) = Self::cell_of(p);
        !self.is_walkable(row, col)
    }

    /// Door-aware blocking test for a ray crossing at `p`.
    ///
    /// Ordinary cells block iff they are not walkable.  For a door cell the
    /// crossing point is projected onto the door's travel axis and compared
    /// against the still-closed portion of the leaf, so a half-open door
    /// blocks only the covered part of the opening.  The projection follows
    /// the door leaf sitting recessed at the cell's centre line: the crossing
    /// offset is shifted by the half-cell of extra travel along the ray
    /// before being wrapped into the cell.
    pub fn is_blocking(&self, p: Vec2, ray_angle: f32, orientation: Orientation) -> bool {
        let (row, col) = Self::cell_of(p);
        let Some(door) = self.door(row, col) else {
            return !self.is_walkable(row, col);
        };

        let toward_west = ray_angle > 90.0 && ray_angle < 270.0;
        let dx = if toward_west { -HALF_CELL } else { HALF_CELL };
        let tan = ray_angle.to_radians().tan();

        let (offset, shift) = match orientation {
            Orientation::Horizontal => (p.x, dx / tan.abs()),
            Orientation::Vertical => (p.y, -dx * tan),
        };
        let on_door = (offset + shift).rem_euclid(CELL_SIZE);

        door.slide() <= on_door
    }

    /// The neighbour door the given facing angle points at, if any.
    ///
    /// Checks the four axis neighbours in fixed order south, north, east,
    /// west, and returns the first whose normal lies within the facing
    /// tolerance of `angle`.  Returns the door's cell so callers can fetch
    /// the leaf mutably.
    pub fn find_door_facing(&self, row: i32, col: i32, angle: f32) -> Option<(i32, i32)> {
        let a = angle.rem_euclid(360.0);

        // South neighbour (+y is down, 270 degrees points at it).
        if self.is_door(row + 1, col)
            && a > 270.0 - FACING_TOLERANCE
            && a < 270.0 + FACING_TOLERANCE
        {
            return Some((row + 1, col));
        }
        if self.is_door(row - 1, col)
            && a > 90.0 - FACING_TOLERANCE
            && a < 90.0 + FACING_TOLERANCE
        {
            return Some((row - 1, col));
        }
        if self.is_door(row, col + 1) && (a > 360.0 - FACING_TOLERANCE || a < FACING_TOLERANCE) {
            return Some((row, col + 1));
        }
        if self.is_door(row, col - 1)
            && a > 180.0 - FACING_TOLERANCE
            && a < 180.0 + FACING_TOLERANCE
        {
            return Some((row, col - 1));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;

    /// 3x3 floor surrounded by walls, with a door in the east wall.
    fn walled_room() -> Grid {
        Grid::from_rows(vec![
            vec![1, 1, 1, 1, 1],
            vec![1, 0, 0, 0, 1],
            vec![1, 0, 0, DOOR, 1],
            vec![1, 0, 0, 0, 1],
            vec![1, 1, 1, 1, 1],
        ])
        .unwrap()
    }

    #[test]
    fn ragged_rows_are_fatal() {
        let err = Grid::from_rows(vec![vec![1, 1], vec![1]]).unwrap_err();
        assert_eq!(
            err,
            GridError::Ragged {
                row: 1,
                expected: 2,
                got: 1
            }
        );
        assert_eq!(Grid::from_rows(vec![]).unwrap_err(), GridError::Empty);
        assert_eq!(Grid::from_rows(vec![vec![]]).unwrap_err(), GridError::Empty);
    }

    #[test]
    fn out_of_bounds_fails_safe() {
        let g = walled_room();
        assert!(!g.is_walkable(-1, 0));
        assert!(!g.is_walkable(0, 99));
        assert!(!g.is_door(-1, -1));
        assert!(g.is_solid_at(vec2(-10.0, -10.0)));
        assert!(g.is_solid_at(vec2(1e6, 1e6)));
    }

    #[test]
    fn walkability_tracks_door_travel() {
        let mut g = walled_room();
        assert!(g.is_walkable(1, 1));
        assert!(!g.is_walkable(0, 0));
        assert!(!g.is_walkable(2, 3)); // closed door

        let door = g.door_mut(2, 3).unwrap();
        door.request_open();
        door.advance(100.0);
        assert!(g.is_walkable(2, 3));
    }

    #[test]
    fn cell_world_round_trip() {
        for row in 0..5i32 {
            for col in 0..5i32 {
                let centre = Grid::cell_origin(row, col) + vec2(HALF_CELL, HALF_CELL);
                assert_eq!(Grid::cell_of(centre), (row, col));
                assert_eq!(Grid::cell_of(Grid::cell_origin(row, col)), (row, col));
            }
        }
    }

    #[test]
    fn closed_door_blocks_every_offset() {
        let g = walled_room();
        // Door cell spans x in [192, 256), y in [128, 192).
        for off in [1.0, 10.0, 32.0, 54.0, 63.0] {
            // Straight east along the cell, crossing at y-offset `off`:
            // at angle 0 the travel-axis shift is exactly zero.
            let p = vec2(192.0, 128.0 + off);
            assert!(g.is_blocking(p, 0.0, Orientation::Vertical), "off {off}");
        }
    }

    #[test]
    fn open_door_blocks_nothing() {
        let mut g = walled_room();
        let door = g.door_mut(2, 3).unwrap();
        door.request_open();
        door.advance(100.0);
        for off in [1.0, 10.0, 32.0, 54.0, 63.0] {
            let p = vec2(192.0, 128.0 + off);
            assert!(!g.is_blocking(p, 0.0, Orientation::Vertical), "off {off}");
        }
    }

    #[test]
    fn half_open_door_blocks_only_the_covered_half() {
        let mut g = walled_room();
        let door = g.door_mut(2, 3).unwrap();
        door.request_open();
        door.advance(HALF_CELL / crate::world::door::SLIDE_SPEED);
        assert!((door.slide() - HALF_CELL).abs() < 1e-3);

        // Offset 10 lies in the opened half, 54 in the still-covered half.
        assert!(!g.is_blocking(vec2(192.0, 128.0 + 10.0), 0.0, Orientation::Vertical));
        assert!(g.is_blocking(vec2(192.0, 128.0 + 54.0), 0.0, Orientation::Vertical));
    }

    #[test]
    fn facing_picks_the_door_under_the_view_cone() {
        let g = walled_room();
        // Standing in (2, 2), the door is the east neighbour.
        assert_eq!(g.find_door_facing(2, 2, 10.0), Some((2, 3)));
        assert_eq!(g.find_door_facing(2, 2, 355.0), Some((2, 3)));
        assert_eq!(g.find_door_facing(2, 2, 90.0), None);
        assert_eq!(g.find_door_facing(2, 2, 180.0), None);
        // No doors around (1, 1) at all.
        assert_eq!(g.find_door_facing(1, 1, 0.0), None);
    }
}
