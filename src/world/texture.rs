// Format-agnostic repository of textures produced by the asset layer.
// The renderer and world logic interact through `TextureId` only.

use std::collections::HashMap;

use glam::Vec2;
use thiserror::Error;

use crate::world::grid::{CELL_SIZE, Grid, Orientation};

/// Runtime handle for a texture in this bank.
///
/// *Guaranteed* to remain stable for the lifetime of the bank.
pub type TextureId = u16;

/// `TextureId` whose pixels are the checkerboard fallback.
/// Always = 0 because [`TextureBank::new`] inserts it first.
pub const NO_TEXTURE: TextureId = 0;

/// CPU-side storage: 32-bit **ARGB** (0xAARRGGBB) in row-major order.
/// Alpha 0 texels are transparent; sprite compositing skips them.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub name: String,
    pub w: usize,
    pub h: usize,
    pub pixels: Vec<u32>,
}

/// Convenience checkerboard 8x8 (dark/light grey).
impl Default for Texture {
    fn default() -> Self {
        const LIGHT: u32 = 0xFF_9A9A9A;
        const DARK: u32 = 0xFF_4A4A4A;
        let mut pix = vec![0u32; 8 * 8];
        for y in 0..8 {
            for x in 0..8 {
                pix[y * 8 + x] = if (x ^ y) & 1 == 0 { LIGHT } else { DARK };
            }
        }
        Texture {
            name: "CHECKER".to_string(),
            w: 8,
            h: 8,
            pixels: pix,
        }
    }
}

/// Things that can go wrong when using the bank.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TextureError {
    /// Attempted to insert a second texture with an existing name.
    #[error("texture name `{0}` already present in bank")]
    Duplicate(String),

    /// Requested ID is outside `0 .. bank.len()`.
    #[error("texture id {0} out of range")]
    BadId(TextureId),
}

/// A cache of textures with stable ids.
///
/// * Does **not** know about files or windows; that's the asset layer's job.
/// * Stores exactly one copy of every name.
/// * ID **0** is always the "missing" checkerboard.
#[derive(Debug)]
pub struct TextureBank {
    by_name: HashMap<String, TextureId>,
    data: Vec<Texture>,
}

impl TextureBank {
    /// Create an empty bank with a mandatory *missing* texture used as
    /// fallback.  The texture is inserted under the fixed name `"MISSING"`
    /// and obtains the handle **0**.
    pub fn new(missing_tex: Texture) -> Self {
        let mut by_name = HashMap::new();
        by_name.insert("MISSING".into(), NO_TEXTURE);
        Self {
            by_name,
            data: vec![missing_tex],
        }
    }

    pub fn default_with_checker() -> Self {
        Self::new(Texture::default())
    }

    /// Number of textures stored (including the "missing" one).
    pub fn len(&self) -> usize {
        self.data.len()
    }
    pub fn is_empty(&self) -> bool {
        self.data.len() == 1
    } // only checker

    /// Obtain the id for a *loaded* texture by name.
    pub fn id(&self, name: &str) -> Option<TextureId> {
        self.by_name.get(name).copied()
    }

    /// Fallback-safe query: unknown names resolve to the checkerboard id.
    pub fn id_or_missing(&self, name: &str) -> TextureId {
        self.id(name).unwrap_or(NO_TEXTURE)
    }

    /// Borrow a texture by id, with bounds-checking.
    pub fn texture(&self, id: TextureId) -> Result<&Texture, TextureError> {
        self.data.get(id as usize).ok_or(TextureError::BadId(id))
    }

    pub fn texture_mut(&mut self, id: TextureId) -> Result<&mut Texture, TextureError> {
        self.data
            .get_mut(id as usize)
            .ok_or(TextureError::BadId(id))
    }

    /// Insert a texture under `name`.
    ///
    /// * Returns the newly assigned `TextureId`.
    /// * Fails if the name already exists (`Duplicate`).
    pub fn insert<S: Into<String>>(
        &mut self,
        name: S,
        tex: Texture,
    ) -> Result<TextureId, TextureError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(TextureError::Duplicate(name));
        }
        let id = self.data.len() as TextureId;
        self.data.push(tex);
        self.by_name.insert(name, id);
        Ok(id)
    }
}

/*====================================================================*/
/*                        Wall face selection                          */
/*====================================================================*/

/// Texture ids for the four faces of one wall code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceSet {
    pub north: TextureId,
    pub south: TextureId,
    pub east: TextureId,
    pub west: TextureId,
}

impl FaceSet {
    pub const fn uniform(id: TextureId) -> Self {
        Self {
            north: id,
            south: id,
            east: id,
            west: id,
        }
    }

    /// Lit north/south faces with darker east/west faces.
    pub const fn shaded(lit: TextureId, dark: TextureId) -> Self {
        Self {
            north: lit,
            south: lit,
            east: dark,
            west: dark,
        }
    }
}

/// Maps grid wall codes to face sets and holds the door leaf faces.
#[derive(Debug)]
pub struct WallTextures {
    sets: HashMap<i32, FaceSet>,
    door: FaceSet,
}

impl WallTextures {
    pub fn new(door: FaceSet) -> Self {
        Self {
            sets: HashMap::new(),
            door,
        }
    }

    /// Bind a wall code to its faces, replacing any previous binding.
    pub fn bind(&mut self, code: i32, faces: FaceSet) {
        self.sets.insert(code, faces);
    }

    pub fn faces(&self, code: i32) -> FaceSet {
        self.sets
            .get(&code)
            .copied()
            .unwrap_or(FaceSet::uniform(NO_TEXTURE))
    }

    /// Texture and texture-column for a wall hit.
    ///
    /// Which face is struck follows from the crossing orientation and the
    /// ray heading; north and west faces sample mirrored so patterns read
    /// continuously around a block.  Door leaves sample shifted by the
    /// current slide offset so the texture travels with the leaf, and are
    /// never mirrored.
    pub fn column_for(
        &self,
        grid: &Grid,
        orientation: Orientation,
        hit: Vec2,
        ray_angle: f32,
    ) -> (TextureId, u32) {
        let (row, col) = Grid::cell_of(hit);
        let door_slide = grid.door(row, col).map(|d| d.slide());
        let faces = match door_slide {
            Some(_) => self.door,
            None => self.faces(grid.code(row, col).unwrap_or(0)),
        };

        let wrap = |v: f32| v.rem_euclid(CELL_SIZE) as u32;

        match orientation {
            Orientation::Horizontal => {
                // A ray heading up the map strikes a south face.
                let south = ray_angle > 0.0 && ray_angle < 180.0;
                if let Some(slide) = door_slide {
                    let tex = if south { faces.south } else { faces.north };
                    (tex, wrap(hit.x - slide))
                } else if south {
                    (faces.south, wrap(hit.x))
                } else {
                    (faces.north, wrap(CELL_SIZE - hit.x))
                }
            }
            Orientation::Vertical => {
                let west = ray_angle > 90.0 && ray_angle < 270.0;
                if let Some(slide) = door_slide {
                    let tex = if west { faces.west } else { faces.east };
                    (tex, wrap(hit.y - slide))
                } else if west {
                    (faces.west, wrap(CELL_SIZE - hit.y))
                } else {
                    (faces.east, wrap(hit.y))
                }
            }
        }
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::grid::DOOR;
    use glam::vec2;

    fn dummy_tex(color: u32) -> Texture {
        Texture {
            name: "Dummy".to_string(),
            w: 2,
            h: 2,
            pixels: vec![color; 4],
        }
    }

    #[test]
    fn insert_and_lookup() {
        let mut bank = TextureBank::default_with_checker();
        let red = bank.insert("RED", dummy_tex(0xFF_FF0000)).unwrap();
        let blue = bank.insert("BLUE", dummy_tex(0xFF_0000FF)).unwrap();

        assert_ne!(red, NO_TEXTURE);
        assert_ne!(blue, red);
        assert_eq!(bank.id("RED"), Some(red));
        assert_eq!(bank.id("NOPE"), None);
        assert_eq!(bank.id_or_missing("NOPE"), NO_TEXTURE);
        assert_eq!(bank.texture(blue).unwrap().pixels[0], 0xFF_0000FF);
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut bank = TextureBank::default_with_checker();
        bank.insert("WOOD", dummy_tex(1)).unwrap();
        let err = bank.insert("WOOD", dummy_tex(2)).unwrap_err();
        assert_eq!(err, TextureError::Duplicate("WOOD".into()));
        assert_eq!(bank.len(), 2);
    }

    #[test]
    fn bad_id_guard() {
        let bank = TextureBank::default_with_checker();
        let bad = TextureId::MAX;
        assert_eq!(bank.texture(bad).unwrap_err(), TextureError::BadId(bad));
    }

    /*──────────────────── face selection ────────────────────*/

    fn small_world() -> (Grid, WallTextures) {
        let grid = Grid::from_rows(vec![
            vec![1, 1, 1],
            vec![1, 0, DOOR],
            vec![1, 1, 1],
        ])
        .unwrap();
        let mut walls = WallTextures::new(FaceSet {
            north: 20,
            south: 21,
            east: 22,
            west: 23,
        });
        walls.bind(
            1,
            FaceSet {
                north: 10,
                south: 11,
                east: 12,
                west: 13,
            },
        );
        (grid, walls)
    }

    #[test]
    fn south_face_samples_straight_north_face_mirrored() {
        let (grid, walls) = small_world();
        // Hit on the top wall row (south face), x offset 10 into the cell.
        let hit = vec2(74.0, 63.0);
        assert_eq!(walls.column_for(&grid, Orientation::Horizontal, hit, 90.0), (11, 10));
        // Same x on the bottom wall row (north face) mirrors the column.
        let hit = vec2(74.0, 128.0);
        assert_eq!(
            walls.column_for(&grid, Orientation::Horizontal, hit, 270.0),
            (10, 54)
        );
    }

    #[test]
    fn east_face_samples_straight_west_face_mirrored() {
        let (grid, walls) = small_world();
        // West wall column hit by a leftward ray, y offset 20.
        let hit = vec2(63.0, 84.0);
        assert_eq!(
            walls.column_for(&grid, Orientation::Vertical, hit, 180.0),
            (13, 44)
        );
    }

    #[test]
    fn door_column_travels_with_the_leaf() {
        let (mut grid, walls) = small_world();
        let hit = vec2(160.0, 84.0); // inside the door cell, y offset 20
        assert_eq!(walls.column_for(&grid, Orientation::Vertical, hit, 0.0), (22, 20));

        let door = grid.door_mut(1, 2).unwrap();
        door.request_open();
        door.advance(0.05); // part-way open
        let slide = grid.door(1, 2).unwrap().slide();
        assert!(slide > 0.0 && slide < CELL_SIZE);

        let got = walls.column_for(&grid, Orientation::Vertical, hit, 0.0);
        assert_eq!(got.0, 22);
        assert_eq!(got.1, (20.0 - slide).rem_euclid(CELL_SIZE) as u32);
    }
}
