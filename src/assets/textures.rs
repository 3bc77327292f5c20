//! Procedural texture synthesis.
//!
//! Everything the renderer samples is generated at load time, so the crate
//! runs with zero asset files.  Wall styles come in a lit variant for
//! north/south faces and a darkened variant for east/west faces, the
//! classic flat-shading trick that keeps corners readable.

use smallvec::smallvec;

use crate::sim::FrameList;
use crate::world::{FaceSet, Texture, TextureBank, TextureError, TextureId};

const SIZE: usize = 64;

/*──────────────────────── pixel helpers ─────────────────────────────*/

fn shade(argb: u32, f: f32) -> u32 {
    let ch = |v: u32| (((v & 0xFF) as f32 * f) as u32).min(0xFF);
    (argb & 0xFF_00_00_00) | (ch(argb >> 16) << 16) | (ch(argb >> 8) << 8) | ch(argb)
}

struct Canvas(Vec<u32>);

impl Canvas {
    fn filled(color: u32) -> Self {
        Self(vec![color; SIZE * SIZE])
    }

    fn clear() -> Self {
        Self(vec![0; SIZE * SIZE]) // alpha 0 everywhere
    }

    fn rect(&mut self, x0: usize, y0: usize, w: usize, h: usize, color: u32) {
        for y in y0..(y0 + h).min(SIZE) {
            for x in x0..(x0 + w).min(SIZE) {
                self.0[y * SIZE + x] = color;
            }
        }
    }

    fn disc(&mut self, cx: i32, cy: i32, r: i32, color: u32) {
        for y in (cy - r).max(0)..(cy + r + 1).min(SIZE as i32) {
            for x in (cx - r).max(0)..(cx + r + 1).min(SIZE as i32) {
                let (dx, dy) = (x - cx, y - cy);
                if dx * dx + dy * dy <= r * r {
                    self.0[y as usize * SIZE + x as usize] = color;
                }
            }
        }
    }

    fn into_texture(self, name: &str) -> Texture {
        Texture {
            name: name.to_string(),
            w: SIZE,
            h: SIZE,
            pixels: self.0,
        }
    }
}

/*──────────────────────── wall styles ───────────────────────────────*/

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WallStyle {
    Brick,
    Stone,
    Slab,
    Metal,
}

impl WallStyle {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "brick" => Some(Self::Brick),
            "stone" => Some(Self::Stone),
            "slab" => Some(Self::Slab),
            "metal" => Some(Self::Metal),
            _ => None,
        }
    }

    fn key(self) -> &'static str {
        match self {
            Self::Brick => "BRICK",
            Self::Stone => "STONE",
            Self::Slab => "SLAB",
            Self::Metal => "METAL",
        }
    }

    fn paint(self, dim: f32) -> Texture {
        match self {
            Self::Brick => courses(shade(0xFF_A0_40_30, dim), shade(0xFF_60_28_20, dim), 16, 32),
            Self::Stone => courses(shade(0xFF_8A_8A_80, dim), shade(0xFF_55_55_50, dim), 8, 16),
            Self::Slab => {
                let mut c = Canvas::filled(shade(0xFF_5A_6A_5A, dim));
                for band in (0..SIZE).step_by(16) {
                    c.rect(0, band, SIZE, 2, shade(0xFF_3A_46_3A, dim));
                }
                c.into_texture("slab")
            }
            Self::Metal => {
                let mut c = Canvas::filled(shade(0xFF_4A_52_62, dim));
                c.rect(0, 0, SIZE, 2, shade(0xFF_2A_2E_3A, dim));
                c.rect(0, 62, SIZE, 2, shade(0xFF_2A_2E_3A, dim));
                for (x, y) in [(6, 6), (56, 6), (6, 56), (56, 56)] {
                    c.disc(x, y, 2, shade(0xFF_8A_92_A2, dim));
                }
                c.into_texture("metal")
            }
        }
    }
}

/// Running-bond courses: `course_h`-tall rows of `brick_w`-wide blocks with
/// mortar lines, odd courses offset half a block.
fn courses(face: u32, mortar: u32, course_h: usize, brick_w: usize) -> Texture {
    let mut c = Canvas::filled(face);
    for (i, y) in (0..SIZE).step_by(course_h).enumerate() {
        c.rect(0, y, SIZE, 1, mortar);
        let off = if i % 2 == 0 { 0 } else { brick_w / 2 };
        let mut x = off;
        while x < SIZE + brick_w {
            c.rect(x % SIZE, y, 1, course_h, mortar);
            x += brick_w;
        }
    }
    c.into_texture("courses")
}

fn door_leaf(dim: f32) -> Texture {
    let mut c = Canvas::filled(shade(0xFF_3A_6E_8E, dim));
    for x in (0..SIZE).step_by(16) {
        c.rect(x, 0, 2, SIZE, shade(0xFF_24_46_5A, dim));
    }
    c.rect(0, 30, SIZE, 4, shade(0xFF_24_46_5A, dim));
    c.disc(54, 32, 3, shade(0xFF_D8_C8_50, dim));
    c.into_texture("door")
}

/// Insert under `name`, or reuse the existing id when already present.
fn intern(bank: &mut TextureBank, name: &str, tex: Texture) -> Result<TextureId, TextureError> {
    match bank.insert(name, tex) {
        Ok(id) => Ok(id),
        Err(TextureError::Duplicate(_)) => Ok(bank.id(name).unwrap_or(0)),
        Err(e) => Err(e),
    }
}

/// The lit/darkened face pair for one wall style.
pub fn wall_faces(bank: &mut TextureBank, style: WallStyle) -> Result<FaceSet, TextureError> {
    let lit = intern(bank, style.key(), style.paint(1.0))?;
    let dark = intern(bank, &format!("{}_D", style.key()), style.paint(0.72))?;
    Ok(FaceSet::shaded(lit, dark))
}

pub fn door_faces(bank: &mut TextureBank) -> Result<FaceSet, TextureError> {
    let lit = intern(bank, "DOOR", door_leaf(1.0))?;
    let dark = intern(bank, "DOOR_D", door_leaf(0.72))?;
    Ok(FaceSet::shaded(lit, dark))
}

/*──────────────────────── sprite frames ─────────────────────────────*/

/// Texture ids for every entity the demo levels can spawn.
#[derive(Debug)]
pub struct SpriteCatalog {
    pub guard: FrameList,
    pub guard_death: FrameList,
    pub medkit: FrameList,
    pub column: TextureId,
    pub rocket: FrameList,
    pub blast: FrameList,
}

fn guard_frame(sector: usize) -> Texture {
    let uniform = 0xFF_4A_6A_3A;
    let mut c = Canvas::clear();
    c.rect(22, 26, 20, 30, uniform); // torso
    c.rect(24, 56, 6, 8, 0xFF_30_30_30); // legs
    c.rect(34, 56, 6, 8, 0xFF_30_30_30);
    c.disc(32, 18, 8, 0xFF_C8_9A_78); // head
    // The facing notch swings around the head with the rotation sector.
    let a = (sector as f32) * std::f32::consts::FRAC_PI_4;
    let (nx, ny) = ((32.0 + a.sin() * 6.0) as i32, (18.0 - a.cos() * 6.0) as i32);
    c.disc(nx, ny, 2, 0xFF_40_28_18);
    c.into_texture("guard")
}

fn guard_death_frame(step: usize) -> Texture {
    let mut c = Canvas::clear();
    let top = 30 + step * 10;
    c.rect(18, top.min(58), 28, SIZE - top.min(58), 0xFF_4A_6A_3A);
    c.rect(14, 58, 36, 6, 0xFF_7A_20_18);
    c.into_texture("guard_death")
}

fn medkit_frame(bright: bool) -> Texture {
    let body = if bright { 0xFF_F2_F2_F2 } else { 0xFF_D6_D6_D6 };
    let mut c = Canvas::clear();
    c.rect(18, 36, 28, 20, body);
    c.rect(29, 38, 6, 16, 0xFF_B8_20_20);
    c.rect(24, 43, 16, 6, 0xFF_B8_20_20);
    c.into_texture("medkit")
}

fn column_frame() -> Texture {
    let mut c = Canvas::clear();
    c.rect(26, 8, 12, 52, 0xFF_9A_92_82);
    c.rect(22, 4, 20, 6, 0xFF_B2_AA_9A);
    c.rect(22, 58, 20, 6, 0xFF_B2_AA_9A);
    c.into_texture("column")
}

fn rocket_frame(sector: usize) -> Texture {
    let mut c = Canvas::clear();
    let stretch: usize = if sector % 4 == 0 { 4 } else { 10 };
    c.rect(32 - stretch, 30, stretch * 2, 6, 0xFF_9A_9A_A6);
    c.disc(32, 32, 3, 0xFF_E8_60_20);
    c.into_texture("rocket")
}

fn blast_frame(step: usize) -> Texture {
    let mut c = Canvas::clear();
    let r = 6 + step as i32 * 8;
    c.disc(32, 36, r, 0xFF_E8_A0_20);
    c.disc(32, 36, r / 2, 0xFF_F8_E0_60);
    c.into_texture("blast")
}

/// Generate and register every sprite frame.
pub fn install_sprites(bank: &mut TextureBank) -> Result<SpriteCatalog, TextureError> {
    let mut guard: FrameList = smallvec![];
    for sector in 0..8 {
        guard.push(intern(bank, &format!("GRD{sector}"), guard_frame(sector))?);
    }

    let mut guard_death: FrameList = smallvec![];
    for step in 0..3 {
        guard_death.push(intern(
            bank,
            &format!("GRDDIE{step}"),
            guard_death_frame(step),
        )?);
    }

    let medkit: FrameList = smallvec![
        intern(bank, "MEDI0", medkit_frame(false))?,
        intern(bank, "MEDI1", medkit_frame(true))?,
    ];

    let column = intern(bank, "COL", column_frame())?;

    let mut rocket: FrameList = smallvec![];
    for sector in 0..8 {
        rocket.push(intern(bank, &format!("RCKT{sector}"), rocket_frame(sector))?);
    }

    let mut blast: FrameList = smallvec![];
    for step in 0..3 {
        blast.push(intern(bank, &format!("BLST{step}"), blast_frame(step))?);
    }

    Ok(SpriteCatalog {
        guard,
        guard_death,
        medkit,
        column,
        rocket,
        blast,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wall_faces_register_lit_and_dark_variants() {
        let mut bank = TextureBank::default_with_checker();
        let faces = wall_faces(&mut bank, WallStyle::Brick).unwrap();
        assert_ne!(faces.north, faces.east);
        assert_eq!(faces.north, faces.south);
        assert_eq!(faces.east, faces.west);

        // A second request reuses the same textures.
        let again = wall_faces(&mut bank, WallStyle::Brick).unwrap();
        assert_eq!(faces, again);
    }

    #[test]
    fn sprites_are_transparent_outside_the_silhouette() {
        let mut bank = TextureBank::default_with_checker();
        let catalog = install_sprites(&mut bank).unwrap();
        let tex = bank.texture(catalog.guard[0]).unwrap();
        assert_eq!(tex.pixels[0] >> 24, 0, "corners stay see-through");
        assert!(tex.pixels.iter().any(|&p| p >> 24 != 0));
    }

    #[test]
    fn wall_textures_are_fully_opaque() {
        let mut bank = TextureBank::default_with_checker();
        let faces = wall_faces(&mut bank, WallStyle::Metal).unwrap();
        let tex = bank.texture(faces.north).unwrap();
        assert!(tex.pixels.iter().all(|&p| p >> 24 == 0xFF));
    }
}
