//! Sprite pass: billboard projection, z-ordering, and per-column occlusion
//! against the wall depth buffer written by the wall pass.

use glam::Vec2;

use crate::{
    renderer::{DrawCall, SpriteColumn},
    world::{CELL_SIZE, TextureId, Viewpoint},
};

/// Base stacking order for sprites; walls composite below this.
pub const SPRITE_Z_BASE: f32 = 3.0;

/// One frame's view of a renderable entity.
///
/// The simulation hands the compositor a snapshot collection once per frame:
/// position, the already-resolved billboard frame for this viewer, and
/// whether the entity still counts for occlusion priority.  Absent
/// capabilities stay on the simulation side as explicit components; nothing
/// here is probed at run time.
#[derive(Clone, Copy, Debug)]
pub struct SpriteView {
    pub pos: Vec2,
    pub tex: TextureId,
    pub alive: bool,
}

/// A column claim: which snapshot entry owns this screen column and at what
/// stacking order it was drawn.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Claim {
    pub entity: usize,
    pub z: f32,
    pub alive: bool,
}

/// A billboard that survived projection.
struct VisSprite {
    entity: usize,
    pos: Vec2,
    x: f32,
    y_top: f32,
    scale: f32,
    size: f32,
    perp: f32,
    z: f32,
    tex: TextureId,
}

fn project(
    view: &Viewpoint,
    proj: f32,
    w: usize,
    h: usize,
    entity: usize,
    s: &SpriteView,
) -> Option<VisSprite> {
    let dx = s.pos.x - view.pos.x;
    // Mirror in x: the grid's y grows downwards, bearings grow upwards.
    let dy = -(s.pos.y - view.pos.y);
    let distance = (dx * dx + dy * dy).sqrt();

    let bearing = -(dy.atan2(dx).to_degrees() - view.angle);
    let perp = distance * bearing.to_radians().cos();
    if perp <= 0.0 {
        return None; // behind the viewer
    }

    let z = SPRITE_Z_BASE + 1.0 / (perp / CELL_SIZE);
    let scale = proj / perp;
    let size = scale * CELL_SIZE;

    let x = bearing.to_radians().tan() * proj + (w as f32 - size) / 2.0;
    if x + size < 0.0 || x >= w as f32 {
        return None; // entirely outside the viewport
    }

    Some(VisSprite {
        entity,
        pos: s.pos,
        x,
        y_top: (h as f32 - size) * (1.0 - view.height),
        scale,
        size,
        perp,
        z,
        tex: s.tex,
    })
}

/// Composite every snapshot entry against the wall depth buffer.
///
/// Sprites are drawn in ascending z-order (farthest first) so later, nearer
/// draws win overlapped pixels.  Equal z-orders break the tie by world
/// position, x then y, so the outcome never depends on snapshot insertion
/// order.
pub(crate) fn sprite_pass(
    sprites: &[SpriteView],
    view: &Viewpoint,
    w: usize,
    h: usize,
    depth: &[f32],
    claims: &mut [Option<Claim>],
    out: &mut Vec<DrawCall>,
) {
    let proj = view.projection_distance(w);

    let mut vis: Vec<VisSprite> = sprites
        .iter()
        .enumerate()
        .filter_map(|(i, s)| project(view, proj, w, h, i, s))
        .collect();
    vis.sort_by(|a, b| {
        a.z.total_cmp(&b.z)
            .then(a.pos.x.total_cmp(&b.pos.x))
            .then(a.pos.y.total_cmp(&b.pos.y))
    });

    for vs in &vis {
        for i in 0..CELL_SIZE as usize {
            let off = i as f32 * vs.scale;
            if off >= vs.size {
                break;
            }
            let slice = vs.x + off;
            let col = slice as i32;
            if slice < 0.0 || col as usize >= w {
                continue;
            }
            let col = col as usize;

            // Painter test against the nearest wall in this column.
            if vs.perp >= depth[col] {
                continue;
            }

            out.push(DrawCall::Sprite(SpriteColumn {
                x: slice,
                y_top: vs.y_top,
                scale: vs.scale,
                tex: vs.tex,
                tex_col: i as u32,
                z: vs.z,
            }));

            if sprites[vs.entity].alive {
                claim_strip(claims, col, slice + vs.scale, vs);
            }
        }
    }
}

/// Record ownership of the columns a texel strip covers.
///
/// A strip never displaces a claim by a still-alive sprite stacked nearer;
/// claims by farther sprites are overwritten (dead entries never claim in
/// the first place, so anything already present is live).
fn claim_strip(claims: &mut [Option<Claim>], from: usize, until: f32, vs: &VisSprite) {
    if claims[from].is_some_and(|c| c.alive && c.z > vs.z) {
        return;
    }
    let mut col = from;
    while (col as f32) < until && col < claims.len() {
        claims[col] = Some(Claim {
            entity: vs.entity,
            z: vs.z,
            alive: true,
        });
        col += 1;
    }
}
