//! ---------------------------------------------------------------------------
//! Classic software (CPU) column renderer
//!
//! * Fills an internal `Vec<u32>` frame-buffer in **0xAARRGGBB** format.
//! * Relies on the compositing stage to feed walls before sprites and
//!   sprites back-to-front, so no Z-buffer is needed here.
//! ---------------------------------------------------------------------------

use crate::{
    renderer::{Renderer, Rgba, SpriteColumn, WallColumn},
    world::{CELL_SIZE, TextureBank},
};

const CEILING: Rgba = 0xFF_38_38_40;
const FLOOR: Rgba = 0xFF_70_70_70;

/// Wolfenstein-style column renderer.
pub struct Software {
    scratch: Vec<Rgba>,
    width: usize,
    height: usize,
}

impl Default for Software {
    fn default() -> Self {
        Self {
            scratch: Vec::new(),
            width: 0,
            height: 0,
        }
    }
}

impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize, horizon: f32) {
        // (re)allocate if resolution changed
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.scratch.resize(w * h, 0);
        }

        /* ceiling above the horizon row, floor below */
        let split = ((h as f32) * (1.0 - horizon)).clamp(0.0, h as f32) as usize;
        self.scratch[..split * w].fill(CEILING);
        self.scratch[split * w..].fill(FLOOR);
    }

    fn draw_wall(&mut self, wc: &WallColumn, bank: &TextureBank) {
        let col = wc.x as usize;
        if col >= self.width || wc.height <= 0.0 {
            return;
        }
        let tex = bank
            .texture(wc.tex)
            .unwrap_or_else(|_| bank.texture(0).unwrap());

        /* texture u from the cell-unit column */
        let u = (wc.tex_col as usize * tex.w) / CELL_SIZE as usize;
        let u = u.min(tex.w - 1);

        let y0 = wc.y_top.max(0.0) as usize;
        let y1 = ((wc.y_top + wc.height) as usize).min(self.height);
        let v_step = tex.h as f32 / wc.height;
        let mut v_f = (y0 as f32 - wc.y_top) * v_step;

        for y in y0..y1 {
            let v = (v_f as usize).min(tex.h - 1);
            self.scratch[y * self.width + col] = tex.pixels[v * tex.w + u];
            v_f += v_step;
        }
    }

    fn draw_sprite(&mut self, sc: &SpriteColumn, bank: &TextureBank) {
        if sc.scale <= 0.0 {
            return;
        }
        let tex = bank
            .texture(sc.tex)
            .unwrap_or_else(|_| bank.texture(0).unwrap());

        let u = (sc.tex_col as usize * tex.w) / CELL_SIZE as usize;
        let u = u.min(tex.w - 1);

        let x0 = sc.x.max(0.0) as usize;
        let mut x1 = ((sc.x + sc.scale).ceil() as usize).min(self.width);
        if x1 <= x0 {
            x1 = (x0 + 1).min(self.width);
        }

        let px_h = sc.scale * CELL_SIZE;
        let y0 = sc.y_top.max(0.0) as usize;
        let y1 = ((sc.y_top + px_h) as usize).min(self.height);
        let v_step = tex.h as f32 / px_h;

        for x in x0..x1 {
            let mut v_f = (y0 as f32 - sc.y_top) * v_step;
            for y in y0..y1 {
                let v = (v_f as usize).min(tex.h - 1);
                let texel = tex.pixels[v * tex.w + u];
                if texel >> 24 != 0 {
                    self.scratch[y * self.width + x] = texel;
                }
                v_f += v_step;
            }
        }
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.scratch, self.width, self.height);
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
