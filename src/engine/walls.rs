//! Wall pass: one ray per screen column (or per sub-division group),
//! fisheye-corrected into the depth buffer.

use crate::{
    renderer::{DrawCall, WallColumn},
    world::{CELL_SIZE, CastError, Grid, Viewpoint, WallTextures},
};

/// Cast the fan of rays and emit one wall slice per covered column.
///
/// Every covered column gets its corrected distance written into `depth`;
/// the sprite pass reads that buffer afterwards, never before the whole fan
/// has been walked.
pub(crate) fn wall_pass(
    grid: &Grid,
    walls: &WallTextures,
    view: &Viewpoint,
    w: usize,
    h: usize,
    sub_division: usize,
    depth: &mut [f32],
    out: &mut Vec<DrawCall>,
) -> Result<(), CastError> {
    let proj = view.projection_distance(w);
    let fan = view.ray_fan(w);

    let mut x = 0;
    while x < w {
        let angle = fan.angle_at(x);
        let hit = grid.find_nearest_intersection(view.pos, angle)?;

        // Remove the spherical distortion: the screen wants the distance
        // perpendicular to the view plane, not along the ray.
        let corrected = hit.distance * (angle - view.angle).to_radians().cos();

        let height = CELL_SIZE / corrected * proj;
        let y_top = (h as f32 - height) * (1.0 - view.height);
        let (tex, tex_col) = walls.column_for(grid, hit.orientation, hit.hit, angle);

        let span = sub_division.max(1).min(w - x);
        for n in 0..span {
            depth[x + n] = corrected;
            out.push(DrawCall::Wall(WallColumn {
                x: (x + n) as u16,
                y_top,
                height,
                tex,
                tex_col,
                depth: corrected,
            }));
        }
        x += span;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{FaceSet, NO_TEXTURE};
    use glam::Vec2;

    fn open_room() -> Grid {
        Grid::from_rows(vec![
            vec![1, 1, 1, 1, 1],
            vec![1, 0, 0, 0, 1],
            vec![1, 0, 0, 0, 1],
            vec![1, 0, 0, 0, 1],
            vec![1, 1, 1, 1, 1],
        ])
        .unwrap()
    }

    #[test]
    fn corrected_distance_never_exceeds_the_ray_distance() {
        let grid = open_room();
        let walls = WallTextures::new(FaceSet::uniform(NO_TEXTURE));
        let view = Viewpoint::new(Vec2::splat(CELL_SIZE * 2.5), 0.0);

        let w = 64;
        let mut depth = vec![f32::INFINITY; w];
        let mut out = Vec::new();
        wall_pass(&grid, &walls, &view, w, 48, 1, &mut depth, &mut out).unwrap();

        let fan = view.ray_fan(w);
        for x in 0..w {
            let raw = grid
                .find_nearest_intersection(view.pos, fan.angle_at(x))
                .unwrap()
                .distance;
            assert!(depth[x] <= raw + 1e-3, "column {x}");
            let off_axis = (fan.angle_at(x) - view.angle).abs() > 1e-4;
            if off_axis {
                assert!(depth[x] < raw, "column {x} should shrink off-axis");
            }
        }
    }

    #[test]
    fn straight_ahead_column_reads_one_and_a_half_cells() {
        let grid = open_room();
        let walls = WallTextures::new(FaceSet::uniform(NO_TEXTURE));
        let view = Viewpoint::new(Vec2::splat(CELL_SIZE * 2.5), 0.0);

        let w = 64;
        let mut depth = vec![f32::INFINITY; w];
        let mut out = Vec::new();
        wall_pass(&grid, &walls, &view, w, 48, 1, &mut depth, &mut out).unwrap();

        // Column w/2 looks exactly along the view axis.
        assert!((depth[w / 2] - CELL_SIZE * 1.5).abs() < 1e-2);
        assert_eq!(out.len(), w);
    }

    #[test]
    fn sub_division_replicates_one_ray_across_the_group() {
        let grid = open_room();
        let walls = WallTextures::new(FaceSet::uniform(NO_TEXTURE));
        let view = Viewpoint::new(Vec2::splat(CELL_SIZE * 2.5), 17.0);

        let w = 64;
        let mut depth = vec![f32::INFINITY; w];
        let mut out = Vec::new();
        wall_pass(&grid, &walls, &view, w, 48, 4, &mut depth, &mut out).unwrap();

        assert_eq!(out.len(), w);
        for group in depth.chunks(4) {
            assert!(group.iter().all(|&d| d == group[0]));
        }
    }
}
