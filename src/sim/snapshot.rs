//! Builds the per-frame renderable snapshot the compositor consumes.
//!
//! Frame resolution happens here, once, with the viewer in hand: rotational
//! billboards pick their sector from the viewer-relative facing, dead
//! actors show their death sequence, blasts play out.  The compositor never
//! looks back into the ECS.

use hecs::{Entity, World};

use super::components::{Animation, Billboard, DeathFrames, Detonated, Health, Heading, Position};
use crate::{engine::SpriteView, world::Viewpoint};

/// Tics per death-sequence frame.
const DEATH_STEP: u32 = 3;

/// The frame's renderables plus the entity each view index maps back to,
/// so crosshair hits can be routed to the ECS.
pub struct Snapshot {
    pub views: Vec<SpriteView>,
    pub entities: Vec<Entity>,
}

impl Snapshot {
    pub fn entity(&self, view_index: usize) -> Option<Entity> {
        self.entities.get(view_index).copied()
    }
}

/// Rotation sector for an 8-frame billboard: which of the entity's eight
/// sides the viewer sees, 0 = facing the viewer head-on.
fn facing_sector(heading: f32, viewer_angle: f32) -> usize {
    (((heading + 180.0 + viewer_angle + 22.5).rem_euclid(360.0)) / 45.0) as usize
}

pub fn capture(world: &World, view: &Viewpoint) -> Snapshot {
    let mut views = Vec::new();
    let mut entities = Vec::new();

    let mut query = world.query::<(
        &Position,
        &Billboard,
        Option<&Heading>,
        Option<&Animation>,
        Option<&Health>,
        Option<&DeathFrames>,
        Option<&Detonated>,
    )>();

    for (e, (pos, billboard, heading, anim, health, death, blast)) in query.iter() {
        let dead = health.is_some_and(Health::dead) || blast.is_some();

        let tex = if dead {
            let Some(DeathFrames(frames)) = death else {
                continue; // nothing to show for this corpse
            };
            let step = blast.map_or(u32::MAX, |b| b.tics) / DEATH_STEP;
            frames[(step as usize).min(frames.len() - 1)]
        } else {
            match billboard {
                Billboard::Still(tex) => *tex,
                Billboard::Cycle(frames) => {
                    let frame = anim.map_or(0, |a| a.frame);
                    frames[frame % frames.len()]
                }
                Billboard::Facing(frames) => {
                    let heading = heading.map_or(0.0, |h| h.0);
                    frames[facing_sector(heading, view.angle) % frames.len()]
                }
            }
        };

        // Occlusion priority belongs to entities that can still be shot;
        // props, pickups, and corpses are drawn but never claim columns.
        let alive = health.is_some_and(|h| !h.dead());

        views.push(SpriteView {
            pos: pos.0,
            tex,
            alive,
        });
        entities.push(e);
    }

    Snapshot { views, entities }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::components::FrameList;
    use glam::Vec2;
    use smallvec::smallvec;

    fn eight() -> FrameList {
        (10..18).collect()
    }

    #[test]
    fn facing_sector_front_and_back() {
        // Entity looking straight at a viewer looking straight at it.
        assert_eq!(facing_sector(180.0, 0.0), 0);
        // Entity looking away: the viewer sees its back sector.
        assert_eq!(facing_sector(0.0, 0.0), 4);
        // Quarter turns land on the side sectors.
        assert_eq!(facing_sector(90.0, 0.0), 6);
        assert_eq!(facing_sector(270.0, 0.0), 2);
    }

    #[test]
    fn rotational_billboard_resolves_by_viewer_angle() {
        let mut world = World::new();
        world.spawn((
            Position(Vec2::new(100.0, 0.0)),
            Heading(180.0),
            Billboard::Facing(eight()),
            Health(100),
        ));

        let view = Viewpoint::new(Vec2::ZERO, 0.0);
        let snap = capture(&world, &view);
        assert_eq!(snap.views.len(), 1);
        assert_eq!(snap.views[0].tex, 10); // front sector
        assert!(snap.views[0].alive);
    }

    #[test]
    fn dead_actor_shows_the_last_death_frame_and_loses_priority() {
        let mut world = World::new();
        let death: FrameList = smallvec![40, 41, 42];
        world.spawn((
            Position(Vec2::ZERO),
            Billboard::Facing(eight()),
            Heading(0.0),
            Health(0),
            DeathFrames(death),
        ));

        let view = Viewpoint::new(Vec2::new(50.0, 0.0), 180.0);
        let snap = capture(&world, &view);
        assert_eq!(snap.views[0].tex, 42);
        assert!(!snap.views[0].alive);
    }

    #[test]
    fn blast_plays_the_sequence_forward() {
        let mut world = World::new();
        let death: FrameList = smallvec![50, 51, 52];
        world.spawn((
            Position(Vec2::ZERO),
            Billboard::Still(5),
            DeathFrames(death),
            Detonated { tics: 0 },
        ));

        let view = Viewpoint::new(Vec2::new(50.0, 0.0), 180.0);
        let snap = capture(&world, &view);
        assert_eq!(snap.views[0].tex, 50);

        if let Some((_, det)) = world.query_mut::<&mut Detonated>().into_iter().next() {
            det.tics = 2 * DEATH_STEP;
        }
        let snap = capture(&world, &view);
        assert_eq!(snap.views[0].tex, 52);
    }

    #[test]
    fn corpse_without_death_frames_is_omitted() {
        let mut world = World::new();
        world.spawn((Position(Vec2::ZERO), Billboard::Still(5), Health(0)));
        let view = Viewpoint::new(Vec2::new(50.0, 0.0), 0.0);
        let snap = capture(&world, &view);
        assert!(snap.views.is_empty());
    }
}
