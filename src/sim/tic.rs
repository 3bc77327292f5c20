use std::time::{Duration, Instant};

use glam::Vec2;
use hecs::{Entity, World};

use super::components::{
    ActorFlags, Animation, Billboard, DeathFrames, FrameList, Health, Heading, Missile, Position,
};
use super::systems;
use crate::world::Grid;

pub const SIM_FPS: u32 = 35;
pub const DT: f32 = 1.0 / SIM_FPS as f32;
const TIC: Duration = Duration::from_micros(1_000_000 / SIM_FPS as u64);

/// Owns the ECS world and drives all game-logic systems at a fixed rate.
pub struct TicRunner {
    world: World,
    last: Instant,
}

impl Default for TicRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl TicRunner {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            last: Instant::now(),
        }
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[inline]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /*──────────────────────── spawning ──────────────────────────────*/

    /// Scenery: solid, undamageable, one frame.
    pub fn spawn_prop(&mut self, pos: Vec2, tex: crate::world::TextureId) -> Entity {
        self.world
            .spawn((Position(pos), Billboard::Still(tex), ActorFlags::SOLID))
    }

    /// Pickup: walk-through, shimmering through its frames.
    pub fn spawn_item(&mut self, pos: Vec2, frames: FrameList) -> Entity {
        self.world.spawn((
            Position(pos),
            Billboard::Cycle(frames),
            Animation::every(8),
            ActorFlags::empty(),
        ))
    }

    /// A standing opponent: eight rotation frames, a death sequence, and
    /// hit points.  Behaviour stays with the caller; the core only renders
    /// and occludes it.
    pub fn spawn_actor(
        &mut self,
        pos: Vec2,
        heading: f32,
        rotations: FrameList,
        death: FrameList,
        health: i32,
    ) -> Entity {
        self.world.spawn((
            Position(pos),
            Heading(heading),
            Billboard::Facing(rotations),
            DeathFrames(death),
            Health(health),
            ActorFlags::SOLID | ActorFlags::SHOOTABLE,
        ))
    }

    pub fn spawn_missile(
        &mut self,
        pos: Vec2,
        heading: f32,
        rotations: FrameList,
        blast: FrameList,
        owner: Option<Entity>,
    ) -> Entity {
        self.world.spawn((
            Position(pos),
            Heading(heading),
            Billboard::Facing(rotations),
            DeathFrames(blast),
            Missile {
                damage: 40,
                speed: 420.0,
                owner,
            },
            ActorFlags::empty(),
        ))
    }

    /*──────────────────────── stepping ──────────────────────────────*/

    /// Advance enough tics to synchronise simulation with real time.
    pub fn pump(&mut self, grid: &mut Grid, player: Vec2) {
        while self.last.elapsed() >= TIC {
            self.tick(grid, player);
            self.last += TIC;
        }
    }

    /// One fixed-rate tic: doors first (the draw pass reads their slide),
    /// then frame clocks, then projectiles.
    pub fn tick(&mut self, grid: &mut Grid, player: Vec2) {
        systems::doors(grid, &self.world, player, DT);
        systems::animation(&mut self.world);
        systems::missiles(&mut self.world, grid, DT);
    }
}
