use bitflags::bitflags;
use glam::Vec2;
use smallvec::SmallVec;

use crate::world::TextureId;

/// World-space position, in continuous world units.
#[derive(Debug, Clone, Copy)]
pub struct Position(pub Vec2);

/// Facing in degrees, same convention as the viewer.
#[derive(Debug, Clone, Copy)]
pub struct Heading(pub f32);

#[derive(Debug, Clone, Copy)]
pub struct Health(pub i32);

impl Health {
    #[inline]
    pub fn dead(&self) -> bool {
        self.0 <= 0
    }
}

bitflags! {
    /// Capability flags consulted by doors and the crosshair.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ActorFlags: u8 {
        /// Occupies its cell: keeps doors from auto-closing on it.
        const SOLID     = 0x01;
        /// Valid crosshair target.
        const SHOOTABLE = 0x02;
    }
}

/// Frame lists are almost always 8 long (rotations or a short sequence).
pub type FrameList = SmallVec<[TextureId; 8]>;

/// How an entity produces its current billboard frame.
#[derive(Debug, Clone)]
pub enum Billboard {
    /// One frame, always.
    Still(TextureId),
    /// Loops through frames on the entity's [`Animation`] clock.
    Cycle(FrameList),
    /// Eight rotation sectors picked by the viewer-relative facing;
    /// requires a [`Heading`].
    Facing(FrameList),
}

/// Frames shown once [`Health`] runs out; holds on the last frame.
#[derive(Debug, Clone)]
pub struct DeathFrames(pub FrameList);

/// Per-entity frame clock stepped once per tic.
#[derive(Debug, Clone, Copy)]
pub struct Animation {
    /// Tics per frame step.
    pub period: u32,
    pub tics: u32,
    pub frame: usize,
}

impl Animation {
    pub fn every(period: u32) -> Self {
        Self {
            period: period.max(1),
            tics: 0,
            frame: 0,
        }
    }

    pub fn step(&mut self) {
        self.tics += 1;
        if self.tics >= self.period {
            self.tics = 0;
            self.frame += 1;
        }
    }
}

/// Straight-line projectile.
#[derive(Debug, Clone, Copy)]
pub struct Missile {
    pub damage: i32,
    /// World units per second.
    pub speed: f32,
    /// Never hurts its own launcher.
    pub owner: Option<hecs::Entity>,
}

/// Marks a missile that went off; counts blast tics until despawn.
#[derive(Debug, Clone, Copy, Default)]
pub struct Detonated {
    pub tics: u32,
}
