mod components;
mod snapshot;
mod systems;
mod tic;

pub use components::{
    ActorFlags, Animation, Billboard, DeathFrames, Detonated, FrameList, Health, Heading, Missile,
    Position,
};
pub use snapshot::{Snapshot, capture};
pub use systems::{BLAST_TICS, MISSILE_HIT_RANGE, animation, apply_damage, doors, missiles};
pub use tic::{DT, SIM_FPS, TicRunner};
