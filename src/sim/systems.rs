//! Fixed-rate game-logic systems.  Each runs once per tic, over the whole
//! world, before any drawing for that frame starts.

use glam::Vec2;
use hecs::{Entity, World};

use super::components::{ActorFlags, Animation, Detonated, Health, Heading, Missile, Position};
use crate::world::{AUTO_CLOSE_AFTER, DoorState, Grid};

/// A missile detonates when a shootable target is within this box radius.
pub const MISSILE_HIT_RANGE: f32 = 60.0;

/// Tics a blast stays visible before the projectile despawns.
pub const BLAST_TICS: u32 = 10;

/// Advance every door leaf and apply the auto-close policy: a door fully
/// open for [`AUTO_CLOSE_AFTER`] seconds is commanded shut unless its cell
/// is occupied by the player or any solid entity.
pub fn doors(grid: &mut Grid, world: &World, player: Vec2, dt: f32) {
    let mut occupied = vec![Grid::cell_of(player)];
    for (_, (pos, flags)) in world.query::<(&Position, &ActorFlags)>().iter() {
        if flags.contains(ActorFlags::SOLID) {
            occupied.push(Grid::cell_of(pos.0));
        }
    }

    for ((row, col), door) in grid.doors_mut() {
        door.advance(dt);
        if door.state() == DoorState::Open
            && door.hold_time() >= AUTO_CLOSE_AFTER
            && !occupied.contains(&(row as i32, col as i32))
        {
            door.request_close();
        }
    }
}

/// Step every frame clock.
pub fn animation(world: &mut World) {
    for (_, anim) in world.query_mut::<&mut Animation>() {
        anim.step();
    }
}

/// Fly every live missile, detonate on walls or near shootable targets,
/// age blasts out of the world.
pub fn missiles(world: &mut World, grid: &Grid, dt: f32) {
    /* plan flight while the world is immutable */
    struct Plan {
        missile: Entity,
        next: Option<Vec2>, // None = wall impact
        hit: Option<(Entity, i32)>,
    }

    let mut plans = Vec::new();
    for (e, (pos, heading, missile)) in world
        .query::<(&Position, &Heading, &Missile)>()
        .without::<&Detonated>()
        .iter()
    {
        let r = heading.0.to_radians();
        let next = pos.0 + Vec2::new(r.cos(), -r.sin()) * missile.speed * dt;

        let mut hit = None;
        for (target, (tpos, flags, health)) in
            world.query::<(&Position, &ActorFlags, &Health)>().iter()
        {
            if !flags.contains(ActorFlags::SHOOTABLE)
                || health.dead()
                || Some(target) == missile.owner
            {
                continue;
            }
            let d = tpos.0 - next;
            if d.x.abs() <= MISSILE_HIT_RANGE && d.y.abs() <= MISSILE_HIT_RANGE {
                hit = Some((target, missile.damage));
                break;
            }
        }

        plans.push(Plan {
            missile: e,
            next: (!grid.is_solid_at(next)).then_some(next),
            hit,
        });
    }

    /* apply */
    for plan in plans {
        if let Some((target, damage)) = plan.hit {
            if let Ok(health) = world.query_one_mut::<&mut Health>(target) {
                health.0 = (health.0 - damage).max(0);
            }
            let _ = world.insert_one(plan.missile, Detonated::default());
        } else if let Some(next) = plan.next {
            if let Ok(pos) = world.query_one_mut::<&mut Position>(plan.missile) {
                pos.0 = next;
            }
        } else {
            let _ = world.insert_one(plan.missile, Detonated::default());
        }
    }

    /* age blasts */
    let mut done = Vec::new();
    for (e, det) in world.query_mut::<&mut Detonated>() {
        det.tics += 1;
        if det.tics > BLAST_TICS {
            done.push(e);
        }
    }
    for e in done {
        let _ = world.despawn(e);
    }
}

/// Crosshair damage from the player's weapon.
pub fn apply_damage(world: &mut World, target: Entity, damage: i32) {
    if let Ok(health) = world.query_one_mut::<&mut Health>(target) {
        health.0 = (health.0 - damage).max(0);
    }
}
