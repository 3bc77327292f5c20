//! Interactive software-rendered viewer.
//!
//! ```bash
//! cargo run --release -- [level.txt]
//! ```
//!
//! Arrows or WASD move, Shift runs, Space works doors, Ctrl fires at
//! whatever the crosshair column claims.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use glam::Vec2;
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use yawolf_rs::{
    assets::{Scene, SpawnKind},
    engine::Composer,
    renderer::{RendererExt, Software},
    sim::{TicRunner, apply_damage, capture},
    world::{Grid, MOVE_SPEED, RUN_FACTOR, TURN_SPEED, Viewpoint},
};

#[derive(Parser)]
#[command(version, about = "Yet Another Wolfenstein in Rust")]
struct Args {
    /// Level file; runs the built-in demo level when omitted.
    level: Option<PathBuf>,

    #[arg(long, default_value_t = 960)]
    width: usize,

    #[arg(long, default_value_t = 600)]
    height: usize,

    /// Screen columns sharing one ray; raise for speed on big windows.
    #[arg(long, default_value_t = 1)]
    sub_division: usize,
}

const FIRE_COOLDOWN: Duration = Duration::from_millis(300);
const WEAPON_DAMAGE: i32 = 25;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut scene = match &args.level {
        Some(path) => yawolf_rs::assets::load(path)
            .with_context(|| format!("loading level {}", path.display()))?,
        None => Scene::demo()?,
    };

    let mut view = Viewpoint::new(scene.player_pos, scene.player_angle);

    let mut sim = TicRunner::new();
    for spawn in &scene.spawns {
        match spawn.kind {
            SpawnKind::Guard => {
                sim.spawn_actor(
                    spawn.pos,
                    spawn.heading,
                    scene.catalog.guard.clone(),
                    scene.catalog.guard_death.clone(),
                    100,
                );
            }
            SpawnKind::Medkit => {
                sim.spawn_item(spawn.pos, scene.catalog.medkit.clone());
            }
            SpawnKind::Column => {
                sim.spawn_prop(spawn.pos, scene.catalog.column);
            }
        }
    }

    let mut composer = Composer::new();
    composer.sub_division = args.sub_division.max(1);
    let mut renderer = Software::default();

    let mut win = Window::new("yawolf", args.width, args.height, WindowOptions::default())?;
    win.set_target_fps(60);

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();

    let mut last_frame = Instant::now();
    let mut last_fire = Instant::now() - FIRE_COOLDOWN;

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let t0 = Instant::now();
        let dt = last_frame.elapsed().as_secs_f32().min(0.1);
        last_frame = Instant::now();

        /* ------------------------ movement ---------------------------- */
        let run = win.is_key_down(Key::LeftShift) || win.is_key_down(Key::RightShift);
        let speed = MOVE_SPEED * if run { RUN_FACTOR } else { 1.0 } * dt;
        let turn = TURN_SPEED * if run { RUN_FACTOR } else { 1.0 } * dt;

        if win.is_key_down(Key::Left) {
            view.turn(turn);
        }
        if win.is_key_down(Key::Right) {
            view.turn(-turn);
        }

        let mut step = Vec2::ZERO;
        if win.is_key_down(Key::Up) || win.is_key_down(Key::W) {
            step += view.forward() * speed;
        }
        if win.is_key_down(Key::Down) || win.is_key_down(Key::S) {
            step -= view.forward() * speed;
        }
        if win.is_key_down(Key::A) {
            step += view.left() * speed;
        }
        if win.is_key_down(Key::D) {
            step -= view.left() * speed;
        }
        if step != Vec2::ZERO {
            view.advance(&scene.grid, step);
        }

        /* ------------------------ use doors --------------------------- */
        if win.is_key_pressed(Key::Space, KeyRepeat::No) {
            let (row, col) = Grid::cell_of(view.pos);
            if let Some((r, c)) = scene.grid.find_door_facing(row, col, view.angle) {
                if let Some(door) = scene.grid.door_mut(r, c) {
                    if door.is_open() {
                        door.request_close();
                    } else if door.is_closed() {
                        door.request_open();
                    }
                }
            }
        }

        /* ------------------------ simulate ---------------------------- */
        sim.pump(&mut scene.grid, view.pos);

        /* ------------------------ compose ----------------------------- */
        let snapshot = capture(sim.world(), &view);
        composer.compose(
            &scene.grid,
            &scene.walls,
            &snapshot.views,
            &view,
            args.width,
            args.height,
        )?;

        /* ------------------------ fire -------------------------------- */
        if win.is_key_down(Key::LeftCtrl) && last_fire.elapsed() >= FIRE_COOLDOWN {
            last_fire = Instant::now();
            if let Some(target) = composer
                .entity_at(args.width / 2)
                .and_then(|idx| snapshot.entity(idx))
            {
                apply_damage(sim.world_mut(), target, WEAPON_DAMAGE);
            }
        }

        /* ------------------------ present ----------------------------- */
        renderer.draw_frame(
            args.width,
            args.height,
            view.height,
            composer.calls(),
            &scene.bank,
            |fb, w, h| {
                acc_time += t0.elapsed();
                acc_frames += 1;
                win.update_with_buffer(fb, w, h).unwrap()
            },
        );

        if last_print.elapsed() >= Duration::from_secs(3) {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames.max(1) as f64;
            println!("avg frame: {:.2} ms  ({:.1} FPS)", avg_ms, 1000.0 / avg_ms);
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}
