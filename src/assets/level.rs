//! Text level-format loader.
//!
//! A level file is a handful of directive lines followed by a `map:`
//! section holding the cell-code matrix:
//!
//! ```text
//! # comment
//! player 2.5 2.5 0
//! wall 1 brick
//! guard 9.5 2.5 180
//! medkit 3.5 3.5
//! column 10.5 1.5
//! map:
//! 1 1 1 1
//! 1 0 0 1
//! 1 1 1 1
//! ```
//!
//! Positions are in cell units (fractions allowed) and are scaled to world
//! units on load.  Cell codes follow the grid contract: `0` floor, `-1`
//! door, positive values are wall codes bound to styles by `wall` lines.

use std::fs;
use std::path::Path;

use glam::Vec2;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use super::textures::{self, SpriteCatalog, WallStyle};
use crate::world::{CELL_SIZE, Grid, GridError, TextureBank, TextureError, WallTextures};

/// Built-in demo: two rooms joined by a sliding door.
pub const DEMO_LEVEL: &str = "\
# two rooms joined by a sliding door
player 2.5 2.5 0
wall 1 brick
wall 2 stone
wall 3 metal
guard 9.5 2.5 180
medkit 3.5 3.5
column 10.5 1.5
map:
1 1 1 1 1 1 3 2 2 2 2 2 2
1 0 0 0 0 1 3 2 0 0 0 0 2
1 0 0 0 0 0 -1 0 0 0 0 0 2
1 0 0 0 0 1 3 2 0 0 0 0 2
1 1 1 1 1 1 3 2 2 2 2 2 2
";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnKind {
    Guard,
    Medkit,
    Column,
}

#[derive(Clone, Copy, Debug)]
pub struct Spawn {
    pub kind: SpawnKind,
    pub pos: Vec2,
    pub heading: f32,
}

/// Everything a level file yields, ready for the engine and the sim.
#[derive(Debug)]
pub struct Scene {
    pub grid: Grid,
    pub walls: WallTextures,
    pub bank: TextureBank,
    pub catalog: SpriteCatalog,
    pub player_pos: Vec2,
    pub player_angle: f32,
    pub spawns: Vec<Spawn>,
}

impl Scene {
    pub fn demo() -> Result<Self, LevelError> {
        parse(DEMO_LEVEL)
    }
}

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: unknown directive `{what}`")]
    UnknownDirective { line: usize, what: String },

    #[error("line {line}: malformed number")]
    BadNumber { line: usize },

    #[error("line {line}: unknown wall style `{what}`")]
    UnknownStyle { line: usize, what: String },

    #[error("line {line}: bad cell code")]
    BadCell { line: usize },

    #[error("no `player` line in level")]
    MissingPlayer,

    #[error("no `map:` section in level")]
    MissingMap,

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Texture(#[from] TextureError),
}

static DIRECTIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<name>[a-z]+)\s+(?P<rest>.*)$").unwrap());
static MAP_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^map\s*:\s*$").unwrap());

pub fn load<P: AsRef<Path>>(path: P) -> Result<Scene, LevelError> {
    parse(&fs::read_to_string(path)?)
}

pub fn parse(text: &str) -> Result<Scene, LevelError> {
    let mut player: Option<(Vec2, f32)> = None;
    let mut wall_styles: Vec<(i32, WallStyle)> = Vec::new();
    let mut spawns = Vec::new();
    let mut rows: Vec<Vec<i32>> = Vec::new();
    let mut in_map = false;

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if in_map {
            let row = trimmed
                .split_whitespace()
                .map(str::parse)
                .collect::<Result<Vec<i32>, _>>()
                .map_err(|_| LevelError::BadCell { line })?;
            rows.push(row);
            continue;
        }

        if MAP_HEADER.is_match(trimmed) {
            in_map = true;
            continue;
        }

        let caps = DIRECTIVE
            .captures(trimmed)
            .ok_or_else(|| LevelError::UnknownDirective {
                line,
                what: trimmed.to_string(),
            })?;
        let name = &caps["name"];
        let rest = &caps["rest"];
        let nums: Vec<f32> = rest
            .split_whitespace()
            .filter_map(|t| t.parse().ok())
            .collect();
        let num = |i: usize| nums.get(i).copied().ok_or(LevelError::BadNumber { line });

        match name {
            "player" => {
                player = Some((Vec2::new(num(0)?, num(1)?) * CELL_SIZE, num(2)?));
            }
            "wall" => {
                let code = num(0)? as i32;
                let style_name = rest.split_whitespace().nth(1).unwrap_or("");
                let style =
                    WallStyle::from_name(style_name).ok_or_else(|| LevelError::UnknownStyle {
                        line,
                        what: style_name.to_string(),
                    })?;
                wall_styles.push((code, style));
            }
            "guard" => spawns.push(Spawn {
                kind: SpawnKind::Guard,
                pos: Vec2::new(num(0)?, num(1)?) * CELL_SIZE,
                heading: nums.get(2).copied().unwrap_or(0.0),
            }),
            "medkit" => spawns.push(Spawn {
                kind: SpawnKind::Medkit,
                pos: Vec2::new(num(0)?, num(1)?) * CELL_SIZE,
                heading: 0.0,
            }),
            "column" => spawns.push(Spawn {
                kind: SpawnKind::Column,
                pos: Vec2::new(num(0)?, num(1)?) * CELL_SIZE,
                heading: 0.0,
            }),
            _ => {
                return Err(LevelError::UnknownDirective {
                    line,
                    what: name.to_string(),
                });
            }
        }
    }

    if !in_map {
        return Err(LevelError::MissingMap);
    }
    let (player_pos, player_angle) = player.ok_or(LevelError::MissingPlayer)?;

    let grid = Grid::from_rows(rows)?;

    let mut bank = TextureBank::default_with_checker();
    let mut walls = WallTextures::new(textures::door_faces(&mut bank)?);
    for (code, style) in wall_styles {
        let faces = textures::wall_faces(&mut bank, style)?;
        walls.bind(code, faces);
    }
    let catalog = textures::install_sprites(&mut bank)?;

    Ok(Scene {
        grid,
        walls,
        bank,
        catalog,
        player_pos,
        player_angle,
        spawns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_level_parses() {
        let scene = Scene::demo().unwrap();
        assert_eq!(scene.grid.width(), 13);
        assert_eq!(scene.grid.height(), 5);
        assert!(scene.grid.is_door(2, 6));
        assert_eq!(scene.player_pos, Vec2::splat(CELL_SIZE * 2.5));
        assert_eq!(scene.player_angle, 0.0);
        assert_eq!(scene.spawns.len(), 3);
        assert_eq!(scene.spawns[0].kind, SpawnKind::Guard);
        assert_eq!(scene.spawns[0].heading, 180.0);
    }

    #[test]
    fn ragged_map_is_fatal() {
        let text = "player 1.5 1.5 0\nmap:\n1 1 1\n1 1\n";
        match parse(text) {
            Err(LevelError::Grid(GridError::Ragged { row: 1, .. })) => {}
            other => panic!("expected ragged-row error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_directive_is_fatal() {
        let text = "teleporter 1 1\nmap:\n1\n";
        match parse(text) {
            Err(LevelError::UnknownDirective { line: 1, what }) => {
                assert_eq!(what, "teleporter");
            }
            other => panic!("expected directive error, got {other:?}"),
        }
    }

    #[test]
    fn missing_player_and_map_are_fatal() {
        assert!(matches!(
            parse("map:\n1 1\n1 1\n"),
            Err(LevelError::MissingPlayer)
        ));
        assert!(matches!(
            parse("player 1 1 0\n"),
            Err(LevelError::MissingMap)
        ));
    }

    #[test]
    fn bad_wall_style_is_fatal() {
        let text = "player 1 1 0\nwall 1 chintz\nmap:\n1\n";
        assert!(matches!(
            parse(text),
            Err(LevelError::UnknownStyle { line: 2, .. })
        ));
    }
}
