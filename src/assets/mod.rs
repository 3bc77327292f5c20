mod level;
mod textures;

pub use level::{DEMO_LEVEL, LevelError, Scene, Spawn, SpawnKind, load, parse};
pub use textures::{SpriteCatalog, WallStyle, door_faces, install_sprites, wall_faces};
