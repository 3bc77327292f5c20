mod camera;
mod door;
mod grid;
mod raycast;
mod texture;

pub use camera::{FOV, MOVE_SPEED, RUN_FACTOR, RayFan, TURN_SPEED, Viewpoint};
pub use door::{AUTO_CLOSE_AFTER, Door, DoorState, SLIDE_SPEED};
pub use grid::{CELL_SIZE, DOOR, FLOOR, Grid, GridError, HALF_CELL, Orientation};
pub use raycast::{CastError, Intersection};
pub use texture::{FaceSet, NO_TEXTURE, Texture, TextureBank, TextureError, TextureId, WallTextures};
