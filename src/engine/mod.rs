mod composer;
mod sprites;
mod walls;

pub use composer::Composer;
pub use sprites::{SPRITE_Z_BASE, SpriteView};
