//! Yet Another Wolfenstein in Rust.
//!
//! A grid raycasting core: a tile world with sliding doors, a closed-form
//! ray/grid intersection engine, and a two-pass projection stage that writes
//! walls into a per-column depth buffer before compositing billboard sprites
//! against it.  The library produces draw-call lists and pixel buffers; it
//! never owns a window.

pub mod assets;
pub mod engine;
pub mod renderer;
pub mod sim;
pub mod world;
