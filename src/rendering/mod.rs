//! # Rendering Module
//!
//! Macroquad drawing on top of the simulation: the level view, the camera
//! that follows the knight, and the menu and HUD panels.

pub mod camera;
pub mod display;
pub mod ui;

pub use camera::*;
pub use display::*;
pub use ui::*;
