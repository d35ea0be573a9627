//! # Game Module
//!
//! The simulation core: tile collision, actor physics, animation, combat and
//! the per-level orchestrator that ties them together each frame.
//!
//! This module contains everything that runs without a window:
//! - Tile grid and the walkability oracle
//! - Kinematics shared by the knight and monsters
//! - Clip selection from motion and death state
//! - Health, stun, cooldown and weapon timing
//! - Level orchestration and campaign sequencing

pub mod animation;
pub mod campaign;
pub mod combat;
pub mod config;
pub mod entities;
pub mod events;
pub mod physics;
pub mod state;
pub mod world;

pub use animation::*;
pub use campaign::*;
pub use combat::*;
pub use config::*;
pub use entities::*;
pub use events::*;
pub use physics::*;
pub use state::*;
pub use world::*;
