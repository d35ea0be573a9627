//! # Dungeon Life
//!
//! A top-down action game: a knight walks out of the backyard, down the
//! stairs and through dungeon levels full of orcs.
//!
//! ## Architecture Overview
//!
//! The simulation core runs without a window and is driven one frame at a
//! time. Everything visual sits on top of it:
//!
//! - **Game**: tile collision, actor physics, animation state, combat and
//!   the level orchestrator
//! - **Maps**: level data and the Tiled JSON reader that produces it
//! - **Input**: keyboard polling turned into move and swing intents
//! - **Rendering**: macroquad drawing, camera follow and the HUD
//! - **Scenes**: the start menu and the play screen
//!
//! Timers read an injected [`Clock`], so the whole core can be stepped in
//! tests with a [`ManualClock`].

pub mod game;
pub mod input;
pub mod maps;
pub mod rendering;
pub mod scenes;
pub mod utils;

// Core module re-exports
pub use game::*;
pub use input::*;
pub use maps::*;
pub use rendering::*;
pub use scenes::*;
pub use utils::*;

/// Core error type for the game.
#[derive(thiserror::Error, Debug)]
pub enum DungeonError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// The map has no spawn point, so no level can be built from it
    #[error("Map has no spawn point")]
    MissingSpawn,

    /// Map data is malformed
    #[error("Invalid map: {0}")]
    InvalidMap(String),

    /// Configuration values are unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),
}

/// Result type used throughout the codebase.
pub type DungeonResult<T> = Result<T, DungeonError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Tile edge length in world units
    pub const DEFAULT_TILE_SIZE: u32 = 16;

    /// Frames per second target for the game loop
    pub const TARGET_FPS: u64 = 60;

    /// Window width in pixels
    pub const WINDOW_WIDTH: i32 = 640;

    /// Window height in pixels
    pub const WINDOW_HEIGHT: i32 = 480;

    /// Longest frame the simulation will integrate in one step, in seconds
    pub const MAX_FRAME_TIME: f32 = 0.1;
}
