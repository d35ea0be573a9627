//! # Input Module
//!
//! Keyboard polling turned into per-frame intents for the level.
//!
//! Movement keys are read as held (one acceleration impulse per frame for
//! every held direction); the swing, confirm and quit keys are read as
//! presses.

use crate::game::state::Level;
use macroquad::prelude::*;
use serde::{Deserialize, Serialize};

/// A movement direction in the y-up world frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Heading in degrees, counter-clockwise from +x.
    ///
    /// # Examples
    ///
    /// ```
    /// use dungeonlife::Direction;
    ///
    /// assert_eq!(Direction::Right.angle(), 0.0);
    /// assert_eq!(Direction::Down.angle(), 270.0);
    /// ```
    pub fn angle(self) -> f32 {
        match self {
            Direction::Right => 0.0,
            Direction::Up => 90.0,
            Direction::Left => 180.0,
            Direction::Down => 270.0,
        }
    }

    pub fn all() -> [Direction; 4] {
        [
            Direction::Left,
            Direction::Right,
            Direction::Up,
            Direction::Down,
        ]
    }
}

/// Everything the player asked for this frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// Held movement directions, in [`Direction::all`] order
    pub moves: Vec<Direction>,
    /// Swing the weapon
    pub attack: bool,
    /// Confirm (start the game from the menu)
    pub confirm: bool,
    /// Leave the current scene
    pub quit: bool,
}

impl FrameInput {
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty() && !self.attack && !self.confirm && !self.quit
    }

    /// Feeds the frame's intents to the level: movement impulses first, then
    /// the swing.
    pub fn apply_to(&self, level: &mut Level) {
        for direction in &self.moves {
            level.on_move_input(*direction);
        }
        if self.attack {
            let hit = level.on_attack_input();
            log::debug!("swing hit {hit} monsters");
        }
    }
}

/// Input handler reading the macroquad keyboard state.
pub struct InputHandler {
    /// Whether WASD moves as well as the arrow keys
    pub wasd_enabled: bool,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    /// Creates a new input handler.
    ///
    /// # Examples
    ///
    /// ```
    /// use dungeonlife::InputHandler;
    ///
    /// let input_handler = InputHandler::new();
    /// assert!(input_handler.wasd_enabled);
    /// ```
    pub fn new() -> Self {
        Self { wasd_enabled: true }
    }

    /// Keys that move in `direction`.
    pub fn keys_for(&self, direction: Direction) -> Vec<KeyCode> {
        let (arrow, letter) = match direction {
            Direction::Left => (KeyCode::Left, KeyCode::A),
            Direction::Right => (KeyCode::Right, KeyCode::D),
            Direction::Up => (KeyCode::Up, KeyCode::W),
            Direction::Down => (KeyCode::Down, KeyCode::S),
        };
        if self.wasd_enabled {
            vec![arrow, letter]
        } else {
            vec![arrow]
        }
    }

    /// Reads the keyboard for this frame.
    pub fn poll(&self) -> FrameInput {
        let moves = Direction::all()
            .into_iter()
            .filter(|d| self.keys_for(*d).into_iter().any(is_key_down))
            .collect();
        FrameInput {
            moves,
            attack: is_key_pressed(KeyCode::Space),
            confirm: is_key_pressed(KeyCode::Enter),
            quit: is_key_pressed(KeyCode::Escape),
        }
    }
}
