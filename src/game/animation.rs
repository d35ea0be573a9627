//! # Animation Module
//!
//! Chooses which of an actor's six clips plays, from its velocity and
//! whether it is dead.
//!
//! Clip data itself lives with the renderer. The simulation only tracks
//! opaque [`AnimationHandle`]s handed out by a [`ClipLoader`] when an actor
//! is built.

use crate::utils::Vector2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Horizontal facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// Facing implied by a velocity heading. Anything strictly between 90°
    /// and 270° faces left.
    pub fn from_velocity(velocity: Vector2) -> Self {
        let angle = velocity.angle();
        if angle > 90.0 && angle < 270.0 {
            Facing::Left
        } else {
            Facing::Right
        }
    }

    pub fn is_right(self) -> bool {
        self == Facing::Right
    }
}

/// The six clip states of an animated actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationState {
    IdleRight,
    IdleLeft,
    WalkRight,
    WalkLeft,
    DeadRight,
    DeadLeft,
}

impl AnimationState {
    pub fn idle(facing: Facing) -> Self {
        match facing {
            Facing::Right => AnimationState::IdleRight,
            Facing::Left => AnimationState::IdleLeft,
        }
    }

    pub fn walk(facing: Facing) -> Self {
        match facing {
            Facing::Right => AnimationState::WalkRight,
            Facing::Left => AnimationState::WalkLeft,
        }
    }

    pub fn dead(facing: Facing) -> Self {
        match facing {
            Facing::Right => AnimationState::DeadRight,
            Facing::Left => AnimationState::DeadLeft,
        }
    }

    pub fn facing(self) -> Facing {
        match self {
            AnimationState::IdleRight | AnimationState::WalkRight | AnimationState::DeadRight => {
                Facing::Right
            }
            AnimationState::IdleLeft | AnimationState::WalkLeft | AnimationState::DeadLeft => {
                Facing::Left
            }
        }
    }

    pub fn is_idle(self) -> bool {
        matches!(self, AnimationState::IdleRight | AnimationState::IdleLeft)
    }

    pub fn is_walking(self) -> bool {
        matches!(self, AnimationState::WalkRight | AnimationState::WalkLeft)
    }

    pub fn is_dead(self) -> bool {
        matches!(self, AnimationState::DeadRight | AnimationState::DeadLeft)
    }

    /// Next state from the previous one, the current velocity and death.
    ///
    /// Returns the state and whether clip time restarts. Dead states are
    /// terminal and keep the last facing. Idle keeps the facing of the last
    /// walk.
    pub fn next(self, velocity: Vector2, dead: bool) -> (AnimationState, bool) {
        let facing = self.facing();
        if self.is_dead() {
            return (self, false);
        }
        if dead {
            return (AnimationState::dead(facing), true);
        }
        if velocity.length() > 0.0 {
            let new_facing = Facing::from_velocity(velocity);
            let restart = self.is_idle() || new_facing != facing;
            return (AnimationState::walk(new_facing), restart);
        }
        (AnimationState::idle(facing), false)
    }
}

/// Opaque reference to a clip owned by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimationHandle(pub u32);

/// Clip names for the six states, as configured per actor kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipNames {
    pub walk_right: String,
    pub walk_left: String,
    pub idle_right: String,
    pub idle_left: String,
    pub dead_right: String,
    pub dead_left: String,
}

impl ClipNames {
    /// Conventional `<prefix>-<action>-<side>` names.
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            walk_right: format!("{prefix}-walk-right"),
            walk_left: format!("{prefix}-walk-left"),
            idle_right: format!("{prefix}-idle-right"),
            idle_left: format!("{prefix}-idle-left"),
            dead_right: format!("{prefix}-dead-right"),
            dead_left: format!("{prefix}-dead-left"),
        }
    }
}

/// Resolves clip names to handles. Implemented by whatever owns textures.
pub trait ClipLoader {
    fn load_clip(&mut self, name: &str) -> AnimationHandle;
}

/// Clip handles for all six states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipSet {
    pub walk_right: AnimationHandle,
    pub walk_left: AnimationHandle,
    pub idle_right: AnimationHandle,
    pub idle_left: AnimationHandle,
    pub dead_right: AnimationHandle,
    pub dead_left: AnimationHandle,
}

impl ClipSet {
    pub fn load(names: &ClipNames, loader: &mut dyn ClipLoader) -> Self {
        Self {
            walk_right: loader.load_clip(&names.walk_right),
            walk_left: loader.load_clip(&names.walk_left),
            idle_right: loader.load_clip(&names.idle_right),
            idle_left: loader.load_clip(&names.idle_left),
            dead_right: loader.load_clip(&names.dead_right),
            dead_left: loader.load_clip(&names.dead_left),
        }
    }

    pub fn handle_for(&self, state: AnimationState) -> AnimationHandle {
        match state {
            AnimationState::WalkRight => self.walk_right,
            AnimationState::WalkLeft => self.walk_left,
            AnimationState::IdleRight => self.idle_right,
            AnimationState::IdleLeft => self.idle_left,
            AnimationState::DeadRight => self.dead_right,
            AnimationState::DeadLeft => self.dead_left,
        }
    }
}

/// Interns clip names into sequential handles.
#[derive(Debug, Clone, Default)]
pub struct ClipRegistry {
    by_name: HashMap<String, AnimationHandle>,
    names: Vec<String>,
}

impl ClipRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name behind a handle.
    pub fn name_of(&self, handle: AnimationHandle) -> Option<&str> {
        self.names.get(handle.0 as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl ClipLoader for ClipRegistry {
    fn load_clip(&mut self, name: &str) -> AnimationHandle {
        if let Some(handle) = self.by_name.get(name) {
            return *handle;
        }
        let handle = AnimationHandle(self.names.len() as u32);
        self.names.push(name.to_string());
        self.by_name.insert(name.to_string(), handle);
        handle
    }
}

/// Per-actor animation state and clip playback time.
#[derive(Debug, Clone, PartialEq)]
pub struct Animator {
    state: AnimationState,
    elapsed: f32,
    clips: ClipSet,
}

impl Animator {
    /// Starts idle facing right.
    pub fn new(clips: ClipSet) -> Self {
        Self {
            state: AnimationState::IdleRight,
            elapsed: 0.0,
            clips,
        }
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn facing(&self) -> Facing {
        self.state.facing()
    }

    /// Seconds into the current clip.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Handle of the clip for the current state.
    pub fn clip(&self) -> AnimationHandle {
        self.clips.handle_for(self.state)
    }

    /// Advances clip time by `dt`, then re-evaluates the state.
    pub fn update(&mut self, dt: f32, velocity: Vector2, dead: bool) {
        self.elapsed += dt;
        let (state, restart) = self.state.next(velocity, dead);
        if restart {
            self.elapsed = 0.0;
        }
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animator() -> Animator {
        let mut registry = ClipRegistry::new();
        Animator::new(ClipSet::load(&ClipNames::with_prefix("knight"), &mut registry))
    }

    #[test]
    fn test_facing_from_velocity() {
        assert_eq!(Facing::from_velocity(Vector2::new(1.0, 0.0)), Facing::Right);
        assert_eq!(Facing::from_velocity(Vector2::new(-1.0, 0.0)), Facing::Left);
        // Straight up and down keep facing right.
        assert_eq!(Facing::from_velocity(Vector2::new(0.0, 1.0)), Facing::Right);
        assert_eq!(Facing::from_velocity(Vector2::new(0.0, -1.0)), Facing::Right);
        assert_eq!(Facing::from_velocity(Vector2::new(-1.0, -1.0)), Facing::Left);
    }

    #[test]
    fn test_walk_then_idle_keeps_facing() {
        let mut a = animator();
        a.update(0.1, Vector2::new(-10.0, 0.0), false);
        assert_eq!(a.state(), AnimationState::WalkLeft);
        a.update(0.1, Vector2::ZERO, false);
        assert_eq!(a.state(), AnimationState::IdleLeft);
    }

    #[test]
    fn test_clip_time_restarts_only_on_clip_change() {
        let mut a = animator();
        a.update(0.5, Vector2::new(10.0, 0.0), false);
        assert_eq!(a.elapsed(), 0.0);
        a.update(0.25, Vector2::new(10.0, 5.0), false);
        assert_eq!(a.elapsed(), 0.25);
        a.update(0.25, Vector2::new(-10.0, 0.0), false);
        assert_eq!(a.state(), AnimationState::WalkLeft);
        assert_eq!(a.elapsed(), 0.0);
    }

    #[test]
    fn test_dead_is_terminal_and_keeps_facing() {
        let mut a = animator();
        a.update(0.1, Vector2::new(-10.0, 0.0), false);
        a.update(0.1, Vector2::new(-10.0, 0.0), true);
        assert_eq!(a.state(), AnimationState::DeadLeft);
        a.update(0.1, Vector2::new(10.0, 0.0), true);
        assert_eq!(a.state(), AnimationState::DeadLeft);
        a.update(0.1, Vector2::new(10.0, 0.0), false);
        assert_eq!(a.state(), AnimationState::DeadLeft);
    }

    #[test]
    fn test_clip_handles_follow_state() {
        let mut registry = ClipRegistry::new();
        let clips = ClipSet::load(&ClipNames::with_prefix("orc"), &mut registry);
        let mut a = Animator::new(clips);
        assert_eq!(registry.name_of(a.clip()), Some("orc-idle-right"));
        a.update(0.1, Vector2::new(-1.0, 0.0), false);
        assert_eq!(registry.name_of(a.clip()), Some("orc-walk-left"));
    }

    #[test]
    fn test_registry_interns_names() {
        let mut registry = ClipRegistry::new();
        let a = registry.load_clip("x");
        let b = registry.load_clip("x");
        let c = registry.load_clip("y");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(registry.len(), 2);
    }
}
