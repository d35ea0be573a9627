//! # Combat Module
//!
//! Health, timers and the weapon used to resolve fights between the knight
//! and monsters.
//!
//! All timers compare millisecond timestamps from the injected clock, so
//! their behaviour does not depend on frame rate.

use crate::game::animation::Facing;
use crate::utils::Vector2;
use serde::{Deserialize, Serialize};

/// Health and attack stats of anything that can be hurt.
///
/// # Examples
///
/// ```
/// use dungeonlife::CombatantState;
///
/// let mut orc = CombatantState::new(10.0, 5.0, 10.0);
/// orc.decrease_health(15.0);
/// assert_eq!(orc.health(), 0.0);
/// assert!(!orc.is_alive());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombatantState {
    health: f32,
    kill_reward: f32,
    attack_power: f32,
}

impl CombatantState {
    pub fn new(health: f32, kill_reward: f32, attack_power: f32) -> Self {
        Self {
            health: health.max(0.0),
            kill_reward,
            attack_power,
        }
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn kill_reward(&self) -> f32 {
        self.kill_reward
    }

    pub fn attack_power(&self) -> f32 {
        self.attack_power
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Subtracts `amount`, never going below zero.
    pub fn decrease_health(&mut self, amount: f32) {
        self.health = (self.health - amount).max(0.0);
    }
}

/// The knight's stats plus accumulated experience.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeroState {
    pub combatant: CombatantState,
    experience: f32,
}

impl HeroState {
    pub fn new(health: f32, attack_power: f32) -> Self {
        Self {
            combatant: CombatantState::new(health, 0.0, attack_power),
            experience: 0.0,
        }
    }

    pub fn experience(&self) -> f32 {
        self.experience
    }

    pub fn increase_experience(&mut self, amount: f32) {
        self.experience += amount;
    }
}

/// Timed stun. Active from `stun(now)` until more than `duration_ms` has
/// passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StunTimer {
    pub duration_ms: u64,
    started_at: Option<u64>,
}

impl StunTimer {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            started_at: None,
        }
    }

    /// Starts or restarts the stun.
    pub fn stun(&mut self, now: u64) {
        self.started_at = Some(now);
    }

    /// Whether the stun is in effect at `now`.
    pub fn is_stunned(&self, now: u64) -> bool {
        match self.started_at {
            Some(start) => now.saturating_sub(start) <= self.duration_ms,
            None => false,
        }
    }

    /// Clears an expired stun. Returns true if it expired on this call.
    pub fn update(&mut self, now: u64) -> bool {
        if self.started_at.is_some() && !self.is_stunned(now) {
            self.started_at = None;
            return true;
        }
        false
    }

    pub fn clear(&mut self) {
        self.started_at = None;
    }
}

/// Minimum spacing between attacks. A cooldown that never fired is ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cooldown {
    pub period_ms: u64,
    last_fired: Option<u64>,
}

impl Cooldown {
    pub fn new(period_ms: u64) -> Self {
        Self {
            period_ms,
            last_fired: None,
        }
    }

    pub fn is_ready(&self, now: u64) -> bool {
        match self.last_fired {
            Some(last) => now.saturating_sub(last) > self.period_ms,
            None => true,
        }
    }

    pub fn fire(&mut self, now: u64) {
        self.last_fired = Some(now);
    }

    pub fn last_fired(&self) -> Option<u64> {
        self.last_fired
    }
}

/// Whose attack stat a monster's hit on the knight subtracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageSource {
    /// The knight's own attack power, as the game has always played.
    #[default]
    HeroAttack,
    /// The attacking monster's attack power.
    MonsterAttack,
}

impl DamageSource {
    pub fn amount(self, hero: &HeroState, monster: &CombatantState) -> f32 {
        match self {
            DamageSource::HeroAttack => hero.combatant.attack_power(),
            DamageSource::MonsterAttack => monster.attack_power(),
        }
    }
}

/// What a monster is doing this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MonsterBehavior {
    #[default]
    Idle,
    Chasing,
    Attacking,
    Stunned,
    Dead,
}

/// Pose the renderer should show for the weapon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponPose {
    IdleRight,
    IdleLeft,
    HitRight,
    HitLeft,
}

/// The knight's melee weapon.
///
/// It has no physics of its own; each tick it is placed beside its owner
/// on the side the owner faces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub range: f32,
    pub hit_duration_ms: u64,
    pub offset_x: f32,
    pub knockback_speed: f32,
    position: Vector2,
    facing: Facing,
    hit_started_at: Option<u64>,
}

impl Weapon {
    pub fn new(range: f32, hit_duration_ms: u64, offset_x: f32, knockback_speed: f32) -> Self {
        Self {
            range,
            hit_duration_ms,
            offset_x,
            knockback_speed,
            position: Vector2::ZERO,
            facing: Facing::Right,
            hit_started_at: None,
        }
    }

    /// Starts the hit window.
    pub fn hit(&mut self, now: u64) {
        self.hit_started_at = Some(now);
    }

    /// Whether the hit window is open at `now`.
    pub fn is_hitting(&self, now: u64) -> bool {
        match self.hit_started_at {
            Some(start) => now.saturating_sub(start) <= self.hit_duration_ms,
            None => false,
        }
    }

    /// Follows the owner.
    pub fn follow(&mut self, owner_position: Vector2, facing: Facing) {
        let offset = if facing.is_right() {
            self.offset_x
        } else {
            -self.offset_x
        };
        self.position = Vector2::new(owner_position.x + offset, owner_position.y);
        self.facing = facing;
    }

    pub fn position(&self) -> Vector2 {
        self.position
    }

    pub fn pose(&self, now: u64) -> WeaponPose {
        match (self.is_hitting(now), self.facing) {
            (true, Facing::Right) => WeaponPose::HitRight,
            (true, Facing::Left) => WeaponPose::HitLeft,
            (false, Facing::Right) => WeaponPose::IdleRight,
            (false, Facing::Left) => WeaponPose::IdleLeft,
        }
    }
}
