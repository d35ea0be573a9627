//! # Entities Module
//!
//! The knight and the monsters, built by composition: every actor has a
//! physics body, a shape and an animator; combat state sits beside it.
//!
//! Monster kinds differ only in the stat table and clip set picked at
//! spawn time.

use crate::game::animation::{Animator, ClipLoader, ClipSet};
use crate::game::combat::{CombatantState, Cooldown, HeroState, MonsterBehavior, StunTimer};
use crate::game::config::{ActorProfile, HeroConfig, MonsterConfig};
use crate::game::physics::{CollisionResponse, PhysicsBody, StepOutcome};
use crate::game::world::{Footprint, FootprintGate, TileGrid};
use crate::utils::{Polygon, Vector2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for actors.
pub type EntityId = Uuid;

/// Creates a new unique entity ID.
pub fn new_entity_id() -> EntityId {
    Uuid::new_v4()
}

/// The monster kinds a map can place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonsterKind {
    Orc,
    MaskedOrc,
    Boss,
}

impl MonsterKind {
    /// Every kind, in spawn order.
    pub fn all() -> [MonsterKind; 3] {
        [MonsterKind::Orc, MonsterKind::MaskedOrc, MonsterKind::Boss]
    }

    /// The map object type that spawns this kind.
    pub fn object_type(self) -> &'static str {
        match self {
            MonsterKind::Orc => "orc",
            MonsterKind::MaskedOrc => "orc2",
            MonsterKind::Boss => "boss",
        }
    }

    pub fn from_object_type(name: &str) -> Option<Self> {
        Self::all().into_iter().find(|k| k.object_type() == name)
    }
}

/// Simulation state shared by every moving thing.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: EntityId,
    pub body: PhysicsBody,
    pub midpoint: Vector2,
    pub boundary: Polygon,
    pub footprint: Footprint,
    pub animator: Animator,
    /// Back-to-front draw position, assigned by the level each tick.
    pub draw_index: usize,
}

impl Actor {
    pub fn new(
        position: Vector2,
        profile: &ActorProfile,
        response: CollisionResponse,
        loader: &mut dyn ClipLoader,
    ) -> Self {
        Self {
            id: new_entity_id(),
            body: PhysicsBody::new(position, profile.movement).with_response(response),
            midpoint: profile.midpoint,
            boundary: profile.boundary.clone(),
            footprint: profile.footprint,
            animator: Animator::new(ClipSet::load(&profile.clips, loader)),
            draw_index: 0,
        }
    }

    /// Lower-left position of the sprite.
    pub fn position(&self) -> Vector2 {
        self.body.position
    }

    /// Visual center, used for distances and aiming.
    pub fn center(&self) -> Vector2 {
        self.body.position + self.midpoint
    }

    pub fn distance_to(&self, other: &Actor) -> f32 {
        self.center().distance(other.center())
    }

    /// Whether the two hit polygons intersect.
    pub fn overlaps(&self, other: &Actor) -> bool {
        self.boundary
            .translated(self.body.position)
            .overlaps(&other.boundary.translated(other.body.position))
    }

    /// Accelerates toward another actor's center.
    pub fn move_towards(&mut self, target: Vector2) {
        let from = self.center();
        self.body.accelerate_towards(from, target);
    }

    /// Whether the footprint fits at the current position.
    pub fn fits(&self, grid: &TileGrid) -> bool {
        self.footprint.fits(grid, self.body.position)
    }

    /// Runs one physics step gated by the footprint against `grid`.
    pub fn step(&mut self, dt: f32, grid: &TileGrid) -> StepOutcome {
        let gate = FootprintGate {
            grid,
            footprint: &self.footprint,
        };
        self.body.step(dt, &gate)
    }

    /// Advances the animator from the current velocity.
    pub fn animate(&mut self, dt: f32, dead: bool) {
        let velocity = self.body.velocity();
        self.animator.update(dt, velocity, dead);
    }
}

/// The player character.
#[derive(Debug, Clone)]
pub struct Knight {
    pub actor: Actor,
    pub state: HeroState,
    pub stun: StunTimer,
}

impl Knight {
    pub fn new(
        position: Vector2,
        config: &HeroConfig,
        response: CollisionResponse,
        loader: &mut dyn ClipLoader,
    ) -> Self {
        Self {
            actor: Actor::new(position, &config.profile, response, loader),
            state: HeroState::new(config.health, config.attack_power),
            stun: StunTimer::new(config.stun_duration_ms),
        }
    }

    pub fn is_dead(&self) -> bool {
        !self.state.combatant.is_alive()
    }

    pub fn is_stunned(&self, now: u64) -> bool {
        self.stun.is_stunned(now)
    }
}

/// A hostile actor.
#[derive(Debug, Clone)]
pub struct Monster {
    pub actor: Actor,
    pub kind: MonsterKind,
    pub state: CombatantState,
    pub sight: f32,
    pub attack_range: f32,
    pub cooldown: Cooldown,
    pub stun: StunTimer,
    pub behavior: MonsterBehavior,
}

impl Monster {
    pub fn new(
        kind: MonsterKind,
        position: Vector2,
        config: &MonsterConfig,
        response: CollisionResponse,
        loader: &mut dyn ClipLoader,
    ) -> Self {
        Self {
            actor: Actor::new(position, &config.profile, response, loader),
            kind,
            state: CombatantState::new(config.health, config.kill_reward, config.attack_power),
            sight: config.sight,
            attack_range: config.attack_range,
            cooldown: Cooldown::new(config.attack_cooldown_ms),
            stun: StunTimer::new(config.stun_duration_ms),
            behavior: MonsterBehavior::Idle,
        }
    }

    pub fn is_dead(&self) -> bool {
        !self.state.is_alive()
    }

    pub fn is_stunned(&self, now: u64) -> bool {
        self.stun.is_stunned(now)
    }

    pub fn can_attack(&self, now: u64) -> bool {
        self.cooldown.is_ready(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::animation::ClipRegistry;
    use crate::game::config::GameConfig;

    fn orc_at(position: Vector2) -> Monster {
        let config = GameConfig::default();
        Monster::new(
            MonsterKind::Orc,
            position,
            &config.monsters.orc,
            CollisionResponse::Cancel,
            &mut ClipRegistry::new(),
        )
    }

    #[test]
    fn test_object_type_mapping() {
        assert_eq!(MonsterKind::from_object_type("orc"), Some(MonsterKind::Orc));
        assert_eq!(MonsterKind::from_object_type("orc2"), Some(MonsterKind::MaskedOrc));
        assert_eq!(MonsterKind::from_object_type("boss"), Some(MonsterKind::Boss));
        assert_eq!(MonsterKind::from_object_type("spawn"), None);
    }

    #[test]
    fn test_center_uses_midpoint() {
        let orc = orc_at(Vector2::new(10.0, 20.0));
        assert_eq!(orc.actor.center(), Vector2::new(16.0, 26.0));
    }

    #[test]
    fn test_overlap_uses_translated_boundaries() {
        let a = orc_at(Vector2::new(0.0, 0.0));
        let b = orc_at(Vector2::new(5.0, 2.0));
        let c = orc_at(Vector2::new(40.0, 0.0));
        assert!(a.actor.overlaps(&b.actor));
        assert!(!a.actor.overlaps(&c.actor));
    }

    #[test]
    fn test_move_towards_accelerates_at_target() {
        let mut orc = orc_at(Vector2::ZERO);
        let target = orc.actor.center() + Vector2::new(0.0, 50.0);
        orc.actor.move_towards(target);
        let a = orc.actor.body.acceleration();
        assert!(a.x.abs() < 1e-3);
        assert!(a.y > 0.0);
    }

    #[test]
    fn test_fresh_monster_can_attack() {
        let orc = orc_at(Vector2::ZERO);
        assert!(orc.can_attack(0));
        assert!(!orc.is_stunned(0));
        assert!(!orc.is_dead());
    }
}
