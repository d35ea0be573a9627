//! # Game Configuration
//!
//! Stat tables and rule switches for a play session.
//!
//! Every monster kind is data: a [`MonsterConfig`] with its own stats,
//! shape and clip names. The [`RulesConfig`] switches capture behaviours
//! that have more than one defensible reading.

use crate::game::animation::ClipNames;
use crate::game::combat::DamageSource;
use crate::game::entities::MonsterKind;
use crate::game::physics::{CollisionResponse, MovementProfile};
use crate::game::world::{Footprint, WalkPolicy};
use crate::utils::{Polygon, Vector2};
use crate::{DungeonError, DungeonResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Shape, movement and clips shared by actors of one kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorProfile {
    pub movement: MovementProfile,
    /// Offset from the actor's position to its visual center.
    pub midpoint: Vector2,
    /// Hit polygon in local space.
    pub boundary: Polygon,
    /// Corner offsets checked against the tile grid.
    pub footprint: Footprint,
    pub clips: ClipNames,
}

impl ActorProfile {
    /// A 32x32 knight-sized sprite.
    pub fn knight(clip_prefix: &str, max_speed: f32) -> Self {
        Self {
            movement: MovementProfile {
                acceleration: 200.0,
                max_speed,
                deceleration: 100.0,
            },
            midpoint: Vector2::new(17.0, 8.0),
            boundary: Polygon::rectangle(Vector2::new(10.0, 0.0), 12.0, 8.0),
            footprint: Footprint::new(10.0, 22.0, -1.0, 6.0),
            clips: ClipNames::with_prefix(clip_prefix),
        }
    }

    /// A 16x20 orc-sized sprite.
    pub fn orc(clip_prefix: &str) -> Self {
        Self {
            movement: MovementProfile {
                acceleration: 200.0,
                max_speed: 25.0,
                deceleration: 100.0,
            },
            midpoint: Vector2::new(6.0, 6.0),
            boundary: Polygon::rectangle(Vector2::new(2.0, 0.0), 11.0, 5.0),
            footprint: Footprint::new(2.0, 13.0, -1.0, 5.0),
            clips: ClipNames::with_prefix(clip_prefix),
        }
    }

    fn validate(&self, who: &str) -> DungeonResult<()> {
        let m = &self.movement;
        if m.acceleration < 0.0 || m.max_speed < 0.0 || m.deceleration < 0.0 {
            return Err(DungeonError::InvalidConfig(format!(
                "{who}: movement values must not be negative"
            )));
        }
        if self.boundary.vertices.len() < 3 {
            return Err(DungeonError::InvalidConfig(format!(
                "{who}: boundary polygon needs at least 3 vertices"
            )));
        }
        Ok(())
    }
}

/// The knight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroConfig {
    pub health: f32,
    pub attack_power: f32,
    pub stun_duration_ms: u64,
    pub profile: ActorProfile,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            health: 100.0,
            attack_power: 10.0,
            stun_duration_ms: 500,
            profile: ActorProfile::knight("elite-knight", 75.0),
        }
    }
}

/// The knight's sword.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponConfig {
    pub range: f32,
    pub hit_duration_ms: u64,
    pub offset_x: f32,
    pub knockback_speed: f32,
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self {
            range: 16.0,
            hit_duration_ms: 400,
            offset_x: 5.0,
            knockback_speed: 500.0,
        }
    }
}

/// One monster kind's stat table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterConfig {
    pub health: f32,
    pub kill_reward: f32,
    pub attack_power: f32,
    /// Distance at which the monster starts chasing.
    pub sight: f32,
    /// Distance at which the monster lands hits.
    pub attack_range: f32,
    pub attack_cooldown_ms: u64,
    pub stun_duration_ms: u64,
    pub profile: ActorProfile,
}

impl MonsterConfig {
    fn with_profile(profile: ActorProfile) -> Self {
        Self {
            health: 20.0,
            kill_reward: 5.0,
            attack_power: 10.0,
            sight: 5.0 * 16.0,
            attack_range: 10.0,
            attack_cooldown_ms: 500,
            stun_duration_ms: 500,
            profile,
        }
    }
}

/// Stat tables for every monster kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterTable {
    pub orc: MonsterConfig,
    pub masked_orc: MonsterConfig,
    pub boss: MonsterConfig,
}

impl MonsterTable {
    pub fn get(&self, kind: MonsterKind) -> &MonsterConfig {
        match kind {
            MonsterKind::Orc => &self.orc,
            MonsterKind::MaskedOrc => &self.masked_orc,
            MonsterKind::Boss => &self.boss,
        }
    }
}

impl Default for MonsterTable {
    fn default() -> Self {
        Self {
            orc: MonsterConfig::with_profile(ActorProfile::orc("orc-warrior")),
            masked_orc: MonsterConfig::with_profile(ActorProfile::orc("masked-orc")),
            boss: MonsterConfig::with_profile(ActorProfile::knight("knight", 25.0)),
        }
    }
}

/// Behaviour switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub walk_policy: WalkPolicy,
    pub collision_response: CollisionResponse,
    pub monster_damage_source: DamageSource,
    /// Whether a monster hit stuns the knight.
    pub hero_stun_on_hit: bool,
}

/// Complete session configuration.
///
/// # Examples
///
/// ```
/// use dungeonlife::GameConfig;
///
/// let config = GameConfig::default();
/// assert_eq!(config.hero.health, 100.0);
/// assert_eq!(config.weapon.range, 16.0);
/// assert!(!config.rules.hero_stun_on_hit);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub hero: HeroConfig,
    pub weapon: WeaponConfig,
    pub monsters: MonsterTable,
    pub rules: RulesConfig,
}

impl GameConfig {
    /// Parses and validates a JSON configuration. Missing sections take
    /// their defaults.
    pub fn from_json_str(json: &str) -> DungeonResult<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON configuration file.
    pub fn load_from_file(path: impl AsRef<Path>) -> DungeonResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&text)?;
        log::info!("loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    /// Serializes to pretty JSON.
    pub fn to_json(&self) -> DungeonResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rejects values the simulation cannot work with.
    pub fn validate(&self) -> DungeonResult<()> {
        if self.hero.health <= 0.0 {
            return Err(DungeonError::InvalidConfig(
                "hero health must be positive".to_string(),
            ));
        }
        if self.weapon.range < 0.0 {
            return Err(DungeonError::InvalidConfig(
                "weapon range must not be negative".to_string(),
            ));
        }
        self.hero.profile.validate("hero")?;
        for kind in MonsterKind::all() {
            let monster = self.monsters.get(kind);
            if monster.health <= 0.0 {
                return Err(DungeonError::InvalidConfig(format!(
                    "{}: health must be positive",
                    kind.object_type()
                )));
            }
            monster.profile.validate(kind.object_type())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        GameConfig::default().validate().unwrap();
    }

    #[test]
    fn test_json_roundtrip_preserves_rules() {
        let mut config = GameConfig::default();
        config.rules.monster_damage_source = DamageSource::MonsterAttack;
        config.rules.walk_policy = WalkPolicy::FloorOnly;
        let json = config.to_json().unwrap();
        let loaded = GameConfig::from_json_str(&json).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let json = r#"{ "rules": { "walk_policy": "floor_only", "collision_response": "bounce",
            "monster_damage_source": "monster_attack", "hero_stun_on_hit": true } }"#;
        let config = GameConfig::from_json_str(json).unwrap();
        assert_eq!(config.rules.walk_policy, WalkPolicy::FloorOnly);
        assert_eq!(config.rules.collision_response, CollisionResponse::Bounce);
        assert!(config.rules.hero_stun_on_hit);
        assert_eq!(config.hero, HeroConfig::default());
    }

    #[test]
    fn test_rejects_degenerate_boundary() {
        let mut config = GameConfig::default();
        config.monsters.orc.profile.boundary = Polygon::new(vec![Vector2::ZERO]);
        assert!(matches!(
            config.validate(),
            Err(DungeonError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            GameConfig::from_json_str("{ not json"),
            Err(DungeonError::Serde(_))
        ));
    }

    #[test]
    fn test_orc_profile_matches_sprite_inset() {
        let orc = &GameConfig::default().monsters.orc;
        assert_eq!(orc.profile.footprint.corners[0], Vector2::new(2.0, -1.0));
        assert_eq!(orc.profile.footprint.corners[3], Vector2::new(13.0, 5.0));
        assert_eq!(orc.sight, 80.0);
    }
}
