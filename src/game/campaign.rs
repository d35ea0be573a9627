//! # Campaign Module
//!
//! Level sequencing: a backyard hub and an ordered list of dungeon levels.
//!
//! Stairs in the hub lead into the first dungeon, stairs in a dungeon lead
//! to the next one and the last dungeon leads back to the hub. Dying always
//! returns to the hub. Every entry builds a fresh [`Level`], so nothing
//! carries over between visits.

use crate::game::animation::ClipRegistry;
use crate::game::config::GameConfig;
use crate::game::events::GameEvent;
use crate::game::state::{GameStatistics, Level, LevelTransition};
use crate::maps::LevelMap;
use crate::utils::Clock;
use crate::{DungeonError, DungeonResult};
use serde::{Deserialize, Serialize};

/// Which map of the campaign is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelSlot {
    Hub,
    /// Index into the dungeon list.
    Dungeon(usize),
}

/// A map with the name it is shown and logged under.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedMap {
    pub name: String,
    pub map: LevelMap,
}

impl NamedMap {
    pub fn new(name: &str, map: LevelMap) -> Self {
        Self {
            name: name.to_string(),
            map,
        }
    }
}

/// Owns the active level and decides which one comes next.
///
/// # Examples
///
/// ```
/// use dungeonlife::{Campaign, GameConfig, LevelMap, LevelSlot, ManualClock, MapObject, NamedMap};
///
/// let mut map = LevelMap::new(16);
/// map.add_object(MapObject::new(0.0, 0.0, "spawn"));
/// let campaign = Campaign::new(
///     NamedMap::new("backyard", map.clone()),
///     vec![NamedMap::new("level-1", map)],
///     GameConfig::default(),
///     ManualClock::new(0),
/// )
/// .unwrap();
/// assert_eq!(campaign.slot(), LevelSlot::Hub);
/// assert_eq!(campaign.level().name(), "backyard");
/// ```
#[derive(Debug)]
pub struct Campaign<C: Clock + Clone + 'static> {
    hub: NamedMap,
    dungeons: Vec<NamedMap>,
    config: GameConfig,
    clock: C,
    clips: ClipRegistry,
    slot: LevelSlot,
    level: Level,
    reward_kills: bool,
    events: Vec<GameEvent>,
    statistics: GameStatistics,
}

impl<C: Clock + Clone + 'static> Campaign<C> {
    /// Validates every map and enters the hub.
    pub fn new(
        hub: NamedMap,
        dungeons: Vec<NamedMap>,
        config: GameConfig,
        clock: C,
    ) -> DungeonResult<Self> {
        config.validate()?;
        for entry in std::iter::once(&hub).chain(dungeons.iter()) {
            entry.map.spawn().map_err(|_| {
                DungeonError::InvalidMap(format!("{} has no spawn point", entry.name))
            })?;
        }

        let mut clips = ClipRegistry::new();
        let level = Level::new(
            &hub.name,
            &hub.map,
            &config,
            Box::new(clock.clone()),
            &mut clips,
        )?;
        let mut campaign = Self {
            hub,
            dungeons,
            config,
            clock,
            clips,
            slot: LevelSlot::Hub,
            level,
            reward_kills: false,
            events: Vec::new(),
            statistics: GameStatistics::new(),
        };
        campaign.record(GameEvent::LevelEntered {
            level: campaign.hub.name.clone(),
        });
        Ok(campaign)
    }

    /// Grants each kill's reward as experience, on this and every later level.
    pub fn with_kill_rewards(mut self) -> Self {
        self.reward_kills = true;
        Self::install_reward_hook(&mut self.level);
        self
    }

    fn install_reward_hook(level: &mut Level) {
        level.set_kill_hook(|monster, hero| {
            hero.increase_experience(monster.state.kill_reward());
        });
    }

    pub fn slot(&self) -> LevelSlot {
        self.slot
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn level_mut(&mut self) -> &mut Level {
        &mut self.level
    }

    /// Clip names interned while building actors.
    pub fn clips(&self) -> &ClipRegistry {
        &self.clips
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn statistics(&self) -> &GameStatistics {
        &self.statistics
    }

    pub fn dungeon_count(&self) -> usize {
        self.dungeons.len()
    }

    /// Slot that follows `from` after a transition.
    pub fn next_slot(&self, from: LevelSlot, transition: LevelTransition) -> LevelSlot {
        match (transition, from) {
            (LevelTransition::HeroDied, _) => LevelSlot::Hub,
            (LevelTransition::Exit, LevelSlot::Hub) if !self.dungeons.is_empty() => {
                LevelSlot::Dungeon(0)
            }
            (LevelTransition::Exit, LevelSlot::Hub) => LevelSlot::Hub,
            (LevelTransition::Exit, LevelSlot::Dungeon(i)) if i + 1 < self.dungeons.len() => {
                LevelSlot::Dungeon(i + 1)
            }
            (LevelTransition::Exit, LevelSlot::Dungeon(_)) => LevelSlot::Hub,
        }
    }

    /// Builds a fresh level for `slot` and makes it active.
    pub fn enter(&mut self, slot: LevelSlot) -> DungeonResult<()> {
        let entry = match slot {
            LevelSlot::Hub => &self.hub,
            LevelSlot::Dungeon(i) => self.dungeons.get(i).ok_or_else(|| {
                DungeonError::InvalidState(format!("no dungeon level {i}"))
            })?,
        };
        let mut level = Level::new(
            &entry.name,
            &entry.map,
            &self.config,
            Box::new(self.clock.clone()),
            &mut self.clips,
        )?;
        if self.reward_kills {
            Self::install_reward_hook(&mut level);
        }
        let name = entry.name.clone();

        // Events the old level produced but nobody collected yet.
        for event in self.level.drain_events() {
            self.record(event);
        }
        self.level = level;
        self.slot = slot;
        log::info!("entered {name} ({slot:?})");
        self.record(GameEvent::LevelEntered { level: name });
        Ok(())
    }

    /// Ticks the active level and follows any transition it signals.
    pub fn tick(&mut self, dt: f32) -> DungeonResult<Option<LevelTransition>> {
        let transition = self.level.tick(dt);
        for event in self.level.drain_events() {
            self.record(event);
        }
        if let Some(transition) = transition {
            let next = self.next_slot(self.slot, transition);
            self.enter(next)?;
        }
        Ok(transition)
    }

    /// Events from every level since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        for event in self.level.drain_events() {
            self.record(event);
        }
        std::mem::take(&mut self.events)
    }

    fn record(&mut self, event: GameEvent) {
        self.statistics.update_from_event(&event);
        self.events.push(event);
    }
}
