//! # Game State Module
//!
//! The level orchestrator: owns one level's tile grid, the knight, the
//! monster roster and the weapon, and advances them together one tick at a
//! time.
//!
//! A level is built fresh from a [`LevelMap`] every time it is entered and
//! dropped when left. Which level comes next is decided by the caller from
//! the [`LevelTransition`] that [`Level::tick`] returns.

use crate::game::animation::ClipLoader;
use crate::game::combat::{HeroState, MonsterBehavior, Weapon};
use crate::game::config::{GameConfig, RulesConfig};
use crate::game::entities::{Knight, Monster, MonsterKind};
use crate::game::events::GameEvent;
use crate::game::world::{TileGrid, TAG_STAIRS};
use crate::input::Direction;
use crate::maps::LevelMap;
use crate::utils::{Clock, Vector2};
use crate::DungeonResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Signal to whatever decides which level is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelTransition {
    /// The knight reached stairs.
    Exit,
    /// The knight's health reached zero.
    HeroDied,
}

/// A movable thing in draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorRef {
    Knight,
    /// The knight's weapon, always drawn just before the knight.
    Weapon,
    /// Index into [`Level::monsters`].
    Monster(usize),
}

/// Callback run once per monster killed. Gets the hero's state so it can
/// grant rewards.
pub type KillHook = Box<dyn FnMut(&Monster, &mut HeroState)>;

/// Session statistics built from the event stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameStatistics {
    /// Number of monsters killed
    pub monsters_killed: u32,
    /// Total damage dealt to monsters
    pub damage_dealt: f32,
    /// Total damage taken by the knight
    pub damage_taken: f32,
    /// Number of times the knight has died
    pub deaths: u32,
    /// Number of levels entered, hub included
    pub levels_entered: u32,
    /// Number of sword swings
    pub swings: u32,
}

impl GameStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates statistics based on a game event.
    pub fn update_from_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::HeroDamaged { amount, .. } => self.damage_taken += amount,
            GameEvent::MonsterHit { damage, .. } => self.damage_dealt += damage,
            GameEvent::MonsterKilled { .. } => self.monsters_killed += 1,
            GameEvent::WeaponSwung { .. } => self.swings += 1,
            GameEvent::HeroDied => self.deaths += 1,
            GameEvent::LevelEntered { .. } => self.levels_entered += 1,
            GameEvent::LevelExit { .. } => {}
        }
    }
}

/// One playable level.
///
/// # Examples
///
/// ```
/// use dungeonlife::{
///     ClipRegistry, GameConfig, Level, LevelMap, ManualClock, MapObject, TileCoordinate,
/// };
///
/// let mut map = LevelMap::new(16);
/// map.fill(TileCoordinate::new(0, 0), TileCoordinate::new(9, 9), 1, "floor");
/// map.add_object(MapObject::new(64.0, 64.0, "spawn"));
///
/// let clock = ManualClock::new(0);
/// let mut level = Level::new(
///     "backyard",
///     &map,
///     &GameConfig::default(),
///     Box::new(clock.clone()),
///     &mut ClipRegistry::new(),
/// )
/// .unwrap();
/// assert!(level.tick(1.0 / 60.0).is_none());
/// assert!(level.monsters().is_empty());
/// ```
pub struct Level {
    name: String,
    grid: TileGrid,
    spawn: Vector2,
    knight: Knight,
    monsters: Vec<Monster>,
    weapon: Weapon,
    weapon_draw_index: usize,
    draw_order: Vec<ActorRef>,
    rules: RulesConfig,
    clock: Box<dyn Clock>,
    events: Vec<GameEvent>,
    kill_hook: Option<KillHook>,
    death_reported: bool,
}

impl fmt::Debug for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Level")
            .field("name", &self.name)
            .field("spawn", &self.spawn)
            .field("knight", &self.knight)
            .field("monsters", &self.monsters.len())
            .field("pending_events", &self.events.len())
            .finish_non_exhaustive()
    }
}

impl Level {
    /// Builds a level from map data.
    ///
    /// Fails with [`crate::DungeonError::MissingSpawn`] if the map has no
    /// spawn point. Monster kinds absent from the map spawn nothing.
    pub fn new(
        name: &str,
        map: &LevelMap,
        config: &GameConfig,
        clock: Box<dyn Clock>,
        loader: &mut dyn ClipLoader,
    ) -> DungeonResult<Self> {
        config.validate()?;
        let spawn_object = map.spawn()?;
        let spawn = Vector2::new(spawn_object.x, spawn_object.y);
        let grid = TileGrid::from_level_map(map, config.rules.walk_policy)?;
        let response = config.rules.collision_response;

        let knight = Knight::new(spawn, &config.hero, response, loader);
        if !knight.actor.fits(&grid) {
            log::warn!("{name}: spawn point {spawn:?} is not walkable");
        }

        let mut monsters = Vec::new();
        for kind in MonsterKind::all() {
            let stats = config.monsters.get(kind);
            for object in map.objects_of(kind.object_type()) {
                let position = Vector2::new(object.x, object.y);
                monsters.push(Monster::new(kind, position, stats, response, loader));
            }
        }

        let w = config.weapon;
        let mut weapon = Weapon::new(w.range, w.hit_duration_ms, w.offset_x, w.knockback_speed);
        weapon.follow(spawn, knight.actor.animator.facing());

        log::info!(
            "built level {name}: {} cells, {} monsters",
            grid.len(),
            monsters.len()
        );

        let mut level = Self {
            name: name.to_string(),
            grid,
            spawn,
            knight,
            monsters,
            weapon,
            weapon_draw_index: 0,
            draw_order: Vec::new(),
            rules: config.rules,
            clock,
            events: Vec::new(),
            kill_hook: None,
            death_reported: false,
        };
        level.update_draw_order();
        Ok(level)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// The knight's start position.
    pub fn spawn(&self) -> Vector2 {
        self.spawn
    }

    pub fn knight(&self) -> &Knight {
        &self.knight
    }

    pub fn knight_mut(&mut self) -> &mut Knight {
        &mut self.knight
    }

    pub fn monsters(&self) -> &[Monster] {
        &self.monsters
    }

    pub fn monsters_mut(&mut self) -> &mut [Monster] {
        &mut self.monsters
    }

    pub fn weapon(&self) -> &Weapon {
        &self.weapon
    }

    /// Draw index of the weapon, one behind its owner.
    pub fn weapon_draw_index(&self) -> usize {
        self.weapon_draw_index
    }

    /// Movables back to front as of the last tick.
    pub fn draw_order(&self) -> &[ActorRef] {
        &self.draw_order
    }

    /// Current time from the level's clock.
    pub fn now(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Events produced since the last drain, oldest first.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Installs the callback run for every monster killed.
    pub fn set_kill_hook(&mut self, hook: impl FnMut(&Monster, &mut HeroState) + 'static) {
        self.kill_hook = Some(Box::new(hook));
    }

    /// Puts the knight back on the spawn point, at rest and unstunned.
    pub fn reset_to_spawn(&mut self) {
        self.knight.actor.body.teleport(self.spawn);
        self.knight.stun.clear();
        let facing = self.knight.actor.animator.facing();
        self.weapon.follow(self.spawn, facing);
    }

    fn hero_can_act(&self, now: u64) -> bool {
        !self.knight.is_dead() && !self.knight.is_stunned(now)
    }

    /// Adds a movement impulse for this frame. Ignored while the knight is
    /// stunned or dead.
    pub fn on_move_input(&mut self, direction: Direction) {
        let now = self.clock.now_ms();
        if self.hero_can_act(now) {
            self.knight.actor.body.accelerate_at_angle(direction.angle());
        }
    }

    /// Swings the weapon at every live monster in range. Returns how many
    /// were hit. Ignored while the knight is stunned or dead.
    pub fn on_attack_input(&mut self) -> usize {
        let now = self.clock.now_ms();
        if !self.hero_can_act(now) {
            return 0;
        }
        self.weapon.hit(now);

        let hero_center = self.knight.actor.center();
        let damage = self.knight.state.combatant.attack_power();
        let mut targets = 0;
        for index in 0..self.monsters.len() {
            let monster = &mut self.monsters[index];
            let in_range = monster.actor.distance_to(&self.knight.actor) < self.weapon.range;
            if monster.is_dead() || !in_range {
                continue;
            }
            targets += 1;

            let away = monster.actor.center() - hero_center;
            monster.actor.body.set_speed(self.weapon.knockback_speed);
            monster.actor.body.set_motion_angle(away.angle());
            monster.stun.stun(now);
            monster.behavior = MonsterBehavior::Stunned;
            monster.state.decrease_health(damage);

            let hit = GameEvent::MonsterHit {
                monster: monster.actor.id,
                kind: monster.kind,
                damage,
                at: monster.actor.center(),
            };
            log::debug!(
                "hit {:?} for {damage}, {} left",
                monster.kind,
                monster.state.health()
            );

            let killed = monster.is_dead().then(|| GameEvent::MonsterKilled {
                monster: monster.actor.id,
                kind: monster.kind,
                kill_reward: monster.state.kill_reward(),
            });
            self.events.push(hit);
            if let Some(killed) = killed {
                self.monsters[index].behavior = MonsterBehavior::Dead;
                if let Some(hook) = self.kill_hook.as_mut() {
                    hook(&self.monsters[index], &mut self.knight.state);
                }
                log::info!("{}: {:?} killed", self.name, self.monsters[index].kind);
                self.events.push(killed);
            }
        }

        self.events.push(GameEvent::WeaponSwung { targets });
        targets
    }

    /// Advances the level by `dt` seconds.
    ///
    /// Runs monster AI, physics, separation, timers, animation and draw
    /// ordering, then checks for death and stairs. Returns a transition at
    /// most once per tick.
    pub fn tick(&mut self, dt: f32) -> Option<LevelTransition> {
        let now = self.clock.now_ms();

        self.run_monsters(now);

        self.knight.actor.step(dt, &self.grid);
        for monster in &mut self.monsters {
            monster.actor.step(dt, &self.grid);
        }

        for monster in &mut self.monsters {
            if !monster.is_dead() && monster.actor.overlaps(&self.knight.actor) {
                monster.actor.body.stop();
                self.knight.actor.body.stop();
            }
        }

        self.knight.stun.update(now);
        for monster in &mut self.monsters {
            if monster.stun.update(now) && monster.behavior == MonsterBehavior::Stunned {
                monster.behavior = MonsterBehavior::Idle;
            }
        }

        let knight_dead = self.knight.is_dead();
        self.knight.actor.animate(dt, knight_dead);
        for monster in &mut self.monsters {
            let dead = monster.is_dead();
            monster.actor.animate(dt, dead);
        }

        self.weapon.follow(
            self.knight.actor.position(),
            self.knight.actor.animator.facing(),
        );
        self.update_draw_order();

        if knight_dead {
            if self.death_reported {
                return None;
            }
            self.death_reported = true;
            log::info!("{}: the knight died", self.name);
            self.events.push(GameEvent::HeroDied);
            return Some(LevelTransition::HeroDied);
        }

        let footprint = self.knight.actor.footprint;
        if footprint.touches_tag(&self.grid, self.knight.actor.position(), TAG_STAIRS) {
            self.reset_to_spawn();
            log::info!("{}: stairs reached", self.name);
            self.events.push(GameEvent::LevelExit {
                level: self.name.clone(),
            });
            return Some(LevelTransition::Exit);
        }

        None
    }

    fn run_monsters(&mut self, now: u64) {
        let source = self.rules.monster_damage_source;
        for monster in &mut self.monsters {
            if monster.is_dead() {
                monster.behavior = MonsterBehavior::Dead;
                continue;
            }
            if monster.is_stunned(now) {
                monster.behavior = MonsterBehavior::Stunned;
                continue;
            }

            let distance = monster.actor.distance_to(&self.knight.actor);
            monster.behavior = MonsterBehavior::Idle;

            if distance < monster.attack_range && !self.knight.is_dead() {
                monster.behavior = MonsterBehavior::Attacking;
                if monster.can_attack(now) {
                    monster.cooldown.fire(now);
                    let amount = source.amount(&self.knight.state, &monster.state);
                    self.knight.state.combatant.decrease_health(amount);
                    if self.rules.hero_stun_on_hit {
                        self.knight.stun.stun(now);
                    }
                    let remaining = self.knight.state.combatant.health();
                    log::debug!(
                        "{:?} hits the knight for {amount}, {remaining} left",
                        monster.kind
                    );
                    self.events.push(GameEvent::HeroDamaged {
                        amount,
                        remaining,
                        at: self.knight.actor.center(),
                    });
                }
            }

            if distance < monster.sight {
                if monster.behavior == MonsterBehavior::Idle {
                    monster.behavior = MonsterBehavior::Chasing;
                }
                let target = self.knight.actor.center();
                monster.actor.move_towards(target);
            }
        }
    }

    /// Sorts movables back to front by descending y. Ties keep roster order.
    fn update_draw_order(&mut self) {
        let mut order = Vec::with_capacity(self.monsters.len() + 2);
        order.push(ActorRef::Knight);
        order.extend((0..self.monsters.len()).map(ActorRef::Monster));

        let y_of = |actor: &ActorRef| match actor {
            ActorRef::Knight | ActorRef::Weapon => self.knight.actor.position().y,
            ActorRef::Monster(i) => self.monsters[*i].actor.position().y,
        };
        order.sort_by(|a, b| y_of(b).total_cmp(&y_of(a)));
        let knight_at = order
            .iter()
            .position(|actor| *actor == ActorRef::Knight)
            .unwrap_or(0);
        order.insert(knight_at, ActorRef::Weapon);

        for (index, actor) in order.iter().enumerate() {
            match actor {
                ActorRef::Knight => self.knight.actor.draw_index = index,
                ActorRef::Weapon => self.weapon_draw_index = index,
                ActorRef::Monster(i) => self.monsters[*i].actor.draw_index = index,
            }
        }
        self.draw_order = order;
    }
}
