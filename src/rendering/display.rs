//! # Display Management
//!
//! Draws a running level with macroquad: tiles colored by their tags,
//! blood decals, actors in back-to-front order and the knight's weapon.
//!
//! The world is y-up; the screen is y-down. All conversions go through
//! [`CameraRig::world_to_screen`].

use crate::game::animation::ClipRegistry;
use crate::game::combat::WeaponPose;
use crate::game::entities::{Actor, MonsterKind};
use crate::game::events::GameEvent;
use crate::game::state::{ActorRef, Level};
use crate::game::world::{TagSet, TAG_FLOOR, TAG_NONE, TAG_STAIRS, TAG_WALL};
use crate::rendering::{CameraRig, HudInfo, UI};
use crate::utils::Vector2;
use macroquad::prelude::*;
use ::rand::rngs::StdRng;
use ::rand::{Rng, SeedableRng};

/// Largest random offset of a blood decal from the wound, per axis.
pub const BLOOD_JITTER: f32 = 8.0;

/// A blood stain left where something got hurt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloodDecal {
    pub position: Vector2,
    /// Which of the stain shapes to draw
    pub variant: u8,
}

impl BloodDecal {
    /// A decal near `at`, offset by up to [`BLOOD_JITTER`] on each axis.
    pub fn splatter(at: Vector2, rng: &mut impl Rng) -> Self {
        let offset = Vector2::new(
            rng.gen_range(-BLOOD_JITTER..=BLOOD_JITTER),
            rng.gen_range(-BLOOD_JITTER..=BLOOD_JITTER),
        );
        Self {
            position: at + offset,
            variant: rng.gen_range(0..5),
        }
    }
}

/// Fill color for a tile cell. Walls win over stairs, stairs over floor.
pub fn tile_color(tags: &TagSet) -> Option<Color> {
    if tags.contains(TAG_WALL) {
        Some(Color::new(0.25, 0.22, 0.2, 1.0))
    } else if tags.contains(TAG_STAIRS) {
        Some(ORANGE)
    } else if tags.contains(TAG_FLOOR) {
        Some(Color::new(0.45, 0.42, 0.38, 1.0))
    } else if tags.contains(TAG_NONE) || !tags.is_empty() {
        Some(Color::new(0.15, 0.3, 0.15, 1.0))
    } else {
        None
    }
}

fn monster_color(kind: MonsterKind) -> Color {
    match kind {
        MonsterKind::Orc => GREEN,
        MonsterKind::MaskedOrc => DARKGREEN,
        MonsterKind::Boss => MAROON,
    }
}

/// Macroquad display manager for the game.
pub struct MacroquadDisplay {
    /// Screen pixels per world unit
    pub zoom: f32,
    pub camera: CameraRig,
    /// Message history
    pub messages: Vec<String>,
    /// Maximum number of messages to keep
    pub max_messages: usize,
    pub decals: Vec<BloodDecal>,
    /// Oldest decals are dropped past this count
    pub max_decals: usize,
    /// Draw each actor's clip name above it
    pub show_clip_names: bool,
    pub ui: UI,
    rng: StdRng,
    recenter: bool,
}

impl MacroquadDisplay {
    /// Creates a display. A seed makes blood placement reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        let zoom = 2.0;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            zoom,
            camera: CameraRig::new(
                Vector2::ZERO,
                screen_width() / zoom,
                screen_height() / zoom,
            ),
            messages: Vec::new(),
            max_messages: 100,
            decals: Vec::new(),
            max_decals: 256,
            show_clip_names: cfg!(feature = "dev-tools"),
            ui: UI::new(),
            rng,
            recenter: true,
        }
    }

    /// Adds a message to the message history.
    pub fn add_message(&mut self, message: String) {
        self.messages.push(message);
        if self.messages.len() > self.max_messages {
            self.messages.remove(0);
        }
    }

    /// Reacts to simulation events: messages, decals, and a camera jump
    /// plus a clean floor on level entry.
    pub fn observe(&mut self, events: &[GameEvent]) {
        for event in events {
            if let GameEvent::LevelEntered { .. } = event {
                self.decals.clear();
                self.recenter = true;
            }
            if let Some(at) = event.blood_position() {
                let decal = BloodDecal::splatter(at, &mut self.rng);
                self.decals.push(decal);
                if self.decals.len() > self.max_decals {
                    self.decals.remove(0);
                }
            }
            if let Some(message) = event.message() {
                self.add_message(message);
            }
        }
    }

    fn screen(&self) -> Vector2 {
        Vector2::new(screen_width(), screen_height())
    }

    /// Draws a world-space rectangle given its lower-left corner.
    fn fill_world_rect(&self, min: Vector2, width: f32, height: f32, color: Color) {
        let top_left = self.camera.world_to_screen(
            Vector2::new(min.x, min.y + height),
            self.zoom,
            self.screen(),
        );
        draw_rectangle(
            top_left.x,
            top_left.y,
            width * self.zoom,
            height * self.zoom,
            color,
        );
    }

    /// Renders the complete game screen for one frame.
    pub fn render_level(&mut self, level: &Level, clips: &ClipRegistry, hud: &HudInfo) {
        let screen = self.screen();
        self.camera.resize(screen.x / self.zoom, screen.y / self.zoom);
        let target = level.knight().actor.center();
        if self.recenter {
            self.camera.center_on(target);
            self.recenter = false;
        } else {
            self.camera.follow(target);
        }

        clear_background(BLACK);
        self.render_tiles(level);
        for decal in &self.decals {
            let shade = 0.45 + 0.05 * decal.variant as f32;
            let at = decal.position - Vector2::new(4.0, 4.0);
            self.fill_world_rect(at, 8.0, 6.0, Color::new(shade, 0.0, 0.0, 0.85));
        }

        let now = level.now();
        for actor_ref in level.draw_order() {
            match actor_ref {
                ActorRef::Weapon => self.render_weapon(level, now),
                ActorRef::Knight => {
                    let knight = level.knight();
                    let mut color = SKYBLUE;
                    if knight.is_stunned(now) {
                        color = YELLOW;
                    }
                    self.render_actor(&knight.actor, color, knight.is_dead(), clips);
                }
                ActorRef::Monster(index) => {
                    if let Some(monster) = level.monsters().get(*index) {
                        let mut color = monster_color(monster.kind);
                        if monster.is_stunned(now) {
                            color = WHITE;
                        }
                        self.render_actor(&monster.actor, color, monster.is_dead(), clips);
                    }
                }
            }
        }

        self.ui.render_hud(hud);
        self.ui.render_messages(&self.messages, 3);
    }

    fn render_tiles(&self, level: &Level) {
        let size = level.grid().tile_size();
        for (coordinate, tags) in level.grid().cells() {
            if let Some(color) = tile_color(tags) {
                let origin = coordinate.to_world(size);
                self.fill_world_rect(origin, size, size, color);
            }
        }
    }

    fn render_actor(&self, actor: &Actor, color: Color, dead: bool, clips: &ClipRegistry) {
        let Some(bounds) = actor.boundary.bounding_box() else {
            return;
        };
        let position = actor.position();
        let width = bounds.max.x - bounds.min.x;
        let min = Vector2::new(position.x + bounds.min.x, position.y + bounds.min.y);

        if dead {
            let gray = Color::new(color.r * 0.4, color.g * 0.4, color.b * 0.4, 1.0);
            self.fill_world_rect(min, width, actor.midpoint.y / 2.0, gray);
            return;
        }

        let height = actor.midpoint.y * 2.0;
        self.fill_world_rect(min, width, height, color);

        // Eye on the facing side.
        let eye_x = if actor.animator.facing().is_right() {
            min.x + width - 3.0
        } else {
            min.x + 1.0
        };
        self.fill_world_rect(Vector2::new(eye_x, min.y + height - 4.0), 2.0, 2.0, BLACK);

        if self.show_clip_names {
            if let Some(name) = clips.name_of(actor.animator.clip()) {
                let label = self.camera.world_to_screen(
                    Vector2::new(min.x, min.y + height + 2.0),
                    self.zoom,
                    self.screen(),
                );
                draw_text(name, label.x, label.y, 12.0, LIGHTGRAY);
            }
        }
    }

    fn render_weapon(&self, level: &Level, now: u64) {
        let weapon = level.weapon();
        let knight = &level.knight().actor;
        let base = weapon.position() + Vector2::new(knight.midpoint.x, knight.midpoint.y / 2.0);
        let (length, lift) = match weapon.pose(now) {
            WeaponPose::HitRight | WeaponPose::HitLeft => (weapon.range, 0.0),
            WeaponPose::IdleRight | WeaponPose::IdleLeft => (weapon.range / 2.0, 4.0),
        };
        let x = match weapon.pose(now) {
            WeaponPose::HitRight | WeaponPose::IdleRight => base.x,
            WeaponPose::HitLeft | WeaponPose::IdleLeft => base.x - length,
        };
        self.fill_world_rect(Vector2::new(x, base.y + lift), length, 2.0, LIGHTGRAY);
    }
}
