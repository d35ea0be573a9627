//! # User Interface Elements
//!
//! The start menu, the HUD and the message log.

use crate::game::campaign::LevelSlot;
use crate::game::state::{GameStatistics, Level};
use macroquad::prelude::*;

/// Numbers shown on the HUD for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct HudInfo {
    pub level_name: String,
    pub depth: usize,
    pub health: f32,
    pub max_health: f32,
    pub experience: f32,
    pub monsters_alive: usize,
    pub kills: u32,
    pub deaths: u32,
    pub stunned: bool,
}

impl HudInfo {
    pub fn new(level: &Level, slot: LevelSlot, max_health: f32, stats: &GameStatistics) -> Self {
        let knight = level.knight();
        Self {
            level_name: level.name().to_string(),
            depth: match slot {
                LevelSlot::Hub => 0,
                LevelSlot::Dungeon(i) => i + 1,
            },
            health: knight.state.combatant.health(),
            max_health,
            experience: knight.state.experience(),
            monsters_alive: level.monsters().iter().filter(|m| !m.is_dead()).count(),
            kills: stats.monsters_killed,
            deaths: stats.deaths,
            stunned: knight.is_stunned(level.now()),
        }
    }

    /// Health as a fraction in `[0, 1]`.
    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        (self.health / self.max_health).clamp(0.0, 1.0)
    }

    pub fn lines(&self) -> Vec<String> {
        let place = if self.depth == 0 {
            self.level_name.clone()
        } else {
            format!("{} (depth {})", self.level_name, self.depth)
        };
        vec![
            place,
            format!("Health: {:.0}/{:.0}", self.health, self.max_health),
            format!("XP: {:.0}", self.experience),
            format!("Orcs left: {}", self.monsters_alive),
            format!("Kills: {}  Deaths: {}", self.kills, self.deaths),
        ]
    }
}

/// Draws text panels on top of the world.
pub struct UI {
    pub font_size: f32,
    pub line_height: f32,
}

impl Default for UI {
    fn default() -> Self {
        Self::new()
    }
}

impl UI {
    pub fn new() -> Self {
        Self {
            font_size: 18.0,
            line_height: 20.0,
        }
    }

    /// Title screen.
    pub fn render_menu(&self, version: &str) {
        clear_background(BLACK);
        let w = screen_width();
        let h = screen_height();
        let title = "DUNGEON LIFE";
        let size = measure_text(title, None, 48, 1.0);
        draw_text(title, (w - size.width) / 2.0, h / 3.0, 48.0, GOLD);

        let lines = ["ENTER: Start", "ESC: Quit", "", "Arrows/WASD: Move", "SPACE: Swing"];
        for (i, line) in lines.iter().enumerate() {
            let size = measure_text(line, None, self.font_size as u16, 1.0);
            draw_text(
                line,
                (w - size.width) / 2.0,
                h / 2.0 + i as f32 * self.line_height,
                self.font_size,
                WHITE,
            );
        }
        draw_text(&format!("v{version}"), 10.0, h - 10.0, 14.0, GRAY);
    }

    /// Health bar and stats in the top-left corner.
    pub fn render_hud(&self, hud: &HudInfo) {
        let x = 10.0;
        let mut y = 10.0;
        draw_rectangle(x, y, 150.0, 10.0, Color::new(0.3, 0.0, 0.0, 0.8));
        draw_rectangle(x, y, 150.0 * hud.health_fraction(), 10.0, RED);
        y += 10.0 + self.line_height;

        for line in hud.lines() {
            draw_text(&line, x, y, self.font_size, WHITE);
            y += self.line_height;
        }
        if hud.stunned {
            draw_text("STUNNED", x, y, self.font_size, YELLOW);
        }
    }

    /// The newest messages along the bottom edge.
    pub fn render_messages(&self, messages: &[String], count: usize) {
        let area_y = screen_height() - count as f32 * self.line_height - 10.0;
        draw_rectangle(
            0.0,
            area_y - self.line_height,
            screen_width(),
            count as f32 * self.line_height + 20.0,
            Color::new(0.0, 0.0, 0.0, 0.6),
        );
        let start = messages.len().saturating_sub(count);
        for (i, message) in messages[start..].iter().enumerate() {
            draw_text(
                message,
                10.0,
                area_y + i as f32 * self.line_height,
                16.0,
                WHITE,
            );
        }
    }
}
