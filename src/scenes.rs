//! # Scene Management System
//!
//! The start menu and the play screen, and the switching between them.
//! Keeps the main loop down to "update the current scene, wait for the
//! next frame".

use crate::game::campaign::{Campaign, LevelSlot};
use crate::input::{FrameInput, InputHandler};
use crate::rendering::{HudInfo, MacroquadDisplay};
use crate::utils::Clock;
use crate::DungeonResult;
use macroquad::prelude::*;

/// Represents the current scene in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneType {
    /// Title screen
    Menu,
    /// Normal gameplay
    Playing,
}

/// What the scene loop should do after a frame's input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    Stay,
    Switch(SceneType),
    Exit,
}

impl SceneType {
    /// Menu: Enter starts, Escape quits. Playing: Escape returns to the menu.
    pub fn command_for(self, input: &FrameInput) -> SceneCommand {
        match self {
            SceneType::Menu if input.quit => SceneCommand::Exit,
            SceneType::Menu if input.confirm => SceneCommand::Switch(SceneType::Playing),
            SceneType::Playing if input.quit => SceneCommand::Switch(SceneType::Menu),
            _ => SceneCommand::Stay,
        }
    }
}

/// The main scene manager that coordinates all game scenes
pub struct SceneManager<C: Clock + Clone + 'static> {
    current_scene: SceneType,
    campaign: Campaign<C>,
    display: MacroquadDisplay,
    input_handler: InputHandler,
    started: bool,
}

impl<C: Clock + Clone + 'static> SceneManager<C> {
    /// Creates a scene manager starting at the menu.
    pub fn new(campaign: Campaign<C>, input_handler: InputHandler, seed: Option<u64>) -> Self {
        let mut display = MacroquadDisplay::new(seed);
        display.add_message("Welcome to Dungeon Life!".to_string());
        display.add_message("Find the stairs. Mind the orcs.".to_string());

        Self {
            current_scene: SceneType::Menu,
            campaign,
            display,
            input_handler,
            started: false,
        }
    }

    pub fn current_scene(&self) -> SceneType {
        self.current_scene
    }

    /// Runs the main scene loop until the game exits
    pub async fn run(&mut self) -> DungeonResult<()> {
        loop {
            let input = self.input_handler.poll();
            match self.current_scene.command_for(&input) {
                SceneCommand::Exit => break,
                SceneCommand::Switch(scene) => self.switch_to(scene)?,
                SceneCommand::Stay => {}
            }

            match self.current_scene {
                SceneType::Menu => self.display.ui.render_menu(crate::VERSION),
                SceneType::Playing => self.update_playing_scene(&input)?,
            }
            next_frame().await;
        }
        log::info!("scene loop ended");
        Ok(())
    }

    fn switch_to(&mut self, scene: SceneType) -> DungeonResult<()> {
        log::info!("switching to {scene:?}");
        if scene == SceneType::Playing {
            // Every run after the first starts over in the hub.
            if self.started {
                self.campaign.enter(LevelSlot::Hub)?;
            }
            self.started = true;
        }
        self.current_scene = scene;
        Ok(())
    }

    /// Runs one simulation tick and draws it.
    fn update_playing_scene(&mut self, input: &FrameInput) -> DungeonResult<()> {
        input.apply_to(self.campaign.level_mut());

        let dt = get_frame_time().min(crate::config::MAX_FRAME_TIME);
        if let Some(transition) = self.campaign.tick(dt)? {
            log::debug!("transition {transition:?} -> {:?}", self.campaign.slot());
        }

        let events = self.campaign.drain_events();
        self.display.observe(&events);

        let hud = HudInfo::new(
            self.campaign.level(),
            self.campaign.slot(),
            self.campaign.config().hero.health,
            self.campaign.statistics(),
        );
        self.display
            .render_level(self.campaign.level(), self.campaign.clips(), &hud);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Direction;

    fn input(confirm: bool, quit: bool) -> FrameInput {
        FrameInput {
            confirm,
            quit,
            ..FrameInput::default()
        }
    }

    #[test]
    fn test_menu_commands() {
        assert_eq!(
            SceneType::Menu.command_for(&input(true, false)),
            SceneCommand::Switch(SceneType::Playing)
        );
        assert_eq!(SceneType::Menu.command_for(&input(false, true)), SceneCommand::Exit);
        assert_eq!(SceneType::Menu.command_for(&input(false, false)), SceneCommand::Stay);
    }

    #[test]
    fn test_escape_while_playing_returns_to_menu() {
        assert_eq!(
            SceneType::Playing.command_for(&input(false, true)),
            SceneCommand::Switch(SceneType::Menu)
        );
        let moving = FrameInput {
            moves: vec![Direction::Left],
            confirm: true,
            ..FrameInput::default()
        };
        assert_eq!(SceneType::Playing.command_for(&moving), SceneCommand::Stay);
    }
}
