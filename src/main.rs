//! # Dungeon Life Main Entry Point
//!
//! Loads the maps and configuration, sets up logging and the window, and
//! hands control to the scene manager.

use clap::Parser;
use dungeonlife::{
    Campaign, DungeonError, DungeonResult, GameConfig, InputHandler, NamedMap, SceneManager,
    SystemClock, TiledMapReader,
};
use macroquad::prelude::*;
use std::path::{Path, PathBuf};

/// Command line arguments for Dungeon Life.
#[derive(Parser, Debug)]
#[command(name = "dungeonlife")]
#[command(about = "A knight, a backyard, and dungeons full of orcs")]
#[command(version)]
struct Args {
    /// Tiled JSON map used as the hub
    #[arg(long, default_value = "assets/backyard.json")]
    backyard: PathBuf,

    /// Tiled JSON dungeon maps, in play order (repeatable)
    #[arg(long = "level")]
    levels: Vec<PathBuf>,

    /// JSON game configuration; built-in defaults when absent
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for cosmetic effects
    #[arg(short, long)]
    seed: Option<u64>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Dungeon Life".to_string(),
        window_width: dungeonlife::config::WINDOW_WIDTH,
        window_height: dungeonlife::config::WINDOW_HEIGHT,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() -> DungeonResult<()> {
    let args = Args::parse();

    initialize_logging(&args.log_level)?;
    log::info!("Starting Dungeon Life v{}", dungeonlife::VERSION);

    let config = match &args.config {
        Some(path) => GameConfig::load_from_file(path)?,
        None => GameConfig::default(),
    };

    let hub = load_map(&args.backyard)?;
    let level_paths = if args.levels.is_empty() {
        vec![PathBuf::from("assets/level1.json")]
    } else {
        args.levels.clone()
    };
    let dungeons = level_paths
        .iter()
        .map(|path| load_map(path))
        .collect::<DungeonResult<Vec<_>>>()?;
    log::info!("campaign: {} plus {} levels", hub.name, dungeons.len());

    let campaign = Campaign::new(hub, dungeons, config, SystemClock::new())?.with_kill_rewards();
    let mut scenes = SceneManager::new(campaign, InputHandler::new(), args.seed);
    scenes.run().await
}

/// Reads a Tiled map, naming it after its file.
fn load_map(path: &Path) -> DungeonResult<NamedMap> {
    let map = TiledMapReader::read_file(path)?;
    let name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| DungeonError::InvalidMap(format!("bad map path {}", path.display())))?;
    Ok(NamedMap::new(name, map))
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: &str) -> DungeonResult<()> {
    #[cfg(feature = "dev-tools")]
    {
        use tracing_subscriber::EnvFilter;

        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(log_level))
            .with_target(false)
            .try_init()
            .map_err(|e| DungeonError::InvalidState(format!("logging: {e}")))?;
        tracing::debug!(filter = log_level, "tracing subscriber installed");
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        env_logger::Builder::new()
            .parse_filters(log_level)
            .try_init()
            .map_err(|e| DungeonError::InvalidState(format!("logging: {e}")))?;
    }

    Ok(())
}
