use anyhow::{Context, Result};
use clap::Parser;
use grid_snake::game::{GameConfig, GameState};
use grid_snake::modes::PlayMode;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Classic Snake on a square grid")]
struct Cli {
    /// JSON file with game settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width and height, in cells
    #[arg(long)]
    grid_size: Option<usize>,

    /// Milliseconds between two moves
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Cells along each edge where food never appears
    #[arg(long)]
    food_margin: Option<usize>,

    /// Seed for food placement, for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (filtered by RUST_LOG, default "info")
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_file(path)?,
            None => GameConfig::default(),
        };

        if let Some(grid_size) = self.grid_size {
            config.grid_size = grid_size;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_interval_ms = tick_ms;
        }
        if let Some(food_margin) = self.food_margin {
            config.food_margin = food_margin;
        }

        config.validate().context("Invalid game settings")?;
        Ok(config)
    }
}

/// The terminal belongs to the game, so logs only go to a file
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let config = cli.game_config()?;
    info!(?config, seed = ?cli.seed, "Configuration loaded");

    let state = match cli.seed {
        Some(seed) => GameState::with_seed(config, seed)?,
        None => GameState::new(config)?,
    };

    PlayMode::new(state).run().await
}
