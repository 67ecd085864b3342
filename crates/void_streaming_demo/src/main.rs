//! Zone Walk
//!
//! Console walkthrough for Void Engine zone streaming. A cursor walks a
//! grid; every move re-evaluates the zones around it, which load and unload
//! in the background while you keep walking.
//!
//! Type keys and press Enter: `w`/`a`/`s`/`d` or the arrow keys move,
//! `q` quits.
//!
//! Run with: cargo run --bin zone-walk [zones.toml]

mod boot_config;
mod console;
mod error;
mod grid;
mod keys;

use boot_config::BootConfig;
use console::ConsoleStatus;
use error::Result;
use grid::GridCursor;
use keys::{KeyCommand, INVALID_KEY_MESSAGE, WELCOME_MESSAGE};

use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use void_streaming::prelude::*;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match BootConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load boot config: {}", e);
            std::process::exit(1);
        }
    };
    config.print_summary();

    if let Err(e) = run(config).await {
        log::error!("zone-walk: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: BootConfig) -> Result<()> {
    let options = config.streaming.streamer_options();
    let registry = config.streaming.into_registry()?;

    let provider = Arc::new(MemoryProvider::new());
    let status = Arc::new(ConsoleStatus::stdout());
    let mut streamer = ZoneStreamer::new(registry, provider.clone(), status.clone(), options)?;

    let adopted = streamer.adopt_external();
    if !adopted.is_empty() {
        log::info!("Adopted {} already active zone(s)", adopted.len());
    }

    let mut cursor = GridCursor::new(&config.grid);
    let position = SharedPosition::new(cursor.world_position());
    println!("Start at cell {:?} {}", cursor.cell(), cursor.world_position());

    // The streamer owns its loop; we only feed it positions and move events
    let (moves, moves_rx) = movement_channel();
    let driver = tokio::spawn({
        let position = position.clone();
        async move {
            streamer.run(moves_rx, position).await;
            streamer
        }
    });

    status.show(WELCOME_MESSAGE);
    let mut first_move = true;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    'input: while let Some(line) = lines.next_line().await? {
        for command in keys::parse_keys(&line) {
            match command {
                KeyCommand::Move(direction) => {
                    if first_move {
                        first_move = false;
                        status.hide();
                    }
                    if !cursor.step(direction) {
                        log::debug!("Edge of the grid, staying at {:?}", cursor.cell());
                    }
                    position.set(cursor.world_position());
                    println!("Cell {:?} {}", cursor.cell(), cursor.world_position());

                    if moves.send(MoveEvent::new(direction)).is_err() {
                        log::warn!("Streamer stopped, ending walk");
                        break 'input;
                    }
                }
                KeyCommand::Quit => break 'input,
                KeyCommand::Invalid => status.show(INVALID_KEY_MESSAGE),
            }
        }
    }

    // Closing the channel lets the streamer settle and return
    drop(moves);
    let streamer = driver.await?;

    let loaded: Vec<String> = streamer
        .registry()
        .loaded_ids()
        .into_iter()
        .map(ToString::to_string)
        .collect();
    let stats = provider.stats();
    println!(
        "Loaded at exit: [{}] ({} load(s), {} unload(s), {} active)",
        loaded.join(", "),
        stats.load_calls,
        stats.unload_calls,
        stats.active
    );

    Ok(())
}
