//! Bot Arena demo runner
//!
//! Assembles a match from the built-in controllers, runs it to completion,
//! and prints the standings. Consumes the core only through the public match
//! surface; rendering, replay files, and argument parsing belong to other
//! tools.

use std::env;
use std::f64::consts::PI;
use std::fs;
use std::sync::Arc;

use bot_arena::controller::{Hunter, Sitter, Wanderer};
use bot_arena::sim::{Angle, Point};
use bot_arena::{BotSpec, Match, MatchConfig, MatchError};

/// Optional JSON config override, pointed at by BOT_ARENA_CONFIG
fn load_config() -> MatchConfig {
    let Ok(path) = env::var("BOT_ARENA_CONFIG") else {
        return MatchConfig::default();
    };
    match fs::read_to_string(&path).map_err(|e| e.to_string()).and_then(|json| {
        MatchConfig::from_json(&json).map_err(|e| e.to_string())
    }) {
        Ok(config) => {
            log::info!("loaded config override from {path}");
            config
        }
        Err(err) => {
            log::warn!("ignoring config override {path}: {err}");
            MatchConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), MatchError> {
    env_logger::init();
    log::info!("Bot Arena starting...");

    let config = load_config();
    let roster = vec![
        BotSpec::new("hunter", Point::new(-300.0, 0.0), Angle::ZERO, Arc::new(Hunter::new())),
        BotSpec::new(
            "drifter",
            Point::new(300.0, 0.0),
            Angle::new(PI),
            Arc::new(Wanderer::new(0xB07_A12E)),
        ),
        BotSpec::new(
            "rambler",
            Point::new(0.0, 300.0),
            Angle::new(-PI / 2.0),
            Arc::new(Wanderer::new(0xCAFE)),
        ),
        BotSpec::new("target", Point::new(0.0, -300.0), Angle::ZERO, Arc::new(Sitter)),
    ];

    // Wanderers never shoot back, so cap the demo rather than trusting the
    // hunter to finish the job
    const MAX_TICKS: u64 = 10_000;
    let mut game = Match::setup(roster, config)?;
    while game.step().await? == bot_arena::MatchPhase::Running {
        if game.arena().tick() >= MAX_TICKS {
            log::warn!("tick cap reached, calling it");
            break;
        }
    }

    println!("match over after {} ticks", game.arena().tick() + 1);
    println!("standings (first out first):");
    for bot in game.standings() {
        match bot.death_tick() {
            Some(tick) => println!("  {} - died on tick {tick} at {}", bot.name(), bot.position()),
            None => println!("  {} - survived at {}", bot.name(), bot.position()),
        }
    }
    println!("{} notable events journaled", game.events().len());

    Ok(())
}
