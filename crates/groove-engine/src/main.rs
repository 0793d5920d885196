//! Party engine binary for the Groove simulation.
//!
//! Wires the simulated beat source, crowd spawner, and tick cycle into a
//! fixed-rate run loop. The real renderer and control panel are external
//! collaborators; this binary drives the core and logs periodic
//! summaries so a headless run is observable.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `groove-config.yaml` (defaults if absent)
//! 3. Create the party state and spawn the starting crowd
//! 4. Create the simulated beat source
//! 5. Run the fixed-rate tick loop until `max_ticks` (0 = forever)

mod beat;
mod error;
mod spawner;

use std::path::Path;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use groove_core::{PartyConfig, PartyState};

use crate::beat::SimulatedBeats;
use crate::error::EngineError;

/// Ticks between periodic summary log lines.
const SUMMARY_EVERY: u64 = 300;

/// Application entry point for the party engine.
///
/// # Errors
///
/// Returns an error if configuration loading fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("groove-engine starting");

    // 2. Load configuration.
    let config = load_config()?;
    info!(
        name = config.party.name,
        seed = config.party.seed,
        tick_interval_ms = config.party.tick_interval_ms,
        dancers = config.crowd.initial_dancers,
        "configuration loaded"
    );

    // 3. Create the party state and spawn the crowd.
    let mut state = PartyState::from_config(&config);
    let mut spawn_rng = StdRng::seed_from_u64(config.party.seed);
    let spawned = spawner::spawn_crowd(&mut state, &config.crowd, &mut spawn_rng);
    info!(spawned = spawned.len(), moves = state.catalog.len(), "floor ready");

    // 4. Create the simulated beat source.
    let mut beats = SimulatedBeats::new(config.music.tempo);
    info!(tempo = beats.tempo(), "beat source running");

    // 5. Fixed-rate tick loop.
    let tick_interval = Duration::from_millis(config.party.tick_interval_ms);
    let mut last_frame = Instant::now();
    loop {
        if config.party.max_ticks > 0 && state.tick >= config.party.max_ticks {
            break;
        }

        let now = Instant::now();
        let dt = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;

        let signal = beats.advance(dt);
        let summary = state.run_tick(&signal, dt);

        if summary.tick % SUMMARY_EVERY == 0 {
            info!(
                tick = summary.tick,
                dancers = summary.dancers,
                groups = summary.groups,
                congas = summary.conga_lines,
                crews = summary.crews,
                relationships = summary.relationships,
                moves = summary.moves,
                top_move = summary.top_move.as_deref().unwrap_or("-"),
                "party status"
            );
        }

        std::thread::sleep(tick_interval);
    }

    info!(ticks = state.tick, moves = state.catalog.len(), "party over");
    Ok(())
}

/// Load `groove-config.yaml` from the working directory, falling back to
/// defaults when the file is absent.
fn load_config() -> Result<PartyConfig, EngineError> {
    let path = Path::new("groove-config.yaml");
    if path.exists() {
        Ok(PartyConfig::from_file(path)?)
    } else {
        info!("groove-config.yaml not found, using defaults");
        Ok(PartyConfig::default())
    }
}
