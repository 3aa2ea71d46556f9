//! Host harness binary for the Vendetta bounty engine.
//!
//! Wires the economy engine to a scripted in-memory host and drives
//! the host tick loop the way an embedding game server would: pump the
//! scheduler queue every tick, feed in kill events, and shut down with
//! a final flush. Useful as a smoke run and as a reference for host
//! integration.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `vendetta-config.yaml` (defaults if absent)
//! 3. Build the engine on the data directory (first CLI argument)
//! 4. Restore map markers for loaded bounties
//! 5. Run the scripted demo: place a bounty, tick, resolve a kill
//! 6. Shut down: cancel timers, final drain, flush all stores

mod demo;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use vendetta_core::{EconomyEngine, KillEvent, SystemTimeSource, VendettaConfig};
use vendetta_types::PlayerId;

use crate::demo::DemoHost;

/// Interval between simulated host ticks.
const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Number of host ticks the demo runs for.
const DEMO_TICKS: u32 = 50;

fn main() -> anyhow::Result<()> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("vendetta-engine starting");

    // 2. Load configuration.
    let config = load_config()?;
    info!(
        enabled = config.general.enabled,
        minimum_bounty = config.payment.minimum_bounty,
        contracts = config.contracts.enabled,
        "Configuration loaded"
    );

    // 3. Build the engine.
    let data_dir = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from("vendetta-data"), PathBuf::from);
    let mut engine = EconomyEngine::new(config, &data_dir, Arc::new(SystemTimeSource))?;
    info!(data_dir = %data_dir.display(), "Engine initialized");

    // 4. Bring up the host and restore markers for loaded bounties.
    let mut host = DemoHost::new();
    engine.restore_map_markers(&mut host);

    // 5. Scripted demo flow: Aurelia puts 500 on Brakus, Casimir
    //    collects it mid-run while the tick loop pumps the scheduler.
    match engine.place_bounty(&mut host, PlayerId(101), "Aurelia", "Brakus", 500) {
        Ok(bounty) => info!(target = %bounty.target_name, amount = bounty.amount, "bounty placed"),
        Err(e) => warn!(error = %e, "bounty placement rejected"),
    }

    for tick in 0..DEMO_TICKS {
        engine.pump(&mut host);

        if tick == DEMO_TICKS / 2 {
            let report = engine.handle_kill(
                &mut host,
                &KillEvent {
                    victim_id: PlayerId(102),
                    victim_name: String::from("Brakus"),
                    killer_id: PlayerId(103),
                    killer_name: String::from("Casimir"),
                },
            );
            info!(?report, "kill processed");
        }

        std::thread::sleep(TICK_INTERVAL);
    }

    for entry in engine.top_leaderboard(10) {
        info!(player = %entry.name, total = entry.total_claimed, "leaderboard");
    }

    // 6. Shut down with a final drain and flush.
    engine.shutdown(&mut host);
    info!("vendetta-engine shutdown complete");
    Ok(())
}

/// Load the configuration from `vendetta-config.yaml`.
///
/// Looks for the config file relative to the current working
/// directory; a missing file falls back to the shipped defaults.
fn load_config() -> Result<VendettaConfig, vendetta_core::ConfigError> {
    let config_path = Path::new("vendetta-config.yaml");
    if config_path.exists() {
        VendettaConfig::from_file(config_path)
    } else {
        info!("Config file not found, using defaults");
        Ok(VendettaConfig::default())
    }
}
