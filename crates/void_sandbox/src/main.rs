//! Void Sandbox
//!
//! Runs an authority and a replica side by side: the replica's player aims
//! at a loot pouch, holds interact until the countdown completes on the
//! authority, then drops part of the loot again. The authority's inventory
//! is replicated to the replica after every tick.
//!
//! Run with: cargo run -p void_sandbox
//!       or: VOID_SANDBOX_CONFIG=my.toml cargo run --bin void-sandbox

mod config;
mod session;

use config::SandboxConfig;
use session::Session;

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    let config = match SandboxConfig::load() {
        Ok(config) => config,
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(1);
        }
    };

    log::info!(
        "Sandbox: {} ticks of {}s, loot {} x{}",
        config.session.ticks,
        config.session.tick_seconds,
        config.loot.kind,
        config.loot.quantity
    );

    match Session::new(config).and_then(Session::run) {
        Ok(report) => report.log_summary(),
        Err(err) => {
            log::error!("Sandbox session failed: {}", err);
            std::process::exit(1);
        }
    }
}
