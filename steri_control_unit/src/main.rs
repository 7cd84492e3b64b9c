//! # STERI Control Unit
//!
//! Safety-interlocked cycle controller for the STERI benchtop sterilization
//! chamber.
//!
//! Loads the controller timing and threshold configuration, selects a board
//! driver by name from the driver registry, performs RT setup, and enters
//! the fixed-interval tick loop until Ctrl-C (or an optional `--duration-ms`
//! budget is spent).

use clap::Parser;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

use steri_control_unit::config::load_config;
use steri_control_unit::cycle::{TickRunner, rt_setup};
use steri_hal::driver_registry::builtin_registry;

/// STERI Control Unit — sterilization cycle controller
#[derive(Parser, Debug)]
#[command(name = "steri_control_unit")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Safety-interlocked cycle controller for benchtop sterilizers")]
struct Args {
    /// Path to the controller configuration TOML.
    #[arg(default_value = "config/controller.toml")]
    config: PathBuf,

    /// Board driver to run against.
    #[arg(long, default_value = "simulation")]
    driver: String,

    /// Stop after this much controller time [ms]. Runs until Ctrl-C when omitted.
    #[arg(long, value_name = "MS")]
    duration_ms: Option<u32>,

    /// CPU core to pin the tick thread to (default: 1).
    #[arg(long, default_value_t = 1)]
    cpu_core: usize,

    /// SCHED_FIFO priority (default: 80).
    #[arg(long, default_value_t = 80)]
    rt_priority: i32,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    setup_tracing(&args);

    info!("STERI Control Unit v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&args) {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("STERI Control Unit shutdown complete");
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let loaded = load_config(&args.config)?;
    info!(
        "Config OK: dwell={}ms, settle={}ms, debounce={}ms, tick={}ms",
        loaded.controller.state_duration_ms,
        loaded.controller.settle_delay_ms,
        loaded.controller.debounce_ms,
        loaded.controller.tick_interval_ms,
    );
    info!(
        "Release thresholds: {:.1}°C / {:.1}kPa",
        loaded.thresholds.max_temperature_c, loaded.thresholds.max_pressure_kpa,
    );

    let registry = builtin_registry();
    let driver = registry.create_driver(&args.driver)?;

    // RT setup (mlockall, affinity, scheduler).
    rt_setup(args.cpu_core, args.rt_priority)?;
    info!(
        "RT setup complete (cpu_core={}, priority={})",
        args.cpu_core, args.rt_priority
    );

    let mut runner = TickRunner::new(loaded, driver)?;

    // Signal handler for graceful shutdown.
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    })?;

    info!("TickRunner initialized, entering tick loop");
    if let Err(e) = runner.run(&running, args.duration_ms) {
        error!("Tick loop error: {e}");
        return Err(Box::new(e) as Box<dyn std::error::Error>);
    }

    Ok(())
}

/// Setup tracing subscriber based on CLI arguments.
fn setup_tracing(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
