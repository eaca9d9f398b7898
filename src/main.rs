//! Venue desk - front desk console for room and locker rentals
//!
//! Reads operator commands from stdin and applies them to a single in-memory
//! engine. State lives for the process lifetime only.
//!
//! Module structure:
//! - `domain/` - Core business types (Session, Resource, PriceTable)
//! - `services/` - Business logic (ResourcePool, Engine, Desk)
//! - `io/` - External interfaces (console, receipt log)
//! - `infra/` - Infrastructure (Config, Metrics)

use clap::Parser;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;
use venue_desk::infra::{Config, LogFormat, Metrics};
use venue_desk::io::{execute, spawn_line_reader, Command, Outcome};
use venue_desk::services::Desk;

/// Venue desk - room and locker allocation with flat-rate billing
#[derive(Parser, Debug)]
#[command(name = "venue-desk", version, about)]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "config/dev.toml")]
    config: String,

    /// Override the number of rooms
    #[arg(long)]
    rooms: Option<usize>,

    /// Override the number of lockers
    #[arg(long)]
    lockers: Option<usize>,
}

fn init_tracing(format: LogFormat) {
    // Default: INFO, use RUST_LOG=debug for full event visibility
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Config decides the log format, so load it before logging is up
    let loaded = Config::from_file(&args.config);
    let log_format = loaded.as_ref().map(|c| c.log_format()).unwrap_or_default();
    init_tracing(log_format);

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %format!("{e:#}"), "config_load_failed_using_defaults");
            Config::default()
        }
    }
    .with_pool_sizes(args.rooms, args.lockers);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        git = env!("GIT_HASH"),
        config_file = %config.config_file(),
        venue = %config.venue_name(),
        rooms = config.room_count(),
        lockers = config.locker_count(),
        prices = ?config.prices().entries().collect::<Vec<_>>(),
        receipts_file = %config.receipts_file(),
        "config_loaded"
    );

    let metrics = Arc::new(Metrics::new());
    let desk = Arc::new(Desk::new(&config, metrics));

    // Create shutdown signal
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    // Periodic metrics summary
    let reporter_desk = Arc::clone(&desk);
    let metrics_interval = config.metrics_interval_secs();
    let reporter = tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(metrics_interval));
        // First tick fires immediately
        interval.tick().await;
        loop {
            tokio::select! {
                _ = interval.tick() => reporter_desk.report().log(),
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }
    });

    // Stdin lives on its own thread so a pending read never blocks shutdown
    let mut line_rx = spawn_line_reader(std::io::BufReader::new(std::io::stdin()), 64);

    println!("{} desk ready. Type `help` for commands.", config.venue_name());

    loop {
        let line = tokio::select! {
            line = line_rx.recv() => line,
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown_signal_received");
                break;
            }
        };

        // EOF
        let Some(line) = line else { break };

        match Command::parse(&line) {
            Ok(None) => {}
            Ok(Some(command)) => match execute(&desk, command) {
                Outcome::Reply(text) => println!("{text}"),
                Outcome::Quit => break,
            },
            Err(e) => println!("error: {e}"),
        }
    }

    let _ = shutdown_tx.send(true);
    if let Err(e) = reporter.await {
        warn!(error = %e, "metrics_reporter_join_failed");
    }

    desk.report().log();
    info!("venue-desk shutdown complete");
    Ok(())
}
