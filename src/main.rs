//! Queue notifier - texts waiting barbershop customers when they are almost up
//!
//! Intended to be started periodically by an external scheduler (cron).
//! Each invocation performs a single pass and exits.
//!
//! Module structure:
//! - `domain/` - Snapshot types (Shop, Barber, QueueEntry)
//! - `io/` - External interfaces (Supabase, Twilio) and their traits
//! - `services/` - Estimation, eligibility policy, run controller
//! - `infra/` - Infrastructure (Config, business hours, run summary)

use chrono::Utc;
use clap::Parser;
use queue_notifier::infra::{BusinessHours, Config};
use queue_notifier::io::{SupabaseClient, TwilioDispatcher};
use queue_notifier::services::Notifier;
use tracing::{error, info, warn};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

/// Queue notifier - one notification pass over all shops
#[derive(Parser, Debug)]
#[command(
    name = "queue-notifier",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")"),
    about
)]
struct Args {
    /// Path to TOML configuration file (falls back to CONFIG_FILE, then config/dev.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Run even outside business hours
    #[arg(long)]
    ignore_hours: bool,

    /// Classify and log, but send nothing and record nothing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging with configurable level via RUST_LOG env var
    // Default: INFO, use RUST_LOG=debug for per-shop and per-request detail
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .init();

    let args = Args::parse();
    info!(git_hash = queue_notifier::GIT_HASH, "queue-notifier starting");

    let config_path = Config::resolve_config_path(args.config.as_deref());
    let config = Config::load_from_path(&config_path);
    config.validate(args.dry_run)?;

    info!(
        config_file = %config.config_file(),
        supabase_url = %config.supabase_url(),
        from_number = %config.twilio_from_number(),
        hours_enabled = %config.hours_enabled(),
        timezone = %config.timezone(),
        open_hour = %config.open_hour(),
        close_hour = %config.close_hour(),
        dry_run = %args.dry_run,
        "config_loaded"
    );

    if config.hours_enabled() && !args.ignore_hours {
        let hours = BusinessHours::from_config(&config)?;
        let now = Utc::now();
        if !hours.is_open_at(now) {
            info!(
                timezone = %hours.timezone(),
                local_hour = %hours.local_hour(now),
                "outside_business_hours"
            );
            return Ok(());
        }
    }

    let source = SupabaseClient::new(&config)?;
    let dispatcher = TwilioDispatcher::new(&config)?;
    let notifier =
        Notifier::new(source, dispatcher, config.message_template()).with_dry_run(args.dry_run);

    // Run failures are logged, never surfaced to the scheduler as a crash
    match notifier.run().await {
        Ok(summary) if summary.has_failures() => {
            warn!(attempts = %summary.attempts(), "run_completed_with_failures")
        }
        Ok(_) => info!("run_completed"),
        Err(e) => error!(error = %e, "run_aborted"),
    }

    Ok(())
}
