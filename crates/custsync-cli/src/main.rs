//! Local driver for the customer-sync handler.
//!
//! Builds a simulated contact event from the command line and runs it through
//! the same pipeline the Lambda entry point runs:
//!
//! `custsync ticket_created --id 1832093000000383491 --config config.json`
//! `custsync session --idfa AEBE52E7-03EE-455A-B3C4-E57283966239`

use std::collections::HashMap;
use std::fs;

use anyhow::Context;
use clap::Parser;

use custsync_connectors::SyncHandler;
use custsync_core::config::load_sync_config;
use custsync_core::types::{ContactEvent, EventType, SyncOutcome};

#[derive(Debug, Parser)]
#[command(
    name = "custsync",
    about = "Send a simulated contact event through the customer-sync pipeline"
)]
struct Args {
    /// Event type triggering the invocation: session or ticket_created
    event_type: String,

    /// Externally defined customer id (CRM contact id or email address)
    #[arg(long)]
    id: Option<String>,

    /// Device identifier, supplied when no id is set
    #[arg(long)]
    idfa: Option<String>,

    /// Customer sync timestamp, ISO 8601 UTC ("2016-01-01T00:00:00.000Z")
    #[arg(long)]
    timestamp: Option<String>,

    /// Path to the sync configuration file
    #[arg(long, default_value = "config.json")]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let event_type: EventType = args
        .event_type
        .parse()
        .map_err(|_| anyhow::anyhow!("unknown event type '{}'", args.event_type))?;

    let content = fs::read_to_string(&args.config)
        .with_context(|| format!("failed to read config file {}", args.config))?;
    let config = load_sync_config(&content, &HashMap::new())?;

    let event = ContactEvent {
        event_type,
        id: args.id,
        idfa: args.idfa,
        timestamp: args.timestamp,
    };

    let handler = SyncHandler::new(config)?;
    match handler.handle(&event).await? {
        SyncOutcome::Completed { message, report } => {
            println!(
                "{} (created: {}, updated: {})",
                message, report.created_count, report.updated_count
            );
        }
        SyncOutcome::Skipped { reason } => {
            println!("skipped: {}", reason);
        }
    }

    Ok(())
}
