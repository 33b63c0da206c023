use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use custsync_connectors::SyncHandler;
use custsync_core::config::load_sync_config;
use custsync_core::types::{ContactEvent, SyncOutcome, SyncReport};

/// Response returned to the invoking framework.
///
/// Every invocation either resolves to one of these or to a function error;
/// there is no silent-termination path.
#[derive(Debug, Deserialize, Serialize)]
pub struct Response {
    pub status: String,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<SyncReport>,
}

pub async fn run(event: ContactEvent) -> anyhow::Result<Response> {
    let config_content = include_str!("config.json");

    let config = load_sync_config(config_content, &HashMap::new())?;
    let handler = SyncHandler::new(config)?;

    match handler.handle(&event).await? {
        SyncOutcome::Completed { message, report } => Ok(Response {
            status: "success".to_string(),
            message,
            report: Some(report),
        }),
        SyncOutcome::Skipped { reason } => Ok(Response {
            status: "skipped".to_string(),
            message: reason,
            report: None,
        }),
    }
}
