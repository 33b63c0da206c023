use chrono::Utc;
use log::info;
use std::time::Duration;

use custsync_core::config::SyncConfig;
use custsync_core::error::{EventError, SyncResult};
use custsync_core::types::{ContactEvent, SyncOutcome};
use custsync_core::utils::parse_iso8601_timestamp;

use crate::contact::build_contact;
use crate::usercare::SyncPushClient;
use crate::zoho::CrmClient;

/// Fixed completion message reported to the invoking framework on success
pub const SUCCESS_MESSAGE: &str = "Success!";

/// Orchestrates one contact-sync invocation: CRM lookup, payload assembly,
/// sync push.
///
/// Construction takes the full configuration object and builds both HTTP
/// clients up front; `handle` holds no state across invocations.
pub struct SyncHandler {
    crm: CrmClient,
    push: SyncPushClient,
    min_sync_interval_secs: u64,
}

impl SyncHandler {
    pub fn new(config: SyncConfig) -> SyncResult<Self> {
        let timeout = Duration::from_secs(config.options.request_timeout_secs);
        let push = SyncPushClient::new(&config.publisher, timeout)?;
        let crm = CrmClient::new(config.crm, timeout)?;

        Ok(Self {
            crm,
            push,
            min_sync_interval_secs: config.options.min_sync_interval_secs,
        })
    }

    /// Handle one inbound contact event.
    ///
    /// The push is only reachable after `build_contact` has returned a fully
    /// populated payload, so a partially extracted record can never go out.
    pub async fn handle(&self, event: &ContactEvent) -> SyncResult<SyncOutcome> {
        info!(
            "got event: {}",
            serde_json::to_string(event).unwrap_or_else(|_| "<unserializable>".to_string())
        );

        let id = event
            .id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(EventError::MissingCustomerId)?;

        if let Some(reason) = self.freshness_skip(event) {
            info!("{}", reason);
            return Ok(SyncOutcome::Skipped { reason });
        }

        let payload = build_contact(&self.crm, id).await?;
        let report = self.push.push(&payload).await?;

        Ok(SyncOutcome::Completed {
            message: SUCCESS_MESSAGE.to_string(),
            report,
        })
    }

    /// Events whose sync timestamp is fresher than the configured interval
    /// are dropped without any HTTP traffic. Unparseable timestamps never
    /// skip.
    fn freshness_skip(&self, event: &ContactEvent) -> Option<String> {
        if self.min_sync_interval_secs == 0 {
            return None;
        }

        let timestamp = event.timestamp.as_deref().and_then(parse_iso8601_timestamp)?;
        let age_secs = Utc::now().signed_duration_since(timestamp).num_seconds();

        if age_secs < self.min_sync_interval_secs as i64 {
            Some(format!(
                "last sync update was {}s ago, under the {}s minimum interval",
                age_secs, self.min_sync_interval_secs
            ))
        } else {
            None
        }
    }
}
