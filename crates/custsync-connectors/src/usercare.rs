use log::debug;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use custsync_core::auth::BasicCredentials;
use custsync_core::config::PublisherConfig;
use custsync_core::error::{PushError, SyncResult};
use custsync_core::types::{CustomerSyncPayload, SyncReport};

/// Client for the customer-sync push endpoint.
///
/// The Basic credential is installed as a default header at construction, so
/// every push carries it without touching per-request headers.
pub struct SyncPushClient {
    url: String,
    client: Client,
}

impl SyncPushClient {
    pub fn new(config: &PublisherConfig, timeout: Duration) -> SyncResult<Self> {
        let credentials =
            BasicCredentials::new(&config.admin_username, &config.admin_password)?;
        let client = credentials.create_authenticated_client(timeout)?;

        let url = config
            .connection
            .endpoint_url(&format!("/{}/sync_customers", config.api_key));

        Ok(Self { url, client })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST the payload and interpret the sync report.
    ///
    /// Transport failure, a non-200 status, and a report with a non-zero
    /// `error_count` are all explicit errors.
    pub async fn push(&self, payload: &CustomerSyncPayload) -> SyncResult<SyncReport> {
        debug!("sync push: POST {}", self.url);

        let response = self
            .client
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .map_err(PushError::from)?;

        let status = response.status();
        if status != StatusCode::OK {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PushError::RequestFailed {
                status: Some(status.as_u16()),
                message,
            }
            .into());
        }

        let report: SyncReport = response
            .json()
            .await
            .map_err(|e| PushError::InvalidReport(e.to_string()))?;

        debug!(
            "sync report: created {}, updated {}, errors {}",
            report.created_count, report.updated_count, report.error_count
        );

        if report.error_count != 0 {
            return Err(PushError::ReportedErrors {
                error_count: report.error_count,
            }
            .into());
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use custsync_core::config::ConnectionConfig;

    #[test]
    fn test_push_url_embeds_publisher_key() {
        let client = SyncPushClient::new(
            &PublisherConfig {
                connection: ConnectionConfig {
                    protocol: "https".to_string(),
                    hostname: "sync.example.com".to_string(),
                    port: 443,
                    request_path: "/api/v1".to_string(),
                },
                api_key: "pubkey".to_string(),
                admin_username: "admin@example.com".to_string(),
                admin_password: "hunter22hunter22".to_string(),
            },
            Duration::from_secs(5),
        )
        .unwrap();

        assert_eq!(
            client.url(),
            "https://sync.example.com:443/api/v1/pubkey/sync_customers"
        );
    }
}
