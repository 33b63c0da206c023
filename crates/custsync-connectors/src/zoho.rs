use log::debug;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use custsync_core::config::CrmConfig;
use custsync_core::error::{ConfigError, CrmError, SyncResult};

const SEARCH_BY_ID_PATH: &str = "/getSearchRecordsByPDC";
const SEARCH_BY_EMAIL_PATH: &str = "/searchRecords";
const CRM_SCOPE: &str = "crmapi";

/// Client for the CRM contact-search API.
///
/// Both search operations return the raw response body on a 200 status; the
/// record shape is interpreted by the contact builder, not here.
pub struct CrmClient {
    config: CrmConfig,
    client: Client,
}

impl CrmClient {
    pub fn new(config: CrmConfig, timeout: Duration) -> SyncResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Fetch the raw search response for a contact id
    pub async fn fetch_by_id(&self, id: &str) -> SyncResult<String> {
        let request = self.search_by_id_request(id)?;
        self.execute(request).await
    }

    /// Fetch the raw search response for an email address
    pub async fn search_by_email(&self, email: &str) -> SyncResult<String> {
        let request = self.search_by_email_request(email)?;
        self.execute(request).await
    }

    /// Build the id-search request without sending it
    pub(crate) fn search_by_id_request(&self, id: &str) -> Result<reqwest::Request, CrmError> {
        let url = self.config.connection.endpoint_url(SEARCH_BY_ID_PATH);
        self.client
            .get(url)
            .query(&[
                ("authtoken", self.config.api_token.as_str()),
                ("scope", CRM_SCOPE),
                ("searchColumn", "contactid"),
                ("searchValue", id),
            ])
            .build()
            .map_err(CrmError::from)
    }

    /// Build the email-search request without sending it
    pub(crate) fn search_by_email_request(
        &self,
        email: &str,
    ) -> Result<reqwest::Request, CrmError> {
        let url = self.config.connection.endpoint_url(SEARCH_BY_EMAIL_PATH);
        let criteria = format!("(email:{})", email);
        self.client
            .get(url)
            .query(&[
                ("authtoken", self.config.api_token.as_str()),
                ("scope", CRM_SCOPE),
                ("criteria", criteria.as_str()),
            ])
            .build()
            .map_err(CrmError::from)
    }

    async fn execute(&self, request: reqwest::Request) -> SyncResult<String> {
        // The URL query carries the API token, so it is stripped from
        // everything that can end up in a log line or error value.
        debug!("CRM lookup: GET {}", request.url().path());

        let mut redacted = request.url().clone();
        redacted.set_query(None);
        let url = redacted.to_string();
        let response = self.client.execute(request).await.map_err(CrmError::from)?;

        let status = response.status();
        if status != StatusCode::OK {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(CrmError::RequestFailed {
                url,
                status: Some(status.as_u16()),
                message,
            }
            .into());
        }

        response.text().await.map_err(|e| CrmError::from(e).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use custsync_core::config::ConnectionConfig;
    use std::collections::HashMap;

    fn create_test_client() -> CrmClient {
        CrmClient::new(
            CrmConfig {
                connection: ConnectionConfig {
                    protocol: "https".to_string(),
                    hostname: "crm.example.com".to_string(),
                    port: 443,
                    request_path: "/crm/private/json/Contacts".to_string(),
                },
                api_token: "test-crm-token".to_string(),
            },
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn query_map(request: &reqwest::Request) -> HashMap<String, String> {
        request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_id_search_request_shape() {
        let client = create_test_client();
        let request = client.search_by_id_request("123").unwrap();

        assert_eq!(
            request.url().path(),
            "/crm/private/json/Contacts/getSearchRecordsByPDC"
        );

        let query = query_map(&request);
        assert_eq!(query.get("searchColumn").map(String::as_str), Some("contactid"));
        assert_eq!(query.get("searchValue").map(String::as_str), Some("123"));
        assert_eq!(query.get("scope").map(String::as_str), Some("crmapi"));
        assert_eq!(
            query.get("authtoken").map(String::as_str),
            Some("test-crm-token")
        );
    }

    #[test]
    fn test_email_search_request_shape() {
        let client = create_test_client();
        let request = client.search_by_email_request("fsmith@example.com").unwrap();

        assert_eq!(
            request.url().path(),
            "/crm/private/json/Contacts/searchRecords"
        );

        let query = query_map(&request);
        assert_eq!(
            query.get("criteria").map(String::as_str),
            Some("(email:fsmith@example.com)")
        );
        assert_eq!(query.get("scope").map(String::as_str), Some("crmapi"));
    }
}
