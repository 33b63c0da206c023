use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::warn;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use std::time::Duration;

use crate::error::{AuthError, ConfigError, SyncResult};

/// Secure string that clears memory on drop
#[derive(Clone)]
pub struct SecureString {
    data: Vec<u8>,
}

impl SecureString {
    pub fn new(s: String) -> Self {
        Self {
            data: s.into_bytes(),
        }
    }

    pub fn as_str(&self) -> Result<&str, AuthError> {
        std::str::from_utf8(&self.data)
            .map_err(|e| AuthError::InvalidCredentials(format!("invalid UTF-8: {}", e)))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Drop for SecureString {
    fn drop(&mut self) {
        // Securely clear the memory
        for byte in &mut self.data {
            *byte = 0;
        }
    }
}

impl std::fmt::Debug for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecureString([REDACTED] {} bytes)", self.len())
    }
}

impl std::fmt::Display for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}

/// HTTP Basic credentials for the publisher admin account.
///
/// The base64-encoded `username:password` token is computed once at
/// construction and held as a [`SecureString`].
#[derive(Debug, Clone)]
pub struct BasicCredentials {
    username: String,
    token: SecureString,
}

impl BasicCredentials {
    /// Creates Basic credentials with security validation
    pub fn new(username: &str, password: &str) -> SyncResult<Self> {
        Self::validate_credentials(username, password)?;

        let credentials = format!("{}:{}", username, password);
        let encoded = STANDARD.encode(credentials.as_bytes());

        Ok(Self {
            username: username.to_string(),
            token: SecureString::new(encoded),
        })
    }

    /// Validates basic auth credentials
    fn validate_credentials(username: &str, password: &str) -> Result<(), AuthError> {
        if username.is_empty() {
            return Err(AuthError::MissingCredentials(
                "username cannot be empty".to_string(),
            ));
        }

        if password.is_empty() {
            return Err(AuthError::MissingCredentials(
                "password cannot be empty".to_string(),
            ));
        }

        if password.len() < 8 {
            warn!("Password is shorter than recommended minimum (8 characters)");
        }

        Ok(())
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// The full `Authorization` header value, `Basic <base64 token>`
    pub fn authorization_value(&self) -> SyncResult<String> {
        Ok(format!("Basic {}", self.token.as_str()?))
    }

    /// Adds the authentication header to a request header map
    pub fn add_auth_headers(&self, headers: &mut HeaderMap) -> SyncResult<()> {
        let auth_value = self.authorization_value()?;
        let header_value = HeaderValue::from_str(&auth_value)
            .map_err(|e| AuthError::InvalidCredentials(format!("invalid header value: {}", e)))?;
        headers.insert(AUTHORIZATION, header_value);
        Ok(())
    }

    /// Creates a pre-configured reqwest client carrying the Basic header and
    /// a JSON content type on every request
    pub fn create_authenticated_client(&self, timeout: Duration) -> SyncResult<reqwest::Client> {
        let mut headers = HeaderMap::new();
        self.add_auth_headers(&mut headers)?;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(client)
    }
}
