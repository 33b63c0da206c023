use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::env;
use std::sync::Arc;

use crate::error::{ConfigError, SyncResult};

/// Top-level configuration for one sync deployment: where the CRM lives,
/// where the customer-sync endpoint lives, and the handler options.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SyncConfig {
    pub crm: CrmConfig,
    pub publisher: PublisherConfig,
    #[serde(default)]
    pub options: SyncOptions,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ConnectionConfig {
    pub protocol: String,
    pub hostname: String,
    pub port: u16,
    pub request_path: String,
}

impl ConnectionConfig {
    /// Scheme-host-port prefix, no path
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.hostname, self.port)
    }

    /// Build a complete URL for an endpoint under this connection's base path
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        let endpoint = if endpoint.is_empty() || endpoint.starts_with('/') {
            endpoint.to_string()
        } else {
            format!("/{}", endpoint)
        };

        format!("{}{}{}", self.base_url(), self.request_path, endpoint)
    }
}

/// CRM search endpoint and its API token
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CrmConfig {
    pub connection: ConnectionConfig,
    pub api_token: String,
}

/// Customer-sync endpoint, publisher key, and the admin account used for
/// Basic authentication
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PublisherConfig {
    pub connection: ConnectionConfig,
    pub api_key: String,
    pub admin_username: String,
    pub admin_password: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SyncOptions {
    /// Events synced more recently than this many seconds ago are skipped.
    /// Zero disables the window.
    #[serde(default = "default_min_sync_interval_secs")]
    pub min_sync_interval_secs: u64,

    /// Timeout applied to both outbound HTTP clients
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_min_sync_interval_secs() -> u64 {
    600
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            min_sync_interval_secs: default_min_sync_interval_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Loads a sync configuration from a JSON document, resolving `ENV_*` and
/// `CREDENTIAL_*` placeholder strings before deserializing.
pub fn load_sync_config(
    config_content: &str,
    credentials: &HashMap<String, String>,
) -> SyncResult<SyncConfig> {
    let mut raw: Value = serde_json::from_str(config_content)
        .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;

    let mut processor = VariableResolverProcessor::new(credentials);
    processor.resolve(&mut raw)?;

    debug!("Loaded and processed sync configuration");

    serde_json::from_value(raw).map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
}

pub trait VariableResolver {
    fn is_resolvable(&self, key: &str) -> bool;
    fn resolve(&self, key: &str) -> Result<String, ConfigError>;
}

pub struct EnvVarResolver {}

pub struct CredentialResolver {
    credentials: HashMap<String, String>,
}

impl CredentialResolver {
    pub fn new(credentials: HashMap<String, String>) -> Self {
        CredentialResolver { credentials }
    }
}

impl VariableResolver for EnvVarResolver {
    fn is_resolvable(&self, key: &str) -> bool {
        // Support both ENV_ prefix and ${VAR} syntax for flexibility
        key.starts_with("ENV_") || (key.starts_with("${") && key.ends_with('}'))
    }

    fn resolve(&self, key: &str) -> Result<String, ConfigError> {
        let env_key = if let Some(stripped) = key.strip_prefix("ENV_") {
            stripped
        } else {
            &key[2..key.len() - 1]
        };

        debug!("Looking up environment variable: {}", env_key);
        env::var(env_key).map_err(|_| ConfigError::EnvironmentResolution(env_key.to_string()))
    }
}

impl VariableResolver for CredentialResolver {
    fn is_resolvable(&self, key: &str) -> bool {
        key.starts_with("CREDENTIAL_")
    }

    fn resolve(&self, key: &str) -> Result<String, ConfigError> {
        let credential_key = &key[11..]; // Skip the "CREDENTIAL_" prefix
        debug!("Looking up credential: {}", credential_key);
        self.credentials
            .get(credential_key)
            .cloned()
            .ok_or_else(|| ConfigError::CredentialResolution(credential_key.to_string()))
    }
}

pub struct VariableResolverProcessor {
    resolvers: Vec<Arc<dyn VariableResolver>>,
}

impl VariableResolverProcessor {
    pub fn new(credentials: &HashMap<String, String>) -> Self {
        VariableResolverProcessor {
            resolvers: vec![
                Arc::new(EnvVarResolver {}),
                Arc::new(CredentialResolver::new(credentials.clone())),
            ],
        }
    }

    fn resolve(&mut self, value: &mut Value) -> Result<(), ConfigError> {
        match value {
            Value::String(s) => {
                for resolver in &self.resolvers {
                    if resolver.is_resolvable(s) {
                        *s = resolver.resolve(s)?;
                        return Ok(());
                    }
                }
                Ok(())
            }
            Value::Object(map) => {
                for (_, v) in map.iter_mut() {
                    self.resolve(v)?;
                }
                Ok(())
            }
            Value::Array(arr) => {
                for item in arr.iter_mut() {
                    self.resolve(item)?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}
