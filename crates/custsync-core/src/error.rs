use std::fmt;

/// Core error types for the customer sync system
#[derive(Debug)]
pub enum SyncError {
    /// Configuration-related errors
    Config(ConfigError),

    /// Credential and Basic-auth errors
    Auth(AuthError),

    /// Inbound event errors
    Event(EventError),

    /// CRM lookup transport errors
    Crm(CrmError),

    /// Contact record parsing and extraction errors
    Contact(ContactError),

    /// Sync push errors
    Push(PushError),
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
    /// Missing required configuration parameter
    MissingParameter(String),

    /// Invalid configuration format
    InvalidFormat(String),

    /// Environment variable resolution failed
    EnvironmentResolution(String),

    /// Credential resolution failed
    CredentialResolution(String),

    /// HTTP client construction failed
    HttpClient(String),
}

/// Credential and Basic-auth errors
#[derive(Debug)]
pub enum AuthError {
    /// Missing username or password
    MissingCredentials(String),

    /// Credentials cannot be carried in an HTTP header
    InvalidCredentials(String),
}

/// Inbound event errors
#[derive(Debug)]
pub enum EventError {
    /// Event carries no customer id
    MissingCustomerId,
}

/// CRM lookup transport errors
#[derive(Debug)]
pub enum CrmError {
    /// Lookup request failed or returned a non-200 status
    RequestFailed {
        url: String,
        status: Option<u16>,
        message: String,
    },

    /// Lookup timed out
    Timeout(String),
}

/// Contact record parsing and extraction errors
#[derive(Debug)]
pub enum ContactError {
    /// Response body does not hold exactly one contact row
    MalformedResponse(String),

    /// No contact matched the search value
    NotFound(String),

    /// One or more of the required contact fields is absent
    PartialContact { id: String, missing: Vec<String> },
}

/// Sync push errors
#[derive(Debug)]
pub enum PushError {
    /// Push request failed or returned a non-200 status
    RequestFailed {
        status: Option<u16>,
        message: String,
    },

    /// Push timed out
    Timeout(String),

    /// 200 response body is not a sync report
    InvalidReport(String),

    /// Sync endpoint accepted the request but reported per-customer errors
    ReportedErrors { error_count: u64 },
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::Config(e) => write!(f, "Configuration error: {}", e),
            SyncError::Auth(e) => write!(f, "Authentication error: {}", e),
            SyncError::Event(e) => write!(f, "Event error: {}", e),
            SyncError::Crm(e) => write!(f, "CRM lookup error: {}", e),
            SyncError::Contact(e) => write!(f, "Contact error: {}", e),
            SyncError::Push(e) => write!(f, "Sync push error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingParameter(param) => {
                write!(f, "Missing required parameter: {}", param)
            }
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid configuration format: {}", msg),
            ConfigError::EnvironmentResolution(var) => {
                write!(f, "Failed to resolve environment variable: {}", var)
            }
            ConfigError::CredentialResolution(cred) => {
                write!(f, "Failed to resolve credential: {}", cred)
            }
            ConfigError::HttpClient(msg) => write!(f, "Failed to build HTTP client: {}", msg),
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingCredentials(which) => {
                write!(f, "Missing credentials: {}", which)
            }
            AuthError::InvalidCredentials(reason) => {
                write!(f, "Invalid credentials: {}", reason)
            }
        }
    }
}

impl fmt::Display for EventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventError::MissingCustomerId => write!(f, "Event carries no customer id"),
        }
    }
}

impl fmt::Display for CrmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrmError::RequestFailed {
                url,
                status,
                message,
            } => match status {
                Some(code) => write!(
                    f,
                    "CRM request to {} failed with status {}: {}",
                    url, code, message
                ),
                None => write!(f, "CRM request to {} failed: {}", url, message),
            },
            CrmError::Timeout(url) => write!(f, "CRM request timeout for: {}", url),
        }
    }
}

impl fmt::Display for ContactError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContactError::MalformedResponse(msg) => {
                write!(f, "Malformed CRM response: {}", msg)
            }
            ContactError::NotFound(search) => write!(f, "No contact found: {}", search),
            ContactError::PartialContact { id, missing } => {
                write!(
                    f,
                    "Contact '{}' is missing required fields: {}",
                    id,
                    missing.join(", ")
                )
            }
        }
    }
}

impl fmt::Display for PushError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PushError::RequestFailed { status, message } => match status {
                Some(code) => write!(f, "Sync post failed with status {}: {}", code, message),
                None => write!(f, "Sync post failed: {}", message),
            },
            PushError::Timeout(url) => write!(f, "Sync post timeout for: {}", url),
            PushError::InvalidReport(msg) => write!(f, "Invalid sync report: {}", msg),
            PushError::ReportedErrors { error_count } => {
                write!(f, "Sync post response errors: {}", error_count)
            }
        }
    }
}

impl std::error::Error for SyncError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for AuthError {}
impl std::error::Error for EventError {}
impl std::error::Error for CrmError {}
impl std::error::Error for ContactError {}
impl std::error::Error for PushError {}

impl From<ConfigError> for SyncError {
    fn from(err: ConfigError) -> Self {
        SyncError::Config(err)
    }
}

impl From<AuthError> for SyncError {
    fn from(err: AuthError) -> Self {
        SyncError::Auth(err)
    }
}

impl From<EventError> for SyncError {
    fn from(err: EventError) -> Self {
        SyncError::Event(err)
    }
}

impl From<CrmError> for SyncError {
    fn from(err: CrmError) -> Self {
        SyncError::Crm(err)
    }
}

impl From<ContactError> for SyncError {
    fn from(err: ContactError) -> Self {
        SyncError::Contact(err)
    }
}

impl From<PushError> for SyncError {
    fn from(err: PushError) -> Self {
        SyncError::Push(err)
    }
}

/// Conversion from reqwest::Error for the lookup leg. The lookup URL query
/// carries the API token, so only the query-less URL is retained.
impl From<reqwest::Error> for CrmError {
    fn from(err: reqwest::Error) -> Self {
        let url = err
            .url()
            .map(|u| {
                let mut u = u.clone();
                u.set_query(None);
                u.to_string()
            })
            .unwrap_or_else(|| "unknown".to_string());
        if err.is_timeout() {
            CrmError::Timeout(url)
        } else {
            let status = err.status().map(|s| s.as_u16());
            CrmError::RequestFailed {
                url,
                status,
                message: err.without_url().to_string(),
            }
        }
    }
}

/// Conversion from reqwest::Error for the push leg
impl From<reqwest::Error> for PushError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PushError::Timeout(
                err.url()
                    .map(|u| u.to_string())
                    .unwrap_or_else(|| "unknown".to_string()),
            )
        } else {
            PushError::RequestFailed {
                status: err.status().map(|s| s.as_u16()),
                message: err.to_string(),
            }
        }
    }
}

/// Result type alias for sync operations
pub type SyncResult<T> = Result<T, SyncError>;
