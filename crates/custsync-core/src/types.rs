// crates/custsync-core/src/types.rs
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Inbound contact lifecycle event delivered by the event framework.
///
/// Only `id` feeds the lookup; `timestamp` feeds the freshness window. The
/// remaining fields are accepted so any event the framework sends
/// deserializes cleanly.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ContactEvent {
    #[serde(default)]
    pub event_type: EventType,

    pub id: Option<String>,

    #[serde(rename = "IDFA")]
    pub idfa: Option<String>,

    pub timestamp: Option<String>,
}

#[derive(Debug, PartialEq, Eq, EnumString, Serialize, Deserialize, Display, Clone, Copy, Default)]
pub enum EventType {
    #[default]
    #[strum(ascii_case_insensitive, to_string = "session")]
    #[serde(rename = "session")]
    Session,

    #[strum(
        ascii_case_insensitive,
        serialize = "ticket_created",
        to_string = "ticket_created"
    )]
    #[serde(rename = "ticket_created")]
    TicketCreated,
}

/// Document posted to the customer-sync endpoint
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CustomerSyncPayload {
    pub customers: Vec<Customer>,
}

/// One synchronized customer. `IDFA` is always serialized, as JSON null when
/// unset.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Customer {
    pub id: String,

    #[serde(rename = "IDFA")]
    pub idfa: Option<String>,

    pub first_name: String,

    pub last_name: String,

    pub email: String,

    pub properties: CustomerProperties,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CustomerProperties {
    #[serde(rename = "Salutation")]
    pub salutation: String,

    #[serde(rename = "Title")]
    pub title: String,
}

/// Counts returned by the sync endpoint on a 200 response
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SyncReport {
    pub created_count: u64,
    pub updated_count: u64,
    pub error_count: u64,
}

/// Result of one handler invocation
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// The payload was pushed and the endpoint reported no errors
    Completed { message: String, report: SyncReport },

    /// The event was dropped without any HTTP traffic
    Skipped { reason: String },
}
