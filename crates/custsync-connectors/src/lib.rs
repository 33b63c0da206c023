// crates/custsync-connectors/src/lib.rs
pub mod contact;
pub mod handler;
pub mod usercare;
pub mod zoho;

pub use handler::{SyncHandler, SUCCESS_MESSAGE};
