//! Wire types shared between the ORP file-transfer receiver and its callers.

pub mod constants;
pub mod messages;
pub mod types;

// Re-export primary types for convenience.
pub use constants::TransferEvent;
pub use messages::FileData;
pub use types::{DeliveryMode, TransferProgress, TransferRequest, TransferState, declared_size};

/// Errors produced when decoding protocol values.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("unknown file transfer event code: {0}")]
    UnknownEvent(u8),
}
