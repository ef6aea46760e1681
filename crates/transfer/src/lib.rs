//! Receiving side of ORP inbound file transfers.
//!
//! A [`TransferSession`] turns data chunks into appends on a lazily opened
//! [`StorageSink`], either immediately (auto mode) or after the peer's data
//! is acknowledged (manual mode). [`TransferReceiver`] drives a session from
//! protocol events.

mod buffer;
mod config;
mod receiver;
mod session;
mod shared;
mod sink;
mod validation;

#[cfg(test)]
mod testing;

pub use buffer::ChunkBuffer;
pub use config::TransferConfig;
pub use receiver::TransferReceiver;
pub use session::TransferSession;
pub use shared::SharedReceiver;
pub use sink::{FileSink, FileSinkProvider, SinkProvider, StorageSink};
pub use validation::{validate_destination_name, validate_relative_path};

use orpfile_protocol::{TransferEvent, TransferState};

/// Errors produced by the transfer crate.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("invalid file name: {0}")]
    InvalidName(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("cannot open output file {name}: {source}")]
    SinkOpenFailed {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("write to {name} failed: {source}")]
    SinkWriteFailed {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("close failed: {0}")]
    SinkCloseFailed(#[source] std::io::Error),

    #[error("previous output file is still open")]
    SinkStillOpen,

    #[error("chunk of {len} bytes exceeds buffer capacity of {capacity} bytes")]
    ChunkTooLarge { len: usize, capacity: usize },

    #[error("unexpected {event} event while {state}")]
    UnexpectedEvent {
        event: TransferEvent,
        state: TransferState,
    },

    #[error("cannot {action} while {state}")]
    InvalidState {
        action: &'static str,
        state: TransferState,
    },
}
