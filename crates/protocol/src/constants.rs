use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// Maximum length in bytes of a destination file name.
///
/// Names are owned strings with no terminator, so all 128 bytes are usable;
/// a 128-byte C buffer would only hold 127.
pub const FILE_NAME_MAX_LEN: usize = 128;

/// Maximum size of a single staged chunk (100 KiB).
pub const FILE_DATA_MAX_LEN: usize = 100 * 1024;

/// File transfer event reported by the resource protocol.
///
/// Discriminants are the numeric codes used on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum TransferEvent {
    /// Informational, carries no state change.
    Info = 0,
    /// Peer is ready to start sending.
    Ready = 1,
    /// Transfer pending.
    Pending = 2,
    Suspend = 3,
    Resume = 4,
    Complete = 5,
    Abort = 6,
}

impl TransferEvent {
    /// Returns the wire code for this event.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Whether the event ends the current transfer.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Abort)
    }
}

impl TryFrom<u8> for TransferEvent {
    type Error = ProtocolError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Info),
            1 => Ok(Self::Ready),
            2 => Ok(Self::Pending),
            3 => Ok(Self::Suspend),
            4 => Ok(Self::Resume),
            5 => Ok(Self::Complete),
            6 => Ok(Self::Abort),
            other => Err(ProtocolError::UnknownEvent(other)),
        }
    }
}

impl fmt::Display for TransferEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Info => "INFO",
            Self::Ready => "READY",
            Self::Pending => "PENDING",
            Self::Suspend => "SUSPEND",
            Self::Resume => "RESUME",
            Self::Complete => "COMPLETE",
            Self::Abort => "ABORT",
        };
        f.write_str(name)
    }
}
