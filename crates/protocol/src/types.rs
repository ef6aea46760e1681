use std::fmt;

use serde::{Deserialize, Serialize};

/// How received chunks reach storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    /// Every chunk is written as soon as it arrives.
    Auto,
    /// Chunks are staged until the peer's data is acknowledged.
    Manual,
}

impl DeliveryMode {
    pub fn from_auto(auto: bool) -> Self {
        if auto { Self::Auto } else { Self::Manual }
    }

    pub fn is_auto(self) -> bool {
        self == Self::Auto
    }
}

/// Parameters of an inbound transfer, taken from the `file control start`
/// or `file control auto` command that precedes `READY`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub name: String,
    /// Declared file size. Zero or negative means unknown.
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub auto: bool,
}

impl TransferRequest {
    pub fn new(name: impl Into<String>, size: i64, auto: bool) -> Self {
        Self {
            name: name.into(),
            size,
            auto,
        }
    }

    /// Declared size, or `None` when the peer did not give a positive one.
    pub fn expected_bytes(&self) -> Option<u64> {
        declared_size(self.size)
    }
}

/// Interprets a declared file size; zero or negative means unknown.
pub fn declared_size(size: i64) -> Option<u64> {
    u64::try_from(size).ok().filter(|&n| n > 0)
}

/// Receiver-side state of the transfer state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferState {
    Idle,
    Receiving,
    Suspended,
}

impl fmt::Display for TransferState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Receiving => "receiving",
            Self::Suspended => "suspended",
        };
        f.write_str(name)
    }
}

/// Progress snapshot reported upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferProgress {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub state: TransferState,
    pub mode: DeliveryMode,
    pub received_bytes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_bytes: Option<u64>,
    /// A staged chunk is waiting for acknowledgement.
    #[serde(default, skip_serializing_if = "is_false")]
    pub pending: bool,
}

impl TransferProgress {
    /// Returns progress as a percentage (0-100), or 0 when the size is unknown.
    pub fn percentage(&self) -> f64 {
        match self.expected_bytes {
            Some(total) if total > 0 => {
                (self.received_bytes as f64 / total as f64 * 100.0).min(100.0)
            }
            _ => 0.0,
        }
    }
}

fn is_false(v: &bool) -> bool {
    !v
}
