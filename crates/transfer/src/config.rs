use std::path::PathBuf;

use orpfile_protocol::constants::{FILE_DATA_MAX_LEN, FILE_NAME_MAX_LEN};
use serde::{Deserialize, Serialize};

/// Limits and storage settings for inbound transfers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferConfig {
    /// Longest accepted destination name, in bytes.
    #[serde(default = "default_max_name_len")]
    pub max_name_len: usize,

    /// Largest chunk that can be staged in manual mode.
    #[serde(default = "default_chunk_capacity")]
    pub chunk_capacity: usize,

    /// Directory that destination names are resolved under. When unset,
    /// names are used as given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_dir: Option<PathBuf>,

    /// Permission bits for newly created files (Unix only).
    #[serde(default = "default_file_mode")]
    pub file_mode: u32,
}

fn default_max_name_len() -> usize {
    FILE_NAME_MAX_LEN
}

fn default_chunk_capacity() -> usize {
    FILE_DATA_MAX_LEN
}

fn default_file_mode() -> u32 {
    0o660
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            max_name_len: default_max_name_len(),
            chunk_capacity: default_chunk_capacity(),
            root_dir: None,
            file_mode: default_file_mode(),
        }
    }
}
