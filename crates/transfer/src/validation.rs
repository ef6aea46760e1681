use std::path::{Component, Path};

use crate::TransferError;

/// Validates a destination name received from the control channel.
///
/// Rejects empty names, names longer than `max_len` bytes and names with an
/// embedded NUL. Oversized names are never truncated.
pub fn validate_destination_name(name: &str, max_len: usize) -> Result<(), TransferError> {
    if name.is_empty() {
        return Err(TransferError::InvalidName("empty name".into()));
    }

    if name.len() > max_len {
        return Err(TransferError::InvalidName(format!(
            "name is {} bytes, limit is {max_len}",
            name.len()
        )));
    }

    if name.contains('\0') {
        return Err(TransferError::InvalidName("name contains NUL".into()));
    }

    Ok(())
}

/// Validates that a name used under a root directory does not escape it.
///
/// Rejects:
/// - Absolute paths (Unix `/` or Windows `C:\`)
/// - Parent directory traversal (`..`)
/// - Windows prefix components (`C:`, `\\server`)
/// - Paths without a file component (`.`)
pub fn validate_relative_path(name: &str) -> Result<(), TransferError> {
    let path = Path::new(name);

    if path.is_absolute() {
        return Err(TransferError::InvalidPath(format!(
            "absolute path not allowed: {name}"
        )));
    }

    let mut has_file = false;
    for component in path.components() {
        match component {
            Component::ParentDir => {
                return Err(TransferError::InvalidPath(format!(
                    "parent directory traversal not allowed: {name}"
                )));
            }
            Component::Prefix(_) | Component::RootDir => {
                return Err(TransferError::InvalidPath(format!(
                    "absolute path not allowed: {name}"
                )));
            }
            Component::Normal(_) => has_file = true,
            Component::CurDir => {}
        }
    }

    if !has_file {
        return Err(TransferError::InvalidPath(format!("no file name in: {name}")));
    }

    Ok(())
}
