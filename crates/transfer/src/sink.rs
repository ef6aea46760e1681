//! Storage sinks that received file data is appended to.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;

use tracing::debug;

use crate::{TransferConfig, TransferError, validate_relative_path};

/// An open, append-only destination for file data.
pub trait StorageSink {
    /// Appends `data`, returning how many bytes were written. A count below
    /// `data.len()` is a short write.
    fn write(&mut self, data: &[u8]) -> io::Result<usize>;

    /// Releases the handle, reporting any error from committing the data.
    fn close(self) -> io::Result<()>
    where
        Self: Sized;
}

/// Opens sinks by destination name.
pub trait SinkProvider {
    type Sink: StorageSink;

    /// Opens `name` for appending, creating it if missing.
    fn open(&mut self, name: &str) -> Result<Self::Sink, TransferError>;
}

/// A file on the local filesystem opened in append mode.
#[derive(Debug)]
pub struct FileSink {
    file: File,
}

impl StorageSink for FileSink {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.file.write(data)
    }

    fn close(self) -> io::Result<()> {
        self.file.sync_all()
    }
}

/// Opens [`FileSink`]s, optionally confined to a root directory.
#[derive(Debug, Clone)]
pub struct FileSinkProvider {
    root: Option<PathBuf>,
    mode: u32,
}

impl FileSinkProvider {
    /// Creates a provider that opens names exactly as given, with
    /// owner/group read-write permissions.
    pub fn new() -> Self {
        Self {
            root: None,
            mode: 0o660,
        }
    }

    /// Creates a provider that resolves names under `root`.
    ///
    /// Names must then be relative and may not traverse upwards; missing
    /// parent directories are created on open.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            ..Self::new()
        }
    }

    pub fn from_config(config: &TransferConfig) -> Self {
        Self {
            root: config.root_dir.clone(),
            mode: config.file_mode,
        }
    }

    /// Resolves the on-disk path for `name`.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, TransferError> {
        match &self.root {
            Some(root) => {
                validate_relative_path(name)?;
                Ok(root.join(name))
            }
            None => Ok(PathBuf::from(name)),
        }
    }
}

impl Default for FileSinkProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SinkProvider for FileSinkProvider {
    type Sink = FileSink;

    fn open(&mut self, name: &str) -> Result<FileSink, TransferError> {
        let path = self.resolve(name)?;
        let open_failed = |source| TransferError::SinkOpenFailed {
            name: name.to_string(),
            source,
        };

        if self.root.is_some()
            && let Some(parent) = path.parent()
        {
            std::fs::create_dir_all(parent).map_err(open_failed)?;
        }

        let mut options = OpenOptions::new();
        options.create(true).append(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(self.mode);
        }

        let file = options.open(&path).map_err(open_failed)?;
        debug!(path = %path.display(), "output file opened");

        Ok(FileSink { file })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn open_creates_and_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.bin");
        std::fs::write(&path, b"old").unwrap();

        let mut provider = FileSinkProvider::new();
        let mut sink = provider.open(path.to_str().unwrap()).unwrap();
        assert_eq!(sink.write(b"new").unwrap(), 3);
        sink.close().unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"oldnew");
    }

    #[test]
    fn root_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let mut provider = FileSinkProvider::with_root(dir.path());

        let mut sink = provider.open("logs/device/archive.tar").unwrap();
        sink.write(b"tar").unwrap();
        sink.close().unwrap();

        let content = std::fs::read(dir.path().join("logs/device/archive.tar")).unwrap();
        assert_eq!(content, b"tar");
    }

    #[test]
    fn root_rejects_traversal() {
        let dir = TempDir::new().unwrap();
        let mut provider = FileSinkProvider::with_root(dir.path());
        let result = provider.open("../escape.bin");
        assert!(matches!(result, Err(TransferError::InvalidPath(_))));
    }

    #[test]
    fn open_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("no/such/dir/out.bin");
        let mut provider = FileSinkProvider::new();
        let result = provider.open(missing.to_str().unwrap());
        assert!(matches!(result, Err(TransferError::SinkOpenFailed { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn created_file_uses_configured_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let config = TransferConfig {
            root_dir: Some(dir.path().to_path_buf()),
            file_mode: 0o600,
            ..TransferConfig::default()
        };
        let mut provider = FileSinkProvider::from_config(&config);
        provider.open("secret.cfg").unwrap().close().unwrap();

        let meta = std::fs::metadata(dir.path().join("secret.cfg")).unwrap();
        assert_eq!(meta.permissions().mode() & 0o777, 0o600);
    }
}
