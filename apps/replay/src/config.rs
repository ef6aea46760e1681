//! Replay tool configuration.
//!
//! Stored as TOML:
//!
//! ```toml
//! log_filter = "debug"
//!
//! [transfer]
//! root_dir = "/var/lib/orp/files"
//! chunk_capacity = 102400
//! ```

use std::path::Path;

use anyhow::Context;
use orpfile_transfer::TransferConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// `tracing` filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    #[serde(default)]
    pub transfer: TransferConfig,
}

fn default_log_filter() -> String {
    "info".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            transfer: TransferConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from `path`. Defaults are used when no path is
    /// given or the file does not exist.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Config::default());
        };

        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("failed to parse config {}", path.display()))?;
            Ok(config)
        } else {
            tracing::info!(path = %path.display(), "config file not found, using defaults");
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn default_config() {
        let config = Config::load(None).unwrap();
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.transfer, TransferConfig::default());
    }

    #[test]
    fn partial_toml() {
        let toml_str = r#"
            [transfer]
            root_dir = "/data/incoming"
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.log_filter, "info");
        assert_eq!(
            config.transfer.root_dir,
            Some(PathBuf::from("/data/incoming"))
        );
        assert_eq!(config.transfer.max_name_len, 128);
    }

    #[test]
    fn load_from_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("replay.toml");
        std::fs::write(
            &path,
            "log_filter = \"debug\"\n[transfer]\nchunk_capacity = 16\nfile_mode = 384\n",
        )
        .unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.transfer.chunk_capacity, 16);
        assert_eq!(config.transfer.file_mode, 0o600);
    }

    #[test]
    fn missing_file_uses_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::load(Some(tmp.path().join("absent.toml").as_path())).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("replay.toml");
        std::fs::write(&path, "log_filter = [").unwrap();
        let err = Config::load(Some(path.as_path())).unwrap_err();
        assert!(err.to_string().contains("failed to parse config"));
    }
}
