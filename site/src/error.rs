use std::path::PathBuf;
use thiserror::Error;

use gh_storage::StorageError;
use gh_whmcs::ConfigError;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Failed to read settings file {}: {source}", .path.display())]
    SettingsIo {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse settings file {}: {source}", .path.display())]
    SettingsParse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Contact form {field} {reason}")]
    InvalidContact {
        field: &'static str,
        reason: &'static str,
    },
    #[error("No config directory available; set GAMEHOST_CONFIG")]
    NoConfigDir,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
