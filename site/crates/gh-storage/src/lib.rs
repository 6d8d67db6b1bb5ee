//! Keyring-backed key/value store for WHMCS credentials and visitor
//! preferences, with an in-memory fallback when no keyring is available.

use keyring::Entry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;

const KEYRING_SERVICE: &str = "gamehost-site";
const PREFERENCES_KEY: &str = "preferences";
const DEFAULT_CURRENCY: &str = "USD";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage error: {0}")]
    Error(String),
    #[error("Not found")]
    NotFound,
    #[error("Keyring error: {0}")]
    KeyringError(String),
}

/// WHMCS credential slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretKind {
    AccessKey,
    SecretKey,
    Username,
    Password,
}

impl SecretKind {
    pub const ALL: [SecretKind; 4] = [
        Self::AccessKey,
        Self::SecretKey,
        Self::Username,
        Self::Password,
    ];

    pub fn storage_key(&self) -> &'static str {
        match self {
            Self::AccessKey => "whmcs:accesskey",
            Self::SecretKey => "whmcs:secretkey",
            Self::Username => "whmcs:username",
            Self::Password => "whmcs:password",
        }
    }
}

/// Visitor preferences. Field names match the keys the site pages read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(rename = "darkMode", default)]
    pub dark_mode: bool,
    #[serde(rename = "selectedCurrency", default = "default_currency")]
    pub selected_currency: String,
    #[serde(rename = "whmcs_logged_in", default)]
    pub logged_in: bool,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            dark_mode: false,
            selected_currency: default_currency(),
            logged_in: false,
        }
    }
}

pub struct Storage {
    // In-memory fallback when keyring is unavailable
    memory_store: Mutex<HashMap<String, String>>,
    use_keyring: bool,
}

impl Default for Storage {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Storage {
    pub fn new(use_keyring: bool) -> Self {
        Self {
            memory_store: Mutex::new(HashMap::new()),
            use_keyring,
        }
    }

    fn get_entry(&self, key: &str) -> Result<Entry, StorageError> {
        Entry::new(KEYRING_SERVICE, key).map_err(|e| StorageError::KeyringError(e.to_string()))
    }

    pub async fn store_secret(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.use_keyring {
            match self
                .get_entry(key)
                .and_then(|entry| {
                    entry
                        .set_password(value)
                        .map_err(|e| StorageError::KeyringError(e.to_string()))
                }) {
                Ok(()) => return Ok(()),
                Err(e) => tracing::warn!(key, error = %e, "keyring write failed, keeping value in memory"),
            }
        }

        let mut store = self
            .memory_store
            .lock()
            .map_err(|e| StorageError::Error(e.to_string()))?;
        store.insert(key.to_string(), value.to_string());
        Ok(())
    }

    pub async fn get_secret(&self, key: &str) -> Result<String, StorageError> {
        if self.use_keyring {
            if let Ok(password) = self.get_entry(key).and_then(|entry| {
                entry
                    .get_password()
                    .map_err(|e| StorageError::KeyringError(e.to_string()))
            }) {
                return Ok(password);
            }
        }

        let store = self
            .memory_store
            .lock()
            .map_err(|e| StorageError::Error(e.to_string()))?;
        store.get(key).cloned().ok_or(StorageError::NotFound)
    }

    pub async fn delete_secret(&self, key: &str) -> Result<(), StorageError> {
        if self.use_keyring {
            if let Ok(entry) = self.get_entry(key) {
                let _ = entry.delete_password();
            }
        }

        let mut store = self
            .memory_store
            .lock()
            .map_err(|e| StorageError::Error(e.to_string()))?;
        store.remove(key);
        Ok(())
    }

    // WHMCS credentials
    pub async fn store_whmcs_secret(&self, kind: SecretKind, value: &str) -> Result<(), StorageError> {
        self.store_secret(kind.storage_key(), value).await
    }

    /// `None` when the slot was never written.
    pub async fn get_whmcs_secret(&self, kind: SecretKind) -> Result<Option<String>, StorageError> {
        match self.get_secret(kind.storage_key()).await {
            Ok(value) => Ok(Some(value)),
            Err(StorageError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn clear_whmcs_secrets(&self) -> Result<(), StorageError> {
        for kind in SecretKind::ALL {
            self.delete_secret(kind.storage_key()).await?;
        }
        Ok(())
    }

    // Preferences
    pub async fn get_preferences(&self) -> Result<Preferences, StorageError> {
        match self.get_secret(PREFERENCES_KEY).await {
            Ok(json) => serde_json::from_str(&json).map_err(|e| StorageError::Error(e.to_string())),
            Err(StorageError::NotFound) => Ok(Preferences::default()),
            Err(e) => Err(e),
        }
    }

    pub async fn set_preferences(&self, prefs: &Preferences) -> Result<(), StorageError> {
        let json = serde_json::to_string(prefs).map_err(|e| StorageError::Error(e.to_string()))?;
        self.store_secret(PREFERENCES_KEY, &json).await
    }

    pub async fn set_dark_mode(&self, enabled: bool) -> Result<Preferences, StorageError> {
        self.update_preferences(|p| p.dark_mode = enabled).await
    }

    pub async fn set_selected_currency(&self, currency: &str) -> Result<Preferences, StorageError> {
        let currency = currency.trim();
        if currency.is_empty() {
            return Err(StorageError::Error("currency code must not be empty".to_string()));
        }
        self.update_preferences(|p| p.selected_currency = currency.to_string())
            .await
    }

    pub async fn set_logged_in(&self, logged_in: bool) -> Result<Preferences, StorageError> {
        self.update_preferences(|p| p.logged_in = logged_in).await
    }

    async fn update_preferences<F>(&self, apply: F) -> Result<Preferences, StorageError>
    where
        F: FnOnce(&mut Preferences),
    {
        let mut prefs = self.get_preferences().await?;
        apply(&mut prefs);
        self.set_preferences(&prefs).await?;
        Ok(prefs)
    }
}
