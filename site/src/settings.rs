use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::SiteError;

pub const CONFIG_ENV: &str = "GAMEHOST_CONFIG";

/// Site settings read from `site.toml`. Secrets never live here; see
/// [`crate::credentials`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSettings {
    /// WHMCS API endpoint, e.g. `https://billing.example.com/includes/api.php`.
    pub api_url: String,
    /// Client area base used for redirects.
    pub client_area: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_payment_method")]
    pub payment_method: String,
    #[serde(default = "default_currency_id")]
    pub currency_id: u32,
    /// Where anonymous visitors are sent when they pick a plan.
    #[serde(default = "default_register_page")]
    pub register_page: String,
    #[serde(default = "default_use_keyring")]
    pub use_keyring: bool,
}

fn default_locale() -> String {
    gh_whmcs::config::DEFAULT_LOCALE.to_string()
}

fn default_payment_method() -> String {
    gh_whmcs::config::DEFAULT_PAYMENT_METHOD.to_string()
}

fn default_currency_id() -> u32 {
    gh_whmcs::config::DEFAULT_CURRENCY_ID
}

fn default_register_page() -> String {
    "./register.html".to_string()
}

fn default_use_keyring() -> bool {
    true
}

impl SiteSettings {
    /// `$GAMEHOST_CONFIG` if set, else `<config dir>/gamehost-site/site.toml`.
    pub fn default_path() -> Result<PathBuf, SiteError> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        dirs::config_dir()
            .map(|dir| dir.join("gamehost-site").join("site.toml"))
            .ok_or(SiteError::NoConfigDir)
    }

    pub fn load() -> Result<Self, SiteError> {
        Self::from_path(&Self::default_path()?)
    }

    pub fn from_path(path: &Path) -> Result<Self, SiteError> {
        debug!("Loading site settings from: {:?}", path);
        let content = fs::read_to_string(path).map_err(|source| SiteError::SettingsIo {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| SiteError::SettingsParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn minimal_file_gets_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
api_url = "https://billing.example.com/includes/api.php"
client_area = "https://billing.example.com/clientarea.php"
"#
        )
        .unwrap();

        let settings = SiteSettings::from_path(file.path()).expect("parse settings");
        assert_eq!(settings.locale, "english");
        assert_eq!(settings.payment_method, "paypal");
        assert_eq!(settings.currency_id, 1);
        assert_eq!(settings.register_page, "./register.html");
        assert!(settings.use_keyring);
    }

    #[test]
    fn overrides_are_respected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
api_url = "https://staging.example.com/includes/api.php"
client_area = "https://staging.example.com/index.php?m=portal"
locale = "german"
payment_method = "stripe"
currency_id = 2
register_page = "/signup"
use_keyring = false
"#
        )
        .unwrap();

        let settings = SiteSettings::from_path(file.path()).expect("parse settings");
        assert_eq!(settings.locale, "german");
        assert_eq!(settings.payment_method, "stripe");
        assert_eq!(settings.currency_id, 2);
        assert_eq!(settings.register_page, "/signup");
        assert!(!settings.use_keyring);
    }

    #[test]
    fn missing_file_and_bad_toml_are_distinct_errors() {
        let missing = SiteSettings::from_path(Path::new("/definitely/not/here.toml"));
        assert!(matches!(missing, Err(SiteError::SettingsIo { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_url = ").unwrap();
        let broken = SiteSettings::from_path(file.path());
        assert!(matches!(broken, Err(SiteError::SettingsParse { .. })));
    }
}
