//! Per-process site context: settings, storage, and one WHMCS client, built
//! once at startup and passed to the commands explicitly.

use gh_storage::{Preferences, Storage};
use gh_whmcs::WhmcsClient;
use serde::Serialize;
use tracing::{info, warn};

use crate::commands::{self, PriceCard};
use crate::credentials::{self, Secrets};
use crate::error::SiteError;
use crate::settings::SiteSettings;

pub struct Site {
    pub settings: SiteSettings,
    pub storage: Storage,
    pub client: WhmcsClient,
}

/// What the landing page needs after load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageState {
    pub preferences: Preferences,
    pub price_cards: Vec<PriceCard>,
}

impl Site {
    /// Open storage per `settings.use_keyring` and pull credentials from the
    /// process environment or the store.
    pub async fn open(settings: SiteSettings) -> Result<Self, SiteError> {
        let storage = Storage::new(settings.use_keyring);
        let secrets = credentials::load_secrets(&storage, |key| std::env::var(key).ok()).await?;
        Self::from_parts(settings, storage, &secrets, reqwest::Client::new())
    }

    pub fn from_parts(
        settings: SiteSettings,
        storage: Storage,
        secrets: &Secrets,
        http: reqwest::Client,
    ) -> Result<Self, SiteError> {
        let config = credentials::client_configuration(&settings, secrets)?;
        info!(
            api_url = config.api_url(),
            auth = config.credentials().mode(),
            "WHMCS client configured"
        );
        Ok(Self {
            settings,
            storage,
            client: WhmcsClient::with_http_client(config, http),
        })
    }

    /// Restore preferences and refresh pricing. Neither failure stops the page
    /// from loading.
    pub async fn page_load(&self) -> PageState {
        let preferences = match commands::restore_preferences(&self.storage).await {
            Ok(prefs) => prefs,
            Err(e) => {
                warn!(error = %e, "could not restore preferences, using defaults");
                Preferences::default()
            }
        };
        let price_cards = commands::load_pricing(&self.client).await;
        PageState {
            preferences,
            price_cards,
        }
    }
}
