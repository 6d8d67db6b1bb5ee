/// WHMCS credential sourcing.
///
/// Each slot is read from its environment variable first and from the secret
/// store second. Nothing is ever compiled in.

use gh_storage::{SecretKind, Storage};
use gh_whmcs::ClientConfiguration;

use crate::error::SiteError;
use crate::settings::SiteSettings;

#[derive(Default, Clone, PartialEq, Eq)]
pub struct Secrets {
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shown = |v: &Option<String>| if v.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("Secrets")
            .field("access_key", &shown(&self.access_key))
            .field("secret_key", &shown(&self.secret_key))
            .field("username", &shown(&self.username))
            .field("password", &shown(&self.password))
            .finish()
    }
}

pub fn env_var(kind: SecretKind) -> &'static str {
    match kind {
        SecretKind::AccessKey => "WHMCS_ACCESS_KEY",
        SecretKind::SecretKey => "WHMCS_SECRET_KEY",
        SecretKind::Username => "WHMCS_USERNAME",
        SecretKind::Password => "WHMCS_PASSWORD",
    }
}

/// Gather secrets using `lookup` for the environment (normally
/// `std::env::var(..).ok()`), falling back to `storage`.
pub async fn load_secrets<F>(storage: &Storage, lookup: F) -> Result<Secrets, SiteError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut secrets = Secrets::default();
    for kind in SecretKind::ALL {
        let value = match lookup(env_var(kind)).filter(|v| !v.is_empty()) {
            Some(v) => Some(v),
            None => storage.get_whmcs_secret(kind).await?,
        };
        let slot = match kind {
            SecretKind::AccessKey => &mut secrets.access_key,
            SecretKind::SecretKey => &mut secrets.secret_key,
            SecretKind::Username => &mut secrets.username,
            SecretKind::Password => &mut secrets.password,
        };
        *slot = value;
    }
    Ok(secrets)
}

pub fn client_configuration(
    settings: &SiteSettings,
    secrets: &Secrets,
) -> Result<ClientConfiguration, SiteError> {
    let mut builder = ClientConfiguration::builder(&settings.api_url, &settings.client_area)
        .locale(&settings.locale)
        .payment_method(&settings.payment_method)
        .currency_id(settings.currency_id);

    if let (Some(ak), Some(sk)) = (&secrets.access_key, &secrets.secret_key) {
        builder = builder.key_pair(ak, sk);
    }
    if let (Some(user), Some(pass)) = (&secrets.username, &secrets.password) {
        builder = builder.login(user, pass);
    }
    Ok(builder.build()?)
}
