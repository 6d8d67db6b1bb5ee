/// Client configuration for a single WHMCS installation.
///
/// A configuration is built once and never mutated. Several may coexist
/// (staging and production, say), each owned by its own `WhmcsClient`.

use reqwest::Url;
use thiserror::Error;

pub const DEFAULT_LOCALE: &str = "english";
pub const DEFAULT_PAYMENT_METHOD: &str = "paypal";
pub const DEFAULT_CURRENCY_ID: u32 = 1;
pub const RESPONSE_TYPE: &str = "json";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {field} URL '{value}': {reason}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },
}

/// Authentication mode appended to every request.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    KeyPair { access_key: String, secret_key: String },
    Login { username: String, password: String },
    Anonymous,
}

impl Credentials {
    /// Pick the active mode. A complete key pair wins over a complete login;
    /// empty strings count as missing.
    pub fn resolve(
        access_key: Option<&str>,
        secret_key: Option<&str>,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Self {
        let present = |v: Option<&str>| v.filter(|s| !s.is_empty()).map(str::to_string);

        if let (Some(access_key), Some(secret_key)) = (present(access_key), present(secret_key)) {
            return Self::KeyPair {
                access_key,
                secret_key,
            };
        }
        if let (Some(username), Some(password)) = (present(username), present(password)) {
            return Self::Login { username, password };
        }
        Self::Anonymous
    }

    /// Wire fields for this mode, in the order they are appended.
    pub fn form_fields(&self) -> Vec<(&'static str, &str)> {
        match self {
            Self::KeyPair {
                access_key,
                secret_key,
            } => vec![
                ("accesskey", access_key.as_str()),
                ("secretkey", secret_key.as_str()),
            ],
            Self::Login { username, password } => {
                vec![("username", username.as_str()), ("password", password.as_str())]
            }
            Self::Anonymous => Vec::new(),
        }
    }

    pub fn mode(&self) -> &'static str {
        match self {
            Self::KeyPair { .. } => "key_pair",
            Self::Login { .. } => "login",
            Self::Anonymous => "anonymous",
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::KeyPair { access_key, .. } => f
                .debug_struct("KeyPair")
                .field("access_key", access_key)
                .field("secret_key", &"<redacted>")
                .finish(),
            Self::Login { username, .. } => f
                .debug_struct("Login")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::Anonymous => write!(f, "Anonymous"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfiguration {
    api_url: String,
    client_area: String,
    locale: String,
    credentials: Credentials,
    payment_method: String,
    currency_id: u32,
}

impl ClientConfiguration {
    pub fn builder(
        api_url: impl Into<String>,
        client_area: impl Into<String>,
    ) -> ClientConfigurationBuilder {
        ClientConfigurationBuilder {
            api_url: api_url.into(),
            client_area: client_area.into(),
            locale: None,
            access_key: None,
            secret_key: None,
            username: None,
            password: None,
            payment_method: None,
            currency_id: None,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn client_area(&self) -> &str {
        &self.client_area
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Always `json`; the client only understands JSON bodies.
    pub fn response_type(&self) -> &'static str {
        RESPONSE_TYPE
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn payment_method(&self) -> &str {
        &self.payment_method
    }

    pub fn currency_id(&self) -> u32 {
        self.currency_id
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfigurationBuilder {
    api_url: String,
    client_area: String,
    locale: Option<String>,
    access_key: Option<String>,
    secret_key: Option<String>,
    username: Option<String>,
    password: Option<String>,
    payment_method: Option<String>,
    currency_id: Option<u32>,
}

impl ClientConfigurationBuilder {
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn key_pair(mut self, access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    pub fn login(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn payment_method(mut self, method: impl Into<String>) -> Self {
        self.payment_method = Some(method.into());
        self
    }

    pub fn currency_id(mut self, id: u32) -> Self {
        self.currency_id = Some(id);
        self
    }

    pub fn build(self) -> Result<ClientConfiguration, ConfigError> {
        validate_url("api", &self.api_url)?;
        validate_url("client area", &self.client_area)?;

        let credentials = Credentials::resolve(
            self.access_key.as_deref(),
            self.secret_key.as_deref(),
            self.username.as_deref(),
            self.password.as_deref(),
        );

        Ok(ClientConfiguration {
            api_url: self.api_url,
            client_area: self.client_area,
            locale: self.locale.unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
            credentials,
            payment_method: self
                .payment_method
                .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string()),
            currency_id: self.currency_id.unwrap_or(DEFAULT_CURRENCY_ID),
        })
    }
}

fn validate_url(field: &'static str, value: &str) -> Result<(), ConfigError> {
    Url::parse(value).map(|_| ()).map_err(|e| ConfigError::InvalidUrl {
        field,
        value: value.to_string(),
        reason: e.to_string(),
    })
}
