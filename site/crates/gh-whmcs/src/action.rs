/// Remote action identifiers and the flat parameter map sent with them.

use std::fmt;
use std::str::FromStr;

/// Actions this client knows how to call. The parameter schema of each one is
/// owned by WHMCS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteAction {
    GetProducts,
    CreateOrder,
    GetClientsDetails,
    AddClient,
    GetDomainPricing,
    CheckDomain,
    GetClientsServices,
}

impl RemoteAction {
    pub const ALL: [RemoteAction; 7] = [
        Self::GetProducts,
        Self::CreateOrder,
        Self::GetClientsDetails,
        Self::AddClient,
        Self::GetDomainPricing,
        Self::CheckDomain,
        Self::GetClientsServices,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetProducts => "GetProducts",
            Self::CreateOrder => "CreateOrder",
            Self::GetClientsDetails => "GetClientsDetails",
            Self::AddClient => "AddClient",
            Self::GetDomainPricing => "GetDomainPricing",
            Self::CheckDomain => "CheckDomain",
            Self::GetClientsServices => "GetClientsServices",
        }
    }
}

impl fmt::Display for RemoteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RemoteAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| format!("Unsupported WHMCS action: {}", s))
    }
}

/// Ordered string-to-string map. Setting a key that already exists replaces
/// the value in place, so later writers win without reordering the body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    pairs: Vec<(String, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.set(key, value);
        self
    }

    /// Merge `other` into `self`; keys in `other` win.
    pub fn extend(&mut self, other: Params) {
        for (k, v) in other.pairs {
            self.set(k, v);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `application/x-www-form-urlencoded` body.
    pub fn to_form_body(&self) -> String {
        // Serialising a slice of string pairs cannot fail.
        serde_urlencoded::to_string(&self.pairs).unwrap_or_default()
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.set(k, v);
        }
        params
    }
}
