//! Client for the WHMCS remote action API.
//!
//! Build a [`ClientConfiguration`], hand it to [`WhmcsClient::new`], and call
//! the convenience methods. They return `None` when the backend cannot be
//! reached or answers badly, so callers can keep rendering with what they
//! already have. Use [`WhmcsClient::api_call`] directly when the error itself
//! matters.

pub mod action;
pub mod client;
pub mod config;
pub mod navigate;
pub mod price;
pub mod types;

pub use action::{Params, RemoteAction};
pub use client::{fail_soft, WhmcsClient};
pub use config::{ClientConfiguration, ClientConfigurationBuilder, ConfigError, Credentials};
pub use gh_error::ApiError;
pub use navigate::{Navigator, RecordingNavigator};
pub use price::{format_price, format_price_str, DEFAULT_CURRENCY_SYMBOL};
pub use types::{NewClient, OrderItem};
