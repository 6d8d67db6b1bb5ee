//! Backend for the game-server hosting site: settings, WHMCS credentials,
//! and the headless page commands built on `gh-whmcs`.

pub mod catalog;
pub mod commands;
pub mod credentials;
pub mod error;
pub mod logging;
pub mod settings;
pub mod site;

pub use error::SiteError;
pub use settings::SiteSettings;
pub use site::{PageState, Site};
