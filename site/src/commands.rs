//! Headless versions of the page widgets. Each command talks to WHMCS or the
//! preference store and returns plain data for a frontend to render.

use gh_storage::{Preferences, Storage};
use gh_whmcs::{format_price_str, Navigator, Params, WhmcsClient, DEFAULT_CURRENCY_SYMBOL};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::catalog::product_id_for_plan;
use crate::error::SiteError;

/// One pricing card refreshed from WHMCS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceCard {
    /// Position of the card on the page; products map to cards by order.
    pub index: usize,
    pub name: Option<String>,
    pub monthly: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainCheck {
    pub domain: String,
    pub available: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum PlanRoute {
    Register { url: String },
    Order { product_id: u32, url: String },
    Unknown,
}

/// Landing spot for the pricing table's purchase buttons.
pub const CHECKOUT_PAGE: &str = "./client-area.html";

pub const CONTACT_ACKNOWLEDGEMENT: &str =
    "Thank you for your message! We will get back to you soon.";

/// A contact form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactMessage {
    fn validate(&self) -> Result<(), SiteError> {
        let blank = |field| SiteError::InvalidContact {
            field,
            reason: "is required",
        };
        if self.name.trim().is_empty() {
            return Err(blank("name"));
        }
        if self.email.trim().is_empty() {
            return Err(blank("email"));
        }
        if self.message.trim().is_empty() {
            return Err(blank("message"));
        }
        match self.email.trim().split_once('@') {
            Some((user, host)) if !user.is_empty() && !host.is_empty() => Ok(()),
            _ => Err(SiteError::InvalidContact {
                field: "email",
                reason: "is not an email address",
            }),
        }
    }
}

/// JavaScript-style truthiness for loosely typed WHMCS fields.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn monthly_price(value: &Value) -> Option<String> {
    if !is_truthy(value) {
        return None;
    }
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Cards from a `GetProducts` response. Accepts both a flat `products`
/// array and the `products.product` nesting WHMCS uses.
pub fn price_cards(response: &Value) -> Vec<PriceCard> {
    let products = response["products"]
        .as_array()
        .or_else(|| response["products"]["product"].as_array());

    let Some(products) = products else {
        return Vec::new();
    };

    products
        .iter()
        .enumerate()
        .filter_map(|(index, product)| {
            let monthly = monthly_price(&product["pricing"]["monthly"])?;
            let amount = format_price_str(&monthly, DEFAULT_CURRENCY_SYMBOL)
                .unwrap_or_else(|| format!("{}{}", DEFAULT_CURRENCY_SYMBOL, monthly));
            Some(PriceCard {
                index,
                name: product["name"].as_str().map(String::from),
                label: format!("{}/mo", amount),
                monthly,
            })
        })
        .collect()
}

/// Refresh pricing. An unreachable backend yields no cards, which leaves the
/// placeholders on the page as they were.
pub async fn load_pricing(client: &WhmcsClient) -> Vec<PriceCard> {
    match client.get_products().await {
        Some(response) => price_cards(&response),
        None => Vec::new(),
    }
}

pub async fn check_domain_availability(client: &WhmcsClient, domain: &str) -> DomainCheck {
    let available = client
        .check_domain(domain)
        .await
        .map(|result| is_truthy(&result["available"]))
        .unwrap_or(false);

    let message = if available {
        format!("{} is available!", domain)
    } else {
        format!("{} is not available.", domain)
    };

    DomainCheck {
        domain: domain.to_string(),
        available,
        message,
    }
}

/// Send the visitor towards checkout for `plan`. Visitors who are not signed
/// in go to the register page with the plan attached.
pub async fn handle_plan_purchase(
    client: &WhmcsClient,
    storage: &Storage,
    navigator: &dyn Navigator,
    register_page: &str,
    plan: &str,
) -> Result<PlanRoute, SiteError> {
    let prefs = storage.get_preferences().await?;

    if !prefs.logged_in {
        let query = Params::new().with("plan", plan).to_form_body();
        let url = format!("{}?{}", register_page, query);
        info!(plan, url = %url, "anonymous plan purchase, sending to register page");
        navigator.navigate(&url);
        return Ok(PlanRoute::Register { url });
    }

    match product_id_for_plan(plan) {
        Some(product_id) => {
            client.order_product(navigator, product_id);
            Ok(PlanRoute::Order {
                product_id,
                url: client.order_url(product_id),
            })
        }
        None => {
            warn!(plan, "unknown plan, ignoring purchase");
            Ok(PlanRoute::Unknown)
        }
    }
}

/// Send the visitor straight to the checkout page with `plan` attached,
/// without looking at the sign-in state.
pub fn purchase_plan(navigator: &dyn Navigator, checkout_page: &str, plan: &str) -> String {
    let query = Params::new().with("plan", plan).to_form_body();
    let url = format!("{}?{}", checkout_page, query);
    info!(plan, url = %url, "plan purchase");
    navigator.navigate(&url);
    url
}

/// Accept a contact form submission and return the acknowledgement to show.
/// Submissions are only logged; nothing is forwarded.
pub fn submit_contact(form: &ContactMessage) -> Result<&'static str, SiteError> {
    form.validate()?;
    info!(
        name = form.name.trim(),
        email = form.email.trim(),
        body = form.message.as_str(),
        "contact form submitted"
    );
    Ok(CONTACT_ACKNOWLEDGEMENT)
}

pub async fn restore_preferences(storage: &Storage) -> Result<Preferences, SiteError> {
    Ok(storage.get_preferences().await?)
}

/// Flip dark mode and return the new state.
pub async fn toggle_dark_mode(storage: &Storage) -> Result<bool, SiteError> {
    let current = storage.get_preferences().await?.dark_mode;
    let prefs = storage.set_dark_mode(!current).await?;
    Ok(prefs.dark_mode)
}

pub async fn switch_currency(storage: &Storage, currency: &str) -> Result<Preferences, SiteError> {
    let prefs = storage.set_selected_currency(currency).await?;
    info!(currency = %prefs.selected_currency, "currency switched");
    Ok(prefs)
}
