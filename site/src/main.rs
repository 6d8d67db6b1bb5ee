use anyhow::Context;
use gamehost_site::{logging, Site, SiteSettings};
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // A missing .env is normal outside development.
    let _ = dotenvy::dotenv();
    logging::init();

    let settings = SiteSettings::load().context("loading site settings")?;
    let site = Site::open(settings).await.context("opening site")?;

    let state = site.page_load().await;
    info!(
        dark_mode = state.preferences.dark_mode,
        currency = %state.preferences.selected_currency,
        cards = state.price_cards.len(),
        "page state ready"
    );
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}
