use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voyant_api::{dashboard_for, nav_links, Storefront};
use voyant_core::Credentials;
use voyant_shared::format_currency;
use voyant_store::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voyant_api=debug,voyant_order=debug,voyant_store=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Using backend at {}", config.api.base_url);

    let storefront = Storefront::new(config).context("Failed to build storefront client")?;
    storefront.auth.bootstrap().await;

    // VOYANT_USERNAME / VOYANT_PASSWORD sign in for this run when no stored session survived.
    if !storefront.session.snapshot().is_authenticated() {
        if let (Ok(username), Ok(password)) =
            (std::env::var("VOYANT_USERNAME"), std::env::var("VOYANT_PASSWORD"))
        {
            let outcome = storefront.auth.login(&Credentials::new(username, password)).await;
            if let Some(error) = outcome.error {
                tracing::warn!("Login failed: {}", error);
            }
        }
    }

    let session = storefront.session.snapshot();
    match &session.user {
        Some(user) => println!(
            "Signed in as {} (dashboard: {})",
            user.display_name(),
            dashboard_for(session.flags())
        ),
        None => println!("Browsing anonymously"),
    }

    let links: Vec<String> = nav_links(session.flags(), session.is_authenticated())
        .into_iter()
        .map(|l| l.label.to_string())
        .collect();
    println!("Menu: {}", links.join(" | "));

    let destinations = storefront
        .catalog
        .featured_destinations()
        .await
        .context("Failed to load featured destinations")?;
    println!("Featured destinations:");
    for destination in destinations {
        println!("  - {}", destination.name);
    }

    if session.is_organizer() || session.is_admin() {
        match storefront.organizer_earnings().await {
            Ok(earnings) => println!(
                "Commission earned: {} on {} confirmed bookings ({} sales)",
                earnings.formatted_commission(),
                earnings.lines.len(),
                format_currency(earnings.total_sales, &earnings.currency)
            ),
            Err(e) => tracing::warn!("Could not load earnings: {}", e),
        }
    }

    Ok(())
}
