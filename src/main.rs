//! zbet client - demo entry point
//!
//! Restores a persisted session (or logs in with env credentials), pulls
//! the betting-events feed, and renders the featured cards the homepage
//! shows. Feed failures degrade to an empty feed; they never crash.

use tracing::{error, info, warn};

use zbet_client::connectors::{TokenStore, ZbetApiClient};
use zbet_client::display::{random_banana_emoji, FeaturedCard};
use zbet_client::session::{LoginCredentials, SessionHandle, SessionStore};
use zbet_client::utils::init_telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: No .env file found or error loading it: {}", e);
    }

    init_telemetry();

    info!("╔════════════════════════════════════════════╗");
    info!("║   zbet client - banana betting             ║");
    info!("╚════════════════════════════════════════════╝");

    let api_url = std::env::var("ZBET_API_URL")
        .unwrap_or_else(|_| "http://localhost:8000".to_string());
    let token_file = std::env::var("ZBET_TOKEN_FILE")
        .unwrap_or_else(|_| ".zbet/session-token.json".to_string());

    let api = ZbetApiClient::with_base_url(api_url);
    let tokens = TokenStore::new(&token_file);
    let session = SessionHandle::new(SessionStore::new(api.clone(), tokens));

    info!("API: {}", api.base_url());
    info!("Token slot: {}", token_file);

    // Restore a persisted session, if any.
    session.initialize().await?;

    if !session.is_authenticated()? {
        match (std::env::var("ZBET_USERNAME"), std::env::var("ZBET_PASSWORD")) {
            (Ok(username), Ok(password)) => {
                let credentials = LoginCredentials { username, password };
                if let Err(e) = session.login(&credentials).await {
                    warn!("Login failed: {}", e);
                }
            }
            _ => {
                warn!("No stored session and no ZBET_USERNAME/ZBET_PASSWORD set");
                warn!("Continuing with the public events feed only");
            }
        }
    }

    if let Some(user) = session.current_user()? {
        info!("Welcome back, {}! {}", user.username, random_banana_emoji());
    }

    let events = match api.events().await {
        Ok(events) => events,
        Err(e) => {
            error!("Failed to fetch events feed: {}", e);
            Vec::new()
        }
    };

    if events.is_empty() {
        info!("No bets available - check back later!");
    } else {
        info!("Today's hottest bets:");
        for event in events.iter().take(3) {
            let card = FeaturedCard::from_event(event);
            info!("  {} [{}] {}", card.emoji, card.category, card.title);
            info!(
                "      {}: {}",
                card.display.primary_label, card.display.primary_value
            );
            if let (Some(label), Some(value)) = (
                card.display.secondary_label,
                card.display.secondary_value.as_deref(),
            ) {
                info!("      {}: {}", label, value);
            }
            info!("      {}", card.display.description);
        }
    }

    if session.is_authenticated()? {
        match session.refresh_balance().await {
            Ok(()) => {
                if let Some(user) = session.current_user()? {
                    info!("Balance: {} ZEC", user.balance.as_deref().unwrap_or("0"));
                }
            }
            Err(e) => warn!("Balance refresh failed: {}", e),
        }
    }

    Ok(())
}
