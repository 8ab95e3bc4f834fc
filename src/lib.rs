//! zbet client - banana-betting session and feed infrastructure
//!
//! This crate provides the client-side infrastructure for the zbet
//! banana-betting service: session restore/login/logout against the auth
//! backend, the betting-events feed, and the display adapter that turns
//! raw betting-system payloads into card fields.
//!
//! # Architecture
//!
//! - **Session store**: one explicit state machine owns the current user
//!   and the persisted bearer token; no global singleton
//! - **Normalized feed**: raw API payloads are parsed into typed views
//!   before any rendering logic touches them
//! - **Total rendering**: the display adapter never fails on feed data;
//!   missing fields fall back to documented defaults
//! - **Guarded concurrency**: a cloneable session handle admits one
//!   operation at a time and fails fast on overlap
//!
//! # Usage
//!
//! ```no_run
//! use zbet_client::connectors::{TokenStore, ZbetApiClient};
//! use zbet_client::display::FeaturedCard;
//! use zbet_client::session::{SessionHandle, SessionStore};
//!
//! #[tokio::main]
//! async fn main() {
//!     let api = ZbetApiClient::new();
//!     let tokens = TokenStore::new(".zbet/session-token.json");
//!     let session = SessionHandle::new(SessionStore::new(api.clone(), tokens));
//!
//!     // Restore a persisted session, if any.
//!     session.initialize().await.unwrap();
//!
//!     // Render featured cards from the feed.
//!     for event in api.events().await.unwrap().iter().take(3) {
//!         let card = FeaturedCard::from_event(event);
//!         println!("{} {} - {}", card.emoji, card.title, card.display.primary_value);
//!     }
//! }
//! ```

pub mod categories;
pub mod connectors;
pub mod display;
pub mod events;
pub mod session;
pub mod utils;

// Re-export commonly used types
pub use categories::Category;
pub use connectors::{TokenStore, ZbetApiClient};
pub use display::{display_fields, DisplayFields, FeaturedCard};
pub use events::{BettingSystem, SportEvent, UserBet};
pub use session::{SessionHandle, SessionState, SessionStore, User};
