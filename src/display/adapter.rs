//! Betting-system display adapter.
//!
//! Pure mapping from an event's betting-system tag plus its opaque payload
//! to the small fixed set of fields a card renders. Total and
//! deterministic: malformed or missing payload fields fall back to the
//! documented defaults, never to an error.

use serde_json::Value;

use crate::categories::Category;
use crate::events::{
    parse_system_data, BettingSystem, FixedOddsData, PariMutuelData, SportEvent, SpreadData,
};

/// Odds assumed for a fixed-odds event whose payload omits them.
pub const DEFAULT_FIXED_ODDS: f64 = 2.0;

/// Over-odds assumed for a spread event whose payload omits them.
pub const DEFAULT_OVER_ODDS: f64 = 1.9;

/// Reference stake used to quote a fixed-odds payout, in ZEC.
pub const FIXED_ODDS_STAKE_ZEC: f64 = 0.001;

/// Fields a homepage card renders for one betting event.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayFields {
    pub primary_label: &'static str,
    pub primary_value: String,
    pub secondary_label: Option<&'static str>,
    pub secondary_value: Option<String>,
    pub description: String,
    pub pool_count: usize,
    /// Share of the total pool held by the leading outcome, pari-mutuel only.
    pub top_percentage: Option<u32>,
}

/// Derives card fields for a betting-system tag and its opaque payload.
pub fn display_fields(system_type: &str, payload: &Value) -> DisplayFields {
    match BettingSystem::from_tag(system_type) {
        BettingSystem::PariMutuel => pari_mutuel_fields(payload),
        BettingSystem::FixedOdds => fixed_odds_fields(payload),
        BettingSystem::Spread => spread_fields(payload),
        BettingSystem::Other(tag) => unsupported_fields(&tag),
    }
}

fn pari_mutuel_fields(payload: &Value) -> DisplayFields {
    let data: PariMutuelData = parse_system_data(payload);

    // Leading outcome is the pool with the highest amount; ties keep the
    // first maximal pool encountered.
    let top = if !data.betting_pools.is_empty() && data.total_pool > 0.0 {
        let mut top = &data.betting_pools[0];
        for pool in &data.betting_pools[1..] {
            if pool.pool_amount > top.pool_amount {
                top = pool;
            }
        }
        Some(top)
    } else {
        None
    };

    DisplayFields {
        primary_label: "Total Pool",
        primary_value: format!("{:.4} ZEC", data.total_pool),
        secondary_label: None,
        secondary_value: None,
        description: top
            .map(|p| p.outcome_description.clone())
            .unwrap_or_else(|| "No bets yet".to_string()),
        pool_count: data.betting_pools.len(),
        top_percentage: top.map(|p| ((p.pool_amount / data.total_pool) * 100.0).round() as u32),
    }
}

fn fixed_odds_fields(payload: &Value) -> DisplayFields {
    let data: FixedOddsData = parse_system_data(payload);
    let odds = data.odds.unwrap_or(DEFAULT_FIXED_ODDS);

    DisplayFields {
        primary_label: "Odds",
        primary_value: format!("{:.1}x", odds),
        secondary_label: Some("Payout"),
        secondary_value: Some(format!("{:.4} ZEC", odds * FIXED_ODDS_STAKE_ZEC)),
        description: "Fixed odds betting".to_string(),
        pool_count: 1,
        top_percentage: None,
    }
}

fn spread_fields(payload: &Value) -> DisplayFields {
    let data: SpreadData = parse_system_data(payload);
    let spread = data.spread.unwrap_or(0.0);
    let over_odds = data.over_odds.unwrap_or(DEFAULT_OVER_ODDS);

    let primary_value = if spread > 0.0 {
        format!("+{}", spread)
    } else {
        format!("{}", spread)
    };

    DisplayFields {
        primary_label: "Spread",
        primary_value,
        secondary_label: Some("Over"),
        secondary_value: Some(format!("{:.1}x", over_odds)),
        description: "Point spread betting".to_string(),
        pool_count: 2,
        top_percentage: None,
    }
}

fn unsupported_fields(tag: &str) -> DisplayFields {
    let primary_value = if tag.is_empty() {
        "Unknown".to_string()
    } else {
        tag.to_string()
    };

    DisplayFields {
        primary_label: "Betting System",
        primary_value,
        secondary_label: Some("Status"),
        secondary_value: Some("Not Supported".to_string()),
        description: "Betting system not yet supported".to_string(),
        pool_count: 0,
        top_percentage: None,
    }
}

/// A fully-derived homepage card: adapter output plus category badge.
#[derive(Debug, Clone)]
pub struct FeaturedCard {
    pub id: i64,
    pub title: String,
    pub emoji: &'static str,
    pub category: String,
    pub display: DisplayFields,
}

impl FeaturedCard {
    /// Projects an event from the feed into its card.
    pub fn from_event(event: &SportEvent) -> FeaturedCard {
        let category = Category::from_slug(&event.category);

        FeaturedCard {
            id: event.id,
            title: event.title.clone(),
            emoji: category.emoji(),
            category: category.display_name().to_string(),
            display: display_fields(&event.betting_system_type, &event.betting_system_data),
        }
    }
}
