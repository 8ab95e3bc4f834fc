//! Betting events as served by `GET /api/events`.
//!
//! The `betting_system_data` payload is opaque at this layer: its shape is
//! keyed by `betting_system_type` and only the typed views below read it.
//! The raw value is never mutated.

use serde::Deserialize;
use serde_json::Value;

/// A betting event record from the events feed.
#[derive(Debug, Clone, Deserialize)]
pub struct SportEvent {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub betting_system_type: String,
    #[serde(default)]
    pub betting_system_data: Value,
}

impl SportEvent {
    /// Resolves the event's betting-system tag.
    pub fn betting_system(&self) -> BettingSystem {
        BettingSystem::from_tag(&self.betting_system_type)
    }
}

/// Betting-system discriminant carried by every event.
///
/// Tags the backend invents later are preserved in `Other` so the feed
/// keeps rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BettingSystem {
    PariMutuel,
    FixedOdds,
    Spread,
    Other(String),
}

impl BettingSystem {
    /// Resolves a wire tag. Total: unknown tags become `Other`.
    pub fn from_tag(tag: &str) -> BettingSystem {
        match tag {
            "pari_mutuel" => BettingSystem::PariMutuel,
            "fixed_odds" => BettingSystem::FixedOdds,
            "spread" => BettingSystem::Spread,
            other => BettingSystem::Other(other.to_string()),
        }
    }

    /// Returns the wire tag.
    pub fn tag(&self) -> &str {
        match self {
            BettingSystem::PariMutuel => "pari_mutuel",
            BettingSystem::FixedOdds => "fixed_odds",
            BettingSystem::Spread => "spread",
            BettingSystem::Other(tag) => tag,
        }
    }
}

/// Typed view of a pari-mutuel payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PariMutuelData {
    #[serde(default)]
    pub total_pool: f64,
    #[serde(default)]
    pub betting_pools: Vec<BettingPool>,
}

/// One outcome pool inside a pari-mutuel event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BettingPool {
    #[serde(default)]
    pub outcome_description: String,
    #[serde(default)]
    pub pool_amount: f64,
}

/// Typed view of a fixed-odds payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FixedOddsData {
    #[serde(default)]
    pub odds: Option<f64>,
}

/// Typed view of a point-spread payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpreadData {
    #[serde(default)]
    pub spread: Option<f64>,
    #[serde(default)]
    pub over_odds: Option<f64>,
}

/// Leniently parses a typed view out of an opaque payload.
///
/// Any payload that does not fit the expected shape yields the view's
/// default instead of an error; renderers must never fail on feed data.
pub fn parse_system_data<T>(value: &Value) -> T
where
    T: serde::de::DeserializeOwned + Default,
{
    serde_json::from_value(value.clone()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_betting_system_tags() {
        assert_eq!(BettingSystem::from_tag("pari_mutuel"), BettingSystem::PariMutuel);
        assert_eq!(BettingSystem::from_tag("fixed_odds"), BettingSystem::FixedOdds);
        assert_eq!(BettingSystem::from_tag("spread"), BettingSystem::Spread);
        assert_eq!(
            BettingSystem::from_tag("parlay"),
            BettingSystem::Other("parlay".to_string())
        );
        assert_eq!(BettingSystem::from_tag("parlay").tag(), "parlay");
    }

    #[test]
    fn test_event_parsing_with_payload() {
        let json = r#"{
            "id": 7,
            "title": "Will the mascot steal first base?",
            "category": "banana-antics",
            "betting_system_type": "pari_mutuel",
            "betting_system_data": {
                "total_pool": 40.0,
                "betting_pools": [
                    {"outcome_description": "Yes", "pool_amount": 10.0},
                    {"outcome_description": "No", "pool_amount": 30.0}
                ]
            }
        }"#;

        let event: SportEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.betting_system(), BettingSystem::PariMutuel);

        let data: PariMutuelData = parse_system_data(&event.betting_system_data);
        assert_eq!(data.total_pool, 40.0);
        assert_eq!(data.betting_pools.len(), 2);
        assert_eq!(data.betting_pools[1].outcome_description, "No");
    }

    #[test]
    fn test_event_parsing_without_payload() {
        let json = r#"{"id": 1, "title": "Bare event"}"#;
        let event: SportEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.betting_system_data, Value::Null);
        assert_eq!(event.betting_system(), BettingSystem::Other(String::new()));
    }

    #[test]
    fn test_parse_system_data_is_total() {
        let odds: FixedOddsData = parse_system_data(&Value::Null);
        assert!(odds.odds.is_none());

        let garbage = serde_json::json!("not an object");
        let spread: SpreadData = parse_system_data(&garbage);
        assert!(spread.spread.is_none());
        assert!(spread.over_odds.is_none());
    }
}
