//! Typed data from the betting-events feed.
//!
//! Raw feed payloads are normalized into the types here before any
//! rendering logic consumes them; `betting_system_data` stays opaque until
//! a typed view reads it.

mod bets;
mod sport_events;

pub use bets::{filter_and_sort, BetFilter, BetSort, BetStats, BetStatus, BetSummary, UserBet};
pub use sport_events::{
    parse_system_data,
    BettingPool,
    BettingSystem,
    FixedOddsData,
    PariMutuelData,
    SportEvent,
    SpreadData,
};
