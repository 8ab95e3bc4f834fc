//! Placed-bet records and the bet-history view helpers.
//!
//! Status is display-only on the client; transitions (pending to won, lost
//! or cancelled) happen server-side at settlement.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a placed wager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetStatus {
    Pending,
    Won,
    Lost,
    Cancelled,
}

impl BetStatus {
    /// Returns true once the wager has left the pending state.
    pub fn is_settled(&self) -> bool {
        !matches!(self, BetStatus::Pending)
    }

    pub fn label(&self) -> &'static str {
        match self {
            BetStatus::Pending => "pending",
            BetStatus::Won => "won",
            BetStatus::Lost => "lost",
            BetStatus::Cancelled => "cancelled",
        }
    }
}

/// Summary of the market a bet was placed on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetSummary {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub odds: f64,
}

/// A placed wager as shown in the bet history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserBet {
    pub id: String,
    pub bet: BetSummary,
    pub amount: f64,
    pub potential_payout: f64,
    pub status: BetStatus,
    pub placed_at: DateTime<Utc>,
    #[serde(default)]
    pub settled_at: Option<DateTime<Utc>>,
}

/// Filter for the history view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BetFilter {
    #[default]
    All,
    Status(BetStatus),
}

impl BetFilter {
    fn matches(&self, bet: &UserBet) -> bool {
        match self {
            BetFilter::All => true,
            BetFilter::Status(status) => bet.status == *status,
        }
    }
}

/// Sort order for the history view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BetSort {
    #[default]
    Newest,
    Oldest,
    Amount,
}

/// Produces the history view: filtered by status, then sorted.
///
/// `Amount` sorts largest wager first.
pub fn filter_and_sort(bets: &[UserBet], filter: BetFilter, sort: BetSort) -> Vec<UserBet> {
    let mut view: Vec<UserBet> = bets.iter().filter(|b| filter.matches(b)).cloned().collect();

    match sort {
        BetSort::Newest => view.sort_by(|a, b| b.placed_at.cmp(&a.placed_at)),
        BetSort::Oldest => view.sort_by(|a, b| a.placed_at.cmp(&b.placed_at)),
        BetSort::Amount => {
            view.sort_by(|a, b| b.amount.partial_cmp(&a.amount).unwrap_or(Ordering::Equal));
        }
    }

    view
}

/// Aggregates shown above the history list.
#[derive(Debug, Clone, PartialEq)]
pub struct BetStats {
    pub total_bets: usize,
    pub pending_bets: usize,
    pub won_bets: usize,
    /// Sum of potential payouts over won bets.
    pub total_winnings: f64,
    /// Sum of stake amounts over all bets.
    pub total_wagered: f64,
}

impl BetStats {
    pub fn compute(bets: &[UserBet]) -> BetStats {
        BetStats {
            total_bets: bets.len(),
            pending_bets: bets.iter().filter(|b| b.status == BetStatus::Pending).count(),
            won_bets: bets.iter().filter(|b| b.status == BetStatus::Won).count(),
            total_winnings: bets
                .iter()
                .filter(|b| b.status == BetStatus::Won)
                .map(|b| b.potential_payout)
                .sum(),
            total_wagered: bets.iter().map(|b| b.amount).sum(),
        }
    }
}
