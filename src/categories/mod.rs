//! Event category definitions for the banana-betting feed.
//!
//! Every renderer (homepage cards, listing, bet history) goes through this
//! one mapping. The backend sends categories as kebab-case slugs; anything
//! it invents later falls through to `Other` instead of breaking the feed.

use std::fmt;

/// Betting event category as reported by the events API.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    BananaAntics,
    PlayerProps,
    CrowdFun,
    Baseball,
    /// A slug this client does not know about yet.
    Other(String),
}

impl Category {
    /// Returns all categories with dedicated display treatment.
    pub fn known() -> Vec<Category> {
        vec![
            Category::BananaAntics,
            Category::PlayerProps,
            Category::CrowdFun,
            Category::Baseball,
        ]
    }

    /// Resolves a backend category slug. Unknown slugs are preserved verbatim.
    pub fn from_slug(slug: &str) -> Category {
        match slug {
            "banana-antics" => Category::BananaAntics,
            "player-props" => Category::PlayerProps,
            "crowd-fun" => Category::CrowdFun,
            "baseball" => Category::Baseball,
            other => Category::Other(other.to_string()),
        }
    }

    /// Returns the kebab-case slug used on the wire.
    pub fn slug(&self) -> &str {
        match self {
            Category::BananaAntics => "banana-antics",
            Category::PlayerProps => "player-props",
            Category::CrowdFun => "crowd-fun",
            Category::Baseball => "baseball",
            Category::Other(slug) => slug,
        }
    }

    /// Returns the human-readable name shown on cards.
    ///
    /// Unknown categories display their raw slug rather than guessing.
    pub fn display_name(&self) -> &str {
        match self {
            Category::BananaAntics => "Banana Antics",
            Category::PlayerProps => "Player Props",
            Category::CrowdFun => "Crowd Fun",
            Category::Baseball => "Baseball",
            Category::Other(slug) => slug,
        }
    }

    /// Returns the emoji badge for this category.
    pub fn emoji(&self) -> &'static str {
        match self {
            Category::BananaAntics => "🍌",
            Category::PlayerProps => "⚾",
            Category::Baseball => "⚾",
            Category::CrowdFun => "🎭",
            Category::Other(_) => "🎪",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
