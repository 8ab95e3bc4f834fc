//! Card rendering helpers for the betting feed.

mod adapter;

pub use adapter::{
    display_fields,
    DisplayFields,
    FeaturedCard,
    DEFAULT_FIXED_ODDS,
    DEFAULT_OVER_ODDS,
    FIXED_ODDS_STAKE_ZEC,
};

use rand::seq::SliceRandom;

const BANANA_EMOJIS: &[&str] = &["🍌", "🍌🍌", "🍌✨", "🍌🎉"];

/// Picks a banana emoji for buttons and banners.
pub fn random_banana_emoji() -> &'static str {
    BANANA_EMOJIS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or("🍌")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_banana_emoji_is_from_the_set() {
        for _ in 0..20 {
            assert!(BANANA_EMOJIS.contains(&random_banana_emoji()));
        }
    }
}
