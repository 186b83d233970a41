//! Example prompts shown on an empty chat

use rand::seq::SliceRandom;
use rand::Rng;

pub const DEFAULT_SUGGESTIONS: [&str; 7] = [
    "Show top 5 lead sources",
    "Highest loan amount requested?",
    "Most common loan purpose?",
    "Highest sanction amount?",
    "Top branches by sanctioned loans",
    "List rejected applications",
    "Show pending follow-ups",
];

/// A subset of prompts picked once when the welcome panel is created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestions {
    shown: Vec<String>,
}

impl Suggestions {
    /// Pick `count` distinct prompts from `pool` in random order
    pub fn pick<R: Rng + ?Sized>(pool: &[&str], count: usize, rng: &mut R) -> Self {
        let shown = pool
            .choose_multiple(rng, count.min(pool.len()))
            .map(|s| s.to_string())
            .collect();
        Self { shown }
    }

    pub fn random(count: usize) -> Self {
        Self::pick(&DEFAULT_SUGGESTIONS, count, &mut rand::thread_rng())
    }

    pub fn items(&self) -> &[String] {
        &self.shown
    }

    /// Only offered while nothing has been said and nothing is pending
    pub fn visible(log_empty: bool, loading: bool) -> bool {
        log_empty && !loading
    }
}
