use std::time::Duration;

use crate::constants::{FINISH_TOLERANCE, SLIDE_DURATION, STATUS_INTERVAL};
use crate::deck::DeckPolicy;

/// Tunables of one carousel session.
#[derive(Debug, Clone, PartialEq)]
pub struct CarouselConfig {
    pub slide_duration: Duration,
    pub finish_tolerance: Duration,
    pub status_interval: Duration,
    pub deck_policy: DeckPolicy,
    /// End the session after the deck wrapped around this many times on its own.
    pub max_loops: Option<u32>,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            slide_duration: SLIDE_DURATION,
            finish_tolerance: FINISH_TOLERANCE,
            status_interval: STATUS_INTERVAL,
            deck_policy: DeckPolicy::CompleteOnly,
            max_loops: None,
        }
    }
}
