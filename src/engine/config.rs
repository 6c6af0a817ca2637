use crate::*;
use std::time::Duration;

/// Every timing and probability knob of the game.
/// Defaults come from the crate constants; tests shorten the timings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub tick: Duration,
    pub join: Duration,
    pub pause: Duration,
    pub pause_every: u64,
    pub extended_pause: Duration,
    pub increment: Multiplier,
    pub ceiling: Multiplier,
    pub base_speed: f64,
    pub max_speed: f64,
    pub speed_change: f64,
    pub crash_base: f64,
    pub crash_slope: f64,
    pub house_fee: f64,
    pub inactive_limit: u32,
    pub history: usize,
    pub attempts: u32,
    pub backoff: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick: TICK_INTERVAL,
            join: JOIN_WINDOW,
            pause: ROUND_PAUSE,
            pause_every: PAUSE_EVERY_N_ROUNDS,
            extended_pause: EXTENDED_PAUSE,
            increment: MULTIPLIER_INCREMENT,
            ceiling: MAX_MULTIPLIER,
            base_speed: BASE_SPEED,
            max_speed: MAX_SPEED,
            speed_change: SPEED_CHANGE_CHANCE,
            crash_base: CRASH_BASE_CHANCE,
            crash_slope: CRASH_SLOPE,
            house_fee: HOUSE_FEE,
            inactive_limit: INACTIVE_ROUND_LIMIT,
            history: HISTORY_SHOWN,
            attempts: DELIVERY_ATTEMPTS,
            backoff: DELIVERY_BACKOFF,
        }
    }
}

impl Config {
    /// True when the extended pause follows round `number`.
    pub fn pauses_after(&self, number: u64) -> bool {
        self.pause_every > 0 && number > 0 && number % self.pause_every == 0
    }
}
