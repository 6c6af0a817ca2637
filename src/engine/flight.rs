use super::*;
use crate::*;
use rand::Rng;

/// Per-round random-walk speed of the climb.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Speed(f64);

impl Speed {
    /// Uniform in `[base_speed, max_speed]`.
    pub fn sample<R: Rng>(config: &Config, rng: &mut R) -> Self {
        Self(rng.random_range(config.base_speed..=config.max_speed))
    }
    pub fn value(&self) -> f64 {
        self.0
    }
    /// Multiplier gained this tick.
    pub fn step(&self, config: &Config) -> Multiplier {
        config.increment * self.0
    }
    /// Resamples with the configured chance.
    pub fn drift<R: Rng>(&mut self, config: &Config, rng: &mut R) {
        if rng.random_bool(config.speed_change.clamp(0.0, 1.0)) {
            *self = Self::sample(config, rng);
        }
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self(BASE_SPEED)
    }
}

/// When a round ends.
pub struct Crash;

impl Crash {
    /// Per-tick crash probability at `multiplier`.
    pub fn chance(config: &Config, multiplier: Multiplier) -> f64 {
        (config.crash_base + (multiplier - 1.0) * config.crash_slope).clamp(0.0, 1.0)
    }
    /// The ceiling always ends the round; below it, one draw per tick.
    pub fn should_end<R: Rng>(config: &Config, multiplier: Multiplier, rng: &mut R) -> bool {
        multiplier >= config.ceiling || rng.random_bool(Self::chance(config, multiplier))
    }
}
