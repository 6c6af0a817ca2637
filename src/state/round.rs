use crate::*;
use std::time::Instant;

/// Where the current round stands.
///
/// `Preparing → Joining → Running → Paused (optional) → Preparing`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Preparing,
    Joining,
    Running,
    Paused,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Phase::Preparing => write!(f, "preparing"),
            Phase::Joining => write!(f, "joining"),
            Phase::Running => write!(f, "running"),
            Phase::Paused => write!(f, "paused"),
        }
    }
}

/// The single live round shared by every player.
#[derive(Debug, Clone)]
pub struct Round {
    number: u64,
    multiplier: Multiplier,
    total_bets: Chips,
    active_players: u32,
    crashed: Multiplier,
    phase: Phase,
    history: Vec<Multiplier>,
    launched: Option<Instant>,
}

impl Default for Round {
    fn default() -> Self {
        Self {
            number: 0,
            multiplier: INITIAL_MULTIPLIER,
            total_bets: 0,
            active_players: 0,
            crashed: 0.0,
            phase: Phase::Preparing,
            history: Vec::with_capacity(100),
            launched: None,
        }
    }
}

impl Round {
    pub fn number(&self) -> u64 {
        self.number
    }
    pub fn multiplier(&self) -> Multiplier {
        self.multiplier
    }
    pub fn total_bets(&self) -> Chips {
        self.total_bets
    }
    pub fn active_players(&self) -> u32 {
        self.active_players
    }
    /// Multiplier the last round crashed at; zero until the crash.
    pub fn crashed(&self) -> Multiplier {
        self.crashed
    }
    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn history(&self) -> &[Multiplier] {
        &self.history
    }
    /// The most recent `n` crash multipliers, oldest first.
    pub fn recent(&self, n: usize) -> &[Multiplier] {
        &self.history[self.history.len().saturating_sub(n)..]
    }
    pub fn is_joining(&self) -> bool {
        self.phase == Phase::Joining
    }
    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }
}

impl Round {
    /// Starts the next round: new number, multiplier and totals zeroed.
    pub fn reset(&mut self) {
        self.number += 1;
        self.multiplier = INITIAL_MULTIPLIER;
        self.total_bets = 0;
        self.active_players = 0;
        self.crashed = 0.0;
        self.phase = Phase::Preparing;
        self.launched = None;
    }
    pub fn open(&mut self) {
        debug_assert!(self.phase == Phase::Preparing, "open from {}", self.phase);
        self.phase = Phase::Joining;
    }
    pub fn launch(&mut self) {
        debug_assert!(self.phase == Phase::Joining, "launch from {}", self.phase);
        self.phase = Phase::Running;
        self.launched = Some(Instant::now());
    }
    /// Raises the multiplier by `delta`. Never lowers it.
    pub fn climb(&mut self, delta: Multiplier) -> Multiplier {
        self.multiplier += delta.max(0.0);
        self.multiplier
    }
    /// Freezes the multiplier as the crash point and appends it to history.
    pub fn crash(&mut self) -> Multiplier {
        self.crashed = self.multiplier;
        self.history.push(self.crashed);
        self.phase = Phase::Preparing;
        self.crashed
    }
    /// Extended pause between rounds.
    pub fn hold(&mut self) {
        self.phase = Phase::Paused;
    }
    /// How long the round has been flying.
    pub fn airtime(&self) -> std::time::Duration {
        self.launched
            .map(|t| t.elapsed())
            .unwrap_or_default()
    }
}

impl Round {
    /// Adds a bet to the aggregate totals.
    pub fn join(&mut self, amount: Chips) {
        self.total_bets += amount;
        self.active_players += 1;
    }
    /// Removes a refunded bet from the aggregate totals.
    pub fn leave(&mut self, amount: Chips) {
        self.total_bets = self.total_bets.saturating_sub(amount);
        self.active_players = self.active_players.saturating_sub(1);
    }
    /// A player cashed out; they no longer ride the multiplier.
    pub fn cash_out(&mut self) {
        self.active_players = self.active_players.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn phases_in_sequence() {
        let mut round = Round::default();
        round.reset();
        assert_eq!(round.number(), 1);
        assert_eq!(round.phase(), Phase::Preparing);
        round.open();
        assert!(round.is_joining());
        round.launch();
        assert!(round.is_running());
        round.crash();
        assert_eq!(round.phase(), Phase::Preparing);
        round.hold();
        assert_eq!(round.phase(), Phase::Paused);
    }
    #[test]
    fn climb_is_monotonic() {
        let mut round = Round::default();
        assert_eq!(round.climb(0.5), 0.5);
        assert_eq!(round.climb(-1.0), 0.5);
        assert_eq!(round.climb(0.25), 0.75);
    }
    #[test]
    fn reset_zeroes_round() {
        let mut round = Round::default();
        round.reset();
        round.open();
        round.join(100);
        round.launch();
        round.climb(2.0);
        round.crash();
        round.reset();
        assert_eq!(round.number(), 2);
        assert_eq!(round.multiplier(), INITIAL_MULTIPLIER);
        assert_eq!(round.total_bets(), 0);
        assert_eq!(round.active_players(), 0);
        assert_eq!(round.crashed(), 0.0);
        assert_eq!(round.history(), &[2.0]);
    }
    #[test]
    fn recent_history_tail() {
        let mut round = Round::default();
        (1..=7).for_each(|i| {
            round.reset();
            round.climb(i as f64);
            round.crash();
        });
        assert_eq!(round.recent(5), &[3.0, 4.0, 5.0, 6.0, 7.0]);
        assert_eq!(round.recent(50).len(), 7);
    }
    #[test]
    fn join_and_leave_totals() {
        let mut round = Round::default();
        round.join(100);
        round.join(50);
        round.leave(100);
        assert_eq!(round.total_bets(), 50);
        assert_eq!(round.active_players(), 1);
        round.cash_out();
        assert_eq!(round.active_players(), 0);
        assert_eq!(round.total_bets(), 50);
    }
}
