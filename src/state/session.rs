use crate::notify::Keyboard;
use crate::*;

/// One player's standing on the channel.
/// Created on first contact and kept for the lifetime of the process.
///
/// `bet` is non-zero only while a wager is riding on the current round:
/// it is cleared on cash-out and at the next reset.
#[derive(Debug, Clone)]
pub struct Session {
    bet: Chips,
    balance: Chips,
    payout: Chips,
    total_win: Chips,
    games_played: u64,
    cashed_out: bool,
    multiplier: Multiplier,
    inactive_rounds: u32,
    notifications: bool,
    status: Option<MessageId>,
    outstanding: Vec<MessageId>,
    last_text: String,
    last_keyboard: Keyboard,
    revision: u64,
}

impl Session {
    pub fn new(balance: Chips) -> Self {
        Self {
            bet: 0,
            balance,
            payout: 0,
            total_win: 0,
            games_played: 0,
            cashed_out: false,
            multiplier: INITIAL_MULTIPLIER,
            inactive_rounds: 0,
            notifications: true,
            status: None,
            outstanding: Vec::new(),
            last_text: String::new(),
            last_keyboard: Keyboard::None,
            revision: 0,
        }
    }
    pub fn bet(&self) -> Chips {
        self.bet
    }
    pub fn balance(&self) -> Chips {
        self.balance
    }
    /// Amount credited by this round's cash-out.
    pub fn payout(&self) -> Chips {
        self.payout
    }
    pub fn total_win(&self) -> Chips {
        self.total_win
    }
    pub fn games_played(&self) -> u64 {
        self.games_played
    }
    pub fn cashed_out(&self) -> bool {
        self.cashed_out
    }
    /// Multiplier locked in by this round's cash-out.
    pub fn multiplier(&self) -> Multiplier {
        self.multiplier
    }
    pub fn inactive_rounds(&self) -> u32 {
        self.inactive_rounds
    }
    pub fn notifications(&self) -> bool {
        self.notifications
    }
    /// Handle of this round's bet-status message, if one was delivered.
    pub fn status(&self) -> Option<MessageId> {
        self.status
    }
    /// Handles delivered this round, pending cleanup.
    pub fn outstanding(&self) -> &[MessageId] {
        &self.outstanding
    }
    /// Counts bet-status renders. Only the newest one may reach the player.
    pub fn revision(&self) -> u64 {
        self.revision
    }
    /// True while a wager is riding on the current round.
    pub fn is_active(&self) -> bool {
        self.bet > 0 && !self.cashed_out
    }
    /// Funds usable for a new bet: the balance plus any refundable stake.
    pub fn available(&self) -> Chips {
        if self.cashed_out {
            self.balance
        } else {
            self.balance + self.bet
        }
    }
    /// Rounds left before notifications are muted for inactivity.
    pub fn rounds_left(&self, limit: u32) -> u32 {
        limit.saturating_sub(self.inactive_rounds)
    }
}

impl Session {
    /// Returns the riding bet to the balance. Yields the refunded amount.
    pub fn refund(&mut self) -> Chips {
        if self.cashed_out {
            return 0;
        }
        let bet = std::mem::take(&mut self.bet);
        self.balance += bet;
        bet
    }
    /// Debits `amount` and rides it on the current round.
    /// Callers check [`Session::available`] and refund first.
    pub fn stake(&mut self, amount: Chips) {
        debug_assert!(self.bet == 0, "refund before restaking");
        debug_assert!(amount <= self.balance, "stake exceeds balance");
        self.balance -= amount;
        self.bet = amount;
        self.cashed_out = false;
        self.multiplier = INITIAL_MULTIPLIER;
        self.inactive_rounds = 0;
    }
    /// Locks in `win` at `multiplier`. The bet is consumed.
    pub fn cash_out(&mut self, multiplier: Multiplier, win: Chips) {
        self.cashed_out = true;
        self.multiplier = multiplier;
        self.payout = win;
        self.balance += win;
        self.total_win += win;
        self.games_played += 1;
        self.bet = 0;
    }
    /// Counts a bet that rode into the crash.
    pub fn forfeit(&mut self) {
        self.games_played += 1;
    }
    /// Clears per-round state ahead of the next round.
    /// Returns the handles delivered this round so they can be deleted.
    pub fn reset(&mut self, limit: u32) -> Vec<MessageId> {
        match self.cashed_out {
            true => self.inactive_rounds = 0,
            false => self.inactive_rounds += 1,
        }
        if self.inactive_rounds >= limit {
            self.notifications = false;
        }
        self.bet = 0;
        self.payout = 0;
        self.cashed_out = false;
        self.multiplier = INITIAL_MULTIPLIER;
        self.status = None;
        self.last_text.clear();
        self.last_keyboard = Keyboard::None;
        std::mem::take(&mut self.outstanding)
    }
    /// Flips notifications. Re-enabling restarts the inactivity count.
    pub fn toggle(&mut self) -> bool {
        self.notifications = !self.notifications;
        if self.notifications {
            self.inactive_rounds = 0;
        }
        self.notifications
    }
}

impl Session {
    /// Remembers a delivered handle for next round's cleanup.
    pub fn track(&mut self, handle: MessageId) {
        if !self.outstanding.contains(&handle) {
            self.outstanding.push(handle);
        }
    }
    pub fn set_status(&mut self, handle: MessageId) {
        self.status = Some(handle);
        self.track(handle);
    }
    /// Records a render. False when it matches what the player already sees.
    pub fn remember(&mut self, text: &str, keyboard: Keyboard) -> bool {
        if self.last_text == text && self.last_keyboard == keyboard {
            false
        } else {
            self.last_text.clear();
            self.last_text.push_str(text);
            self.last_keyboard = keyboard;
            self.revision += 1;
            true
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(INITIAL_BALANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn fresh_session() {
        let session = Session::default();
        assert_eq!(session.balance(), INITIAL_BALANCE);
        assert_eq!(session.bet(), 0);
        assert!(session.notifications());
        assert!(!session.is_active());
    }
    #[test]
    fn stake_and_refund() {
        let mut session = Session::default();
        session.stake(100);
        assert_eq!(session.balance(), 900);
        assert_eq!(session.available(), 1000);
        assert!(session.is_active());
        assert_eq!(session.refund(), 100);
        assert_eq!(session.balance(), 1000);
        assert_eq!(session.bet(), 0);
    }
    #[test]
    fn cash_out_consumes_bet() {
        let mut session = Session::default();
        session.stake(100);
        session.cash_out(2.0, 190);
        assert_eq!(session.balance(), 1090);
        assert_eq!(session.total_win(), 190);
        assert_eq!(session.games_played(), 1);
        assert_eq!(session.bet(), 0);
        assert!(session.cashed_out());
        assert!(!session.is_active());
        assert_eq!(session.refund(), 0);
    }
    #[test]
    fn idle_rounds_mute() {
        let mut session = Session::default();
        session.reset(INACTIVE_ROUND_LIMIT);
        session.reset(INACTIVE_ROUND_LIMIT);
        assert!(session.notifications());
        assert_eq!(session.rounds_left(INACTIVE_ROUND_LIMIT), 1);
        session.reset(INACTIVE_ROUND_LIMIT);
        assert!(!session.notifications());
    }
    #[test]
    fn cash_out_resets_inactivity() {
        let mut session = Session::default();
        session.reset(INACTIVE_ROUND_LIMIT);
        session.reset(INACTIVE_ROUND_LIMIT);
        session.stake(10);
        session.cash_out(1.5, 14);
        session.reset(INACTIVE_ROUND_LIMIT);
        assert_eq!(session.inactive_rounds(), 0);
        assert!(session.notifications());
    }
    #[test]
    fn reset_drains_handles() {
        let mut session = Session::default();
        session.track(3);
        session.set_status(4);
        session.track(4);
        assert_eq!(session.reset(INACTIVE_ROUND_LIMIT), vec![3, 4]);
        assert!(session.outstanding().is_empty());
        assert_eq!(session.status(), None);
    }
    #[test]
    fn remember_deduplicates() {
        let mut session = Session::default();
        assert!(session.remember("x1.00", Keyboard::CashOut));
        assert!(!session.remember("x1.00", Keyboard::CashOut));
        assert!(session.remember("x1.00", Keyboard::None));
        assert!(session.remember("x1.10", Keyboard::None));
        assert_eq!(session.revision(), 3);
    }
    #[test]
    fn toggle_restarts_inactivity() {
        let mut session = Session::default();
        (0..INACTIVE_ROUND_LIMIT).for_each(|_| {
            session.reset(INACTIVE_ROUND_LIMIT);
        });
        assert!(!session.notifications());
        assert!(session.toggle());
        assert_eq!(session.inactive_rounds(), 0);
        assert!(!session.toggle());
    }
}
