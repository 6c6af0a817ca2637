use super::*;
use crate::engine::Config;
use crate::engine::Engine;
use crate::engine::payout;
use crate::notify::*;
use crate::state::*;
use crate::*;

/// Applies player intents against the shared state.
///
/// Many handlers run at once, alongside the engine's ticks. Every
/// mutation happens inside one write-lock critical section; replies are
/// delivered after the lock is released.
#[derive(Clone)]
pub struct Handler {
    context: Context,
    courier: Courier,
    config: Config,
}

impl Handler {
    pub fn new(context: Context, courier: Courier, config: Config) -> Self {
        Self {
            context,
            courier,
            config,
        }
    }
    /// Decodes, applies and delivers. Refusals become plain replies.
    pub async fn handle(&self, chat: ChatId, inbound: Inbound) {
        let result = match Intent::try_from(&inbound) {
            Ok(intent) => self.apply(chat, intent).await,
            Err(Rejection::InvalidAmount) => Err(self.unreadable().await),
            Err(rejection) => Err(rejection),
        };
        let outbox = match result {
            Ok(outbox) => outbox,
            Err(rejection) => {
                log::debug!("[handler] {} rejected: {:?}", chat, rejection);
                Outbox::reply(chat, Notice::Rejected(rejection))
            }
        };
        self.courier.deliver(outbox).await;
    }
    pub async fn apply(&self, chat: ChatId, intent: Intent) -> Result<Outbox, Rejection> {
        log::debug!("[handler] {} wants {}", chat, intent);
        match intent {
            Intent::Start => self.start(chat).await,
            Intent::Help => self.help(chat).await,
            Intent::Stats => self.stats(chat).await,
            Intent::ToggleNotifications => self.toggle_notifications(chat).await,
            Intent::BetPrompt => self.prompt(chat).await,
            Intent::PlaceBet(amount) => self.place_bet(chat, amount).await,
            Intent::Adjust(op) => self.adjust_bet(chat, op).await,
            Intent::CashOut => self.cash_out(chat).await,
        }
    }
}

impl Handler {
    pub async fn start(&self, chat: ChatId) -> Result<Outbox, Rejection> {
        self.context.write().await.sessions.entry(chat);
        let mut outbox = Outbox::default();
        outbox.send_with(chat, Notice::Welcome, Keyboard::Bets);
        Ok(outbox)
    }
    pub async fn help(&self, chat: ChatId) -> Result<Outbox, Rejection> {
        Ok(Outbox::reply(chat, Notice::Help))
    }
    pub async fn prompt(&self, chat: ChatId) -> Result<Outbox, Rejection> {
        let mut outbox = Outbox::default();
        outbox.send_with(chat, Notice::BetPrompt, Keyboard::Bets);
        Ok(outbox)
    }
    /// Read-only; takes the shared lock.
    pub async fn stats(&self, chat: ChatId) -> Result<Outbox, Rejection> {
        let state = self.context.read().await;
        let notice = match state.sessions.get(chat) {
            None => Notice::NoStats,
            Some(session) => Notice::Stats {
                bet: session.bet(),
                balance: session.balance(),
                total_win: session.total_win(),
                games_played: session.games_played(),
                rounds_left: session.rounds_left(self.config.inactive_limit),
                notifications: session.notifications(),
            },
        };
        Ok(Outbox::reply(chat, notice))
    }
    pub async fn toggle_notifications(&self, chat: ChatId) -> Result<Outbox, Rejection> {
        let enabled = self.context.write().await.sessions.entry(chat).toggle();
        log::info!("[handler] {} notifications {}", chat, enabled);
        Ok(Outbox::reply(chat, Notice::Notifications(enabled)))
    }
    /// Replaces any bet already riding: the refund and the new stake
    /// happen in the same critical section.
    pub async fn place_bet(&self, chat: ChatId, amount: Chips) -> Result<Outbox, Rejection> {
        let mut state = self.context.write().await;
        let State { sessions, round } = &mut *state;
        let session = Self::stake(sessions, round, chat, amount)?;
        Ok(self.confirm(chat, session, round))
    }
    pub async fn adjust_bet(&self, chat: ChatId, op: Adjust) -> Result<Outbox, Rejection> {
        let mut state = self.context.write().await;
        let State { sessions, round } = &mut *state;
        if !round.is_joining() {
            return Err(Rejection::BettingClosed);
        }
        let bet = sessions
            .get(chat)
            .map(Session::bet)
            .filter(|bet| *bet > 0)
            .ok_or(Rejection::NoBet(op))?;
        let amount = op.apply(bet);
        if amount < MIN_BET {
            return Err(Rejection::BelowMinimum);
        }
        if amount > MAX_BET {
            return Err(Rejection::AboveMaximum);
        }
        let session = Self::stake(sessions, round, chat, amount)?;
        Ok(self.confirm(chat, session, round))
    }
    /// Locks in the payout at the current multiplier. Effective once per round.
    pub async fn cash_out(&self, chat: ChatId) -> Result<Outbox, Rejection> {
        let mut state = self.context.write().await;
        let State { sessions, round } = &mut *state;
        let session = sessions.get_mut(chat).ok_or(Rejection::CannotCashOut)?;
        if !round.is_running() || !session.is_active() {
            return Err(Rejection::CannotCashOut);
        }
        let multiplier = round.multiplier();
        let win = payout(session.bet(), multiplier, self.config.house_fee);
        session.cash_out(multiplier, win);
        round.cash_out();
        log::info!(
            "[handler] {} cashed out {} at x{:.2}",
            chat,
            win,
            multiplier
        );
        let mut outbox = Outbox::default();
        outbox.send(
            chat,
            Notice::CashedOut {
                win,
                multiplier,
                balance: session.balance(),
            },
        );
        let (notice, keyboard) = Engine::status(session, round, &self.config);
        session.remember(&notice.to_string(), keyboard);
        outbox.status(chat, Stamp::of(round, session), session.status(), notice, keyboard);
        Ok(outbox)
    }
}

impl Handler {
    /// Free text that is not an amount. Outside the join window the
    /// player hears that bets are closed, whatever they typed.
    async fn unreadable(&self) -> Rejection {
        match self.context.read().await.round.is_joining() {
            true => Rejection::InvalidAmount,
            false => Rejection::BettingClosed,
        }
    }
    /// Validates and stakes `amount`, refunding any bet it replaces.
    /// Nothing is mutated unless the bet is accepted.
    fn stake<'a>(
        sessions: &'a mut Sessions,
        round: &mut Round,
        chat: ChatId,
        amount: Chips,
    ) -> Result<&'a mut Session, Rejection> {
        if !round.is_joining() {
            return Err(Rejection::BettingClosed);
        }
        if !(MIN_BET..=MAX_BET).contains(&amount) {
            return Err(Rejection::OutOfRange);
        }
        let session = sessions.entry(chat);
        if amount > session.available() {
            return Err(Rejection::InsufficientFunds {
                balance: session.balance(),
            });
        }
        match session.refund() {
            0 => {}
            refund => round.leave(refund),
        }
        session.stake(amount);
        round.join(amount);
        log::info!("[handler] {} bet {} on round {}", chat, amount, round.number());
        Ok(session)
    }
    /// Confirmation plus a fresh bet-status render.
    fn confirm(&self, chat: ChatId, session: &mut Session, round: &Round) -> Outbox {
        let mut outbox = Outbox::default();
        outbox.send(
            chat,
            Notice::Accepted {
                bet: session.bet(),
                balance: session.balance(),
            },
        );
        let (notice, keyboard) = Engine::status(session, round, &self.config);
        session.remember(&notice.to_string(), keyboard);
        outbox.status(chat, Stamp::of(round, session), session.status(), notice, keyboard);
        outbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    async fn joining() -> (Handler, Context, Arc<Recorder>) {
        let context = Context::default();
        {
            let mut state = context.write().await;
            state.round.reset();
            state.round.open();
        }
        let recorder = Arc::new(Recorder::default());
        let config = Config::default();
        let courier = Courier::new(recorder.clone(), context.clone(), &config);
        (Handler::new(context.clone(), courier, config), context, recorder)
    }
    async fn snapshot(context: &Context, chat: ChatId) -> (Chips, Chips, Chips, u32) {
        let state = context.read().await;
        let session = state.sessions.get(chat).unwrap();
        (
            session.bet(),
            session.balance(),
            state.round.total_bets(),
            state.round.active_players(),
        )
    }
    #[tokio::test]
    async fn fresh_bet_debits_balance() {
        let (handler, context, _) = joining().await;
        handler.place_bet(1, 100).await.unwrap();
        assert_eq!(snapshot(&context, 1).await, (100, 900, 100, 1));
    }
    #[tokio::test]
    async fn double_replaces_the_bet() {
        let (handler, context, _) = joining().await;
        handler.place_bet(1, 100).await.unwrap();
        handler.adjust_bet(1, Adjust::Double).await.unwrap();
        assert_eq!(snapshot(&context, 1).await, (200, 800, 200, 1));
    }
    #[tokio::test]
    async fn replacing_bets_never_drift() {
        let (handler, context, _) = joining().await;
        for amount in [100, 40, 500, 5, 250] {
            handler.place_bet(1, amount).await.unwrap();
            handler.place_bet(2, amount * 2).await.unwrap();
            handler.adjust_bet(2, Adjust::Halve).await.unwrap();
        }
        let state = context.read().await;
        assert_eq!(state.round.total_bets(), state.sessions.staked());
        assert_eq!(state.round.total_bets(), 500);
        assert_eq!(state.round.active_players(), 2);
    }
    #[tokio::test]
    async fn concurrent_replacements_never_drift() {
        let (handler, context, _) = joining().await;
        let tasks = (0..64)
            .map(|i| {
                let handler = handler.clone();
                tokio::spawn(async move { handler.place_bet(i % 4, 5 + i as Chips).await })
            })
            .collect::<Vec<_>>();
        for task in tasks {
            assert!(task.await.unwrap().is_ok());
        }
        let state = context.read().await;
        assert_eq!(state.round.total_bets(), state.sessions.staked());
        assert_eq!(state.round.active_players(), 4);
    }
    #[tokio::test]
    async fn invalid_bets_mutate_nothing() {
        let (handler, context, _) = joining().await;
        handler.place_bet(1, 100).await.unwrap();
        assert_eq!(handler.place_bet(1, 4).await.unwrap_err(), Rejection::OutOfRange);
        assert_eq!(handler.place_bet(1, 1001).await.unwrap_err(), Rejection::OutOfRange);
        assert_eq!(snapshot(&context, 1).await, (100, 900, 100, 1));
        assert_eq!(handler.place_bet(2, 0).await.unwrap_err(), Rejection::OutOfRange);
        assert!(context.read().await.sessions.get(2).is_none());
    }
    #[tokio::test]
    async fn replacing_bet_may_use_its_refund() {
        let (handler, context, _) = joining().await;
        handler.place_bet(1, 1000).await.unwrap();
        handler.place_bet(1, 1000).await.unwrap();
        assert_eq!(snapshot(&context, 1).await, (1000, 0, 1000, 1));
    }
    #[tokio::test]
    async fn insufficient_funds() {
        let (handler, context, _) = joining().await;
        context.write().await.sessions.entry(1).stake(980);
        context.write().await.sessions.get_mut(1).unwrap().cash_out(0.0, 0);
        assert_eq!(
            handler.place_bet(1, 50).await.unwrap_err(),
            Rejection::InsufficientFunds { balance: 20 }
        );
    }
    #[tokio::test]
    async fn adjustments_stay_in_bounds() {
        let (handler, context, _) = joining().await;
        assert_eq!(
            handler.adjust_bet(1, Adjust::Repeat).await.unwrap_err(),
            Rejection::NoBet(Adjust::Repeat)
        );
        handler.place_bet(1, 9).await.unwrap();
        assert_eq!(
            handler.adjust_bet(1, Adjust::Halve).await.unwrap_err(),
            Rejection::BelowMinimum
        );
        handler.place_bet(1, 600).await.unwrap();
        assert_eq!(
            handler.adjust_bet(1, Adjust::Double).await.unwrap_err(),
            Rejection::AboveMaximum
        );
        handler.adjust_bet(1, Adjust::Repeat).await.unwrap();
        assert_eq!(snapshot(&context, 1).await, (600, 400, 600, 1));
    }
    #[tokio::test]
    async fn bets_only_while_joining() {
        let (handler, context, _) = joining().await;
        handler.place_bet(1, 100).await.unwrap();
        context.write().await.round.launch();
        assert_eq!(handler.place_bet(1, 50).await.unwrap_err(), Rejection::BettingClosed);
        assert_eq!(
            handler.adjust_bet(1, Adjust::Double).await.unwrap_err(),
            Rejection::BettingClosed
        );
        assert_eq!(snapshot(&context, 1).await, (100, 900, 100, 1));
    }
    #[tokio::test]
    async fn cash_out_pays_once() {
        let (handler, context, _) = joining().await;
        handler.place_bet(1, 100).await.unwrap();
        {
            let mut state = context.write().await;
            state.round.launch();
            state.round.climb(2.0);
        }
        let outbox = handler.cash_out(1).await.unwrap();
        assert!(matches!(
            outbox.notices(1)[..],
            [Notice::CashedOut { win: 190, .. }, Notice::Flight { .. }]
        ));
        assert_eq!(handler.cash_out(1).await.unwrap_err(), Rejection::CannotCashOut);
        let state = context.read().await;
        let session = state.sessions.get(1).unwrap();
        assert_eq!(session.balance(), 1090);
        assert_eq!(session.total_win(), 190);
        assert_eq!(state.round.active_players(), 0);
    }
    #[tokio::test]
    async fn cash_out_needs_a_running_round() {
        let (handler, _, _) = joining().await;
        assert_eq!(handler.cash_out(1).await.unwrap_err(), Rejection::CannotCashOut);
        handler.place_bet(1, 100).await.unwrap();
        assert_eq!(handler.cash_out(1).await.unwrap_err(), Rejection::CannotCashOut);
    }
    #[tokio::test]
    async fn stats_without_session() {
        let (handler, context, _) = joining().await;
        let outbox = handler.stats(9).await.unwrap();
        assert_eq!(outbox.notices(9), vec![&Notice::NoStats]);
        assert!(context.read().await.sessions.get(9).is_none());
    }
    #[tokio::test]
    async fn toggle_creates_session() {
        let (handler, context, _) = joining().await;
        let outbox = handler.toggle_notifications(3).await.unwrap();
        assert_eq!(outbox.notices(3), vec![&Notice::Notifications(false)]);
        assert!(!context.read().await.sessions.get(3).unwrap().notifications());
    }
    #[tokio::test]
    async fn rejections_become_replies() {
        let (handler, _, recorder) = joining().await;
        handler.handle(1, Inbound::Message("/nope".into())).await;
        handler.handle(1, Inbound::Message("abc".into())).await;
        assert_eq!(
            recorder.texts(1),
            vec![
                Rejection::UnknownCommand.to_string(),
                Rejection::InvalidAmount.to_string()
            ]
        );
    }
    #[tokio::test]
    async fn free_text_outside_joining_means_closed() {
        let (handler, context, recorder) = joining().await;
        context.write().await.round.launch();
        handler.handle(1, Inbound::Message("abc".into())).await;
        handler.handle(1, Inbound::Message("100".into())).await;
        assert_eq!(
            recorder.texts(1),
            vec![
                Rejection::BettingClosed.to_string(),
                Rejection::BettingClosed.to_string()
            ]
        );
    }
    #[tokio::test]
    async fn bet_creates_status_message() {
        let (handler, context, recorder) = joining().await;
        handler.handle(1, Inbound::Message("100".into())).await;
        handler.handle(1, Inbound::Callback("double".into())).await;
        let texts = recorder.seen(1);
        assert_eq!(texts.len(), 4);
        assert_eq!(texts[3], Notice::Ticket { bet: 200, balance: 800 }.to_string());
        assert_eq!(recorder.edits(), 1);
        assert!(context.read().await.sessions.get(1).unwrap().status().is_some());
    }
}
