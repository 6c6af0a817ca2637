use super::*;
use crate::notify::*;
use crate::state::*;
use crate::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tokio::time::MissedTickBehavior;

/// Outcome of one tick of a running round.
#[derive(Debug)]
pub enum Tick {
    /// Still flying. Carries the per-player status renders.
    Climbing(Outbox),
    /// Crashed on this tick. Carries the settlement.
    Crashed(Outbox),
}

/// The single authoritative round loop.
///
/// Each step takes the write lock once, mutates, and returns the
/// deliveries it implies; [`Engine::round`] performs them after the
/// lock is released.
pub struct Engine {
    context: Context,
    courier: Courier,
    config: Config,
    rng: SmallRng,
    speed: Speed,
}

impl Engine {
    pub fn new(context: Context, courier: Courier, config: Config, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        log::debug!("[engine] rng seed {}", seed);
        Self {
            context,
            courier,
            config,
            rng: SmallRng::seed_from_u64(seed),
            speed: Speed::default(),
        }
    }
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Engine {
    /// Plays rounds back to back for the lifetime of the process.
    pub async fn run(mut self) {
        log::info!("[engine] starting round loop");
        loop {
            self.round().await;
        }
    }
    /// One full round, pauses included.
    pub async fn round(&mut self) {
        let cleanup = self.prepare().await;
        self.courier.deliver(cleanup).await;
        let announcement = self.open().await;
        self.courier.dispatch(announcement);
        tokio::time::sleep(self.config.join).await;
        self.launch().await;
        self.fly().await;
        tokio::time::sleep(self.config.pause).await;
        if let Some(notice) = self.hold().await {
            self.courier.dispatch(notice);
            tokio::time::sleep(self.config.extended_pause).await;
        }
    }
    async fn fly(&mut self) {
        let mut interval = tokio::time::interval(self.config.tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval.tick().await;
        loop {
            interval.tick().await;
            match self.tick().await {
                Tick::Climbing(renders) => self.courier.dispatch(renders),
                Tick::Crashed(settlement) => {
                    self.courier.deliver(settlement).await;
                    return;
                }
            }
        }
    }
}

impl Engine {
    /// Clears last round's sessions and starts the next round.
    /// Returns deletions for every message delivered last round.
    pub async fn prepare(&mut self) -> Outbox {
        let mut state = self.context.write().await;
        let State { sessions, round } = &mut *state;
        let mut outbox = Outbox::default();
        for (chat, session) in sessions.iter_mut() {
            let subscribed = session.notifications();
            for handle in session.reset(self.config.inactive_limit) {
                outbox.delete(chat, handle);
            }
            if subscribed && !session.notifications() {
                log::info!(
                    "[engine] muting {} after {} idle rounds",
                    chat,
                    session.inactive_rounds()
                );
            }
        }
        round.reset();
        log::info!("[engine] round {} preparing", round.number());
        outbox
    }
    /// Opens the join window and announces the round.
    pub async fn open(&mut self) -> Outbox {
        let mut state = self.context.write().await;
        let State { sessions, round } = &mut *state;
        round.open();
        let mut outbox = Outbox::default();
        outbox.broadcast(
            sessions,
            Notice::Announce {
                round: round.number(),
                join: self.config.join,
            },
        );
        log::info!(
            "[engine] round {} open for bets ({} subscribers)",
            round.number(),
            outbox.len()
        );
        outbox
    }
    /// Closes the join window and picks this round's starting speed.
    pub async fn launch(&mut self) {
        self.speed = Speed::sample(&self.config, &mut self.rng);
        let mut state = self.context.write().await;
        state.round.launch();
        log::info!(
            "[engine] round {} launched: {} players, {} staked, speed {:.2}",
            state.round.number(),
            state.round.active_players(),
            state.round.total_bets(),
            self.speed.value()
        );
    }
    /// Climbs, decides the crash, and renders, all in one critical section.
    pub async fn tick(&mut self) -> Tick {
        let mut state = self.context.write().await;
        let State { sessions, round } = &mut *state;
        debug_assert!(round.is_running(), "tick while {}", round.phase());
        let multiplier = round.climb(self.speed.step(&self.config));
        if Crash::should_end(&self.config, multiplier, &mut self.rng) {
            round.crash();
            log::info!(
                "[engine] round {} crashed at x{:.2} after {:?}",
                round.number(),
                round.crashed(),
                round.airtime()
            );
            return Tick::Crashed(Self::settle(sessions, round));
        }
        log::trace!("[engine] x{:.2}", multiplier);
        let renders = Self::render(sessions, round, &self.config);
        drop(state);
        self.speed.drift(&self.config, &mut self.rng);
        Tick::Climbing(renders)
    }
    /// Announces the extended pause when this round calls for one.
    pub async fn hold(&mut self) -> Option<Outbox> {
        let mut state = self.context.write().await;
        let State { sessions, round } = &mut *state;
        if !self.config.pauses_after(round.number()) {
            return None;
        }
        round.hold();
        log::info!("[engine] pausing for {:?}", self.config.extended_pause);
        let mut outbox = Outbox::default();
        outbox.broadcast(
            sessions,
            Notice::Pause {
                duration: self.config.extended_pause,
            },
        );
        Some(outbox)
    }
}

impl Engine {
    /// Losing bets are forfeited and told so individually.
    /// Players who cashed out get the round summary.
    pub fn settle(sessions: &mut Sessions, round: &Round) -> Outbox {
        let mut outbox = Outbox::default();
        for (chat, session) in sessions.iter_mut() {
            if session.is_active() {
                session.forfeit();
                outbox.send(
                    chat,
                    Notice::Crashed {
                        multiplier: round.crashed(),
                    },
                );
            } else if session.cashed_out() {
                outbox.send(
                    chat,
                    Notice::Summary {
                        round: round.number(),
                        multiplier: round.crashed(),
                        players: round.active_players(),
                        total: round.total_bets(),
                    },
                );
            }
        }
        outbox
    }
    /// What a player's bet-status message should show right now.
    pub fn status(session: &Session, round: &Round, config: &Config) -> (Notice, Keyboard) {
        match round.phase() {
            Phase::Running => {
                let win = if session.cashed_out() {
                    session.payout()
                } else {
                    payout(session.bet(), round.multiplier(), config.house_fee)
                };
                let keyboard = if session.is_active() {
                    Keyboard::CashOut
                } else {
                    Keyboard::None
                };
                let notice = Notice::Flight {
                    multiplier: round.multiplier(),
                    win,
                    players: round.active_players(),
                    total: round.total_bets(),
                    history: round.recent(config.history).to_vec(),
                };
                (notice, keyboard)
            }
            _ => {
                let notice = Notice::Ticket {
                    bet: session.bet(),
                    balance: session.balance(),
                };
                (notice, Keyboard::None)
            }
        }
    }
    /// Status updates for every player still riding. Unchanged renders are skipped.
    fn render(sessions: &mut Sessions, round: &Round, config: &Config) -> Outbox {
        let mut outbox = Outbox::default();
        for (chat, session) in sessions.iter_mut().filter(|(_, s)| s.is_active()) {
            let (notice, keyboard) = Self::status(session, round, config);
            if session.remember(&notice.to_string(), keyboard) {
                outbox.status(chat, Stamp::of(round, session), session.status(), notice, keyboard);
            }
        }
        outbox
    }
}
