//! Multiplayer crash betting played over a chat channel.
//!
//! One authoritative round engine climbs a shared multiplier on a fixed
//! tick and crashes it at a random moment. Players bet during a short join
//! window and try to cash out before the crash.
//!
//! ## Architecture
//!
//! - [`state`]: Sessions, the current round, and the shared [`state::Context`]
//! - [`engine`]: The round loop: phases, ticks, crash policy, rendering
//! - [`actions`]: Player intents: bets, adjustments, cash-outs, toggles
//! - [`notify`]: The delivery seam: [`notify::Notifier`], outboxes, retries
//! - [`hosting`]: Process wiring: worker pool and the casino itself
pub mod actions;
pub mod engine;
pub mod hosting;
pub mod notify;
pub mod state;

use std::time::Duration;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Balances, bets and payouts.
pub type Chips = u64;
/// Recipient identity on the chat channel.
pub type ChatId = i64;
/// Handle of a message previously delivered on the chat channel.
pub type MessageId = i64;
/// The shared climbing value of a round.
pub type Multiplier = f64;

// ============================================================================
// ECONOMY
// ============================================================================
/// Balance granted to a session on first contact.
pub const INITIAL_BALANCE: Chips = 1000;
/// Smallest accepted bet.
pub const MIN_BET: Chips = 5;
/// Largest accepted bet.
pub const MAX_BET: Chips = 1000;
/// Fraction of every payout kept by the house.
pub const HOUSE_FEE: f64 = 0.05;
/// Amounts offered as one-tap bet buttons.
pub const FIXED_BETS: [Chips; 3] = [50, 250, 500];

// ============================================================================
// FLIGHT
// Each tick adds INCREMENT × speed, speed drawn uniformly in [BASE, MAX]
// and redrawn with SPEED_CHANGE_CHANCE after every tick.
// ============================================================================
/// Multiplier at the start of every round.
pub const INITIAL_MULTIPLIER: Multiplier = 0.0;
/// Multiplier gained per tick at unit speed.
pub const MULTIPLIER_INCREMENT: Multiplier = 0.05;
/// Hard ceiling: the round always ends once reached.
pub const MAX_MULTIPLIER: Multiplier = 10.0;
/// Lower bound of the per-round speed.
pub const BASE_SPEED: f64 = 1.5;
/// Upper bound of the per-round speed.
pub const MAX_SPEED: f64 = 3.0;
/// Probability of redrawing the speed after a tick.
pub const SPEED_CHANGE_CHANCE: f64 = 0.5;
/// Per-tick crash probability at multiplier 1.0.
pub const CRASH_BASE_CHANCE: f64 = 0.03;
/// Crash probability gained per unit of multiplier above 1.0.
pub const CRASH_SLOPE: f64 = 1.0 / 200.0;

// ============================================================================
// FIELD
// ============================================================================
/// Columns of the rendered flight field.
pub const FIELD_WIDTH: usize = 20;
/// Rows of the rendered flight field.
pub const FIELD_HEIGHT: usize = 15;
/// Empty cell.
pub const GLYPH_BACKGROUND: &str = "•";
/// Cell on the flight path.
pub const GLYPH_TRAIL: &str = "/";
/// Head of the flight path.
pub const GLYPH_ROCKET: &str = "🚀";
/// Marker used in crash notices.
pub const GLYPH_EXPLOSION: &str = "💥";

// ============================================================================
// SCHEDULE
// ============================================================================
/// Period of the flight tick.
pub const TICK_INTERVAL: Duration = Duration::from_millis(300);
/// How long bets are accepted before launch.
pub const JOIN_WINDOW: Duration = Duration::from_secs(15);
/// Quiet time after every settlement.
pub const ROUND_PAUSE: Duration = Duration::from_secs(5);
/// Every this many rounds an extended pause follows settlement.
pub const PAUSE_EVERY_N_ROUNDS: u64 = 3;
/// Length of the extended pause.
pub const EXTENDED_PAUSE: Duration = Duration::from_secs(120);

// ============================================================================
// SESSIONS
// ============================================================================
/// Consecutive idle rounds after which notifications are muted.
pub const INACTIVE_ROUND_LIMIT: u32 = 3;
/// Crash multipliers shown in status messages.
pub const HISTORY_SHOWN: usize = 5;

// ============================================================================
// DELIVERY
// ============================================================================
/// Attempts per delivery before giving up on transient failures.
pub const DELIVERY_ATTEMPTS: u32 = 5;
/// First backoff between attempts; doubles after each retry.
pub const DELIVERY_BACKOFF: Duration = Duration::from_secs(1);

// ============================================================================
// HOSTING
// ============================================================================
/// Inbound intents buffered before producers wait on the worker pool.
pub const QUEUE_CAPACITY: usize = 1024;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Dual logging: INFO and up to stderr, DEBUG and up to
/// `logs/liftoff-<unix time>.log`. Records from other crates are dropped.
#[cfg(feature = "server")]
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str(env!("CARGO_CRATE_NAME"))
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .set_time_format_rfc3339()
        .build();
    let started = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();
    let path = format!("logs/{}-{}.log", env!("CARGO_CRATE_NAME"), started);
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(&path).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config,
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
    log::debug!("[casino] logging to {}", path);
}

/// Register Ctrl+C handler for immediate (non-graceful) termination.
#[cfg(feature = "server")]
pub fn kys() {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("failed to listen for interrupt: {}", e);
            return;
        }
        eprintln!();
        log::warn!("violent interrupt received, exiting immediately");
        std::process::exit(0);
    });
}
