use crate::actions::Rejection;
use crate::engine::Field;
use crate::*;
use std::time::Duration;

/// Everything the game says to a player.
/// Rendered to channel text through `Display`.
#[derive(Clone, Debug, PartialEq)]
pub enum Notice {
    Welcome,
    Help,
    /// `/bet` without an amount.
    BetPrompt,
    Stats {
        bet: Chips,
        balance: Chips,
        total_win: Chips,
        games_played: u64,
        rounds_left: u32,
        notifications: bool,
    },
    NoStats,
    /// A new round is open for bets.
    Announce { round: u64, join: Duration },
    /// Confirmation of a placed bet.
    Accepted { bet: Chips, balance: Chips },
    /// The per-round bet-status message, later edited into the flight.
    Ticket { bet: Chips, balance: Chips },
    /// Live flight status for one player.
    Flight {
        multiplier: Multiplier,
        win: Chips,
        players: u32,
        total: Chips,
        history: Vec<Multiplier>,
    },
    CashedOut {
        win: Chips,
        multiplier: Multiplier,
        balance: Chips,
    },
    /// Sent to players whose bet rode into the crash.
    Crashed { multiplier: Multiplier },
    /// Round summary for players who cashed out.
    Summary {
        round: u64,
        multiplier: Multiplier,
        players: u32,
        total: Chips,
    },
    Pause { duration: Duration },
    Notifications(bool),
    Rejected(Rejection),
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Notice::Welcome => write!(
                f,
                "Welcome aboard! Send an amount or use /bet to place a bet."
            ),
            Notice::Help => write!(
                f,
                "Available commands:\n\
                 /bet <amount> - place a bet\n\
                 /stats - show your stats\n\
                 /toggle_notifications - turn round notifications on or off\n\
                 To bet, you can also just send the amount."
            ),
            Notice::BetPrompt => write!(f, "Please enter a bet amount. For example: 100"),
            Notice::Stats {
                bet,
                balance,
                total_win,
                games_played,
                rounds_left,
                notifications,
            } => write!(
                f,
                "📊 Your stats:\n\
                 Current bet: {}\n\
                 Balance: {}\n\
                 Total won: {}\n\
                 Games played: {}\n\
                 Rounds before mute: {}\n\
                 Notifications: {}",
                bet,
                balance,
                total_win,
                games_played,
                rounds_left,
                if *notifications { "on" } else { "off" }
            ),
            Notice::NoStats => write!(f, "You have no game stats yet."),
            Notice::Announce { round, join } => write!(
                f,
                "🆕 New round #{}\n\n⏳ Launch in {} seconds\n💰 Place your bets!",
                round,
                join.as_secs()
            ),
            Notice::Accepted { bet, balance } => write!(
                f,
                "Your bet of {} is accepted. Your balance: {}. Wait for the launch!",
                bet, balance
            ),
            Notice::Ticket { bet, balance } => {
                write!(f, "Your bet: {}\nYour balance: {}", bet, balance)
            }
            Notice::Flight {
                multiplier,
                win,
                players,
                total,
                history,
            } => write!(
                f,
                "{}\n💰 Current win: {}\n📈 Multiplier: x{:.2}\n👥 Players: {}\n💵 Total bets: {}\n\n🔥 Recent multipliers:\n{}",
                Field::from(*multiplier),
                win,
                multiplier,
                players,
                total,
                history
                    .iter()
                    .map(|m| format!("{:.2}x", m))
                    .collect::<Vec<_>>()
                    .join(" | ")
            ),
            Notice::CashedOut {
                win,
                multiplier,
                balance,
            } => write!(
                f,
                "🎉 Congratulations!\n\n💰 You cashed out: {}\n📈 Multiplier: x{:.2}\n💼 Your balance: {}",
                win, multiplier, balance
            ),
            Notice::Crashed { multiplier } => write!(
                f,
                "{} Boom! The round crashed at x{:.2}",
                GLYPH_EXPLOSION, multiplier
            ),
            Notice::Summary {
                round,
                multiplier,
                players,
                total,
            } => write!(
                f,
                "🏁 Round #{} finished\n\n{} Crashed at x{:.2}\n📊 Round stats:\n- Players: {}\n- Total bets: {}",
                round, GLYPH_EXPLOSION, multiplier, players, total
            ),
            Notice::Pause { duration } if duration.as_secs() >= 60 => {
                write!(f, "🕐 Pausing for {} minutes", duration.as_secs() / 60)
            }
            Notice::Pause { duration } => {
                write!(f, "🕐 Pausing for {} seconds", duration.as_secs())
            }
            Notice::Notifications(true) => write!(f, "Notifications are on."),
            Notice::Notifications(false) => write!(f, "Notifications are off."),
            Notice::Rejected(rejection) => write!(f, "{}", rejection),
        }
    }
}
