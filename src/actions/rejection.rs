use super::*;
use crate::*;

/// A player intent that was refused. Nothing was mutated.
/// The `Display` text is the reply the player sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("Sorry, bets are closed right now. Wait for the next round.")]
    BettingClosed,
    #[error("The bet must be between {min} and {max}.", min = MIN_BET, max = MAX_BET)]
    OutOfRange,
    #[error("Insufficient funds. Your balance: {balance}")]
    InsufficientFunds { balance: Chips },
    #[error("{}", .0.missing())]
    NoBet(Adjust),
    #[error("The minimum bet is {min}. Cannot lower the current bet.", min = MIN_BET)]
    BelowMinimum,
    #[error("The maximum bet is {max}. Cannot raise the current bet.", max = MAX_BET)]
    AboveMaximum,
    #[error("Cannot cash out right now.")]
    CannotCashOut,
    #[error("Please enter a valid bet from {min} to {max}.", min = MIN_BET, max = MAX_BET)]
    InvalidAmount,
    #[error("Please enter a valid number for the bet.")]
    NotANumber,
    #[error("Unknown command. Use /help for the list of commands.")]
    UnknownCommand,
    #[error("Unknown command.")]
    UnknownButton,
}
