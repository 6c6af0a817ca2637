use crate::actions::Adjust;
use crate::actions::Intent;
use crate::*;
use serde::Serialize;

/// Buttons attached to a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Keyboard {
    #[default]
    None,
    /// Bet adjustments and one-tap amounts.
    Bets,
    /// A single cash-out button, shown while a bet rides.
    CashOut,
}

/// A tappable button. `data` is what the channel hands back on tap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Button {
    pub label: String,
    pub data: String,
}

impl Button {
    pub fn new<S>(label: S, intent: Intent) -> Self
    where
        S: Into<String>,
    {
        Self {
            label: label.into(),
            data: intent.callback(),
        }
    }
}

impl Keyboard {
    pub fn rows(&self) -> Vec<Vec<Button>> {
        match self {
            Keyboard::None => Vec::new(),
            Keyboard::Bets => vec![
                vec![
                    Button::new("/2", Intent::Adjust(Adjust::Halve)),
                    Button::new("Repeat", Intent::Adjust(Adjust::Repeat)),
                    Button::new("x2", Intent::Adjust(Adjust::Double)),
                ],
                FIXED_BETS
                    .iter()
                    .map(|amount| Button::new(amount.to_string(), Intent::PlaceBet(*amount)))
                    .collect(),
            ],
            Keyboard::CashOut => vec![vec![Button::new("💰 Cash out", Intent::CashOut)]],
        }
    }
}
