use super::*;
use crate::*;

/// Raw input from the chat channel, before decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// A typed message: a `/command` or free text.
    Message(String),
    /// Data carried by a tapped button.
    Callback(String),
}

/// Bet adjustment buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Adjust {
    Halve,
    Repeat,
    Double,
}

impl Adjust {
    pub fn apply(&self, bet: Chips) -> Chips {
        match self {
            Adjust::Halve => bet / 2,
            Adjust::Repeat => bet,
            Adjust::Double => bet.saturating_mul(2),
        }
    }
    /// Reply when there is no bet to adjust.
    pub fn missing(&self) -> &'static str {
        match self {
            Adjust::Halve => "Cannot lower the bet. Place a bet first.",
            Adjust::Repeat => "No previous bet to repeat. Place a new bet.",
            Adjust::Double => "Cannot double the bet. Place a bet first.",
        }
    }
}

/// A decoded player intent. Raw text never gets past this boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Start,
    Help,
    Stats,
    ToggleNotifications,
    /// `/bet` with no amount.
    BetPrompt,
    PlaceBet(Chips),
    Adjust(Adjust),
    CashOut,
}

impl Intent {
    /// Button data that decodes back into this intent.
    pub fn callback(&self) -> String {
        match self {
            Intent::Start => "start".to_string(),
            Intent::Help => "help".to_string(),
            Intent::Stats => "stats".to_string(),
            Intent::ToggleNotifications => "toggle_notifications".to_string(),
            Intent::BetPrompt => "bet".to_string(),
            Intent::PlaceBet(amount) => format!("bet_{}", amount),
            Intent::Adjust(Adjust::Halve) => "half".to_string(),
            Intent::Adjust(Adjust::Repeat) => "repeat".to_string(),
            Intent::Adjust(Adjust::Double) => "double".to_string(),
            Intent::CashOut => "cashout".to_string(),
        }
    }
    fn command(text: &str) -> Result<Self, Rejection> {
        let (command, args) = text
            .trim_start_matches('/')
            .split_once(char::is_whitespace)
            .map(|(command, args)| (command, args.trim()))
            .unwrap_or((text.trim_start_matches('/'), ""));
        let command = command.split('@').next().unwrap_or_default();
        match command {
            "start" => Ok(Intent::Start),
            "help" => Ok(Intent::Help),
            "stats" => Ok(Intent::Stats),
            "toggle_notifications" => Ok(Intent::ToggleNotifications),
            "bet" if args.is_empty() => Ok(Intent::BetPrompt),
            "bet" => args
                .parse::<Chips>()
                .map(Intent::PlaceBet)
                .map_err(|_| Rejection::NotANumber),
            _ => Err(Rejection::UnknownCommand),
        }
    }
    fn button(data: &str) -> Result<Self, Rejection> {
        match data {
            "start" => Ok(Intent::Start),
            "help" => Ok(Intent::Help),
            "stats" => Ok(Intent::Stats),
            "toggle_notifications" => Ok(Intent::ToggleNotifications),
            "bet" => Ok(Intent::BetPrompt),
            "half" => Ok(Intent::Adjust(Adjust::Halve)),
            "repeat" => Ok(Intent::Adjust(Adjust::Repeat)),
            "double" => Ok(Intent::Adjust(Adjust::Double)),
            "cashout" => Ok(Intent::CashOut),
            _ => data
                .strip_prefix("bet_")
                .and_then(|amount| amount.parse::<Chips>().ok())
                .map(Intent::PlaceBet)
                .ok_or(Rejection::UnknownButton),
        }
    }
}

impl TryFrom<&Inbound> for Intent {
    type Error = Rejection;
    fn try_from(inbound: &Inbound) -> Result<Self, Self::Error> {
        match inbound {
            Inbound::Message(text) if text.trim().starts_with('/') => Self::command(text.trim()),
            Inbound::Message(text) => text
                .trim()
                .parse::<Chips>()
                .map(Intent::PlaceBet)
                .map_err(|_| Rejection::InvalidAmount),
            Inbound::Callback(data) => Self::button(data.trim()),
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.callback())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    fn message(text: &str) -> Result<Intent, Rejection> {
        Intent::try_from(&Inbound::Message(text.to_string()))
    }
    fn button(data: &str) -> Result<Intent, Rejection> {
        Intent::try_from(&Inbound::Callback(data.to_string()))
    }
    #[test]
    fn commands() {
        assert_eq!(message("/start"), Ok(Intent::Start));
        assert_eq!(message("/help@liftoff_bot"), Ok(Intent::Help));
        assert_eq!(message("/toggle_notifications"), Ok(Intent::ToggleNotifications));
        assert_eq!(message("/bet"), Ok(Intent::BetPrompt));
        assert_eq!(message("/bet 100"), Ok(Intent::PlaceBet(100)));
        assert_eq!(message("/bet@liftoff_bot  250 "), Ok(Intent::PlaceBet(250)));
        assert_eq!(message("/bet lots"), Err(Rejection::NotANumber));
        assert_eq!(message("/dance"), Err(Rejection::UnknownCommand));
    }
    #[test]
    fn free_text_is_an_amount() {
        assert_eq!(message(" 75 "), Ok(Intent::PlaceBet(75)));
        assert_eq!(message("-5"), Err(Rejection::InvalidAmount));
        assert_eq!(message("hello"), Err(Rejection::InvalidAmount));
    }
    #[test]
    fn buttons() {
        assert_eq!(button("half"), Ok(Intent::Adjust(Adjust::Halve)));
        assert_eq!(button("bet_500"), Ok(Intent::PlaceBet(500)));
        assert_eq!(button("cashout"), Ok(Intent::CashOut));
        assert_eq!(button("bet_x"), Err(Rejection::UnknownButton));
        assert_eq!(button("??"), Err(Rejection::UnknownButton));
    }
    #[test]
    fn callbacks_decode_to_themselves() {
        [
            Intent::Start,
            Intent::Help,
            Intent::Stats,
            Intent::ToggleNotifications,
            Intent::BetPrompt,
            Intent::PlaceBet(50),
            Intent::Adjust(Adjust::Halve),
            Intent::Adjust(Adjust::Repeat),
            Intent::Adjust(Adjust::Double),
            Intent::CashOut,
        ]
        .into_iter()
        .for_each(|intent| assert_eq!(button(&intent.callback()), Ok(intent)));
    }
    #[test]
    fn adjustments() {
        assert_eq!(Adjust::Halve.apply(25), 12);
        assert_eq!(Adjust::Repeat.apply(25), 25);
        assert_eq!(Adjust::Double.apply(25), 50);
        assert_eq!(Adjust::Double.apply(Chips::MAX), Chips::MAX);
    }
}
