use crate::*;

/// Winnings for `bet` cashed out at `multiplier`, after the house fee.
/// Rounded down to whole chips.
pub fn payout(bet: Chips, multiplier: Multiplier, fee: f64) -> Chips {
    let win = bet as f64 * multiplier * (1.0 - fee);
    if win.is_finite() && win > 0.0 {
        win.floor() as Chips
    } else {
        0
    }
}
