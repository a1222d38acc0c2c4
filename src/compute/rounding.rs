//! Statutory benefit rounding
//!
//! Benefit increases rounded to the upper dime before the 1981 amendments
//! took effect (June 1982 increase) and to the lower dime from then on.
//! Payable amounts are floored to the dollar.

use crate::worker::DateMy;

/// First benefit month under lower-dime rounding
pub const LOWER_DIME_START: DateMy = DateMy { year: 1982, month: 6 };

/// Round down to the lower dime
pub fn dime_down(amount: f64) -> f64 {
    // Small epsilon absorbs float error on exact-dime values
    ((amount * 10.0 + 1e-9).floor()) / 10.0
}

/// Round up to the next dime
pub fn dime_up(amount: f64) -> f64 {
    ((amount * 10.0 - 1e-9).ceil()) / 10.0
}

/// Round to the dime per the rule in force on the benefit date
pub fn dime_for(amount: f64, benefit_date: DateMy) -> f64 {
    if benefit_date >= LOWER_DIME_START {
        dime_down(amount)
    } else {
        dime_up(amount)
    }
}

/// Floor a payable amount to the dollar
pub fn dollar_down(amount: f64) -> f64 {
    (amount + 1e-9).floor()
}

/// Round to cents (for intermediate series kept in dollars-and-cents)
pub fn cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
