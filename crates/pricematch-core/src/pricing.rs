//! Price arithmetic shared by the comparison controller.
//!
//! All prices are [`Decimal`]s. Display rounding is half away from zero.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Percentage above which the main price is flagged as too expensive.
const WARNING_CEILING_PERCENT: Decimal = Decimal::TEN;

/// Parses a retailer price string such as `"15.99"`, `"R15.99"` or
/// `"R 1,299.00"`. Returns `None` when nothing numeric remains.
#[must_use]
pub fn parse_price(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    let without_currency = trimmed
        .strip_prefix('R')
        .or_else(|| trimmed.strip_prefix('r'))
        .unwrap_or(trimmed);
    let cleaned: String = without_currency
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

/// Formats `value` with exactly `dp` decimal places.
#[must_use]
pub fn fixed(value: Decimal, dp: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded.to_string()
}

/// Formats an amount in rand, e.g. `R18.50`.
#[must_use]
pub fn format_rand(amount: Decimal) -> String {
    format!("R{}", fixed(amount, 2))
}

/// How a source's price compares to the main price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Main price is more than 10% above the source (red).
    Negative,
    /// Main price is between 0% and 10% above the source (orange).
    Warning,
    /// Main price is below the source (green).
    Positive,
}

impl Tone {
    #[must_use]
    pub fn from_percentage(percentage: Decimal) -> Self {
        if percentage > WARNING_CEILING_PERCENT {
            Tone::Negative
        } else if percentage >= Decimal::ZERO {
            Tone::Warning
        } else {
            Tone::Positive
        }
    }

    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Tone::Negative => "red",
            Tone::Warning => "orange",
            Tone::Positive => "green",
        }
    }
}

/// Difference between the main price and one source's price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceDifference {
    pub percentage: Decimal,
    pub amount: Decimal,
}

impl PriceDifference {
    /// Returns `None` when `source_price` is not positive or the result does
    /// not fit in a `Decimal`.
    #[must_use]
    pub fn between(main_price: Decimal, source_price: Decimal) -> Option<Self> {
        if source_price <= Decimal::ZERO {
            return None;
        }
        let amount = main_price.checked_sub(source_price)?;
        let percentage = amount
            .checked_div(source_price)?
            .checked_mul(Decimal::ONE_HUNDRED)?;
        Some(Self { percentage, amount })
    }

    #[must_use]
    pub fn tone(&self) -> Tone {
        Tone::from_percentage(self.percentage)
    }

    /// `"<pct>% (R<amt>)"`, one decimal place each.
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}% (R{})", fixed(self.percentage, 1), fixed(self.amount, 1))
    }
}

/// Arithmetic mean of two prices; `None` on overflow.
#[must_use]
pub fn average(a: Decimal, b: Decimal) -> Option<Decimal> {
    a.checked_add(b)?.checked_div(Decimal::TWO)
}

/// `base * (1 + percentage / 100)`, rounded to two decimal places. `None` if
/// the result does not fit in a `Decimal`.
#[must_use]
pub fn apply_percentage_adjustment(base: Decimal, percentage: Decimal) -> Option<Decimal> {
    let factor = Decimal::ONE.checked_add(percentage.checked_div(Decimal::ONE_HUNDRED)?)?;
    Some(
        base.checked_mul(factor)?
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
    )
}
