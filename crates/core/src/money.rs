//! Decimal money value type.
//!
//! All monetary values in the configurator are decimals, never binary
//! floats: the quote is recomputed on every keystroke and binary floats
//! accumulate error across repeated derivations (percent ⇄ amount).

use core::ops::{Add, Neg, Sub};
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A monetary amount (currency-agnostic, BRL in practice).
///
/// Compared by value. Arithmetic is exact decimal arithmetic; rounding to
/// display precision happens only where the pricing rules call for it
/// (`round2`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Whole currency units (e.g. `from_major(105_990)` == R$ 105.990,00).
    pub fn from_major(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Round to 2 decimal places, half-up (currency display convention).
    pub fn round2(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// `percent` percent of this amount, rounded to 2 decimal places.
    pub fn percent_of(self, percent: Decimal) -> Money {
        Money(self.0 * percent / Decimal::ONE_HUNDRED).round2()
    }

    /// What percentage this amount is of `base`, rounded to 2 decimal places.
    ///
    /// Returns zero when `base` is zero; callers in the pricing engine guard
    /// on a positive base before deriving a percentage.
    pub fn percent_against(self, base: Money) -> Decimal {
        let ratio = match self.0.checked_div(base.0) {
            Some(r) => r,
            None => return Decimal::ZERO,
        };
        (ratio * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Multiply by a unit count (quote quantity).
    pub fn times(self, quantity: u32) -> Money {
        Money(self.0 * Decimal::from(quantity))
    }

    /// Format as a Brazilian currency string: thousands `.`, decimal `,`,
    /// always 2 decimal places (`105.990,00`).
    pub fn format_brl(&self) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let negative = rounded.is_sign_negative();
        let scale = rounded.scale();
        let factor = 10u128.pow(2u32.saturating_sub(scale));
        let total_cents = rounded.mantissa().unsigned_abs() * factor;

        let units = (total_cents / 100).to_string();
        let cents = (total_cents % 100) as u32;

        let mut grouped = String::with_capacity(units.len() + units.len() / 3);
        for (i, ch) in units.chars().enumerate() {
            if i > 0 && (units.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        format!("{}{},{:02}", if negative { "-" } else { "" }, grouped, cents)
    }

    /// Lenient parse of a live form input ("105.990,00", "R$ 1.650,00",
    /// "5000", "5000.50").
    ///
    /// Returns `None` for unparsable input; the configurator substitutes its
    /// fallback value rather than surfacing an error.
    pub fn parse_brl(input: &str) -> Option<Money> {
        let trimmed = input.trim().trim_start_matches("R$").trim();
        if trimmed.is_empty() {
            return None;
        }

        // With a decimal comma present, dots are thousands separators.
        // Without one, a dot (if any) is the decimal point.
        let normalized = if trimmed.contains(',') {
            trimmed.replace('.', "").replace(',', ".")
        } else {
            trimmed.to_string()
        };

        Decimal::from_str(&normalized).ok().map(Money)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Money {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s)
            .map_err(|e| DomainError::validation(format!("invalid amount: {e}")))?;
        Ok(Self(amount))
    }
}
