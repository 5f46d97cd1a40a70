//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a price from an amount in cents.
    #[must_use]
    pub fn from_cents(cents: i64, currency_code: CurrencyCode) -> Self {
        Self {
            amount: Decimal::new(cents, 2),
            currency_code,
        }
    }

    /// Format for display, e.g. `NZ$49.00`.
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency_code.symbol(), self.amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    NZD,
    AUD,
    USD,
}

impl CurrencyCode {
    /// Display symbol, disambiguated for the dollar currencies.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::NZD => "NZ$",
            Self::AUD => "A$",
            Self::USD => "US$",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_nzd() {
        let price = Price::from_cents(4900, CurrencyCode::NZD);
        assert_eq!(price.display(), "NZ$49.00");
        assert_eq!(price.to_string(), "NZ$49.00");
    }

    #[test]
    fn test_display_rounds_to_cents() {
        let price = Price {
            amount: Decimal::new(555, 1),
            currency_code: CurrencyCode::AUD,
        };
        assert_eq!(price.display(), "A$55.50");
    }

    #[test]
    fn test_default_currency_is_nzd() {
        assert_eq!(CurrencyCode::default(), CurrencyCode::NZD);
    }
}
