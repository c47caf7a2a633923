use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// VAT rate applied to an invoice entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Vat {
    #[serde(rename = "VAT_0")]
    Vat0,
    #[serde(rename = "VAT_5")]
    Vat5,
    #[serde(rename = "VAT_8")]
    Vat8,
    #[serde(rename = "VAT_23")]
    Vat23,
}

impl Vat {
    pub const ALL: [Vat; 4] = [Vat::Vat0, Vat::Vat5, Vat::Vat8, Vat::Vat23];

    /// Rate as a fraction (0.23 for 23%).
    pub fn rate(self) -> Decimal {
        match self {
            Vat::Vat0 => Decimal::new(0, 2),
            Vat::Vat5 => Decimal::new(5, 2),
            Vat::Vat8 => Decimal::new(8, 2),
            Vat::Vat23 => Decimal::new(23, 2),
        }
    }

    /// Whole percentage (23 for 23%).
    pub fn percent(self) -> u32 {
        match self {
            Vat::Vat0 => 0,
            Vat::Vat5 => 5,
            Vat::Vat8 => 8,
            Vat::Vat23 => 23,
        }
    }

    /// Tax due on `net`, rounded half-even to cents.
    pub fn tax_on(self, net: Decimal) -> Decimal {
        round_money(net * self.rate())
    }
}

impl core::fmt::Display for Vat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

/// Round a money amount half-even to two decimal places.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn serializes_by_rate_name() {
        let json = serde_json::to_string(&Vat::Vat23).unwrap();
        assert_eq!(json, "\"VAT_23\"");
        let back: Vat = serde_json::from_str("\"VAT_5\"").unwrap();
        assert_eq!(back, Vat::Vat5);
    }

    #[test]
    fn tax_rounds_half_even() {
        // 0.23 * 10.50 = 2.415 -> 2.42 (nearest even of 2.41/2.42 is 2.42)
        assert_eq!(Vat::Vat23.tax_on(dec!(10.50)), dec!(2.42));
        // 0.05 * 0.50 = 0.025 -> 0.02
        assert_eq!(Vat::Vat5.tax_on(dec!(0.50)), dec!(0.02));
        assert_eq!(Vat::Vat0.tax_on(dec!(999.99)), dec!(0));
    }

    #[test]
    fn displays_percentage() {
        assert_eq!(Vat::Vat8.to_string(), "8%");
    }
}
