// Copyright (c) 2024 Amuse Finance

//! Fixed-point token amounts.
//!
//! Every balance, stake and pool value is held as an unsigned integer count of
//! base units, with [`DECIMALS`] fractional digits per whole token (the same
//! layout as an ERC20 token with 18 decimals). All arithmetic is checked;
//! nothing in this crate silently wraps or saturates.
//!
//! Amounts parse from and format to decimal token strings:
//!
//! ```
//! use amd_token_ledger::Amount;
//!
//! let amount: Amount = "17.5".parse().unwrap();
//! assert_eq!(amount.base_units(), 17_500_000_000_000_000_000);
//! assert_eq!(amount.to_string(), "17.5");
//! assert_eq!(Amount::from_tokens(900).to_string(), "900.0");
//! ```

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Number of fractional decimal digits in a token amount.
pub const DECIMALS: u32 = 18;

/// Base units per whole token (10^18).
pub const BASE_UNITS_PER_TOKEN: u128 = 1_000_000_000_000_000_000;

/// An unsigned fixed-point token amount with 18 decimal places.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(u128);

/// Errors from parsing a decimal amount string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseAmountError {
    #[error("amount is empty")]
    Empty,

    #[error("amount must not be negative: {0}")]
    Negative(String),

    #[error("amount is not a decimal number: {0}")]
    Malformed(String),

    #[error("amount has more than 18 fractional digits: {0}")]
    TooPrecise(String),

    #[error("amount does not fit in 128 bits: {0}")]
    Overflow(String),
}

impl Amount {
    /// The zero amount.
    pub const ZERO: Amount = Amount(0);

    /// Construct from a raw count of base units.
    pub const fn from_base_units(units: u128) -> Self {
        Self(units)
    }

    /// Construct from a whole number of tokens.
    pub const fn from_tokens(tokens: u64) -> Self {
        Self(tokens as u128 * BASE_UNITS_PER_TOKEN)
    }

    /// Raw count of base units.
    pub const fn base_units(self) -> u128 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }

    /// Compute `self * numerator / denominator`, truncating toward zero.
    ///
    /// Returns `None` on overflow of the intermediate product or a zero
    /// denominator.
    pub fn checked_mul_ratio(self, numerator: u64, denominator: u64) -> Option<Amount> {
        if denominator == 0 {
            return None;
        }
        self.0
            .checked_mul(u128::from(numerator))
            .map(|product| Amount(product / u128::from(denominator)))
    }
}

impl fmt::Display for Amount {
    /// Formats like ethers' `formatEther`: the fractional part has its
    /// trailing zeros removed but keeps at least one digit.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / BASE_UNITS_PER_TOKEN;
        let frac = self.0 % BASE_UNITS_PER_TOKEN;
        let digits = format!("{:0width$}", frac, width = DECIMALS as usize);
        let trimmed = digits.trim_end_matches('0');
        if trimmed.is_empty() {
            write!(f, "{whole}.0")
        } else {
            write!(f, "{whole}.{trimmed}")
        }
    }
}

impl FromStr for Amount {
    type Err = ParseAmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseAmountError::Empty);
        }
        if s.starts_with('-') {
            return Err(ParseAmountError::Negative(s.to_string()));
        }

        let (whole, frac) = match s.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (s, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(ParseAmountError::Malformed(s.to_string()));
        }
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(whole) || !all_digits(frac) {
            return Err(ParseAmountError::Malformed(s.to_string()));
        }
        if frac.len() > DECIMALS as usize {
            return Err(ParseAmountError::TooPrecise(s.to_string()));
        }

        let overflow = || ParseAmountError::Overflow(s.to_string());
        let whole_units = if whole.is_empty() {
            0
        } else {
            whole
                .parse::<u128>()
                .map_err(|_| overflow())?
                .checked_mul(BASE_UNITS_PER_TOKEN)
                .ok_or_else(overflow)?
        };
        let frac_units = if frac.is_empty() {
            0
        } else {
            // Right-pad to 18 digits so "5" means 0.5, not 5e-18.
            let padded = format!("{:0<width$}", frac, width = DECIMALS as usize);
            padded.parse::<u128>().map_err(|_| overflow())?
        };

        whole_units
            .checked_add(frac_units)
            .map(Amount)
            .ok_or_else(overflow)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Amount {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Amount {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_whole_and_fractional() {
        assert_eq!("1000".parse::<Amount>().unwrap(), Amount::from_tokens(1000));
        assert_eq!(
            "2.45".parse::<Amount>().unwrap().base_units(),
            2_450_000_000_000_000_000
        );
        assert_eq!(".5".parse::<Amount>().unwrap().base_units(), BASE_UNITS_PER_TOKEN / 2);
        assert_eq!("7.".parse::<Amount>().unwrap(), Amount::from_tokens(7));
        assert_eq!(
            "0.000000000000000001".parse::<Amount>().unwrap(),
            Amount::from_base_units(1)
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!("".parse::<Amount>(), Err(ParseAmountError::Empty));
        assert!(matches!("-1".parse::<Amount>(), Err(ParseAmountError::Negative(_))));
        assert!(matches!("1e18".parse::<Amount>(), Err(ParseAmountError::Malformed(_))));
        assert!(matches!(".".parse::<Amount>(), Err(ParseAmountError::Malformed(_))));
        assert!(matches!("1.2.3".parse::<Amount>(), Err(ParseAmountError::Malformed(_))));
        assert!(matches!(
            "0.0000000000000000001".parse::<Amount>(),
            Err(ParseAmountError::TooPrecise(_))
        ));
        assert!(matches!(
            "999999999999999999999999999999999999999".parse::<Amount>(),
            Err(ParseAmountError::Overflow(_))
        ));
    }

    #[test]
    fn test_display_matches_format_ether() {
        assert_eq!(Amount::ZERO.to_string(), "0.0");
        assert_eq!(Amount::from_tokens(900).to_string(), "900.0");
        assert_eq!(Amount::from_base_units(1).to_string(), "0.000000000000000001");
        assert_eq!("17.80".parse::<Amount>().unwrap().to_string(), "17.8");
    }

    #[test]
    fn test_mul_ratio_truncates() {
        let amount = Amount::from_base_units(999);
        assert_eq!(amount.checked_mul_ratio(10, 100), Some(Amount::from_base_units(99)));
        assert_eq!(amount.checked_mul_ratio(1, 0), None);
        assert_eq!(Amount::from_base_units(u128::MAX).checked_mul_ratio(2, 1), None);
    }
}
