//! Conversions between ether decimals and base units.

use crate::ETHER_DECIMALS;
use alloy_primitives::{
    U256,
    utils::{ParseUnits, UnitsError, format_units, parse_units},
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

/// Why a decimal string is not an [`EtherAmount`].
#[derive(Debug, thiserror::Error)]
pub enum AmountError {
    /// The input is below zero.
    #[error("amount must not be negative")]
    Negative,
    /// The input has more fractional digits than ether has decimals.
    #[error("amount has {digits} fractional digits, ether has {ETHER_DECIMALS}")]
    TooPrecise {
        /// Significant fractional digits in the input.
        digits: usize,
    },
    /// The input is not a decimal number.
    #[error(transparent)]
    Units(#[from] UnitsError),
}

/// A value in base units, displayed and parsed as a decimal amount of ether.
///
/// `10^18` base units make one ether. The decimal form only exists at the edges:
/// [`FromStr`] applies the ether parsing rule and [`Display`](fmt::Display) renders the exact
/// quotient `base_units / 10^18` without trailing zeros.
///
/// ```
/// use missive_common::EtherAmount;
///
/// let amount: EtherAmount = "0.00001".parse().unwrap();
/// assert_eq!(amount.to_wei().to_string(), "10000000000000");
/// assert_eq!(amount.to_string(), "0.00001");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EtherAmount(U256);

impl EtherAmount {
    /// Zero ether.
    pub const ZERO: Self = Self(U256::ZERO);

    /// Wraps an amount of base units.
    pub const fn from_wei(wei: U256) -> Self {
        Self(wei)
    }

    /// Returns the amount in base units.
    pub const fn to_wei(self) -> U256 {
        self.0
    }
}

impl From<U256> for EtherAmount {
    fn from(wei: U256) -> Self {
        Self(wei)
    }
}

impl From<EtherAmount> for U256 {
    fn from(amount: EtherAmount) -> Self {
        amount.0
    }
}

impl FromStr for EtherAmount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some((_, fraction)) = s.split_once('.') {
            let digits = fraction.trim_end_matches('0').len();
            if digits > ETHER_DECIMALS as usize {
                return Err(AmountError::TooPrecise { digits });
            }
        }
        match parse_units(s, ETHER_DECIMALS)? {
            ParseUnits::U256(wei) => Ok(Self(wei)),
            ParseUnits::I256(_) => Err(AmountError::Negative),
        }
    }
}

impl fmt::Display for EtherAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 18 decimals always fit in a `U256`, formatting cannot fail
        let formatted = format_units(self.0, ETHER_DECIMALS).map_err(|_| fmt::Error)?;
        f.write_str(trim_decimals(&formatted))
    }
}

impl Serialize for EtherAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EtherAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

fn trim_decimals(s: &str) -> &str {
    if !s.contains('.') {
        return s;
    }
    s.trim_end_matches('0').trim_end_matches('.')
}
