//! Token amount type.
//!
//! Amounts are fixed-point integers (u128) in the token's smallest unit.
//! A whole token is `10^decimals` raw units; the Motion token uses 18 decimals.
//! Serialized as a decimal string so JSON consumers never lose precision.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};

use crate::error::MotionError;

/// An amount of tokens, in raw units.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct TokenAmount(u128);

impl TokenAmount {
    pub const ZERO: Self = Self(0);

    /// Decimals used by the Motion token.
    pub const DEFAULT_DECIMALS: u8 = 18;

    pub const fn new(raw: u128) -> Self {
        Self(raw)
    }

    /// `whole` tokens at [`Self::DEFAULT_DECIMALS`].
    ///
    /// # Panics
    /// Panics on overflow (more than ~3.4e20 whole tokens).
    pub fn from_tokens(whole: u128) -> Self {
        match Self::from_units(whole, Self::DEFAULT_DECIMALS) {
            Ok(amount) => amount,
            Err(e) => panic!("{e}"),
        }
    }

    /// `whole` tokens scaled by `10^decimals`, with overflow checking.
    pub fn from_units(whole: u128, decimals: u8) -> Result<Self, MotionError> {
        10u128
            .checked_pow(u32::from(decimals))
            .and_then(|scale| whole.checked_mul(scale))
            .map(Self)
            .ok_or(MotionError::AmountOverflow { whole, decimals })
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }
}

impl Add for TokenAmount {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for TokenAmount {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Sum for TokenAmount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, a| acc + a)
    }
}

impl From<u128> for TokenAmount {
    fn from(raw: u128) -> Self {
        Self(raw)
    }
}

impl TryFrom<String> for TokenAmount {
    type Error = MotionError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse::<u128>()
            .map(Self)
            .map_err(|_| MotionError::InvalidAmount(s))
    }
}

impl From<TokenAmount> for String {
    fn from(amount: TokenAmount) -> Self {
        amount.0.to_string()
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
