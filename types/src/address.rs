//! Account address type with `0x` prefix.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MotionError;

/// An account address: `0x` followed by 40 hex digits, stored lowercase.
///
/// Addresses identify token holders, the DAO treasury and the token ledger
/// itself. Ordering is lexicographic so maps keyed by address iterate
/// deterministically.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// The standard prefix for all addresses.
    pub const PREFIX: &'static str = "0x";

    /// Number of hex digits after the prefix.
    pub const HEX_LEN: usize = 40;

    /// Parse and normalize an address, rejecting malformed input.
    pub fn parse(raw: &str) -> Result<Self, MotionError> {
        let digits = raw
            .strip_prefix(Self::PREFIX)
            .ok_or_else(|| MotionError::InvalidAddress(raw.to_string()))?;
        if digits.len() != Self::HEX_LEN || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(MotionError::InvalidAddress(raw.to_string()));
        }
        Ok(Self(format!("{}{}", Self::PREFIX, digits.to_ascii_lowercase())))
    }

    /// Deterministic address derived from an index. Handy for fixtures and
    /// scripted deployments.
    pub fn from_index(index: u64) -> Self {
        Self(format!("{}{:040x}", Self::PREFIX, index))
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Address {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = MotionError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}
