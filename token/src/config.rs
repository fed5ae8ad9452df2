//! Deployment parameters for a token.

use serde::{Deserialize, Serialize};

use motion_types::{Address, TokenAmount};

use crate::error::TokenError;

/// Parameters used to deploy a [`crate::Token`].
///
/// `initial_supply` is in whole tokens; the raw supply minted to `deployer`
/// is `initial_supply * 10^decimals`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Address of the token contract itself.
    pub address: Address,
    pub name: String,
    pub symbol: String,
    #[serde(default = "default_decimals")]
    pub decimals: u8,
    pub initial_supply: u64,
    /// Receives the whole initial supply.
    pub deployer: Address,
}

fn default_decimals() -> u8 {
    TokenAmount::DEFAULT_DECIMALS
}

impl TokenConfig {
    /// Raw supply minted at deployment.
    pub fn raw_supply(&self) -> Result<TokenAmount, TokenError> {
        TokenAmount::from_units(u128::from(self.initial_supply), self.decimals)
            .map_err(|e| TokenError::InvalidConfig(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), TokenError> {
        if self.name.trim().is_empty() {
            return Err(TokenError::InvalidConfig("name must not be empty".into()));
        }
        if self.symbol.trim().is_empty() {
            return Err(TokenError::InvalidConfig("symbol must not be empty".into()));
        }
        self.raw_supply().map(|_| ())
    }
}
