//! Deployment configuration with TOML file support.
//!
//! ```toml
//! [token]
//! address = "0x00000000000000000000000000000000000000aa"
//! name = "MotionToken"
//! symbol = "MOTN"
//! initial_supply = 1000000
//! deployer = "0x0000000000000000000000000000000000000001"
//!
//! [dao]
//! address = "0x0000000000000000000000000000000000000da0"
//! quorum = "30"
//! max_vote_per_proposal = "25"
//!
//! [logging]
//! format = "json"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use motion_governance::DaoParams;
use motion_token::TokenConfig;
use motion_types::Address;
use motion_utils::{parse_amount, LogFormat};

use crate::error::ConfigError;

/// Everything needed to stand up a token and a DAO on top of it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MotionConfig {
    pub token: TokenConfig,
    pub dao: DaoSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// DAO deployment parameters. Amounts are decimal strings in whole tokens
/// (`"30"`, `"0.5"`) and are scaled by the token's decimals.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DaoSection {
    pub address: Address,
    pub quorum: String,
    pub max_vote_per_proposal: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggingSection {
    #[serde(default)]
    pub format: LogFormat,

    /// Filter directive: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: default_log_level(),
        }
    }
}

impl MotionConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Governance parameters in raw token units.
    pub fn dao_params(&self) -> Result<DaoParams, ConfigError> {
        let decimals = self.token.decimals;
        let quorum = parse_amount(&self.dao.quorum, decimals).map_err(|source| {
            ConfigError::Amount {
                field: "dao.quorum",
                source,
            }
        })?;
        let cap = parse_amount(&self.dao.max_vote_per_proposal, decimals).map_err(|source| {
            ConfigError::Amount {
                field: "dao.max_vote_per_proposal",
                source,
            }
        })?;
        Ok(DaoParams::new(quorum, cap))
    }

    /// Check the whole deployment without building it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.token.validate()?;
        self.dao_params()?.validate()?;
        if self.dao.address == self.token.address {
            return Err(ConfigError::Conflict(
                "dao.address must differ from token.address".into(),
            ));
        }
        if self.dao.address == self.token.deployer {
            return Err(ConfigError::Conflict(
                "dao.address must differ from token.deployer".into(),
            ));
        }
        Ok(())
    }
}
