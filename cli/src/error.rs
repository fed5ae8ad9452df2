use motion_governance::GovernanceError;
use motion_token::TokenError;
use motion_utils::AmountParseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid amount for {field}: {source}")]
    Amount {
        field: &'static str,
        source: AmountParseError,
    },

    #[error("invalid token section: {0}")]
    Token(#[from] TokenError),

    #[error("invalid dao section: {0}")]
    Dao(#[from] GovernanceError),

    #[error("{0}")]
    Conflict(String),
}

/// Why a single script step was not applied.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StepError {
    #[error("bad amount: {0}")]
    Amount(#[from] AmountParseError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Governance(#[from] GovernanceError),
}
