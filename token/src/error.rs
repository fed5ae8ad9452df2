//! Ledger errors.

use motion_types::TokenAmount;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("insufficient allowance: need {needed}, approved {available}")]
    InsufficientAllowance {
        needed: TokenAmount,
        available: TokenAmount,
    },

    #[error("insufficient balance: need {needed}, have {available}")]
    InsufficientBalance {
        needed: TokenAmount,
        available: TokenAmount,
    },

    #[error("arithmetic overflow in ledger")]
    Overflow,

    #[error("invalid token config: {0}")]
    InvalidConfig(String),
}
