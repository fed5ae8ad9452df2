//! Errors raised while parsing or constructing shared types.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MotionError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("amount overflows u128: {whole} tokens at {decimals} decimals")]
    AmountOverflow { whole: u128, decimals: u8 },
}
