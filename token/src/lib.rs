//! Fungible token ledger.
//!
//! The governance engine never owns balances itself; it consumes the
//! [`TokenLedger`] contract. This crate defines that contract and ships an
//! in-memory implementation, [`Token`], with ERC-20 style allowances:
//! an owner approves a spender, the spender pulls with `transfer_from`.

pub mod config;
pub mod error;
pub mod ledger;
pub mod token;

pub use config::TokenConfig;
pub use error::TokenError;
pub use ledger::TokenLedger;
pub use token::Token;
