//! Fundamental types for the Motion DAO.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! account addresses, token amounts and proposal identifiers.

pub mod address;
pub mod amount;
pub mod error;

pub use address::Address;
pub use amount::TokenAmount;
pub use error::MotionError;

/// Sequential proposal identifier. The first proposal is 1; ids are never reused.
pub type ProposalId = u64;
