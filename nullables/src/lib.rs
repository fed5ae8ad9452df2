//! Nullable infrastructure for deterministic testing.
//!
//! External collaborators of the DAO engine are abstracted behind traits.
//! This crate provides test-friendly implementations that:
//! - Behave like the real thing by default
//! - Record what was asked of them
//! - Can be told to fail on demand
//!
//! Usage: swap real implementations for nullables in tests.

pub mod ledger;

pub use ledger::{LedgerCall, NullLedger};
