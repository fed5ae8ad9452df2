//! Treasury governance for the Motion DAO.
//!
//! Token holders fund a shared treasury, anyone proposes disbursements,
//! holders stake tokens as votes, and any caller finalizes a proposal once
//! its votes strictly exceed the quorum.
//!
//! Key rules:
//! - votes are token-weighted and escrowed into the treasury, never refunded;
//! - one voter's cumulative stake per proposal is capped;
//! - each proposal pays out at most once.
//!
//! The engine is a serialized state machine: each operation either fully
//! applies (state, ledger transfer, event) or leaves everything unchanged.

pub mod engine;
pub mod error;
pub mod event;
pub mod finalize;
pub mod indexer;
pub mod params;
pub mod proposal;
pub mod tally;

pub use engine::DaoEngine;
pub use error::GovernanceError;
pub use event::{DaoEvent, EventBus};
pub use indexer::{DaoIndex, IndexedProposal};
pub use params::DaoParams;
pub use proposal::{Proposal, ProposalRegistry};
pub use tally::VoteTally;
