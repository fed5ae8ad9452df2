//! Deployment-time governance parameters.
//!
//! Neither value has a built-in default: every deployment states its own
//! quorum and per-voter cap.

use motion_types::TokenAmount;
use serde::{Deserialize, Serialize};

use crate::error::GovernanceError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaoParams {
    /// Votes a proposal must strictly exceed before it can be finalized.
    pub quorum: TokenAmount,
    /// Ceiling on one voter's cumulative stake in one proposal.
    pub max_vote_per_proposal: TokenAmount,
}

impl DaoParams {
    pub fn new(quorum: TokenAmount, max_vote_per_proposal: TokenAmount) -> Self {
        Self {
            quorum,
            max_vote_per_proposal,
        }
    }

    /// A zero cap would make every vote fail.
    pub fn validate(&self) -> Result<(), GovernanceError> {
        if self.max_vote_per_proposal.is_zero() {
            return Err(GovernanceError::InvalidParams(
                "max_vote_per_proposal must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
