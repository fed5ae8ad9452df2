//! Quorum-gated execution of proposals.

use motion_token::TokenLedger;
use motion_types::{Address, ProposalId};
use tracing::{debug, info, warn};

use crate::engine::DaoEngine;
use crate::error::GovernanceError;
use crate::event::DaoEvent;

impl<L: TokenLedger> DaoEngine<L> {
    /// Pay out a proposal whose votes strictly exceed the quorum.
    ///
    /// Any caller may finalize. Each proposal can be finalized once; the
    /// `finalized` flag is set before the treasury transfer so a re-entrant
    /// attempt fails with `ProposalAlreadyFinalized`.
    pub fn finalize_proposal(
        &mut self,
        proposal_id: ProposalId,
        caller: &Address,
    ) -> Result<(), GovernanceError> {
        self.try_finalize(proposal_id, caller)
            .inspect_err(|e| debug!(proposal_id, %caller, error = %e, "finalize rejected"))
    }

    fn try_finalize(
        &mut self,
        proposal_id: ProposalId,
        caller: &Address,
    ) -> Result<(), GovernanceError> {
        let quorum = self.params.quorum;
        let proposal = self
            .registry
            .get_mut(proposal_id)
            .ok_or(GovernanceError::ProposalNotFound(proposal_id))?;
        if proposal.finalized {
            return Err(GovernanceError::ProposalAlreadyFinalized(proposal_id));
        }
        if proposal.votes <= quorum {
            return Err(GovernanceError::QuorumNotReached {
                votes: proposal.votes,
                quorum,
            });
        }
        proposal.finalized = true;
        let amount = proposal.amount;
        let recipient = proposal.recipient.clone();

        let treasury = self.address.clone();
        if let Err(e) = self.ledger.transfer(&treasury, &recipient, amount) {
            warn!(proposal_id, %amount, error = %e, "treasury transfer failed, finalize reverted");
            if let Some(proposal) = self.registry.get_mut(proposal_id) {
                proposal.finalized = false;
            }
            return Err(e.into());
        }

        info!(proposal_id, %caller, %recipient, %amount, "proposal finalized");
        self.emit(DaoEvent::ProposalFinalized { id: proposal_id });
        Ok(())
    }
}
