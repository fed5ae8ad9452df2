//! Rebuilds DAO state purely from its event stream.
//!
//! Descriptions are not part of any event, so an indexed proposal carries
//! everything except its description.

use std::collections::BTreeMap;

use motion_types::{Address, ProposalId, TokenAmount};

use crate::error::GovernanceError;
use crate::event::DaoEvent;
use crate::proposal::Proposal;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedProposal {
    pub amount: TokenAmount,
    pub recipient: Address,
    pub creator: Address,
    pub votes: TokenAmount,
    pub finalized: bool,
}

impl IndexedProposal {
    /// True when this record agrees with the engine's copy on every indexed field.
    pub fn matches(&self, proposal: &Proposal) -> bool {
        self.amount == proposal.amount
            && self.recipient == proposal.recipient
            && self.creator == proposal.creator
            && self.votes == proposal.votes
            && self.finalized == proposal.finalized
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DaoIndex {
    proposals: BTreeMap<ProposalId, IndexedProposal>,
    stakes: BTreeMap<(ProposalId, Address), TokenAmount>,
    funded: TokenAmount,
    escrowed: TokenAmount,
    disbursed: TokenAmount,
}

impl DaoIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from a complete event history.
    pub fn replay<'a>(
        events: impl IntoIterator<Item = &'a DaoEvent>,
    ) -> Result<Self, GovernanceError> {
        let mut index = Self::new();
        for event in events {
            index.apply(event)?;
        }
        Ok(index)
    }

    /// Fold one event into the index. Events that could not have been emitted
    /// by a DAO in the indexed state are rejected and leave the index unchanged.
    pub fn apply(&mut self, event: &DaoEvent) -> Result<(), GovernanceError> {
        match event {
            DaoEvent::DaoFunded { amount, .. } => {
                self.funded = add(self.funded, *amount)?;
            }
            DaoEvent::ProposalCreated {
                id,
                amount,
                recipient,
                creator,
            } => {
                let expected = self.proposals.len() as ProposalId + 1;
                if *id != expected {
                    return Err(GovernanceError::InconsistentEvent(format!(
                        "proposal {id} created, expected id {expected}"
                    )));
                }
                self.proposals.insert(
                    *id,
                    IndexedProposal {
                        amount: *amount,
                        recipient: recipient.clone(),
                        creator: creator.clone(),
                        votes: TokenAmount::ZERO,
                        finalized: false,
                    },
                );
            }
            DaoEvent::Voted {
                proposal_id,
                voter,
                amount,
            } => {
                let escrowed = add(self.escrowed, *amount)?;
                let key = (*proposal_id, voter.clone());
                let stake = add(self.stakes.get(&key).copied().unwrap_or_default(), *amount)?;
                let proposal = self.open_proposal(*proposal_id)?;
                proposal.votes = add(proposal.votes, *amount)?;
                self.stakes.insert(key, stake);
                self.escrowed = escrowed;
            }
            DaoEvent::ProposalFinalized { id } => {
                let disbursed_before = self.disbursed;
                let proposal = self.open_proposal(*id)?;
                let disbursed = add(disbursed_before, proposal.amount)?;
                proposal.finalized = true;
                self.disbursed = disbursed;
            }
        }
        Ok(())
    }

    fn open_proposal(&mut self, id: ProposalId) -> Result<&mut IndexedProposal, GovernanceError> {
        let proposal = self
            .proposals
            .get_mut(&id)
            .ok_or(GovernanceError::ProposalNotFound(id))?;
        if proposal.finalized {
            return Err(GovernanceError::ProposalAlreadyFinalized(id));
        }
        Ok(proposal)
    }

    pub fn proposal(&self, id: ProposalId) -> Option<&IndexedProposal> {
        self.proposals.get(&id)
    }

    pub fn proposal_count(&self) -> u64 {
        self.proposals.len() as u64
    }

    pub fn stake_of(&self, proposal_id: ProposalId, voter: &Address) -> TokenAmount {
        self.stakes
            .get(&(proposal_id, voter.clone()))
            .copied()
            .unwrap_or_default()
    }

    /// Total moved into the treasury through `fund_dao`.
    pub fn total_funded(&self) -> TokenAmount {
        self.funded
    }

    /// Total escrowed into the treasury by votes.
    pub fn total_escrowed(&self) -> TokenAmount {
        self.escrowed
    }

    /// Total paid out by finalized proposals.
    pub fn total_disbursed(&self) -> TokenAmount {
        self.disbursed
    }

    /// Treasury balance implied by the events alone, given the balance the
    /// treasury held before the first event. `None` if the events imply a
    /// negative balance.
    pub fn treasury_balance(&self, opening: TokenAmount) -> Option<TokenAmount> {
        opening
            .checked_add(self.funded)?
            .checked_add(self.escrowed)?
            .checked_sub(self.disbursed)
    }
}

fn add(a: TokenAmount, b: TokenAmount) -> Result<TokenAmount, GovernanceError> {
    a.checked_add(b).ok_or(GovernanceError::Overflow)
}
