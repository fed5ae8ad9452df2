//! Per-voter stake records and the vote operation.

use std::collections::BTreeMap;

use motion_token::TokenLedger;
use motion_types::{Address, ProposalId, TokenAmount};
use tracing::{debug, info};

use crate::engine::DaoEngine;
use crate::error::GovernanceError;
use crate::event::DaoEvent;

/// Cumulative stake per (proposal, voter). Entries are created on a voter's
/// first vote and only ever grow.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VoteTally {
    stakes: BTreeMap<(ProposalId, Address), TokenAmount>,
}

impl VoteTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stake_of(&self, proposal_id: ProposalId, voter: &Address) -> TokenAmount {
        self.get(proposal_id, voter).unwrap_or_default()
    }

    fn get(&self, proposal_id: ProposalId, voter: &Address) -> Option<TokenAmount> {
        self.stakes.get(&(proposal_id, voter.clone())).copied()
    }

    /// Stake after adding `amount`, or `VoteCapExceeded` if it would pass `cap`.
    pub fn checked_stake(
        &self,
        proposal_id: ProposalId,
        voter: &Address,
        amount: TokenAmount,
        cap: TokenAmount,
    ) -> Result<TokenAmount, GovernanceError> {
        let staked = self.stake_of(proposal_id, voter);
        match staked.checked_add(amount) {
            Some(total) if total <= cap => Ok(total),
            _ => Err(GovernanceError::VoteCapExceeded {
                staked,
                requested: amount,
                cap,
            }),
        }
    }

    /// Number of distinct voters on a proposal.
    pub fn voter_count(&self, proposal_id: ProposalId) -> usize {
        self.stakes
            .range((proposal_id, min_address())..)
            .take_while(|((id, _), _)| *id == proposal_id)
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&(ProposalId, Address), &TokenAmount)> {
        self.stakes.iter()
    }

    fn set(&mut self, proposal_id: ProposalId, voter: &Address, stake: Option<TokenAmount>) {
        let key = (proposal_id, voter.clone());
        match stake {
            Some(stake) => {
                self.stakes.insert(key, stake);
            }
            None => {
                self.stakes.remove(&key);
            }
        }
    }
}

fn min_address() -> Address {
    Address::from_index(0)
}

impl<L: TokenLedger> DaoEngine<L> {
    /// Stake `amount` tokens in favour of a proposal.
    ///
    /// The stake is pulled from `voter` into the treasury through the
    /// ledger allowance `voter` granted the DAO, and is never refunded.
    pub fn vote(
        &mut self,
        proposal_id: ProposalId,
        amount: TokenAmount,
        voter: &Address,
    ) -> Result<(), GovernanceError> {
        self.try_vote(proposal_id, amount, voter)
            .inspect_err(|e| debug!(proposal_id, %voter, %amount, error = %e, "vote rejected"))
    }

    fn try_vote(
        &mut self,
        proposal_id: ProposalId,
        amount: TokenAmount,
        voter: &Address,
    ) -> Result<(), GovernanceError> {
        let proposal = self
            .registry
            .get(proposal_id)
            .ok_or(GovernanceError::ProposalNotFound(proposal_id))?;
        if proposal.finalized {
            return Err(GovernanceError::ProposalAlreadyFinalized(proposal_id));
        }
        if *voter == self.address {
            return Err(GovernanceError::TreasuryAccount { role: "voter" });
        }
        if self.ledger.balance_of(voter).is_zero() {
            return Err(GovernanceError::NotATokenHolder(voter.clone()));
        }
        if amount.is_zero() {
            return Err(GovernanceError::ZeroAmount);
        }
        let stake = self.tally.checked_stake(
            proposal_id,
            voter,
            amount,
            self.params.max_vote_per_proposal,
        )?;
        let previous_votes = proposal.votes;
        let votes = previous_votes
            .checked_add(amount)
            .ok_or(GovernanceError::Overflow)?;

        // Commit the tally before pulling funds so a re-entrant vote sees the new stake.
        let previous_stake = self.tally.get(proposal_id, voter);
        self.tally.set(proposal_id, voter, Some(stake));
        self.set_votes(proposal_id, votes);

        let treasury = self.address.clone();
        if let Err(e) = self
            .ledger
            .transfer_from(&treasury, voter, &treasury, amount)
        {
            self.tally.set(proposal_id, voter, previous_stake);
            self.set_votes(proposal_id, previous_votes);
            return Err(e.into());
        }

        info!(proposal_id, %voter, %amount, total = %votes, "vote cast");
        self.emit(DaoEvent::Voted {
            proposal_id,
            voter: voter.clone(),
            amount,
        });
        Ok(())
    }

    fn set_votes(&mut self, proposal_id: ProposalId, votes: TokenAmount) {
        if let Some(proposal) = self.registry.get_mut(proposal_id) {
            proposal.votes = votes;
        }
    }
}
