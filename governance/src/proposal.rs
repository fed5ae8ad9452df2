//! Disbursement proposals and the registry that stores them.

use motion_token::TokenLedger;
use motion_types::{Address, ProposalId, TokenAmount};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::engine::DaoEngine;
use crate::error::GovernanceError;
use crate::event::DaoEvent;

/// A request to pay `amount` from the treasury to `recipient`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    /// Opaque description, usually a link to off-chain content. Never interpreted.
    pub description: String,
    pub amount: TokenAmount,
    pub recipient: Address,
    pub creator: Address,
    /// Cumulative stake cast in favour.
    pub votes: TokenAmount,
    pub finalized: bool,
}

/// Arena of proposals indexed by sequential id (id `n` lives at slot `n - 1`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProposalRegistry {
    proposals: Vec<Proposal>,
}

impl ProposalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The id the next stored proposal will receive.
    pub fn next_id(&self) -> ProposalId {
        self.proposals.len() as ProposalId + 1
    }

    /// Store a fresh proposal under the next id and return that id.
    pub fn insert(
        &mut self,
        description: String,
        amount: TokenAmount,
        recipient: Address,
        creator: Address,
    ) -> ProposalId {
        let id = self.next_id();
        self.proposals.push(Proposal {
            id,
            description,
            amount,
            recipient,
            creator,
            votes: TokenAmount::ZERO,
            finalized: false,
        });
        id
    }

    fn slot(id: ProposalId) -> Option<usize> {
        usize::try_from(id.checked_sub(1)?).ok()
    }

    pub fn get(&self, id: ProposalId) -> Option<&Proposal> {
        self.proposals.get(Self::slot(id)?)
    }

    pub(crate) fn get_mut(&mut self, id: ProposalId) -> Option<&mut Proposal> {
        let slot = Self::slot(id)?;
        self.proposals.get_mut(slot)
    }

    pub fn count(&self) -> u64 {
        self.proposals.len() as u64
    }

    /// All proposals in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Proposal> {
        self.proposals.iter()
    }
}

impl<L: TokenLedger> DaoEngine<L> {
    /// Register a disbursement proposal.
    ///
    /// Anyone may propose, token holder or not. The treasury must currently
    /// hold at least `amount`; nothing is reserved, so several open proposals
    /// may together ask for more than the treasury holds.
    pub fn create_proposal(
        &mut self,
        description: impl Into<String>,
        amount: TokenAmount,
        recipient: &Address,
        creator: &Address,
    ) -> Result<ProposalId, GovernanceError> {
        if amount.is_zero() {
            debug!(%creator, "proposal rejected: zero amount");
            return Err(GovernanceError::ZeroAmount);
        }
        if *recipient == self.address {
            debug!(%creator, "proposal rejected: treasury cannot be the recipient");
            return Err(GovernanceError::TreasuryAccount { role: "recipient" });
        }
        let available = self.treasury_balance();
        if available < amount {
            debug!(%creator, %amount, %available, "proposal rejected: DAO lacks funds");
            return Err(GovernanceError::InsufficientTreasuryFunds {
                requested: amount,
                available,
            });
        }

        let id = self.registry.insert(
            description.into(),
            amount,
            recipient.clone(),
            creator.clone(),
        );
        info!(id, %amount, %recipient, %creator, "proposal created");
        self.emit(DaoEvent::ProposalCreated {
            id,
            amount,
            recipient: recipient.clone(),
            creator: creator.clone(),
        });
        Ok(id)
    }
}
