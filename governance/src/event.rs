//! Events emitted by successful DAO transitions.

use motion_types::{Address, ProposalId, TokenAmount};
use serde::{Deserialize, Serialize};

/// One event per successful mutating operation. Rejected calls emit nothing,
/// so the initial state plus this stream is enough to rebuild the DAO.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum DaoEvent {
    #[serde(rename = "DAOFunded")]
    DaoFunded { funder: Address, amount: TokenAmount },
    ProposalCreated {
        id: ProposalId,
        amount: TokenAmount,
        recipient: Address,
        creator: Address,
    },
    Voted {
        proposal_id: ProposalId,
        voter: Address,
        amount: TokenAmount,
    },
    ProposalFinalized { id: ProposalId },
}

/// Synchronous fan-out event bus for DAO events.
///
/// Listeners run inline inside the transition that emitted the event.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&DaoEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&DaoEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &DaoEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
