//! Operation scripts: a JSON array of calls replayed against a fresh
//! deployment, in order.
//!
//! ```json
//! [
//!   {"op": "transfer", "from": "0x…01", "to": "0x…02", "amount": "200000"},
//!   {"op": "approve", "owner": "0x…02", "amount": "100000"},
//!   {"op": "fund", "funder": "0x…02", "amount": "100000"},
//!   {"op": "propose", "creator": "0x…02", "description": "ipfs://…",
//!    "recipient": "0x…05", "amount": "20000"},
//!   {"op": "vote", "voter": "0x…02", "proposal": 1, "amount": "25"},
//!   {"op": "finalize", "caller": "0x…02", "proposal": 1}
//! ]
//! ```
//!
//! Amounts are decimal strings in whole tokens. `approve` without a
//! `spender` approves the DAO.

use serde::{Deserialize, Serialize};

use motion_types::{Address, ProposalId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Transfer {
        from: Address,
        to: Address,
        amount: String,
    },
    Approve {
        owner: Address,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        spender: Option<Address>,
        amount: String,
    },
    Fund {
        funder: Address,
        amount: String,
    },
    Propose {
        creator: Address,
        #[serde(default)]
        description: String,
        recipient: Address,
        amount: String,
    },
    Vote {
        voter: Address,
        proposal: ProposalId,
        amount: String,
    },
    Finalize {
        caller: Address,
        proposal: ProposalId,
    },
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Transfer { .. } => "transfer",
            Self::Approve { .. } => "approve",
            Self::Fund { .. } => "fund",
            Self::Propose { .. } => "propose",
            Self::Vote { .. } => "vote",
            Self::Finalize { .. } => "finalize",
        }
    }
}

/// Parse a script document.
pub fn parse(json: &str) -> Result<Vec<Operation>, serde_json::Error> {
    serde_json::from_str(json)
}
