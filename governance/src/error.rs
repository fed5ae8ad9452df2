use motion_token::TokenError;
use motion_types::{Address, ProposalId, TokenAmount};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GovernanceError {
    #[error("DAO lacks funds: requested {requested}, treasury holds {available}")]
    InsufficientTreasuryFunds {
        requested: TokenAmount,
        available: TokenAmount,
    },

    #[error("insufficient allowance: need {needed}, approved {available}")]
    InsufficientAllowance {
        needed: TokenAmount,
        available: TokenAmount,
    },

    #[error("insufficient balance: need {needed}, have {available}")]
    InsufficientBalance {
        needed: TokenAmount,
        available: TokenAmount,
    },

    #[error("amount must be greater than 0")]
    ZeroAmount,

    #[error("the DAO treasury cannot act as {role}")]
    TreasuryAccount { role: &'static str },

    #[error("{0} must be a token holder")]
    NotATokenHolder(Address),

    #[error("vote exceeds max allowed per proposal: staked {staked} + {requested} > cap {cap}")]
    VoteCapExceeded {
        staked: TokenAmount,
        requested: TokenAmount,
        cap: TokenAmount,
    },

    #[error("proposal {0} not found")]
    ProposalNotFound(ProposalId),

    #[error("proposal {0} already finalized")]
    ProposalAlreadyFinalized(ProposalId),

    #[error("quorum not reached: {votes} votes, need more than {quorum}")]
    QuorumNotReached {
        votes: TokenAmount,
        quorum: TokenAmount,
    },

    #[error("arithmetic overflow in governance accounting")]
    Overflow,

    #[error("invalid DAO parameters: {0}")]
    InvalidParams(String),

    #[error("event stream is inconsistent: {0}")]
    InconsistentEvent(String),
}

impl From<TokenError> for GovernanceError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::InsufficientAllowance { needed, available } => {
                Self::InsufficientAllowance { needed, available }
            }
            TokenError::InsufficientBalance { needed, available } => {
                Self::InsufficientBalance { needed, available }
            }
            TokenError::Overflow => Self::Overflow,
            TokenError::InvalidConfig(msg) => Self::InvalidParams(msg),
        }
    }
}
