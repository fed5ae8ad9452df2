//! Deploy from config and replay a script, collecting per-step outcomes.

use serde::Serialize;
use tracing::{info, warn};

use motion_governance::{DaoEngine, DaoEvent, Proposal};
use motion_token::{Token, TokenLedger};
use motion_types::{Address, ProposalId};
use motion_utils::{format_amount, parse_amount};

use crate::config::MotionConfig;
use crate::error::{ConfigError, StepError};
use crate::script::Operation;

/// A token and a DAO deployed on it.
pub struct Deployment {
    pub dao: DaoEngine<Token>,
}

/// What happened to one script step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Applied { step: usize, events: Vec<DaoEvent> },
    Rejected { step: usize, error: StepError },
}

/// Final state printed after a replay.
#[derive(Debug, Serialize)]
pub struct Summary {
    pub dao: Address,
    pub token: Address,
    pub symbol: String,
    pub treasury: String,
    pub quorum: String,
    pub max_vote_per_proposal: String,
    pub applied: usize,
    pub rejected: usize,
    pub proposals: Vec<ProposalSummary>,
}

#[derive(Debug, Serialize)]
pub struct ProposalSummary {
    pub id: ProposalId,
    pub description: String,
    pub recipient: Address,
    pub creator: Address,
    pub amount: String,
    pub votes: String,
    pub finalized: bool,
}

impl Deployment {
    /// Deploy the token, then the DAO, exactly as configured.
    pub fn from_config(config: &MotionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let token = Token::deploy(&config.token)?;
        let dao = DaoEngine::new(config.dao.address.clone(), token, config.dao_params()?)?;
        Ok(Self { dao })
    }

    fn decimals(&self) -> u8 {
        self.dao.ledger().decimals()
    }

    /// Apply one operation. On error nothing changed.
    pub fn apply(&mut self, op: &Operation) -> Result<Vec<DaoEvent>, StepError> {
        let decimals = self.decimals();
        let before = self.dao.events().len();
        match op {
            Operation::Transfer { from, to, amount } => {
                let amount = parse_amount(amount, decimals)?;
                self.dao.ledger_mut().transfer(from, to, amount)?;
            }
            Operation::Approve {
                owner,
                spender,
                amount,
            } => {
                let amount = parse_amount(amount, decimals)?;
                let spender = spender.clone().unwrap_or_else(|| self.dao.treasury().clone());
                self.dao.ledger_mut().approve(owner, &spender, amount)?;
            }
            Operation::Fund { funder, amount } => {
                let amount = parse_amount(amount, decimals)?;
                self.dao.fund_dao(amount, funder)?;
            }
            Operation::Propose {
                creator,
                description,
                recipient,
                amount,
            } => {
                let amount = parse_amount(amount, decimals)?;
                self.dao
                    .create_proposal(description.as_str(), amount, recipient, creator)?;
            }
            Operation::Vote {
                voter,
                proposal,
                amount,
            } => {
                let amount = parse_amount(amount, decimals)?;
                self.dao.vote(*proposal, amount, voter)?;
            }
            Operation::Finalize { caller, proposal } => {
                self.dao.finalize_proposal(*proposal, caller)?;
            }
        }
        Ok(self.dao.events()[before..].to_vec())
    }

    /// Apply every operation in order. Rejected steps are recorded and skipped.
    pub fn replay(&mut self, ops: &[Operation]) -> Vec<Outcome> {
        let outcomes: Vec<Outcome> = ops
            .iter()
            .enumerate()
            .map(|(step, op)| match self.apply(op) {
                Ok(events) => Outcome::Applied { step, events },
                Err(error) => {
                    warn!(step, op = op.name(), %error, "step rejected");
                    Outcome::Rejected { step, error }
                }
            })
            .collect();
        info!(
            steps = outcomes.len(),
            events = self.dao.events().len(),
            "replay finished"
        );
        outcomes
    }

    pub fn summary(&self, outcomes: &[Outcome]) -> Summary {
        let token = self.dao.ledger();
        let decimals = token.decimals();
        let show = |amount| format_amount(amount, decimals, "");
        let rejected = outcomes
            .iter()
            .filter(|o| matches!(o, Outcome::Rejected { .. }))
            .count();
        Summary {
            dao: self.dao.treasury().clone(),
            token: token.address().clone(),
            symbol: token.symbol().to_string(),
            treasury: show(self.dao.treasury_balance()),
            quorum: show(self.dao.quorum()),
            max_vote_per_proposal: show(self.dao.max_vote_per_proposal()),
            applied: outcomes.len() - rejected,
            rejected,
            proposals: self
                .dao
                .proposals()
                .map(|p: &Proposal| ProposalSummary {
                    id: p.id,
                    description: p.description.clone(),
                    recipient: p.recipient.clone(),
                    creator: p.creator.clone(),
                    amount: show(p.amount),
                    votes: show(p.votes),
                    finalized: p.finalized,
                })
                .collect(),
        }
    }
}
