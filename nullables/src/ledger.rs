//! Nullable ledger — a real in-memory token that records every call and can
//! be told to fail.

use std::collections::VecDeque;

use motion_token::{Token, TokenConfig, TokenError, TokenLedger};
use motion_types::{Address, TokenAmount};

/// A mutating ledger call that succeeded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LedgerCall {
    Approve {
        owner: Address,
        spender: Address,
        amount: TokenAmount,
    },
    Transfer {
        from: Address,
        to: Address,
        amount: TokenAmount,
    },
    TransferFrom {
        spender: Address,
        from: Address,
        to: Address,
        amount: TokenAmount,
    },
}

/// A test ledger wrapping [`Token`].
///
/// Successful mutating calls are appended to [`NullLedger::calls`]. Errors
/// queued with [`NullLedger::fail_next`] are returned by the next mutating
/// calls, in order, without touching balances.
pub struct NullLedger {
    inner: Token,
    calls: Vec<LedgerCall>,
    failures: VecDeque<TokenError>,
}

impl NullLedger {
    pub fn new(inner: Token) -> Self {
        Self {
            inner,
            calls: Vec::new(),
            failures: VecDeque::new(),
        }
    }

    /// An 18-decimal token at `0x…aa` with `supply` whole tokens minted to `deployer`.
    pub fn with_supply(deployer: &Address, supply: u64) -> Result<Self, TokenError> {
        let token = Token::deploy(&TokenConfig {
            address: Address::from_index(0xaa),
            name: "Null Token".into(),
            symbol: "NULL".into(),
            decimals: TokenAmount::DEFAULT_DECIMALS,
            initial_supply: supply,
            deployer: deployer.clone(),
        })?;
        Ok(Self::new(token))
    }

    /// Make the next mutating call fail with `error`.
    pub fn fail_next(&mut self, error: TokenError) {
        self.failures.push_back(error);
    }

    /// All successful mutating calls (for assertions).
    pub fn calls(&self) -> &[LedgerCall] {
        &self.calls
    }

    /// Successful plain transfers out of `from`.
    pub fn transfers_from(&self, from: &Address) -> Vec<(Address, TokenAmount)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                LedgerCall::Transfer {
                    from: f,
                    to,
                    amount,
                } if f == from => Some((to.clone(), *amount)),
                _ => None,
            })
            .collect()
    }

    pub fn inner(&self) -> &Token {
        &self.inner
    }

    /// Clear recorded calls and pending failures.
    pub fn reset(&mut self) {
        self.calls.clear();
        self.failures.clear();
    }

    fn record(
        &mut self,
        call: LedgerCall,
        apply: impl FnOnce(&mut Token) -> Result<(), TokenError>,
    ) -> Result<(), TokenError> {
        if let Some(error) = self.failures.pop_front() {
            return Err(error);
        }
        apply(&mut self.inner)?;
        self.calls.push(call);
        Ok(())
    }
}

impl TokenLedger for NullLedger {
    fn address(&self) -> &Address {
        self.inner.address()
    }

    fn total_supply(&self) -> TokenAmount {
        self.inner.total_supply()
    }

    fn balance_of(&self, owner: &Address) -> TokenAmount {
        self.inner.balance_of(owner)
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> TokenAmount {
        self.inner.allowance(owner, spender)
    }

    fn approve(
        &mut self,
        owner: &Address,
        spender: &Address,
        amount: TokenAmount,
    ) -> Result<(), TokenError> {
        let call = LedgerCall::Approve {
            owner: owner.clone(),
            spender: spender.clone(),
            amount,
        };
        self.record(call, |token| token.approve(owner, spender, amount))
    }

    fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: TokenAmount,
    ) -> Result<(), TokenError> {
        let call = LedgerCall::Transfer {
            from: from.clone(),
            to: to.clone(),
            amount,
        };
        self.record(call, |token| token.transfer(from, to, amount))
    }

    fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: TokenAmount,
    ) -> Result<(), TokenError> {
        let call = LedgerCall::TransferFrom {
            spender: spender.clone(),
            from: from.clone(),
            to: to.clone(),
            amount,
        };
        self.record(call, |token| token.transfer_from(spender, from, to, amount))
    }
}
