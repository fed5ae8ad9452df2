//! In-memory token ledger.

use std::collections::BTreeMap;

use motion_types::{Address, TokenAmount};
use tracing::trace;

use crate::config::TokenConfig;
use crate::error::TokenError;
use crate::ledger::TokenLedger;

/// An in-memory fungible token with allowances.
///
/// Accounts with a zero balance are not stored, so two ledgers with the same
/// observable balances compare equal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    address: Address,
    name: String,
    symbol: String,
    decimals: u8,
    total_supply: TokenAmount,
    balances: BTreeMap<Address, TokenAmount>,
    /// (owner, spender) → remaining allowance.
    allowances: BTreeMap<(Address, Address), TokenAmount>,
}

impl Token {
    /// Deploy a token, minting the whole supply to the deployer.
    pub fn deploy(config: &TokenConfig) -> Result<Self, TokenError> {
        config.validate()?;
        let supply = config.raw_supply()?;
        let mut balances = BTreeMap::new();
        if !supply.is_zero() {
            balances.insert(config.deployer.clone(), supply);
        }
        tracing::info!(
            token = %config.address,
            symbol = %config.symbol,
            supply = %supply,
            deployer = %config.deployer,
            "token deployed"
        );
        Ok(Self {
            address: config.address.clone(),
            name: config.name.clone(),
            symbol: config.symbol.clone(),
            decimals: config.decimals,
            total_supply: supply,
            balances,
            allowances: BTreeMap::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Number of accounts holding a non-zero balance.
    pub fn holder_count(&self) -> usize {
        self.balances.len()
    }

    /// Validate and apply a balance move. Mutates nothing on error.
    fn move_balance(
        &mut self,
        from: &Address,
        to: &Address,
        amount: TokenAmount,
    ) -> Result<(), TokenError> {
        let available = self.balance_of(from);
        let remaining = available
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientBalance {
                needed: amount,
                available,
            })?;
        if from == to || amount.is_zero() {
            return Ok(());
        }
        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;

        set_or_remove(&mut self.balances, from.clone(), remaining);
        set_or_remove(&mut self.balances, to.clone(), credited);
        trace!(%from, %to, %amount, "transfer");
        Ok(())
    }
}

fn set_or_remove<K: Ord>(map: &mut BTreeMap<K, TokenAmount>, key: K, value: TokenAmount) {
    if value.is_zero() {
        map.remove(&key);
    } else {
        map.insert(key, value);
    }
}

impl TokenLedger for Token {
    fn address(&self) -> &Address {
        &self.address
    }

    fn total_supply(&self) -> TokenAmount {
        self.total_supply
    }

    fn balance_of(&self, owner: &Address) -> TokenAmount {
        self.balances.get(owner).copied().unwrap_or_default()
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> TokenAmount {
        self.allowances
            .get(&(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or_default()
    }

    fn approve(
        &mut self,
        owner: &Address,
        spender: &Address,
        amount: TokenAmount,
    ) -> Result<(), TokenError> {
        set_or_remove(
            &mut self.allowances,
            (owner.clone(), spender.clone()),
            amount,
        );
        trace!(%owner, %spender, %amount, "approve");
        Ok(())
    }

    fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: TokenAmount,
    ) -> Result<(), TokenError> {
        self.move_balance(from, to, amount)
    }

    fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: TokenAmount,
    ) -> Result<(), TokenError> {
        let approved = self.allowance(from, spender);
        let remaining = approved
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientAllowance {
                needed: amount,
                available: approved,
            })?;
        self.move_balance(from, to, amount)?;
        set_or_remove(
            &mut self.allowances,
            (from.clone(), spender.clone()),
            remaining,
        );
        Ok(())
    }
}
