//! The ledger contract consumed by the governance engine.

use crate::error::TokenError;
use motion_types::{Address, TokenAmount};

/// A fungible-balance store with owner-granted spending allowances.
///
/// Implementations must guarantee:
/// - balances never go negative and always sum to [`TokenLedger::total_supply`];
/// - a call that returns `Err` mutates nothing;
/// - `transfer_from` reports [`TokenError::InsufficientAllowance`] and
///   [`TokenError::InsufficientBalance`] distinctly, checking allowance first.
///
/// Callers are trusted to pass the authenticated sender as `from`/`owner`;
/// signing and account management live outside the ledger.
pub trait TokenLedger {
    /// Identity of the ledger (the token contract address).
    fn address(&self) -> &Address;

    fn total_supply(&self) -> TokenAmount;

    fn balance_of(&self, owner: &Address) -> TokenAmount;

    fn allowance(&self, owner: &Address, spender: &Address) -> TokenAmount;

    /// Set (not add to) the amount `spender` may pull from `owner`.
    fn approve(
        &mut self,
        owner: &Address,
        spender: &Address,
        amount: TokenAmount,
    ) -> Result<(), TokenError>;

    /// Move `amount` from `from` to `to`.
    fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: TokenAmount,
    ) -> Result<(), TokenError>;

    /// Move `amount` from `from` to `to` on behalf of `spender`, consuming
    /// `spender`'s allowance over `from`.
    fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: TokenAmount,
    ) -> Result<(), TokenError>;
}
