//! The asset-custody collaborator.
//!
//! The engine never moves assets itself. Every pull into and push out of
//! pool custody goes through an [`AssetTransfer`] implementation supplied by
//! the host, which reports success or a [`TransferError`] synchronously.
//!
//! # Contract
//!
//! - A transfer either happens completely or not at all.
//! - `transfer_from` spends an allowance previously granted by `owner` to
//!   `spender` via [`approve`](AssetTransfer::approve).
//! - Any `Err` is treated identically by the engine: the enclosing operation
//!   aborts with [`AmmError::TransferFailed`](crate::error::AmmError::TransferFailed).

use std::sync::Arc;

use thiserror::Error;

use crate::domain::{AccountId, Amount, AssetId};

/// Why a collaborator refused a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    /// The sending account holds too little of the asset.
    #[error("insufficient balance: {available} available, {required} required")]
    InsufficientBalance {
        /// Balance held.
        available: Amount,
        /// Amount requested.
        required: Amount,
    },

    /// The spender's allowance is too small.
    #[error("insufficient allowance: {available} approved, {required} required")]
    InsufficientAllowance {
        /// Allowance granted.
        available: Amount,
        /// Amount requested.
        required: Amount,
    },

    /// Crediting the recipient would overflow its balance.
    #[error("recipient balance overflow")]
    BalanceOverflow,

    /// The collaborator rejected the transfer for its own reasons.
    #[error("transfer rejected: {0}")]
    Rejected(String),
}

/// Moves fungible assets between accounts on the engine's behalf.
///
/// Methods take `&self` so one collaborator can serve concurrent pools;
/// implementations use interior mutability for their own bookkeeping.
pub trait AssetTransfer {
    /// Moves `amount` of `asset` from `owner` to `recipient`, spending the
    /// allowance `owner` granted to `spender`.
    ///
    /// # Errors
    ///
    /// Returns a [`TransferError`] if the transfer did not happen.
    fn transfer_from(
        &self,
        asset: AssetId,
        spender: AccountId,
        owner: AccountId,
        recipient: AccountId,
        amount: Amount,
    ) -> Result<(), TransferError>;

    /// Moves `amount` of `asset` from `sender` to `recipient`.
    ///
    /// # Errors
    ///
    /// Returns a [`TransferError`] if the transfer did not happen.
    fn transfer(
        &self,
        asset: AssetId,
        sender: AccountId,
        recipient: AccountId,
        amount: Amount,
    ) -> Result<(), TransferError>;

    /// Returns `account`'s balance of `asset`.
    fn balance_of(&self, asset: AssetId, account: AccountId) -> Amount;

    /// Returns how much of `asset` `spender` may still move out of `owner`.
    fn allowance(&self, asset: AssetId, owner: AccountId, spender: AccountId) -> Amount;

    /// Sets `spender`'s allowance over `owner`'s `asset` to `amount`.
    ///
    /// # Errors
    ///
    /// Returns a [`TransferError`] if the approval was refused.
    fn approve(
        &self,
        asset: AssetId,
        owner: AccountId,
        spender: AccountId,
        amount: Amount,
    ) -> Result<(), TransferError>;
}

impl<T: AssetTransfer + ?Sized> AssetTransfer for &T {
    fn transfer_from(
        &self,
        asset: AssetId,
        spender: AccountId,
        owner: AccountId,
        recipient: AccountId,
        amount: Amount,
    ) -> Result<(), TransferError> {
        (**self).transfer_from(asset, spender, owner, recipient, amount)
    }

    fn transfer(
        &self,
        asset: AssetId,
        sender: AccountId,
        recipient: AccountId,
        amount: Amount,
    ) -> Result<(), TransferError> {
        (**self).transfer(asset, sender, recipient, amount)
    }

    fn balance_of(&self, asset: AssetId, account: AccountId) -> Amount {
        (**self).balance_of(asset, account)
    }

    fn allowance(&self, asset: AssetId, owner: AccountId, spender: AccountId) -> Amount {
        (**self).allowance(asset, owner, spender)
    }

    fn approve(
        &self,
        asset: AssetId,
        owner: AccountId,
        spender: AccountId,
        amount: Amount,
    ) -> Result<(), TransferError> {
        (**self).approve(asset, owner, spender, amount)
    }
}

impl<T: AssetTransfer + ?Sized> AssetTransfer for Arc<T> {
    fn transfer_from(
        &self,
        asset: AssetId,
        spender: AccountId,
        owner: AccountId,
        recipient: AccountId,
        amount: Amount,
    ) -> Result<(), TransferError> {
        (**self).transfer_from(asset, spender, owner, recipient, amount)
    }

    fn transfer(
        &self,
        asset: AssetId,
        sender: AccountId,
        recipient: AccountId,
        amount: Amount,
    ) -> Result<(), TransferError> {
        (**self).transfer(asset, sender, recipient, amount)
    }

    fn balance_of(&self, asset: AssetId, account: AccountId) -> Amount {
        (**self).balance_of(asset, account)
    }

    fn allowance(&self, asset: AssetId, owner: AccountId, spender: AccountId) -> Amount {
        (**self).allowance(asset, owner, spender)
    }

    fn approve(
        &self,
        asset: AssetId,
        owner: AccountId,
        spender: AccountId,
        amount: Amount,
    ) -> Result<(), TransferError> {
        (**self).approve(asset, owner, spender, amount)
    }
}
