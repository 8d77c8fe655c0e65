//! In-process asset custody.

use std::collections::{HashMap, HashSet};

use parking_lot::Mutex;

use crate::domain::{AccountId, Amount, AssetId};
use crate::traits::{AssetTransfer, TransferError};

#[derive(Debug, Default)]
struct Books {
    balances: HashMap<(AssetId, AccountId), Amount>,
    allowances: HashMap<(AssetId, AccountId, AccountId), Amount>,
    frozen: HashSet<AssetId>,
}

impl Books {
    fn balance(&self, asset: AssetId, account: AccountId) -> Amount {
        self.balances
            .get(&(asset, account))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    fn set_balance(&mut self, asset: AssetId, account: AccountId, amount: Amount) {
        if amount.is_zero() {
            self.balances.remove(&(asset, account));
        } else {
            self.balances.insert((asset, account), amount);
        }
    }

    fn allowance(&self, asset: AssetId, owner: AccountId, spender: AccountId) -> Amount {
        self.allowances
            .get(&(asset, owner, spender))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Moves `amount` between two accounts or changes nothing.
    fn apply(
        &mut self,
        asset: AssetId,
        sender: AccountId,
        recipient: AccountId,
        amount: Amount,
    ) -> Result<(), TransferError> {
        if self.frozen.contains(&asset) {
            return Err(TransferError::Rejected(format!("asset {asset} is frozen")));
        }
        let available = self.balance(asset, sender);
        let Some(sender_after) = available.checked_sub(&amount) else {
            return Err(TransferError::InsufficientBalance {
                available,
                required: amount,
            });
        };
        if sender == recipient {
            return Ok(());
        }
        let recipient_after = self
            .balance(asset, recipient)
            .checked_add(&amount)
            .ok_or(TransferError::BalanceOverflow)?;
        self.set_balance(asset, sender, sender_after);
        self.set_balance(asset, recipient, recipient_after);
        Ok(())
    }
}

/// A thread-safe balance and allowance table implementing [`AssetTransfer`].
///
/// Balances are created with [`mint`](Self::mint). An allowance of
/// [`Amount::MAX`] is treated as unlimited and is never decremented.
/// [`freeze`](Self::freeze) makes every movement of one asset fail, which
/// lets hosts exercise the engine's rollback paths.
///
/// # Examples
///
/// ```
/// use pair_amm::assets::InMemoryAssets;
/// use pair_amm::domain::{AccountId, Amount, AssetId};
/// use pair_amm::traits::AssetTransfer;
///
/// let assets = InMemoryAssets::new();
/// let token = AssetId::from_bytes([1u8; 32]);
/// let alice = AccountId::from_bytes([10u8; 32]);
/// let bob = AccountId::from_bytes([11u8; 32]);
///
/// assets.mint(token, alice, Amount::new(100)).ok();
/// assert!(assets.transfer(token, alice, bob, Amount::new(40)).is_ok());
/// assert_eq!(assets.balance_of(token, bob), Amount::new(40));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryAssets {
    books: Mutex<Books>,
}

impl InMemoryAssets {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credits `amount` of `asset` to `account` out of thin air.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::BalanceOverflow`] if the balance would exceed
    /// [`Amount::MAX`].
    pub fn mint(
        &self,
        asset: AssetId,
        account: AccountId,
        amount: Amount,
    ) -> Result<(), TransferError> {
        let mut books = self.books.lock();
        let after = books
            .balance(asset, account)
            .checked_add(&amount)
            .ok_or(TransferError::BalanceOverflow)?;
        books.set_balance(asset, account, after);
        Ok(())
    }

    /// Rejects every future transfer of `asset` until [`thaw`](Self::thaw).
    pub fn freeze(&self, asset: AssetId) {
        self.books.lock().frozen.insert(asset);
    }

    /// Lifts a [`freeze`](Self::freeze).
    pub fn thaw(&self, asset: AssetId) {
        self.books.lock().frozen.remove(&asset);
    }
}

impl AssetTransfer for InMemoryAssets {
    fn transfer_from(
        &self,
        asset: AssetId,
        spender: AccountId,
        owner: AccountId,
        recipient: AccountId,
        amount: Amount,
    ) -> Result<(), TransferError> {
        let mut books = self.books.lock();
        let approved = books.allowance(asset, owner, spender);
        let Some(remaining) = approved.checked_sub(&amount) else {
            return Err(TransferError::InsufficientAllowance {
                available: approved,
                required: amount,
            });
        };
        books.apply(asset, owner, recipient, amount)?;
        if approved != Amount::MAX {
            books.allowances.insert((asset, owner, spender), remaining);
        }
        Ok(())
    }

    fn transfer(
        &self,
        asset: AssetId,
        sender: AccountId,
        recipient: AccountId,
        amount: Amount,
    ) -> Result<(), TransferError> {
        self.books.lock().apply(asset, sender, recipient, amount)
    }

    fn balance_of(&self, asset: AssetId, account: AccountId) -> Amount {
        self.books.lock().balance(asset, account)
    }

    fn allowance(&self, asset: AssetId, owner: AccountId, spender: AccountId) -> Amount {
        self.books.lock().allowance(asset, owner, spender)
    }

    fn approve(
        &self,
        asset: AssetId,
        owner: AccountId,
        spender: AccountId,
        amount: Amount,
    ) -> Result<(), TransferError> {
        self.books
            .lock()
            .allowances
            .insert((asset, owner, spender), amount);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    const TOKEN: AssetId = AssetId::from_bytes([1u8; 32]);
    const ALICE: AccountId = AccountId::from_bytes([10u8; 32]);
    const BOB: AccountId = AccountId::from_bytes([11u8; 32]);
    const POOL: AccountId = AccountId::from_bytes([12u8; 32]);

    fn funded(amount: u128) -> InMemoryAssets {
        let assets = InMemoryAssets::new();
        let Ok(()) = assets.mint(TOKEN, ALICE, Amount::new(amount)) else {
            panic!("mint failed");
        };
        assets
    }

    #[test]
    fn transfer_moves_balance() {
        let assets = funded(100);
        assert_eq!(assets.transfer(TOKEN, ALICE, BOB, Amount::new(30)), Ok(()));
        assert_eq!(assets.balance_of(TOKEN, ALICE), Amount::new(70));
        assert_eq!(assets.balance_of(TOKEN, BOB), Amount::new(30));
    }

    #[test]
    fn transfer_rejects_overdraft() {
        let assets = funded(10);
        assert_eq!(
            assets.transfer(TOKEN, ALICE, BOB, Amount::new(11)),
            Err(TransferError::InsufficientBalance {
                available: Amount::new(10),
                required: Amount::new(11),
            })
        );
        assert_eq!(assets.balance_of(TOKEN, ALICE), Amount::new(10));
    }

    #[test]
    fn transfer_from_spends_allowance() {
        let assets = funded(100);
        let Ok(()) = assets.approve(TOKEN, ALICE, POOL, Amount::new(50)) else {
            panic!("approve failed");
        };
        assert_eq!(
            assets.transfer_from(TOKEN, POOL, ALICE, POOL, Amount::new(20)),
            Ok(())
        );
        assert_eq!(assets.allowance(TOKEN, ALICE, POOL), Amount::new(30));
        assert_eq!(assets.balance_of(TOKEN, POOL), Amount::new(20));
        assert!(matches!(
            assets.transfer_from(TOKEN, POOL, ALICE, POOL, Amount::new(31)),
            Err(TransferError::InsufficientAllowance { .. })
        ));
    }

    #[test]
    fn unlimited_allowance_is_not_decremented() {
        let assets = funded(100);
        let Ok(()) = assets.approve(TOKEN, ALICE, POOL, Amount::MAX) else {
            panic!("approve failed");
        };
        let Ok(()) = assets.transfer_from(TOKEN, POOL, ALICE, BOB, Amount::new(60)) else {
            panic!("transfer_from failed");
        };
        assert_eq!(assets.allowance(TOKEN, ALICE, POOL), Amount::MAX);
    }

    #[test]
    fn failed_transfer_from_keeps_allowance() {
        let assets = funded(10);
        let Ok(()) = assets.approve(TOKEN, ALICE, POOL, Amount::new(50)) else {
            panic!("approve failed");
        };
        assert!(assets
            .transfer_from(TOKEN, POOL, ALICE, POOL, Amount::new(20))
            .is_err());
        assert_eq!(assets.allowance(TOKEN, ALICE, POOL), Amount::new(50));
    }

    #[test]
    fn frozen_asset_rejects_until_thawed() {
        let assets = funded(10);
        assets.freeze(TOKEN);
        assert!(matches!(
            assets.transfer(TOKEN, ALICE, BOB, Amount::new(1)),
            Err(TransferError::Rejected(_))
        ));
        assets.thaw(TOKEN);
        assert_eq!(assets.transfer(TOKEN, ALICE, BOB, Amount::new(1)), Ok(()));
    }

    #[test]
    fn mint_overflow_rejected() {
        let assets = funded(u128::MAX);
        assert_eq!(
            assets.mint(TOKEN, ALICE, Amount::new(1)),
            Err(TransferError::BalanceOverflow)
        );
    }
}
