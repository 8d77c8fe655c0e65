//! Per-pool share balances.

use std::collections::HashMap;

use crate::domain::{AccountId, Shares};
use crate::error::AmmError;
use crate::math::CheckedArithmetic;

/// A provider's balance and the ledger total after a pending mint or burn.
///
/// Produced by [`ShareLedger::preview_mint`] and
/// [`ShareLedger::preview_burn`]; nothing changes until it is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerEntry {
    provider: AccountId,
    balance_after: Shares,
    total_after: Shares,
}

impl LedgerEntry {
    /// Returns the provider whose balance changes.
    #[must_use]
    pub const fn provider(&self) -> AccountId {
        self.provider
    }

    /// Returns the provider's balance once applied.
    #[must_use]
    pub const fn balance_after(&self) -> Shares {
        self.balance_after
    }

    /// Returns the ledger total once applied.
    #[must_use]
    pub const fn total_after(&self) -> Shares {
        self.total_after
    }
}

/// Maps each provider of one pool to its share balance.
///
/// Balances are lazily zero and never negative; a balance that returns to
/// zero is removed. The ledger keeps a running total that must always equal
/// the pool's `total_shares`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareLedger {
    balances: HashMap<AccountId, Shares>,
    total: Shares,
}

impl ShareLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `provider`'s balance, zero if it holds none.
    #[must_use]
    pub fn balance_of(&self, provider: &AccountId) -> Shares {
        self.balances.get(provider).copied().unwrap_or(Shares::ZERO)
    }

    /// Returns the sum of every balance.
    #[must_use]
    pub const fn total(&self) -> Shares {
        self.total
    }

    /// Returns the number of providers holding a non-zero balance.
    #[must_use]
    pub fn holders(&self) -> usize {
        self.balances.len()
    }

    /// Iterates over `(provider, balance)` in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&AccountId, &Shares)> {
        self.balances.iter()
    }

    /// Computes the effect of minting `amount` to `provider`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the balance or the total would
    /// overflow.
    pub fn preview_mint(
        &self,
        provider: AccountId,
        amount: Shares,
    ) -> Result<LedgerEntry, AmmError> {
        Ok(LedgerEntry {
            provider,
            balance_after: self
                .balance_of(&provider)
                .safe_add(&amount, "provider share balance")?,
            total_after: self.total.safe_add(&amount, "ledger share total")?,
        })
    }

    /// Computes the effect of burning `amount` from `provider`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientShares`] if the provider holds less than
    ///   `amount`.
    /// - [`AmmError::InvariantViolation`] if the total would go negative,
    ///   which means the ledger has drifted.
    pub fn preview_burn(
        &self,
        provider: AccountId,
        amount: Shares,
    ) -> Result<LedgerEntry, AmmError> {
        let balance_after = self
            .balance_of(&provider)
            .checked_sub(&amount)
            .ok_or(AmmError::InsufficientShares)?;
        let total_after = self
            .total
            .checked_sub(&amount)
            .ok_or(AmmError::InvariantViolation(
                "burn exceeds ledger share total",
            ))?;
        Ok(LedgerEntry {
            provider,
            balance_after,
            total_after,
        })
    }

    /// Applies a previewed entry.
    pub(crate) fn apply(&mut self, entry: LedgerEntry) {
        if entry.balance_after.is_zero() {
            self.balances.remove(&entry.provider);
        } else {
            self.balances.insert(entry.provider, entry.balance_after);
        }
        self.total = entry.total_after;
    }

    /// Recomputes the total from the individual balances and compares it
    /// with both the running total and `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvariantViolation`] on any mismatch.
    pub fn reconcile(&self, expected: Shares) -> Result<(), AmmError> {
        let mut sum = Shares::ZERO;
        for balance in self.balances.values() {
            sum = sum
                .checked_add(balance)
                .ok_or(AmmError::InvariantViolation("share balances overflow"))?;
        }
        if sum != self.total {
            return Err(AmmError::InvariantViolation(
                "share balances do not sum to the ledger total",
            ));
        }
        if self.total != expected {
            return Err(AmmError::InvariantViolation(
                "ledger total differs from pool total shares",
            ));
        }
        Ok(())
    }
}
