//! A pool together with its share ledger, and staged changes to both.

use crate::domain::{AccountId, PoolKey, Shares};
use crate::error::AmmError;

use super::{LedgerEntry, Pool, ShareLedger};

/// A validated, not yet applied change to a [`PoolBook`].
///
/// Staging checks everything that could fail; [`PoolBook::commit`] then
/// only assigns, so a change is either applied whole or not at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StagedChange {
    pool: Pool,
    entry: Option<LedgerEntry>,
}

impl StagedChange {
    /// Returns the pool state that commit will install.
    #[must_use]
    pub const fn pool(&self) -> &Pool {
        &self.pool
    }

    /// Returns the ledger entry that commit will apply, if any.
    #[must_use]
    pub const fn entry(&self) -> Option<LedgerEntry> {
        self.entry
    }
}

/// Everything the engine tracks for one pool: its reserve record and the
/// share balances of its providers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolBook {
    key: PoolKey,
    pool: Pool,
    ledger: ShareLedger,
}

impl PoolBook {
    /// Creates the book of a freshly created pool.
    #[must_use]
    pub fn new(key: PoolKey, pool: Pool) -> Self {
        Self {
            key,
            pool,
            ledger: ShareLedger::new(),
        }
    }

    /// Returns the pool's key.
    #[must_use]
    pub const fn key(&self) -> PoolKey {
        self.key
    }

    /// Returns the reserve record.
    #[must_use]
    pub const fn pool(&self) -> &Pool {
        &self.pool
    }

    /// Returns the share ledger.
    #[must_use]
    pub const fn ledger(&self) -> &ShareLedger {
        &self.ledger
    }

    /// Returns `provider`'s share balance.
    #[must_use]
    pub fn shares_of(&self, provider: &AccountId) -> Shares {
        self.ledger.balance_of(provider)
    }

    /// Validates a proposed new state before anything moves.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvariantViolation`] if `pool` breaks a pool
    /// invariant or if the ledger total after `entry` would not equal the
    /// pool's `total_shares`.
    pub fn stage(&self, pool: Pool, entry: Option<LedgerEntry>) -> Result<StagedChange, AmmError> {
        pool.check_invariants()?;
        if pool.asset_low() != self.pool.asset_low()
            || pool.asset_high() != self.pool.asset_high()
        {
            return Err(AmmError::InvariantViolation(
                "staged pool changes member assets",
            ));
        }
        let total_after = entry.map_or(self.ledger.total(), |e| e.total_after());
        if total_after != pool.total_shares() {
            return Err(AmmError::InvariantViolation(
                "ledger total differs from pool total shares",
            ));
        }
        Ok(StagedChange { pool, entry })
    }

    /// Installs a staged change.
    pub(crate) fn commit(&mut self, change: StagedChange) {
        self.pool = change.pool;
        if let Some(entry) = change.entry {
            self.ledger.apply(entry);
        }
    }

    /// Checks that the ledger and the pool agree.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvariantViolation`] on any disagreement.
    pub fn reconcile(&self) -> Result<(), AmmError> {
        self.pool.check_invariants()?;
        self.ledger.reconcile(self.pool.total_shares())
    }
}
