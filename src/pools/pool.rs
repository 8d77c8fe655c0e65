//! The reserve record of a single pool.
//!
//! A [`Pool`] stores its two member assets in canonical order together with
//! one reserve per side and the number of outstanding shares. Callers name
//! assets in whatever order they like; [`Pool::reserves_for`] orients the
//! reserves to the asset they start from.
//!
//! # Invariants
//!
//! - A pool that does not exist has every other field at its default.
//! - `reserve_low == 0`, `reserve_high == 0` and `total_shares == 0` are
//!   either all true or all false.
//! - `asset_low < asset_high` for every existing pool.

use serde::{Deserialize, Serialize};

use crate::domain::{Amount, AssetId, AssetPair, Shares, Side};
use crate::error::AmmError;
use crate::math::{widening_mul, U256};

/// State of one constant-product pool.
///
/// # Example
///
/// ```rust
/// use pair_amm::domain::{AssetId, AssetPair};
/// use pair_amm::pools::Pool;
///
/// let x = AssetId::from_bytes([1u8; 32]);
/// let y = AssetId::from_bytes([2u8; 32]);
/// let pool = Pool::new(AssetPair::new(y, x).expect("distinct"));
///
/// assert!(pool.exists());
/// assert_eq!(pool.asset_low(), x);
/// assert!(pool.is_empty());
/// assert_eq!(pool.check_invariants(), Ok(()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Pool {
    asset_low: AssetId,
    asset_high: AssetId,
    reserve_low: Amount,
    reserve_high: Amount,
    total_shares: Shares,
    exists: bool,
}

impl Pool {
    /// Creates an existing, empty pool for `pair`.
    #[must_use]
    pub const fn new(pair: AssetPair) -> Self {
        Self {
            asset_low: pair.low(),
            asset_high: pair.high(),
            reserve_low: Amount::ZERO,
            reserve_high: Amount::ZERO,
            total_shares: Shares::ZERO,
            exists: true,
        }
    }

    /// Returns the member asset with the smaller identifier.
    #[must_use]
    pub const fn asset_low(&self) -> AssetId {
        self.asset_low
    }

    /// Returns the member asset with the larger identifier.
    #[must_use]
    pub const fn asset_high(&self) -> AssetId {
        self.asset_high
    }

    /// Returns the reserve of the lower asset.
    #[must_use]
    pub const fn reserve_low(&self) -> Amount {
        self.reserve_low
    }

    /// Returns the reserve of the higher asset.
    #[must_use]
    pub const fn reserve_high(&self) -> Amount {
        self.reserve_high
    }

    /// Returns the number of outstanding shares.
    #[must_use]
    pub const fn total_shares(&self) -> Shares {
        self.total_shares
    }

    /// Returns `true` once the pool has been created.
    #[must_use]
    pub const fn exists(&self) -> bool {
        self.exists
    }

    /// Returns `true` while no shares are outstanding.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total_shares.is_zero()
    }

    /// Returns the reserve held on `side`.
    #[must_use]
    pub const fn reserve(&self, side: Side) -> Amount {
        match side {
            Side::Low => self.reserve_low,
            Side::High => self.reserve_high,
        }
    }

    /// Returns which side `asset` sits on, or `None` if it is not a member.
    #[must_use]
    pub fn side_of(&self, asset: AssetId) -> Option<Side> {
        if !self.exists {
            None
        } else if asset == self.asset_low {
            Some(Side::Low)
        } else if asset == self.asset_high {
            Some(Side::High)
        } else {
            None
        }
    }

    /// Returns `(reserve of asset, reserve of the other member)`.
    ///
    /// `None` if `asset` is not a member of this pool.
    #[must_use]
    pub fn reserves_for(&self, asset: AssetId) -> Option<(Amount, Amount)> {
        let side = self.side_of(asset)?;
        Some((self.reserve(side), self.reserve(side.opposite())))
    }

    /// Returns `k = reserve_low × reserve_high` without truncation.
    #[must_use]
    pub fn invariant(&self) -> U256 {
        widening_mul(self.reserve_low.get(), self.reserve_high.get())
    }

    /// Checks the structural invariants listed in the module docs.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvariantViolation`] naming the broken rule.
    pub fn check_invariants(&self) -> Result<(), AmmError> {
        if !self.exists {
            return if *self == Self::default() {
                Ok(())
            } else {
                Err(AmmError::InvariantViolation(
                    "non-existent pool carries state",
                ))
            };
        }
        if self.asset_low >= self.asset_high {
            return Err(AmmError::InvariantViolation(
                "pool assets are not canonically ordered",
            ));
        }
        let low_zero = self.reserve_low.is_zero();
        let high_zero = self.reserve_high.is_zero();
        let shares_zero = self.total_shares.is_zero();
        if low_zero != high_zero || low_zero != shares_zero {
            return Err(AmmError::InvariantViolation(
                "reserves and shares disagree on emptiness",
            ));
        }
        Ok(())
    }

    /// Returns a copy with the given reserves, oriented to `side`.
    ///
    /// `reserve_side` lands on `side` and `reserve_other` on the opposite
    /// side.
    #[must_use]
    pub(crate) const fn with_state(
        self,
        side: Side,
        reserve_side: Amount,
        reserve_other: Amount,
        total_shares: Shares,
    ) -> Self {
        let (reserve_low, reserve_high) = match side {
            Side::Low => (reserve_side, reserve_other),
            Side::High => (reserve_other, reserve_side),
        };
        Self {
            reserve_low,
            reserve_high,
            total_shares,
            ..self
        }
    }
}
