//! Canonically ordered pair of distinct assets.

use serde::{Deserialize, Serialize};

use super::{AssetId, PoolKey};
use crate::error::AmmError;

/// One side of a pool: the lower or the higher member asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The asset with the smaller identifier.
    Low,
    /// The asset with the larger identifier.
    High,
}

impl Side {
    /// Returns the other side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Low => Self::High,
            Self::High => Self::Low,
        }
    }
}

/// A pair of distinct, non-null assets sorted so that `low() < high()`.
///
/// Construction rejects identical assets before null ones, mirroring the
/// order in which pool creation reports them.
///
/// # Examples
///
/// ```
/// use pair_amm::domain::{AssetId, AssetPair};
///
/// let x = AssetId::from_bytes([1u8; 32]);
/// let y = AssetId::from_bytes([2u8; 32]);
///
/// let pair = AssetPair::new(y, x).expect("distinct assets");
/// assert_eq!(pair.low(), x);
/// assert_eq!(pair.high(), y);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetPair {
    low: AssetId,
    high: AssetId,
}

impl AssetPair {
    /// Creates a canonically ordered pair.
    ///
    /// # Errors
    ///
    /// - [`AmmError::IdenticalAssets`] if `a == b`.
    /// - [`AmmError::NullAsset`] if either asset is [`AssetId::NULL`].
    pub fn new(a: AssetId, b: AssetId) -> Result<Self, AmmError> {
        if a == b {
            return Err(AmmError::IdenticalAssets);
        }
        if a.is_null() || b.is_null() {
            return Err(AmmError::NullAsset);
        }

        let (low, high) = if a < b { (a, b) } else { (b, a) };
        Ok(Self { low, high })
    }

    /// Returns the asset with the smaller identifier.
    #[must_use]
    pub const fn low(&self) -> AssetId {
        self.low
    }

    /// Returns the asset with the larger identifier.
    #[must_use]
    pub const fn high(&self) -> AssetId {
        self.high
    }

    /// Returns the asset on `side`.
    #[must_use]
    pub const fn asset(&self, side: Side) -> AssetId {
        match side {
            Side::Low => self.low,
            Side::High => self.high,
        }
    }

    /// Returns which side `asset` sits on, or `None` if it is not a member.
    #[must_use]
    pub fn side_of(&self, asset: AssetId) -> Option<Side> {
        if asset == self.low {
            Some(Side::Low)
        } else if asset == self.high {
            Some(Side::High)
        } else {
            None
        }
    }

    /// Returns `true` if `asset` is one of the two members.
    #[must_use]
    pub fn contains(&self, asset: AssetId) -> bool {
        self.side_of(asset).is_some()
    }

    /// Derives this pair's [`PoolKey`].
    #[must_use]
    pub fn key(&self) -> PoolKey {
        PoolKey::derive(self.low, self.high)
    }
}
