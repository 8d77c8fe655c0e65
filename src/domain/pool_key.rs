//! Canonical pool key derivation.

use core::fmt;

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

use super::AssetId;

/// Fixed-width identifier of a pool, derived from its two member assets.
///
/// `PoolKey::derive(a, b)` orders the pair (smaller id first) and hashes the
/// concatenation `low || high` with Keccak-256, so the key is independent of
/// argument order. Derivation is pure; it does not check that the assets are
/// distinct or non-null.
///
/// # Examples
///
/// ```
/// use pair_amm::domain::{AssetId, PoolKey};
///
/// let x = AssetId::from_bytes([1u8; 32]);
/// let y = AssetId::from_bytes([2u8; 32]);
/// assert_eq!(PoolKey::derive(x, y), PoolKey::derive(y, x));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PoolKey(#[serde(with = "hex::serde")] [u8; 32]);

impl PoolKey {
    /// Derives the key of the unordered pair `{a, b}`.
    #[must_use]
    pub fn derive(a: AssetId, b: AssetId) -> Self {
        let (low, high) = if a > b { (b, a) } else { (a, b) };

        let mut hasher = Keccak256::new();
        hasher.update(low.as_bytes());
        hasher.update(high.as_bytes());
        let digest = hasher.finalize();

        let mut key = [0u8; 32];
        key.copy_from_slice(&digest);
        Self(key)
    }

    /// Wraps an already derived key, e.g. one read back from storage.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the raw key bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for PoolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Free-function form of [`PoolKey::derive`].
#[must_use]
pub fn pool_key(a: AssetId, b: AssetId) -> PoolKey {
    PoolKey::derive(a, b)
}
