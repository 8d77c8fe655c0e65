//! Opaque asset identifier.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A fixed-width, totally ordered handle to a fungible asset.
///
/// Wraps a `[u8; 32]` byte array compared lexicographically. The all-zero
/// value is the [`NULL`](Self::NULL) sentinel, which is never accepted as a
/// pool member. Serializes as a lowercase hex string.
///
/// # Examples
///
/// ```
/// use pair_amm::domain::AssetId;
///
/// let usdc = AssetId::from_bytes([1u8; 32]);
/// assert!(!usdc.is_null());
/// assert!(AssetId::NULL.is_null());
/// assert!(AssetId::NULL < usdc);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct AssetId(#[serde(with = "hex::serde")] [u8; 32]);

impl AssetId {
    /// The null sentinel (all zero bytes).
    pub const NULL: Self = Self([0u8; 32]);

    /// Creates an `AssetId` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying 32-byte representation.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns `true` for the null sentinel.
    #[must_use]
    pub fn is_null(&self) -> bool {
        *self == Self::NULL
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}
