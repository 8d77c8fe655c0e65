//! Participant identity.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a liquidity provider, trader, the owner, or the pool custody
/// account.
///
/// Like [`AssetId`](super::AssetId) it wraps 32 opaque bytes; the two types
/// are kept apart so an account can never be passed where an asset is
/// expected.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct AccountId(#[serde(with = "hex::serde")] [u8; 32]);

impl AccountId {
    /// The null account (all zero bytes).
    pub const NULL: Self = Self([0u8; 32]);

    /// Creates an `AccountId` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying 32-byte representation.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns `true` for the null account.
    #[must_use]
    pub fn is_null(&self) -> bool {
        *self == Self::NULL
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}
