//! Notifications emitted by completed operations.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{
    AccountId, Amount, AssetId, DepositReceipt, FeeRate, PoolKey, SwapReceipt, WithdrawalReceipt,
};

/// A state change observers can react to.
///
/// Events are published only after the operation that produced them has
/// committed, so an observer never sees a change that was later rolled back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PoolEvent {
    /// A pool was registered for a new asset pair.
    PoolCreated {
        /// Key of the new pool.
        pool: PoolKey,
        /// Lower member asset.
        asset_low: AssetId,
        /// Higher member asset.
        asset_high: AssetId,
    },
    /// A provider deposited into a pool.
    LiquidityAdded {
        /// The depositing provider.
        provider: AccountId,
        /// What was deposited and minted.
        receipt: DepositReceipt,
    },
    /// A provider withdrew from a pool.
    LiquidityRemoved {
        /// The withdrawing provider.
        provider: AccountId,
        /// What was burned and paid out.
        receipt: WithdrawalReceipt,
    },
    /// A trader swapped against a pool.
    TokenSwapped {
        /// The trader.
        trader: AccountId,
        /// What was sold and bought.
        receipt: SwapReceipt,
    },
    /// The owner changed the swap fee.
    FeeUpdated {
        /// Rate before the update.
        previous: FeeRate,
        /// Rate after the update.
        current: FeeRate,
    },
    /// The owner pulled assets straight out of custody.
    EmergencyWithdrawal {
        /// Asset withdrawn.
        asset: AssetId,
        /// Amount withdrawn.
        amount: Amount,
        /// Receiving owner account.
        recipient: AccountId,
    },
}

impl PoolEvent {
    /// Returns the pool this event concerns, if it concerns a single pool.
    #[must_use]
    pub const fn pool(&self) -> Option<PoolKey> {
        match self {
            Self::PoolCreated { pool, .. } => Some(*pool),
            Self::LiquidityAdded { receipt, .. } => Some(receipt.pool()),
            Self::LiquidityRemoved { receipt, .. } => Some(receipt.pool()),
            Self::TokenSwapped { receipt, .. } => Some(receipt.pool()),
            Self::FeeUpdated { .. } | Self::EmergencyWithdrawal { .. } => None,
        }
    }

    /// Returns a short, stable name for the event kind.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::PoolCreated { .. } => "PoolCreated",
            Self::LiquidityAdded { .. } => "LiquidityAdded",
            Self::LiquidityRemoved { .. } => "LiquidityRemoved",
            Self::TokenSwapped { .. } => "TokenSwapped",
            Self::FeeUpdated { .. } => "FeeUpdated",
            Self::EmergencyWithdrawal { .. } => "EmergencyWithdrawal",
        }
    }
}

impl fmt::Display for PoolEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pool() {
            Some(pool) => write!(f, "{}({pool})", self.name()),
            None => write!(f, "{}", self.name()),
        }
    }
}
