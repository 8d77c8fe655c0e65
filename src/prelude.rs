//! Convenience re-exports for common types and traits.
//!
//! ```rust
//! use pair_amm::prelude::*;
//! ```

pub use crate::domain::{
    AccountId, Amount, AssetId, DepositReceipt, DepositRequest, FeeRate, PoolEvent, PoolInfo,
    PoolKey, Shares, SwapReceipt, WithdrawalReceipt, WithdrawalRequest,
};

pub use crate::traits::{AssetTransfer, EventSink, TransferError};

pub use crate::assets::InMemoryAssets;
pub use crate::config::AmmConfig;
pub use crate::events::EventLog;
pub use crate::exchange::{Exchange, SharedExchange};

pub use crate::error::{AmmError, Result};
