//! Fundamental domain value types used throughout the AMM engine.
//!
//! Identifiers, quantities, the fee rate, caller requests, operation
//! receipts and events. All types are newtypes or plain records with
//! validated constructors where an invariant exists.

mod account_id;
mod amount;
mod asset_id;
mod asset_pair;
mod fee_rate;
mod pool_event;
mod pool_key;
mod receipts;
mod requests;
mod shares;

pub use account_id::AccountId;
pub use amount::Amount;
pub use asset_id::AssetId;
pub use asset_pair::{AssetPair, Side};
pub use fee_rate::{FeeRate, FEE_DENOMINATOR};
pub use pool_event::PoolEvent;
pub use pool_key::{pool_key, PoolKey};
pub use receipts::{DepositReceipt, PoolInfo, SwapReceipt, WithdrawalReceipt};
pub use requests::{DepositRequest, WithdrawalRequest};
pub use shares::Shares;
