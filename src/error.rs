//! Unified error types for the AMM engine.
//!
//! All fallible operations across the crate return [`AmmError`], so every
//! rejection reaches the caller as one specific, matchable variant. The first
//! failing check aborts an operation; nothing is retried internally.

use thiserror::Error;

use crate::domain::PoolKey;
use crate::traits::TransferError;

/// Every way an AMM operation can be rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmmError {
    /// Both assets of a pair are the same.
    #[error("pool assets must be distinct")]
    IdenticalAssets,

    /// One asset of a pair is the null sentinel.
    #[error("the null asset cannot be a pool member")]
    NullAsset,

    /// A pool for this pair was already created.
    #[error("pool {0} already exists")]
    PoolAlreadyExists(PoolKey),

    /// No pool exists for the requested pair.
    #[error("no pool exists for this asset pair")]
    PoolNotFound,

    /// The ratio-adjusted amount of asset A is outside the caller's bounds.
    #[error("insufficient asset A amount")]
    InsufficientAAmount,

    /// The ratio-adjusted amount of asset B is below the caller's minimum.
    #[error("insufficient asset B amount")]
    InsufficientBAmount,

    /// The deposit is too small to mint a single share.
    #[error("insufficient liquidity minted")]
    InsufficientLiquidityMinted,

    /// The provider holds fewer shares than it tried to burn.
    #[error("insufficient shares")]
    InsufficientShares,

    /// An output fell below the caller's slippage bound.
    #[error("insufficient output amount")]
    InsufficientOutputAmount,

    /// The pool is empty or cannot cover the requested output.
    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    /// The asset-transfer collaborator refused or failed a transfer.
    #[error("asset transfer failed: {0}")]
    TransferFailed(#[from] TransferError),

    /// A payout failed after an earlier payout of the same withdrawal could
    /// not be reclaimed; the pool was debited for what the provider received.
    #[error("withdrawal partially settled: {0}")]
    PartiallySettled(TransferError),

    /// A division had a zero divisor.
    #[error("division by zero")]
    DivideByZero,

    /// A fee rate above the 30/1000 ceiling was requested.
    #[error("fee rate {0}/1000 exceeds the maximum of 30/1000")]
    FeeTooHigh(u16),

    /// A privileged operation was called by someone other than the owner.
    #[error("caller is not the owner")]
    Unauthorized,

    /// Checked arithmetic overflowed.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// Checked arithmetic underflowed.
    #[error("arithmetic underflow: {0}")]
    Underflow(&'static str),

    /// Pool and share ledger disagree; the change was not committed.
    #[error("invariant violation: {0}")]
    InvariantViolation(&'static str),

    /// Exchange configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, AmmError>;
