//! Outcomes of completed pool operations and read-only pool snapshots.

use serde::{Deserialize, Serialize};

use super::{Amount, AssetId, PoolKey, Shares};

/// Outcome of a successful deposit, in the caller's asset order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DepositReceipt {
    pool: PoolKey,
    asset_a: AssetId,
    asset_b: AssetId,
    amount_a: Amount,
    amount_b: Amount,
    liquidity: Shares,
}

impl DepositReceipt {
    pub(crate) const fn new(
        pool: PoolKey,
        (asset_a, asset_b): (AssetId, AssetId),
        (amount_a, amount_b): (Amount, Amount),
        liquidity: Shares,
    ) -> Self {
        Self {
            pool,
            asset_a,
            asset_b,
            amount_a,
            amount_b,
            liquidity,
        }
    }

    /// Returns the pool deposited into.
    #[must_use]
    pub const fn pool(&self) -> PoolKey {
        self.pool
    }

    /// Returns asset A as the caller named it.
    #[must_use]
    pub const fn asset_a(&self) -> AssetId {
        self.asset_a
    }

    /// Returns asset B as the caller named it.
    #[must_use]
    pub const fn asset_b(&self) -> AssetId {
        self.asset_b
    }

    /// Returns the amount of asset A pulled from the provider.
    #[must_use]
    pub const fn amount_a(&self) -> Amount {
        self.amount_a
    }

    /// Returns the amount of asset B pulled from the provider.
    #[must_use]
    pub const fn amount_b(&self) -> Amount {
        self.amount_b
    }

    /// Returns the shares minted to the provider.
    #[must_use]
    pub const fn liquidity(&self) -> Shares {
        self.liquidity
    }
}

/// Outcome of a successful withdrawal, in the caller's asset order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WithdrawalReceipt {
    pool: PoolKey,
    asset_a: AssetId,
    asset_b: AssetId,
    amount_a: Amount,
    amount_b: Amount,
    liquidity: Shares,
}

impl WithdrawalReceipt {
    pub(crate) const fn new(
        pool: PoolKey,
        (asset_a, asset_b): (AssetId, AssetId),
        (amount_a, amount_b): (Amount, Amount),
        liquidity: Shares,
    ) -> Self {
        Self {
            pool,
            asset_a,
            asset_b,
            amount_a,
            amount_b,
            liquidity,
        }
    }

    /// Returns the pool withdrawn from.
    #[must_use]
    pub const fn pool(&self) -> PoolKey {
        self.pool
    }

    /// Returns asset A as the caller named it.
    #[must_use]
    pub const fn asset_a(&self) -> AssetId {
        self.asset_a
    }

    /// Returns asset B as the caller named it.
    #[must_use]
    pub const fn asset_b(&self) -> AssetId {
        self.asset_b
    }

    /// Returns the amount of asset A paid out.
    #[must_use]
    pub const fn amount_a(&self) -> Amount {
        self.amount_a
    }

    /// Returns the amount of asset B paid out.
    #[must_use]
    pub const fn amount_b(&self) -> Amount {
        self.amount_b
    }

    /// Returns the shares burned.
    #[must_use]
    pub const fn liquidity(&self) -> Shares {
        self.liquidity
    }
}

/// Outcome of a successful exact-in swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SwapReceipt {
    pool: PoolKey,
    asset_in: AssetId,
    asset_out: AssetId,
    amount_in: Amount,
    amount_out: Amount,
}

impl SwapReceipt {
    pub(crate) const fn new(
        pool: PoolKey,
        (asset_in, asset_out): (AssetId, AssetId),
        amount_in: Amount,
        amount_out: Amount,
    ) -> Self {
        Self {
            pool,
            asset_in,
            asset_out,
            amount_in,
            amount_out,
        }
    }

    /// Returns the pool traded against.
    #[must_use]
    pub const fn pool(&self) -> PoolKey {
        self.pool
    }

    /// Returns the asset sold.
    #[must_use]
    pub const fn asset_in(&self) -> AssetId {
        self.asset_in
    }

    /// Returns the asset bought.
    #[must_use]
    pub const fn asset_out(&self) -> AssetId {
        self.asset_out
    }

    /// Returns the input amount pulled from the trader.
    #[must_use]
    pub const fn amount_in(&self) -> Amount {
        self.amount_in
    }

    /// Returns the output amount paid to the trader.
    #[must_use]
    pub const fn amount_out(&self) -> Amount {
        self.amount_out
    }
}

/// Read-only snapshot of a pool, oriented to the caller's asset order.
///
/// Lookups of a pair with no pool return the all-zero snapshot with
/// `exists == false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PoolInfo {
    /// Reserve of the first asset the caller named.
    pub reserve_a: Amount,
    /// Reserve of the second asset the caller named.
    pub reserve_b: Amount,
    /// Outstanding shares.
    pub total_shares: Shares,
    /// Whether the pool has been created.
    pub exists: bool,
}
