//! Constant-product exact-in pricing.
//!
//! The fee is taken from the input before pricing:
//!
//! ```text
//! with_fee   = amount_in × (1000 − fee_rate)
//! amount_out = ⌊with_fee × reserve_out / (reserve_in × 1000 + with_fee)⌋
//! ```
//!
//! The whole `amount_in` is added to the input reserve, so the retained fee
//! grows `reserve_low × reserve_high` on every swap.

use tracing::debug;

use crate::domain::{Amount, AssetId, FeeRate, Side, FEE_DENOMINATOR};
use crate::error::{AmmError, Result};
use crate::math::{floor_mul_div, CheckedArithmetic};
use crate::pools::{Pool, PoolBook, StagedChange};

/// Prices an exact-in swap against `(reserve_in, reserve_out)`.
///
/// # Errors
///
/// - [`AmmError::InsufficientLiquidity`] if either reserve is zero.
/// - [`AmmError::Overflow`] if `amount_in` is too large to price.
///
/// # Examples
///
/// ```
/// use pair_amm::domain::{Amount, FeeRate};
/// use pair_amm::engine::amount_out;
///
/// let out = amount_out(Amount::new(10), Amount::new(150), Amount::new(150), FeeRate::DEFAULT);
/// assert_eq!(out, Ok(Amount::new(9)));
/// ```
pub fn amount_out(
    amount_in: Amount,
    reserve_in: Amount,
    reserve_out: Amount,
    fee_rate: FeeRate,
) -> Result<Amount> {
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(AmmError::InsufficientLiquidity);
    }
    let with_fee = amount_in
        .get()
        .checked_mul(u128::from(fee_rate.complement()))
        .ok_or(AmmError::Overflow("swap input with fee"))?;
    let denominator = reserve_in
        .get()
        .checked_mul(u128::from(FEE_DENOMINATOR))
        .and_then(|scaled| scaled.checked_add(with_fee))
        .ok_or(AmmError::Overflow("swap denominator"))?;
    let out = floor_mul_div(with_fee, reserve_out.get(), denominator)?;
    Ok(Amount::new(out))
}

fn sides(pool: &Pool, asset_in: AssetId, asset_out: AssetId) -> Result<Side> {
    match (pool.side_of(asset_in), pool.side_of(asset_out)) {
        (Some(side_in), Some(side_out)) if side_in != side_out => Ok(side_in),
        _ => Err(AmmError::PoolNotFound),
    }
}

/// Quotes selling `amount_in` of `asset_in` for `asset_out` on `pool`.
///
/// # Errors
///
/// - [`AmmError::PoolNotFound`] if the assets are not this pool's members.
/// - Anything [`amount_out`] returns.
pub fn quote_exact_in(
    pool: &Pool,
    amount_in: Amount,
    asset_in: AssetId,
    asset_out: AssetId,
    fee_rate: FeeRate,
) -> Result<Amount> {
    let side_in = sides(pool, asset_in, asset_out)?;
    let out = amount_out(
        amount_in,
        pool.reserve(side_in),
        pool.reserve(side_in.opposite()),
        fee_rate,
    )?;
    debug!(
        amount_in = %amount_in,
        amount_out = %out,
        fee_rate = %fee_rate,
        "swap quoted"
    );
    Ok(out)
}

/// A fully validated swap waiting for its transfers.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SwapPlan {
    pub(crate) amount_out: Amount,
    pub(crate) change: StagedChange,
}

/// Plans an exact-in swap without touching `book`.
pub(crate) fn plan_swap(
    book: &PoolBook,
    amount_in: Amount,
    amount_out_min: Amount,
    (asset_in, asset_out): (AssetId, AssetId),
    fee_rate: FeeRate,
) -> Result<SwapPlan> {
    let pool = book.pool();
    let side_in = sides(pool, asset_in, asset_out)?;
    let reserve_in = pool.reserve(side_in);
    let reserve_out = pool.reserve(side_in.opposite());

    let out = amount_out(amount_in, reserve_in, reserve_out, fee_rate)?;
    if out < amount_out_min {
        return Err(AmmError::InsufficientOutputAmount);
    }
    if out >= reserve_out {
        return Err(AmmError::InsufficientLiquidity);
    }

    let pool_after = pool.with_state(
        side_in,
        reserve_in.safe_add(&amount_in, "swap reserve in")?,
        reserve_out.safe_sub(&out, "swap reserve out")?,
        pool.total_shares(),
    );
    if pool_after.invariant() < pool.invariant() {
        return Err(AmmError::InvariantViolation("swap decreased the product"));
    }
    let change = book.stage(pool_after, None)?;
    debug!(
        pool = %book.key(),
        amount_in = %amount_in,
        amount_out = %out,
        "swap planned"
    );

    Ok(SwapPlan {
        amount_out: out,
        change,
    })
}
