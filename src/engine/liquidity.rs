//! Deposit and withdrawal arithmetic.
//!
//! # Deposit
//!
//! 1. An empty pool takes the desired amounts verbatim.
//! 2. Otherwise the deposit is fitted to the current ratio:
//!    `b_opt = ⌊a_desired × reserve_b / reserve_a⌋`. If `b_opt` fits within
//!    `b_desired` it is used (subject to `b_min`); otherwise
//!    `a_opt = ⌊b_desired × reserve_a / reserve_b⌋` is used (subject to
//!    `a_desired` and `a_min`).
//! 3. The first deposit mints `⌊√(amount_a × amount_b)⌋` shares; later ones
//!    mint `min(⌊amount_a × total / reserve_a⌋, ⌊amount_b × total / reserve_b⌋)`.
//!
//! # Withdrawal
//!
//! `amount_x = ⌊liquidity × reserve_x / total_shares⌋` for each side.
//!
//! A payout that left custody and could not be reclaimed is charged on its
//! own: its side's reserve drops by the amount paid and the provider burns
//! `⌈paid × total_shares / reserve⌉` shares.
//!
//! Every division floors, so rounding always favours the pool.

use tracing::debug;

use crate::domain::{AccountId, Amount, AssetId, DepositRequest, Shares, Side, WithdrawalRequest};
use crate::error::{AmmError, Result};
use crate::math::{floor_mul_div, min, sqrt_of_product, widening_mul, CheckedArithmetic};
use crate::pools::{PoolBook, StagedChange};

/// Fits a deposit request to reserves `(reserve_a, reserve_b)`.
///
/// Returns the amounts of A and B that will actually be taken.
///
/// # Errors
///
/// - [`AmmError::InsufficientBAmount`] if the ratio-fitted B is below
///   `amount_b_min`.
/// - [`AmmError::InsufficientAAmount`] if the ratio-fitted A exceeds
///   `amount_a_desired` or is below `amount_a_min`.
/// - [`AmmError::DivideByZero`] if exactly one reserve is zero.
pub fn deposit_amounts(
    reserve_a: Amount,
    reserve_b: Amount,
    request: &DepositRequest,
) -> Result<(Amount, Amount)> {
    let a_desired = request.amount_a_desired();
    let b_desired = request.amount_b_desired();

    if reserve_a.is_zero() && reserve_b.is_zero() {
        return Ok((a_desired, b_desired));
    }

    let b_optimal = Amount::new(floor_mul_div(
        a_desired.get(),
        reserve_b.get(),
        reserve_a.get(),
    )?);
    if b_optimal <= b_desired {
        if b_optimal < request.amount_b_min() {
            return Err(AmmError::InsufficientBAmount);
        }
        return Ok((a_desired, b_optimal));
    }

    let a_optimal = Amount::new(floor_mul_div(
        b_desired.get(),
        reserve_a.get(),
        reserve_b.get(),
    )?);
    if a_optimal > a_desired || a_optimal < request.amount_a_min() {
        return Err(AmmError::InsufficientAAmount);
    }
    Ok((a_optimal, b_desired))
}

/// Computes the shares minted for depositing `(amount_a, amount_b)`.
///
/// # Errors
///
/// - [`AmmError::InsufficientLiquidityMinted`] if the result is zero.
/// - [`AmmError::DivideByZero`] if shares exist but a reserve is zero.
pub fn shares_to_mint(
    amount_a: Amount,
    amount_b: Amount,
    reserve_a: Amount,
    reserve_b: Amount,
    total_shares: Shares,
) -> Result<Shares> {
    let minted = if total_shares.is_zero() {
        sqrt_of_product(amount_a.get(), amount_b.get())?
    } else {
        let total = total_shares.get();
        min(
            floor_mul_div(amount_a.get(), total, reserve_a.get())?,
            floor_mul_div(amount_b.get(), total, reserve_b.get())?,
        )
    };
    if minted == 0 {
        return Err(AmmError::InsufficientLiquidityMinted);
    }
    Ok(Shares::new(minted))
}

/// Computes the amounts paid out for burning `liquidity` shares.
///
/// # Errors
///
/// Returns [`AmmError::DivideByZero`] if `total_shares` is zero.
pub fn withdrawal_amounts(
    liquidity: Shares,
    reserve_a: Amount,
    reserve_b: Amount,
    total_shares: Shares,
) -> Result<(Amount, Amount)> {
    let total = total_shares.get();
    let amount_a = floor_mul_div(liquidity.get(), reserve_a.get(), total)?;
    let amount_b = floor_mul_div(liquidity.get(), reserve_b.get(), total)?;
    Ok((Amount::new(amount_a), Amount::new(amount_b)))
}

/// A fully validated deposit waiting for its transfers.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DepositPlan {
    pub(crate) amount_a: Amount,
    pub(crate) amount_b: Amount,
    pub(crate) liquidity: Shares,
    pub(crate) change: StagedChange,
}

/// A fully validated withdrawal waiting for its transfers.
#[derive(Debug, Clone, Copy)]
pub(crate) struct WithdrawalPlan {
    pub(crate) amount_a: Amount,
    pub(crate) amount_b: Amount,
    pub(crate) change: StagedChange,
}

fn side_of_a(book: &PoolBook, asset_a: AssetId, asset_b: AssetId) -> Result<Side> {
    let pool = book.pool();
    match (pool.side_of(asset_a), pool.side_of(asset_b)) {
        (Some(side), Some(other)) if side != other => Ok(side),
        _ => Err(AmmError::PoolNotFound),
    }
}

/// Plans a deposit of `request` by `provider` without touching `book`.
pub(crate) fn plan_deposit(
    book: &PoolBook,
    (asset_a, asset_b): (AssetId, AssetId),
    request: &DepositRequest,
    provider: AccountId,
) -> Result<DepositPlan> {
    let side_a = side_of_a(book, asset_a, asset_b)?;
    let pool = book.pool();
    let reserve_a = pool.reserve(side_a);
    let reserve_b = pool.reserve(side_a.opposite());

    let (amount_a, amount_b) = deposit_amounts(reserve_a, reserve_b, request)?;
    let liquidity = shares_to_mint(amount_a, amount_b, reserve_a, reserve_b, pool.total_shares())?;
    debug!(
        pool = %book.key(),
        amount_a = %amount_a,
        amount_b = %amount_b,
        liquidity = %liquidity,
        "deposit planned"
    );

    let entry = book.ledger().preview_mint(provider, liquidity)?;
    let pool_after = pool.with_state(
        side_a,
        reserve_a.safe_add(&amount_a, "deposit reserve a")?,
        reserve_b.safe_add(&amount_b, "deposit reserve b")?,
        pool.total_shares().safe_add(&liquidity, "pool total shares")?,
    );
    let change = book.stage(pool_after, Some(entry))?;

    Ok(DepositPlan {
        amount_a,
        amount_b,
        liquidity,
        change,
    })
}

/// Plans a withdrawal of `request` by `provider` without touching `book`.
pub(crate) fn plan_withdrawal(
    book: &PoolBook,
    (asset_a, asset_b): (AssetId, AssetId),
    request: &WithdrawalRequest,
    provider: AccountId,
) -> Result<WithdrawalPlan> {
    let side_a = side_of_a(book, asset_a, asset_b)?;
    let liquidity = request.liquidity();
    let entry = book.ledger().preview_burn(provider, liquidity)?;

    let pool = book.pool();
    let reserve_a = pool.reserve(side_a);
    let reserve_b = pool.reserve(side_a.opposite());
    let (amount_a, amount_b) =
        withdrawal_amounts(liquidity, reserve_a, reserve_b, pool.total_shares())?;
    debug!(
        pool = %book.key(),
        amount_a = %amount_a,
        amount_b = %amount_b,
        liquidity = %liquidity,
        "withdrawal planned"
    );
    if amount_a < request.amount_a_min() || amount_b < request.amount_b_min() {
        return Err(AmmError::InsufficientOutputAmount);
    }

    let pool_after = pool.with_state(
        side_a,
        reserve_a.safe_sub(&amount_a, "withdrawal reserve a")?,
        reserve_b.safe_sub(&amount_b, "withdrawal reserve b")?,
        pool.total_shares().safe_sub(&liquidity, "pool total shares")?,
    );
    let change = book.stage(pool_after, Some(entry))?;

    Ok(WithdrawalPlan {
        amount_a,
        amount_b,
        change,
    })
}

/// Returns `⌈paid × total / reserve⌉`, the shares that cover a payout of
/// `paid` out of `reserve`.
///
/// # Errors
///
/// - [`AmmError::DivideByZero`] if `reserve` is zero.
/// - [`AmmError::Overflow`] if the result does not fit in 128 bits.
pub fn shares_for_payout(paid: Amount, reserve: Amount, total: Shares) -> Result<Shares> {
    let floor = floor_mul_div(paid.get(), total.get(), reserve.get())?;
    if widening_mul(floor, reserve.get()) < widening_mul(paid.get(), total.get()) {
        let ceil = floor
            .checked_add(1)
            .ok_or(AmmError::Overflow("payout share count"))?;
        return Ok(Shares::new(ceil));
    }
    Ok(Shares::new(floor))
}

/// Plans the debit for `paid` of `asset` that reached `provider` while the
/// rest of its withdrawal did not.
///
/// The remaining holders' claim per share never shrinks: the burn rounds
/// up and the other reserve is untouched.
pub(crate) fn plan_stranded_payout(
    book: &PoolBook,
    asset: AssetId,
    paid: Amount,
    provider: AccountId,
) -> Result<StagedChange> {
    let pool = book.pool();
    let side = pool.side_of(asset).ok_or(AmmError::PoolNotFound)?;
    let reserve = pool.reserve(side);
    let burned = shares_for_payout(paid, reserve, pool.total_shares())?;
    let entry = book.ledger().preview_burn(provider, burned)?;
    debug!(
        pool = %book.key(),
        %asset,
        paid = %paid,
        burned = %burned,
        "stranded payout planned"
    );

    let pool_after = pool.with_state(
        side,
        reserve.safe_sub(&paid, "stranded payout reserve")?,
        pool.reserve(side.opposite()),
        entry.total_after(),
    );
    book.stage(pool_after, Some(entry))
}
