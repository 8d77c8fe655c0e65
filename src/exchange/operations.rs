//! Operation bodies shared by [`Exchange`](super::Exchange) and
//! [`SharedExchange`](super::SharedExchange).
//!
//! Each function plans against a [`PoolBook`], settles the transfers, and
//! commits only after every transfer succeeded. The one exception is a
//! withdrawal payout that could not be reclaimed, which is charged to the
//! provider. The caller owns locking and event publication.

use tracing::{error, info};

use crate::domain::{
    AccountId, Amount, AssetId, DepositReceipt, DepositRequest, FeeRate, PoolInfo, SwapReceipt,
    WithdrawalReceipt, WithdrawalRequest,
};
use crate::engine::liquidity::{plan_deposit, plan_stranded_payout, plan_withdrawal};
use crate::engine::swap::{plan_swap, quote_exact_in};
use crate::error::{AmmError, Result};
use crate::pools::{PoolBook, StagedChange};
use crate::traits::AssetTransfer;

use super::settlement::Settlement;

pub(crate) fn add_liquidity<T: AssetTransfer + ?Sized>(
    book: &mut PoolBook,
    assets: &T,
    custody: AccountId,
    (asset_a, asset_b): (AssetId, AssetId),
    request: &DepositRequest,
    provider: AccountId,
) -> Result<DepositReceipt> {
    let plan = plan_deposit(book, (asset_a, asset_b), request, provider)?;

    let mut settlement = Settlement::new(assets, custody);
    settlement.pull(asset_a, provider, plan.amount_a)?;
    settlement.pull(asset_b, provider, plan.amount_b)?;

    book.commit(plan.change);
    let receipt = DepositReceipt::new(
        book.key(),
        (asset_a, asset_b),
        (plan.amount_a, plan.amount_b),
        plan.liquidity,
    );
    info!(
        pool = %book.key(),
        provider = %provider,
        amount_a = %plan.amount_a,
        amount_b = %plan.amount_b,
        liquidity = %plan.liquidity,
        "liquidity added"
    );
    Ok(receipt)
}

pub(crate) fn remove_liquidity<T: AssetTransfer + ?Sized>(
    book: &mut PoolBook,
    assets: &T,
    custody: AccountId,
    (asset_a, asset_b): (AssetId, AssetId),
    request: &WithdrawalRequest,
    provider: AccountId,
) -> Result<WithdrawalReceipt> {
    let plan = plan_withdrawal(book, (asset_a, asset_b), request, provider)?;

    let mut settlement = Settlement::new(assets, custody);
    settlement.ensure_custody_covers(asset_a, plan.amount_a)?;
    settlement.ensure_custody_covers(asset_b, plan.amount_b)?;
    let paid = settlement
        .push(asset_a, provider, plan.amount_a)
        .and_then(|()| settlement.push(asset_b, provider, plan.amount_b));
    if let Err(err) = paid {
        return Err(charge_stranded_payouts(
            book,
            &settlement,
            plan.change,
            provider,
            err,
        ));
    }

    book.commit(plan.change);
    let receipt = WithdrawalReceipt::new(
        book.key(),
        (asset_a, asset_b),
        (plan.amount_a, plan.amount_b),
        request.liquidity(),
    );
    info!(
        pool = %book.key(),
        provider = %provider,
        amount_a = %plan.amount_a,
        amount_b = %plan.amount_b,
        liquidity = %request.liquidity(),
        "liquidity removed"
    );
    Ok(receipt)
}

/// Commits the debit for payouts that reached `provider` and could not be
/// reclaimed, and turns `err` into the error the caller sees.
///
/// When a payout cannot be charged on its own (it would leave the pool
/// half empty), the whole withdrawal is committed instead; the unpaid side
/// then stays in custody above the pool's reserve.
fn charge_stranded_payouts<T: AssetTransfer + ?Sized>(
    book: &mut PoolBook,
    settlement: &Settlement<'_, T>,
    withdrawal: StagedChange,
    provider: AccountId,
    err: AmmError,
) -> AmmError {
    let mut stranded = false;
    for (asset, paid) in settlement.stranded_payouts() {
        stranded = true;
        match plan_stranded_payout(book, asset, paid, provider) {
            Ok(change) => book.commit(change),
            Err(charge_err) => {
                error!(
                    pool = %book.key(),
                    provider = %provider,
                    error = %charge_err,
                    "stranded payout charged as a full withdrawal"
                );
                book.commit(withdrawal);
                break;
            }
        }
    }
    match err {
        AmmError::TransferFailed(transfer) if stranded => AmmError::PartiallySettled(transfer),
        other => other,
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn swap_exact_in<T: AssetTransfer + ?Sized>(
    book: &mut PoolBook,
    assets: &T,
    custody: AccountId,
    fee_rate: FeeRate,
    amount_in: Amount,
    amount_out_min: Amount,
    (asset_in, asset_out): (AssetId, AssetId),
    trader: AccountId,
) -> Result<SwapReceipt> {
    let plan = plan_swap(
        book,
        amount_in,
        amount_out_min,
        (asset_in, asset_out),
        fee_rate,
    )?;

    let mut settlement = Settlement::new(assets, custody);
    settlement.pull(asset_in, trader, amount_in)?;
    settlement.push(asset_out, trader, plan.amount_out)?;

    book.commit(plan.change);
    let receipt = SwapReceipt::new(
        book.key(),
        (asset_in, asset_out),
        amount_in,
        plan.amount_out,
    );
    info!(
        pool = %book.key(),
        trader = %trader,
        amount_in = %amount_in,
        amount_out = %plan.amount_out,
        "token swapped"
    );
    Ok(receipt)
}

pub(crate) fn get_amount_out(
    book: &PoolBook,
    amount_in: Amount,
    (asset_in, asset_out): (AssetId, AssetId),
    fee_rate: FeeRate,
) -> Result<Amount> {
    quote_exact_in(book.pool(), amount_in, asset_in, asset_out, fee_rate)
}

pub(crate) fn pool_info(book: &PoolBook, asset_a: AssetId) -> PoolInfo {
    let pool = book.pool();
    let Some((reserve_a, reserve_b)) = pool.reserves_for(asset_a) else {
        return PoolInfo::default();
    };
    PoolInfo {
        reserve_a,
        reserve_b,
        total_shares: pool.total_shares(),
        exists: pool.exists(),
    }
}
