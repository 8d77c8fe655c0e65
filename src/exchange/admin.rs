//! Owner-only operations.
//!
//! The owner check always runs first, so a non-owner learns nothing about
//! the validity of its other arguments.

use tracing::{info, warn};

use crate::config::AmmConfig;
use crate::domain::{AccountId, Amount, AssetId, FeeRate};
use crate::error::Result;
use crate::traits::AssetTransfer;

use super::settlement::Settlement;

fn authorize(config: &AmmConfig, caller: AccountId, operation: &'static str) -> Result<()> {
    if let Err(err) = config.authorize(caller) {
        warn!(caller = %caller, operation, "rejected non-owner call");
        return Err(err);
    }
    Ok(())
}

/// Replaces the fee rate; returns `(previous, current)`.
pub(crate) fn update_fee(
    config: &mut AmmConfig,
    caller: AccountId,
    rate: u16,
) -> Result<(FeeRate, FeeRate)> {
    authorize(config, caller, "update_fee")?;
    let current = FeeRate::new(rate)?;
    let previous = config.fee_rate();
    config.set_fee_rate(current);
    info!(previous = %previous, current = %current, "fee rate updated");
    Ok((previous, current))
}

/// Pushes `amount` of `asset` from custody to the owner.
///
/// Pool reserves are left as they are; this is an escape hatch for assets
/// sent to custody outside any pool operation.
pub(crate) fn emergency_withdraw<T: AssetTransfer + ?Sized>(
    config: &AmmConfig,
    assets: &T,
    caller: AccountId,
    asset: AssetId,
    amount: Amount,
) -> Result<()> {
    authorize(config, caller, "emergency_withdraw")?;
    Settlement::new(assets, config.custody()).push(asset, config.owner(), amount)?;
    info!(asset = %asset, amount = %amount, owner = %config.owner(), "emergency withdrawal");
    Ok(())
}
