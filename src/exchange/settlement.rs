//! Transfer journal for one operation.
//!
//! Each leg is run through the collaborator in order. When a leg fails, the
//! legs that already completed are reversed newest first and the original
//! failure is returned. A reversal that itself fails is logged and the leg
//! is kept as stranded, so the caller can account for a payout that could
//! not be taken back.

use tracing::{error, warn};

use crate::domain::{AccountId, Amount, AssetId};
use crate::error::{AmmError, Result};
use crate::traits::{AssetTransfer, TransferError};

#[derive(Debug, Clone, Copy)]
enum Leg {
    /// `amount` of `asset` moved from `account` into custody.
    Pull {
        asset: AssetId,
        account: AccountId,
        amount: Amount,
    },
    /// `amount` of `asset` moved from custody to `account`.
    Push {
        asset: AssetId,
        account: AccountId,
        amount: Amount,
    },
}

pub(crate) struct Settlement<'a, T: AssetTransfer + ?Sized> {
    assets: &'a T,
    custody: AccountId,
    completed: Vec<Leg>,
    stranded: Vec<Leg>,
}

impl<'a, T: AssetTransfer + ?Sized> Settlement<'a, T> {
    pub(crate) fn new(assets: &'a T, custody: AccountId) -> Self {
        Self {
            assets,
            custody,
            completed: Vec::with_capacity(2),
            stranded: Vec::new(),
        }
    }

    /// Fails with the custody shortfall if custody holds less than `amount`
    /// of `asset`. Moves nothing.
    pub(crate) fn ensure_custody_covers(&self, asset: AssetId, amount: Amount) -> Result<()> {
        let available = self.assets.balance_of(asset, self.custody);
        if available < amount {
            warn!(%asset, %available, required = %amount, "custody cannot cover payout");
            return Err(AmmError::TransferFailed(
                TransferError::InsufficientBalance {
                    available,
                    required: amount,
                },
            ));
        }
        Ok(())
    }

    /// Payouts that completed and could not be reclaimed during unwind.
    pub(crate) fn stranded_payouts(&self) -> impl Iterator<Item = (AssetId, Amount)> + '_ {
        self.stranded.iter().filter_map(|leg| match *leg {
            Leg::Push { asset, amount, .. } => Some((asset, amount)),
            Leg::Pull { .. } => None,
        })
    }

    /// Pulls `amount` of `asset` from `account` into custody, spending the
    /// allowance `account` granted to custody.
    pub(crate) fn pull(
        &mut self,
        asset: AssetId,
        account: AccountId,
        amount: Amount,
    ) -> Result<()> {
        let outcome = self
            .assets
            .transfer_from(asset, self.custody, account, self.custody, amount);
        self.record(
            outcome,
            Leg::Pull {
                asset,
                account,
                amount,
            },
        )
    }

    /// Pushes `amount` of `asset` from custody to `account`.
    pub(crate) fn push(
        &mut self,
        asset: AssetId,
        account: AccountId,
        amount: Amount,
    ) -> Result<()> {
        let outcome = self.assets.transfer(asset, self.custody, account, amount);
        self.record(
            outcome,
            Leg::Push {
                asset,
                account,
                amount,
            },
        )
    }

    fn record(&mut self, outcome: core::result::Result<(), TransferError>, leg: Leg) -> Result<()> {
        match outcome {
            Ok(()) => {
                self.completed.push(leg);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, leg = ?leg, "transfer failed; unwinding settlement");
                self.unwind();
                Err(AmmError::TransferFailed(err))
            }
        }
    }

    fn unwind(&mut self) {
        while let Some(leg) = self.completed.pop() {
            let reversal = match leg {
                Leg::Pull {
                    asset,
                    account,
                    amount,
                } => self.assets.transfer(asset, self.custody, account, amount),
                Leg::Push {
                    asset,
                    account,
                    amount,
                } => self
                    .assets
                    .transfer_from(asset, self.custody, account, self.custody, amount),
            };
            if let Err(err) = reversal {
                error!(error = %err, leg = ?leg, "compensating transfer failed");
                self.stranded.push(leg);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::assets::InMemoryAssets;

    const TOKEN_X: AssetId = AssetId::from_bytes([1u8; 32]);
    const TOKEN_Y: AssetId = AssetId::from_bytes([2u8; 32]);
    const ALICE: AccountId = AccountId::from_bytes([10u8; 32]);
    const CUSTODY: AccountId = AccountId::from_bytes([20u8; 32]);

    fn assets() -> InMemoryAssets {
        let assets = InMemoryAssets::new();
        for token in [TOKEN_X, TOKEN_Y] {
            let Ok(()) = assets.mint(token, ALICE, Amount::new(100)) else {
                panic!("mint failed");
            };
            let Ok(()) = assets.approve(token, ALICE, CUSTODY, Amount::MAX) else {
                panic!("approve failed");
            };
        }
        assets
    }

    #[test]
    fn successful_legs_stay_applied() {
        let assets = assets();
        let mut settlement = Settlement::new(&assets, CUSTODY);
        assert_eq!(settlement.pull(TOKEN_X, ALICE, Amount::new(30)), Ok(()));
        assert_eq!(settlement.pull(TOKEN_Y, ALICE, Amount::new(40)), Ok(()));
        assert_eq!(assets.balance_of(TOKEN_X, CUSTODY), Amount::new(30));
        assert_eq!(assets.balance_of(TOKEN_Y, CUSTODY), Amount::new(40));
    }

    #[test]
    fn failed_second_pull_refunds_the_first() {
        let assets = assets();
        let mut settlement = Settlement::new(&assets, CUSTODY);
        assert_eq!(settlement.pull(TOKEN_X, ALICE, Amount::new(30)), Ok(()));
        assert!(matches!(
            settlement.pull(TOKEN_Y, ALICE, Amount::new(101)),
            Err(AmmError::TransferFailed(_))
        ));
        assert_eq!(assets.balance_of(TOKEN_X, ALICE), Amount::new(100));
        assert_eq!(assets.balance_of(TOKEN_X, CUSTODY), Amount::ZERO);
    }

    #[test]
    fn failed_push_reclaims_the_earlier_push() {
        let assets = assets();
        let Ok(()) = assets.mint(TOKEN_X, CUSTODY, Amount::new(10)) else {
            panic!("mint failed");
        };
        let mut settlement = Settlement::new(&assets, CUSTODY);
        assert_eq!(settlement.push(TOKEN_X, ALICE, Amount::new(10)), Ok(()));
        assert!(settlement.push(TOKEN_Y, ALICE, Amount::new(1)).is_err());
        assert_eq!(assets.balance_of(TOKEN_X, CUSTODY), Amount::new(10));
        assert_eq!(assets.balance_of(TOKEN_X, ALICE), Amount::new(100));
        assert_eq!(settlement.stranded_payouts().count(), 0);
    }

    #[test]
    fn unreclaimable_push_is_reported_as_stranded() {
        let assets = assets();
        let Ok(()) = assets.mint(TOKEN_X, CUSTODY, Amount::new(10)) else {
            panic!("mint failed");
        };
        let Ok(()) = assets.approve(TOKEN_X, ALICE, CUSTODY, Amount::ZERO) else {
            panic!("revoke failed");
        };
        assets.freeze(TOKEN_Y);

        let mut settlement = Settlement::new(&assets, CUSTODY);
        assert_eq!(settlement.push(TOKEN_X, ALICE, Amount::new(10)), Ok(()));
        assert!(settlement.push(TOKEN_Y, ALICE, Amount::new(1)).is_err());

        let stranded: Vec<_> = settlement.stranded_payouts().collect();
        assert_eq!(stranded, vec![(TOKEN_X, Amount::new(10))]);
        assert_eq!(assets.balance_of(TOKEN_X, ALICE), Amount::new(110));
    }

    #[test]
    fn custody_shortfall_is_reported_without_moving_anything() {
        let assets = assets();
        let settlement = Settlement::new(&assets, CUSTODY);
        assert!(matches!(
            settlement.ensure_custody_covers(TOKEN_X, Amount::new(1)),
            Err(AmmError::TransferFailed(
                TransferError::InsufficientBalance { .. }
            ))
        ));
        assert_eq!(settlement.ensure_custody_covers(TOKEN_X, Amount::ZERO), Ok(()));
    }
}
