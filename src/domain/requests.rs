//! Caller-supplied parameters for liquidity operations.

use serde::{Deserialize, Serialize};

use super::{Amount, Shares};

/// Parameters of a deposit, in the caller's asset order.
///
/// The desired amounts are upper bounds; the minimums are slippage bounds
/// applied when the pool's current ratio forces one side to be reduced.
///
/// # Examples
///
/// ```
/// use pair_amm::domain::{Amount, DepositRequest};
///
/// let req = DepositRequest::new(Amount::new(100), Amount::new(100))
///     .with_minimums(Amount::new(95), Amount::new(95));
/// assert_eq!(req.amount_a_min(), Amount::new(95));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DepositRequest {
    amount_a_desired: Amount,
    amount_b_desired: Amount,
    amount_a_min: Amount,
    amount_b_min: Amount,
}

impl DepositRequest {
    /// Creates a request with zero minimums.
    pub const fn new(amount_a_desired: Amount, amount_b_desired: Amount) -> Self {
        Self {
            amount_a_desired,
            amount_b_desired,
            amount_a_min: Amount::ZERO,
            amount_b_min: Amount::ZERO,
        }
    }

    /// Sets the slippage bounds.
    #[must_use]
    pub const fn with_minimums(self, amount_a_min: Amount, amount_b_min: Amount) -> Self {
        Self {
            amount_a_min,
            amount_b_min,
            ..self
        }
    }

    /// Upper bound on asset A pulled from the provider.
    #[must_use]
    pub const fn amount_a_desired(&self) -> Amount {
        self.amount_a_desired
    }

    /// Upper bound on asset B pulled from the provider.
    #[must_use]
    pub const fn amount_b_desired(&self) -> Amount {
        self.amount_b_desired
    }

    /// Smallest acceptable asset A amount.
    #[must_use]
    pub const fn amount_a_min(&self) -> Amount {
        self.amount_a_min
    }

    /// Smallest acceptable asset B amount.
    #[must_use]
    pub const fn amount_b_min(&self) -> Amount {
        self.amount_b_min
    }
}

/// Parameters of a withdrawal, in the caller's asset order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    liquidity: Shares,
    amount_a_min: Amount,
    amount_b_min: Amount,
}

impl WithdrawalRequest {
    /// Burns `liquidity` shares with zero minimums.
    pub const fn new(liquidity: Shares) -> Self {
        Self {
            liquidity,
            amount_a_min: Amount::ZERO,
            amount_b_min: Amount::ZERO,
        }
    }

    /// Sets the slippage bounds.
    #[must_use]
    pub const fn with_minimums(self, amount_a_min: Amount, amount_b_min: Amount) -> Self {
        Self {
            amount_a_min,
            amount_b_min,
            ..self
        }
    }

    /// Shares to burn.
    #[must_use]
    pub const fn liquidity(&self) -> Shares {
        self.liquidity
    }

    /// Smallest acceptable asset A payout.
    #[must_use]
    pub const fn amount_a_min(&self) -> Amount {
        self.amount_a_min
    }

    /// Smallest acceptable asset B payout.
    #[must_use]
    pub const fn amount_b_min(&self) -> Amount {
        self.amount_b_min
    }
}
