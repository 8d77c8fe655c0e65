//! Swap fee expressed as a rate out of 1000.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AmmError;

/// Fee denominator: rates are expressed in thousandths.
pub const FEE_DENOMINATOR: u16 = 1_000;

/// A swap fee rate in thousandths (3 = 0.3%), bounded to `0..=30`.
///
/// The upper bound is enforced at construction and again on
/// deserialization, so every `FeeRate` in memory is valid.
///
/// # Examples
///
/// ```
/// use pair_amm::domain::FeeRate;
///
/// assert_eq!(FeeRate::default().get(), 3);
/// assert_eq!(FeeRate::default().complement(), 997);
/// assert!(FeeRate::new(31).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct FeeRate(u16);

impl FeeRate {
    /// Zero fee.
    pub const ZERO: Self = Self(0);

    /// 0.3%, the rate a fresh exchange starts with.
    pub const DEFAULT: Self = Self(3);

    /// Highest accepted rate (3%).
    pub const MAX: Self = Self(30);

    /// Creates a fee rate.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::FeeTooHigh`] if `rate > 30`.
    pub const fn new(rate: u16) -> Result<Self, AmmError> {
        if rate > Self::MAX.0 {
            return Err(AmmError::FeeTooHigh(rate));
        }
        Ok(Self(rate))
    }

    /// Returns the raw rate in thousandths.
    #[must_use]
    pub const fn get(&self) -> u16 {
        self.0
    }

    /// Returns `1000 - rate`, the share of the input that is priced.
    #[must_use]
    pub const fn complement(&self) -> u16 {
        FEE_DENOMINATOR - self.0
    }
}

impl Default for FeeRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u16> for FeeRate {
    type Error = AmmError;

    fn try_from(rate: u16) -> Result<Self, Self::Error> {
        Self::new(rate)
    }
}

impl From<FeeRate> for u16 {
    fn from(rate: FeeRate) -> Self {
        rate.0
    }
}

impl fmt::Display for FeeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, FEE_DENOMINATOR)
    }
}
