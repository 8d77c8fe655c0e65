//! Exchange-wide configuration.

use serde::{Deserialize, Serialize};

use crate::domain::{AccountId, FeeRate};
use crate::error::AmmError;

/// Global parameters shared by every pool of an exchange.
///
/// - `owner` is the only identity allowed to call privileged operations.
/// - `custody` is the account that holds pooled assets on the pools' behalf.
/// - `fee_rate` prices every swap, in thousandths.
///
/// # Validation
///
/// - Neither `owner` nor `custody` may be the null account.
/// - `custody` must differ from `owner`, so emergency withdrawals always move
///   assets between two distinct accounts.
/// - `fee_rate` is bounded by [`FeeRate`] itself, including on
///   deserialization.
///
/// # Examples
///
/// ```
/// use pair_amm::config::AmmConfig;
/// use pair_amm::domain::{AccountId, FeeRate};
///
/// let owner = AccountId::from_bytes([1u8; 32]);
/// let custody = AccountId::from_bytes([2u8; 32]);
/// let Ok(config) = AmmConfig::new(owner, custody) else {
///     panic!("distinct, non-null accounts");
/// };
/// assert_eq!(config.fee_rate(), FeeRate::DEFAULT);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AmmConfig {
    owner: AccountId,
    custody: AccountId,
    #[serde(default)]
    fee_rate: FeeRate,
}

impl AmmConfig {
    /// Creates a configuration with the default fee rate.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if either account is null
    /// or both are the same.
    pub fn new(owner: AccountId, custody: AccountId) -> Result<Self, AmmError> {
        Self::with_fee_rate(owner, custody, FeeRate::DEFAULT)
    }

    /// Creates a configuration with an explicit fee rate.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if either account is null
    /// or both are the same.
    pub fn with_fee_rate(
        owner: AccountId,
        custody: AccountId,
        fee_rate: FeeRate,
    ) -> Result<Self, AmmError> {
        let config = Self {
            owner,
            custody,
            fee_rate,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// Needed after deserialization, which cannot check cross-field rules.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] naming the first rule that
    /// failed.
    pub fn validate(&self) -> Result<(), AmmError> {
        if self.owner.is_null() {
            return Err(AmmError::InvalidConfiguration("owner is the null account"));
        }
        if self.custody.is_null() {
            return Err(AmmError::InvalidConfiguration(
                "custody is the null account",
            ));
        }
        if self.owner == self.custody {
            return Err(AmmError::InvalidConfiguration(
                "custody must differ from owner",
            ));
        }
        Ok(())
    }

    /// Fails with [`AmmError::Unauthorized`] unless `caller` is the owner.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Unauthorized`] for any other caller.
    pub fn authorize(&self, caller: AccountId) -> Result<(), AmmError> {
        if caller == self.owner {
            Ok(())
        } else {
            Err(AmmError::Unauthorized)
        }
    }

    /// Returns the owner account.
    #[must_use]
    pub const fn owner(&self) -> AccountId {
        self.owner
    }

    /// Returns the custody account.
    #[must_use]
    pub const fn custody(&self) -> AccountId {
        self.custody
    }

    /// Returns the current swap fee rate.
    #[must_use]
    pub const fn fee_rate(&self) -> FeeRate {
        self.fee_rate
    }

    pub(crate) fn set_fee_rate(&mut self, fee_rate: FeeRate) {
        self.fee_rate = fee_rate;
    }
}
