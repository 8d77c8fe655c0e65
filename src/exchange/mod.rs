//! The exchange: registry, ledgers, configuration and collaborators behind
//! one operation surface.
//!
//! [`Exchange`] is the single-writer form: every mutating operation takes
//! `&mut self`. [`SharedExchange`] hosts the same operations behind
//! per-pool locks for concurrent callers.
//!
//! # Atomicity
//!
//! Every operation first computes its complete outcome against the current
//! pool, then runs its transfers through the [`AssetTransfer`]
//! collaborator, and only then commits. A failed transfer leaves reserves,
//! shares and balances exactly as they were; transfers that had already
//! completed are reversed.

mod admin;
mod operations;
mod settlement;
mod shared;

use std::sync::Arc;

use tracing::info;

use crate::config::AmmConfig;
use crate::domain::{
    AccountId, Amount, AssetId, DepositReceipt, DepositRequest, FeeRate, PoolEvent, PoolInfo,
    PoolKey, Shares, SwapReceipt, WithdrawalReceipt, WithdrawalRequest,
};
use crate::error::{AmmError, Result};
use crate::events::Subscribers;
use crate::pools::{Pool, PoolRegistry};
use crate::traits::{AssetTransfer, EventSink};

pub use shared::SharedExchange;

/// A constant-product exchange over many independent two-asset pools.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
///
/// use pair_amm::assets::InMemoryAssets;
/// use pair_amm::config::AmmConfig;
/// use pair_amm::domain::{AccountId, Amount, AssetId, DepositRequest};
/// use pair_amm::exchange::Exchange;
/// use pair_amm::traits::AssetTransfer;
///
/// let owner = AccountId::from_bytes([1u8; 32]);
/// let custody = AccountId::from_bytes([2u8; 32]);
/// let alice = AccountId::from_bytes([3u8; 32]);
/// let x = AssetId::from_bytes([10u8; 32]);
/// let y = AssetId::from_bytes([11u8; 32]);
///
/// let assets = Arc::new(InMemoryAssets::new());
/// for asset in [x, y] {
///     assets.mint(asset, alice, Amount::new(1_000)).expect("mint");
///     assets.approve(asset, alice, custody, Amount::MAX).expect("approve");
/// }
///
/// let config = AmmConfig::new(owner, custody).expect("valid config");
/// let mut exchange = Exchange::new(config, Arc::clone(&assets)).expect("exchange");
/// exchange.create_pool(x, y).expect("new pair");
///
/// let receipt = exchange
///     .add_liquidity(x, y, &DepositRequest::new(Amount::new(100), Amount::new(100)), alice)
///     .expect("deposit");
/// assert_eq!(receipt.liquidity().get(), 100);
///
/// let swap = exchange
///     .swap_exact_in(Amount::new(10), Amount::ZERO, x, y, alice)
///     .expect("swap");
/// assert_eq!(swap.amount_out(), Amount::new(9));
/// ```
#[derive(Debug)]
pub struct Exchange<T> {
    config: AmmConfig,
    assets: T,
    registry: PoolRegistry,
    subscribers: Subscribers,
}

impl<T: AssetTransfer> Exchange<T> {
    /// Creates an exchange with no pools.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if `config` fails
    /// [`AmmConfig::validate`].
    pub fn new(config: AmmConfig, assets: T) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            assets,
            registry: PoolRegistry::new(),
            subscribers: Subscribers::default(),
        })
    }

    /// Returns the current configuration.
    #[must_use]
    pub const fn config(&self) -> &AmmConfig {
        &self.config
    }

    /// Returns the asset-transfer collaborator.
    #[must_use]
    pub const fn assets(&self) -> &T {
        &self.assets
    }

    /// Returns the pool registry for read-only inspection.
    #[must_use]
    pub const fn registry(&self) -> &PoolRegistry {
        &self.registry
    }

    /// Registers `sink` to receive every subsequent [`PoolEvent`].
    pub fn subscribe(&self, sink: Arc<dyn EventSink>) {
        self.subscribers.subscribe(sink);
    }

    /// Creates an empty pool for `{a, b}` and returns its key.
    ///
    /// # Errors
    ///
    /// - [`AmmError::IdenticalAssets`] if `a == b`.
    /// - [`AmmError::NullAsset`] if either asset is null.
    /// - [`AmmError::PoolAlreadyExists`] if the pair already has a pool.
    pub fn create_pool(&mut self, a: AssetId, b: AssetId) -> Result<PoolKey> {
        let (key, pool) = self.registry.create_pool(a, b)?;
        info!(
            pool = %key,
            asset_low = %pool.asset_low(),
            asset_high = %pool.asset_high(),
            "pool created"
        );
        self.subscribers.publish(&PoolEvent::PoolCreated {
            pool: key,
            asset_low: pool.asset_low(),
            asset_high: pool.asset_high(),
        });
        Ok(key)
    }

    /// Deposits into the pool of `{a, b}` for `provider`.
    ///
    /// Amounts in `request` and in the receipt follow the caller's `(a, b)`
    /// order. Both assets are pulled from `provider` into custody, which
    /// requires `provider` to have approved the custody account.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PoolNotFound`] if no pool exists for the pair.
    /// - [`AmmError::InsufficientBAmount`] / [`AmmError::InsufficientAAmount`]
    ///   if the ratio-fitted amounts miss the request's bounds.
    /// - [`AmmError::InsufficientLiquidityMinted`] if no share would be
    ///   minted.
    /// - [`AmmError::TransferFailed`] if either pull fails.
    pub fn add_liquidity(
        &mut self,
        a: AssetId,
        b: AssetId,
        request: &DepositRequest,
        provider: AccountId,
    ) -> Result<DepositReceipt> {
        let key = PoolKey::derive(a, b);
        let book = self
            .registry
            .book_mut(&key)
            .ok_or(AmmError::PoolNotFound)?;
        let receipt = operations::add_liquidity(
            book,
            &self.assets,
            self.config.custody(),
            (a, b),
            request,
            provider,
        )?;
        self.subscribers
            .publish(&PoolEvent::LiquidityAdded { provider, receipt });
        Ok(receipt)
    }

    /// Burns shares of the pool of `{a, b}` and pays `provider` out.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PoolNotFound`] if no pool exists for the pair.
    /// - [`AmmError::InsufficientShares`] if `provider` holds too few shares.
    /// - [`AmmError::InsufficientOutputAmount`] if either payout is below
    ///   its minimum.
    /// - [`AmmError::TransferFailed`] if custody cannot cover both payouts,
    ///   or if a push fails and every completed payout was reclaimed; shares
    ///   and reserves are then unchanged.
    /// - [`AmmError::PartiallySettled`] if a push fails after a payout that
    ///   could not be reclaimed; the pool is debited for that payout.
    pub fn remove_liquidity(
        &mut self,
        a: AssetId,
        b: AssetId,
        request: &WithdrawalRequest,
        provider: AccountId,
    ) -> Result<WithdrawalReceipt> {
        let key = PoolKey::derive(a, b);
        let book = self
            .registry
            .book_mut(&key)
            .ok_or(AmmError::PoolNotFound)?;
        let receipt = operations::remove_liquidity(
            book,
            &self.assets,
            self.config.custody(),
            (a, b),
            request,
            provider,
        )?;
        self.subscribers
            .publish(&PoolEvent::LiquidityRemoved { provider, receipt });
        Ok(receipt)
    }

    /// Sells exactly `amount_in` of `asset_in` for `asset_out`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PoolNotFound`] if no pool exists for the pair.
    /// - [`AmmError::InsufficientLiquidity`] if the pool is empty.
    /// - [`AmmError::InsufficientOutputAmount`] if the output is below
    ///   `amount_out_min`.
    /// - [`AmmError::TransferFailed`] if the pull or the push fails.
    pub fn swap_exact_in(
        &mut self,
        amount_in: Amount,
        amount_out_min: Amount,
        asset_in: AssetId,
        asset_out: AssetId,
        trader: AccountId,
    ) -> Result<SwapReceipt> {
        let key = PoolKey::derive(asset_in, asset_out);
        let book = self
            .registry
            .book_mut(&key)
            .ok_or(AmmError::PoolNotFound)?;
        let receipt = operations::swap_exact_in(
            book,
            &self.assets,
            self.config.custody(),
            self.config.fee_rate(),
            amount_in,
            amount_out_min,
            (asset_in, asset_out),
            trader,
        )?;
        self.subscribers
            .publish(&PoolEvent::TokenSwapped { trader, receipt });
        Ok(receipt)
    }

    /// Quotes [`swap_exact_in`](Self::swap_exact_in) without executing it.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PoolNotFound`] if no pool exists for the pair.
    /// - [`AmmError::InsufficientLiquidity`] if the pool is empty.
    pub fn get_amount_out(
        &self,
        amount_in: Amount,
        asset_in: AssetId,
        asset_out: AssetId,
    ) -> Result<Amount> {
        let key = PoolKey::derive(asset_in, asset_out);
        let book = self.registry.book(&key).ok_or(AmmError::PoolNotFound)?;
        operations::get_amount_out(
            book,
            amount_in,
            (asset_in, asset_out),
            self.config.fee_rate(),
        )
    }

    /// Returns the pool of `{a, b}`, if created.
    #[must_use]
    pub fn get_pool(&self, a: AssetId, b: AssetId) -> Option<&Pool> {
        self.registry.get_pool(a, b)
    }

    /// Returns reserves oriented to `(a, b)`; all zero when no pool exists.
    #[must_use]
    pub fn get_pool_info(&self, a: AssetId, b: AssetId) -> PoolInfo {
        self.registry
            .book(&PoolKey::derive(a, b))
            .map_or_else(PoolInfo::default, |book| operations::pool_info(book, a))
    }

    /// Returns `provider`'s shares in the pool of `{a, b}`.
    #[must_use]
    pub fn get_user_shares(&self, a: AssetId, b: AssetId, provider: AccountId) -> Shares {
        self.registry
            .book(&PoolKey::derive(a, b))
            .map_or(Shares::ZERO, |book| book.shares_of(&provider))
    }

    /// Returns every pool key in creation order.
    #[must_use]
    pub fn list_pools(&self) -> &[PoolKey] {
        self.registry.list_pools()
    }

    /// Number of pools created.
    #[must_use]
    pub fn pool_count(&self) -> usize {
        self.registry.len()
    }

    /// Sets the swap fee to `rate` thousandths. Owner only.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Unauthorized`] if `caller` is not the owner.
    /// - [`AmmError::FeeTooHigh`] if `rate > 30`.
    pub fn update_fee(&mut self, caller: AccountId, rate: u16) -> Result<FeeRate> {
        let (previous, current) = admin::update_fee(&mut self.config, caller, rate)?;
        self.subscribers
            .publish(&PoolEvent::FeeUpdated { previous, current });
        Ok(current)
    }

    /// Moves `amount` of `asset` from custody to the owner without touching
    /// any pool's reserves. Owner only.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Unauthorized`] if `caller` is not the owner.
    /// - [`AmmError::TransferFailed`] if custody cannot cover `amount`.
    pub fn emergency_withdraw(
        &mut self,
        caller: AccountId,
        asset: AssetId,
        amount: Amount,
    ) -> Result<()> {
        admin::emergency_withdraw(&self.config, &self.assets, caller, asset, amount)?;
        self.subscribers.publish(&PoolEvent::EmergencyWithdrawal {
            asset,
            amount,
            recipient: self.config.owner(),
        });
        Ok(())
    }

    /// Checks every pool against its share ledger.
    ///
    /// # Errors
    ///
    /// Returns the first [`AmmError::InvariantViolation`] found.
    pub fn audit(&self) -> Result<()> {
        self.registry.books().try_for_each(|book| book.reconcile())
    }
}
