//! Concurrent exchange host.
//!
//! Lock layout:
//!
//! - each [`PoolBook`] sits behind its own `Mutex`, so operations on one
//!   pool serialize while distinct pools proceed in parallel;
//! - the creation-order index and the configuration are behind `RwLock`s;
//! - the key to book map is a `DashMap`, so lookups never block on a
//!   pool that is busy.
//!
//! A pool lock is never held while another pool lock is taken, and events
//! are published after the pool lock is released. Creation takes the order
//! lock before the map entry, so a pool visible to lookups is already
//! listed.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use tracing::info;

use crate::config::AmmConfig;
use crate::domain::{
    AccountId, Amount, AssetId, AssetPair, DepositReceipt, DepositRequest, FeeRate, PoolEvent,
    PoolInfo, PoolKey, Shares, SwapReceipt, WithdrawalReceipt, WithdrawalRequest,
};
use crate::error::{AmmError, Result};
use crate::events::Subscribers;
use crate::pools::{Pool, PoolBook};
use crate::traits::{AssetTransfer, EventSink};

use super::{admin, operations};

/// A thread-safe [`Exchange`](super::Exchange) with per-pool locking.
///
/// All methods take `&self`; share it across threads with an `Arc` or a
/// scoped borrow.
pub struct SharedExchange<T> {
    config: RwLock<AmmConfig>,
    assets: T,
    books: DashMap<PoolKey, Arc<Mutex<PoolBook>>>,
    order: RwLock<Vec<PoolKey>>,
    subscribers: Subscribers,
}

impl<T: AssetTransfer + Send + Sync> SharedExchange<T> {
    /// Creates an exchange with no pools.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if `config` is invalid.
    pub fn new(config: AmmConfig, assets: T) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: RwLock::new(config),
            assets,
            books: DashMap::new(),
            order: RwLock::new(Vec::new()),
            subscribers: Subscribers::default(),
        })
    }

    /// Returns a snapshot of the current configuration.
    #[must_use]
    pub fn config(&self) -> AmmConfig {
        *self.config.read()
    }

    /// Returns the asset-transfer collaborator.
    #[must_use]
    pub const fn assets(&self) -> &T {
        &self.assets
    }

    /// Registers `sink` to receive every subsequent [`PoolEvent`].
    pub fn subscribe(&self, sink: Arc<dyn EventSink>) {
        self.subscribers.subscribe(sink);
    }

    fn book(&self, key: &PoolKey) -> Result<Arc<Mutex<PoolBook>>> {
        self.books
            .get(key)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(AmmError::PoolNotFound)
    }

    /// See [`Exchange::create_pool`](super::Exchange::create_pool).
    ///
    /// # Errors
    ///
    /// `IdenticalAssets`, `NullAsset` or `PoolAlreadyExists`.
    pub fn create_pool(&self, a: AssetId, b: AssetId) -> Result<PoolKey> {
        let pair = AssetPair::new(a, b)?;
        let key = pair.key();
        let pool = Pool::new(pair);
        {
            let mut order = self.order.write();
            match self.books.entry(key) {
                Entry::Occupied(_) => return Err(AmmError::PoolAlreadyExists(key)),
                Entry::Vacant(slot) => {
                    slot.insert(Arc::new(Mutex::new(PoolBook::new(key, pool))));
                    order.push(key);
                }
            }
        }
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

    /// See [`Exchange::add_liquidity`](super::Exchange::add_liquidity).
    ///
    /// # Errors
    ///
    /// As for the single-writer form.
    pub fn add_liquidity(
        &self,
        a: AssetId,
        b: AssetId,
        request: &DepositRequest,
        provider: AccountId,
    ) -> Result<DepositReceipt> {
        let book = self.book(&PoolKey::derive(a, b))?;
        let custody = self.config.read().custody();
        let receipt = operations::add_liquidity(
            &mut book.lock(),
            &self.assets,
            custody,
            (a, b),
            request,
            provider,
        )?;
        self.subscribers
            .publish(&PoolEvent::LiquidityAdded { provider, receipt });
        Ok(receipt)
    }

    /// See [`Exchange::remove_liquidity`](super::Exchange::remove_liquidity).
    ///
    /// # Errors
    ///
    /// As for the single-writer form.
    pub fn remove_liquidity(
        &self,
        a: AssetId,
        b: AssetId,
        request: &WithdrawalRequest,
        provider: AccountId,
    ) -> Result<WithdrawalReceipt> {
        let book = self.book(&PoolKey::derive(a, b))?;
        let custody = self.config.read().custody();
        let receipt = operations::remove_liquidity(
            &mut book.lock(),
            &self.assets,
            custody,
            (a, b),
            request,
            provider,
        )?;
        self.subscribers
            .publish(&PoolEvent::LiquidityRemoved { provider, receipt });
        Ok(receipt)
    }

    /// See [`Exchange::swap_exact_in`](super::Exchange::swap_exact_in).
    ///
    /// The fee rate is read once when the swap starts.
    ///
    /// # Errors
    ///
    /// As for the single-writer form.
    pub fn swap_exact_in(
        &self,
        amount_in: Amount,
        amount_out_min: Amount,
        asset_in: AssetId,
        asset_out: AssetId,
        trader: AccountId,
    ) -> Result<SwapReceipt> {
        let book = self.book(&PoolKey::derive(asset_in, asset_out))?;
        let config = self.config();
        let receipt = operations::swap_exact_in(
            &mut book.lock(),
            &self.assets,
            config.custody(),
            config.fee_rate(),
            amount_in,
            amount_out_min,
            (asset_in, asset_out),
            trader,
        )?;
        self.subscribers
            .publish(&PoolEvent::TokenSwapped { trader, receipt });
        Ok(receipt)
    }

    /// See [`Exchange::get_amount_out`](super::Exchange::get_amount_out).
    ///
    /// # Errors
    ///
    /// `PoolNotFound` or `InsufficientLiquidity`.
    pub fn get_amount_out(
        &self,
        amount_in: Amount,
        asset_in: AssetId,
        asset_out: AssetId,
    ) -> Result<Amount> {
        let book = self.book(&PoolKey::derive(asset_in, asset_out))?;
        let fee_rate = self.config.read().fee_rate();
        let guard = book.lock();
        operations::get_amount_out(&guard, amount_in, (asset_in, asset_out), fee_rate)
    }

    /// Returns a copy of the pool of `{a, b}`, if created.
    #[must_use]
    pub fn get_pool(&self, a: AssetId, b: AssetId) -> Option<Pool> {
        let book = self.book(&PoolKey::derive(a, b)).ok()?;
        let pool = *book.lock().pool();
        Some(pool)
    }

    /// Returns reserves oriented to `(a, b)`; all zero when no pool exists.
    #[must_use]
    pub fn get_pool_info(&self, a: AssetId, b: AssetId) -> PoolInfo {
        self.book(&PoolKey::derive(a, b))
            .map_or_else(|_| PoolInfo::default(), |book| {
                operations::pool_info(&book.lock(), a)
            })
    }

    /// Returns `provider`'s shares in the pool of `{a, b}`.
    #[must_use]
    pub fn get_user_shares(&self, a: AssetId, b: AssetId, provider: AccountId) -> Shares {
        self.book(&PoolKey::derive(a, b))
            .map_or(Shares::ZERO, |book| book.lock().shares_of(&provider))
    }

    /// Returns every pool key in creation order.
    #[must_use]
    pub fn list_pools(&self) -> Vec<PoolKey> {
        self.order.read().clone()
    }

    /// Number of pools created.
    #[must_use]
    pub fn pool_count(&self) -> usize {
        self.order.read().len()
    }

    /// See [`Exchange::update_fee`](super::Exchange::update_fee).
    ///
    /// # Errors
    ///
    /// `Unauthorized` or `FeeTooHigh`.
    pub fn update_fee(&self, caller: AccountId, rate: u16) -> Result<FeeRate> {
        let (previous, current) = admin::update_fee(&mut self.config.write(), caller, rate)?;
        self.subscribers
            .publish(&PoolEvent::FeeUpdated { previous, current });
        Ok(current)
    }

    /// See [`Exchange::emergency_withdraw`](super::Exchange::emergency_withdraw).
    ///
    /// # Errors
    ///
    /// `Unauthorized` or `TransferFailed`.
    pub fn emergency_withdraw(
        &self,
        caller: AccountId,
        asset: AssetId,
        amount: Amount,
    ) -> Result<()> {
        let config = self.config();
        admin::emergency_withdraw(&config, &self.assets, caller, asset, amount)?;
        self.subscribers.publish(&PoolEvent::EmergencyWithdrawal {
            asset,
            amount,
            recipient: config.owner(),
        });
        Ok(())
    }

    /// Checks every pool against its share ledger.
    ///
    /// # Errors
    ///
    /// Returns the first [`AmmError::InvariantViolation`] found.
    pub fn audit(&self) -> Result<()> {
        for key in self.list_pools() {
            self.book(&key)?.lock().reconcile()?;
        }
        Ok(())
    }
}

impl<T> core::fmt::Debug for SharedExchange<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SharedExchange")
            .field("config", &*self.config.read())
            .field("pools", &self.books.len())
            .field("subscribers", &self.subscribers)
            .finish_non_exhaustive()
    }
}
