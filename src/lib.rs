//! # Pair AMM
//!
//! A constant-product automated market maker engine over many independent
//! two-asset pools.
//!
//! Providers deposit paired assets for proportional pool shares and
//! withdraw proportionally; traders sell an exact amount of one pooled asset
//! for the other at a price set by the reserves, less a fee. All arithmetic
//! is truncating integer math with a 256-bit intermediate, so results are
//! bit-exact and rounding always favours the pool.
//!
//! Asset custody is external: every transfer goes through an
//! [`AssetTransfer`](traits::AssetTransfer) collaborator, and an operation
//! whose transfers fail leaves the engine exactly as it was.
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use pair_amm::prelude::*;
//!
//! let owner = AccountId::from_bytes([1u8; 32]);
//! let custody = AccountId::from_bytes([2u8; 32]);
//! let alice = AccountId::from_bytes([3u8; 32]);
//! let x = AssetId::from_bytes([10u8; 32]);
//! let y = AssetId::from_bytes([11u8; 32]);
//!
//! // 1. Custody collaborator with funded, approved balances
//! let assets = Arc::new(InMemoryAssets::new());
//! for asset in [x, y] {
//!     assets.mint(asset, alice, Amount::new(10_000)).expect("mint");
//!     assets.approve(asset, alice, custody, Amount::MAX).expect("approve");
//! }
//!
//! // 2. Exchange with the default 3/1000 fee
//! let config = AmmConfig::new(owner, custody).expect("valid config");
//! let mut exchange = Exchange::new(config, Arc::clone(&assets)).expect("exchange");
//!
//! // 3. Create a pool, seed it, trade against it
//! exchange.create_pool(x, y).expect("new pair");
//! exchange
//!     .add_liquidity(x, y, &DepositRequest::new(Amount::new(1_000), Amount::new(1_000)), alice)
//!     .expect("deposit");
//! let receipt = exchange
//!     .swap_exact_in(Amount::new(100), Amount::ZERO, x, y, alice)
//!     .expect("swap");
//!
//! assert_eq!(receipt.amount_out(), Amount::new(90));
//! assert_eq!(exchange.get_pool_info(x, y).reserve_a, Amount::new(1_100));
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────┐
//! │    Exchange     │  owner checks, settlement, events
//! └───────┬────────┘
//!         │ plan → settle → commit
//!         ▼
//! ┌────────────────┐
//! │     Engine      │  deposit/withdrawal/swap arithmetic (pure)
//! └───────┬────────┘
//!         ▼
//! ┌────────────────┐
//! │     Pools       │  Pool, ShareLedger, PoolBook, PoolRegistry
//! └───────┬────────┘
//!         ▼
//! ┌────────────────┐
//! │  Domain + Math  │  AssetId, PoolKey, Amount, Shares, floor_mul_div, …
//! └────────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Value types: [`AssetId`](domain::AssetId), [`PoolKey`](domain::PoolKey), [`Amount`](domain::Amount), requests, receipts, events |
//! | [`math`]   | [`floor_mul_div`](math::floor_mul_div), [`integer_sqrt`](math::integer_sqrt), the [`widening_mul`](math::widening_mul) intermediate |
//! | [`pools`]  | [`Pool`](pools::Pool), [`ShareLedger`](pools::ShareLedger), [`PoolRegistry`](pools::PoolRegistry) |
//! | [`engine`] | Pure liquidity and swap pricing |
//! | [`exchange`] | [`Exchange`](exchange::Exchange) and the concurrent [`SharedExchange`](exchange::SharedExchange) |
//! | [`config`] | [`AmmConfig`](config::AmmConfig): owner, custody, fee rate |
//! | [`traits`] | [`AssetTransfer`](traits::AssetTransfer) and [`EventSink`](traits::EventSink) seams |
//! | [`assets`] | [`InMemoryAssets`](assets::InMemoryAssets) reference collaborator |
//! | [`events`] | [`EventLog`](events::EventLog) in-memory sink |
//! | [`error`]  | [`AmmError`](error::AmmError) unified error enum |
//! | [`prelude`] | Convenience re-exports |

pub mod assets;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod events;
pub mod exchange;
pub mod math;
pub mod pools;
pub mod prelude;
pub mod traits;
