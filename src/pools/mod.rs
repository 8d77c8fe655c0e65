//! Pool state: reserve records, share ledgers and the registry.
//!
//! | Type | Role |
//! |------|------|
//! | [`Pool`] | reserves and total shares of one pair |
//! | [`ShareLedger`] | provider balances of one pool |
//! | [`PoolBook`] | a pool with its ledger; the unit that is locked and committed |
//! | [`PoolRegistry`] | every book of an exchange, in creation order |

mod book;
mod ledger;
mod pool;
mod registry;

#[cfg(test)]
mod proptest_properties;

pub use book::{PoolBook, StagedChange};
pub use ledger::{LedgerEntry, ShareLedger};
pub use pool::Pool;
pub use registry::PoolRegistry;
