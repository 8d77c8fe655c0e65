//! Canonical key to pool mapping with creation-order enumeration.

use std::collections::HashMap;

use crate::domain::{AssetId, AssetPair, PoolKey};
use crate::error::AmmError;

use super::{Pool, PoolBook};

/// Owns every [`PoolBook`] of an exchange.
///
/// Pools are created once per unordered asset pair and never removed.
/// [`list_pools`](Self::list_pools) returns keys in creation order.
#[derive(Debug, Clone, Default)]
pub struct PoolRegistry {
    books: HashMap<PoolKey, PoolBook>,
    order: Vec<PoolKey>,
}

impl PoolRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a zeroed pool for `{a, b}` and returns its key.
    ///
    /// # Errors
    ///
    /// - [`AmmError::IdenticalAssets`] if `a == b`.
    /// - [`AmmError::NullAsset`] if either asset is null.
    /// - [`AmmError::PoolAlreadyExists`] if the pair already has a pool.
    pub fn create_pool(&mut self, a: AssetId, b: AssetId) -> Result<(PoolKey, Pool), AmmError> {
        let pair = AssetPair::new(a, b)?;
        let key = pair.key();
        if self.books.contains_key(&key) {
            return Err(AmmError::PoolAlreadyExists(key));
        }
        let pool = Pool::new(pair);
        self.books.insert(key, PoolBook::new(key, pool));
        self.order.push(key);
        Ok((key, pool))
    }

    /// Looks up the pool of `{a, b}` in either order.
    #[must_use]
    pub fn get_pool(&self, a: AssetId, b: AssetId) -> Option<&Pool> {
        self.pool(&PoolKey::derive(a, b))
    }

    /// Looks up a pool by key.
    #[must_use]
    pub fn pool(&self, key: &PoolKey) -> Option<&Pool> {
        self.books.get(key).map(PoolBook::pool)
    }

    /// Looks up a pool and its ledger by key.
    #[must_use]
    pub fn book(&self, key: &PoolKey) -> Option<&PoolBook> {
        self.books.get(key)
    }

    pub(crate) fn book_mut(&mut self, key: &PoolKey) -> Option<&mut PoolBook> {
        self.books.get_mut(key)
    }

    /// Returns every key in creation order.
    #[must_use]
    pub fn list_pools(&self) -> &[PoolKey] {
        &self.order
    }

    /// Iterates over every book in creation order.
    pub fn books(&self) -> impl Iterator<Item = &PoolBook> {
        self.order.iter().filter_map(|key| self.books.get(key))
    }

    /// Number of pools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if no pool has been created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn asset(byte: u8) -> AssetId {
        AssetId::from_bytes([byte; 32])
    }

    #[test]
    fn create_then_lookup_in_either_order() {
        let mut registry = PoolRegistry::new();
        let Ok((key, pool)) = registry.create_pool(asset(2), asset(1)) else {
            panic!("expected pool creation");
        };
        assert_eq!(key, PoolKey::derive(asset(1), asset(2)));
        assert_eq!(pool.asset_low(), asset(1));
        assert_eq!(registry.get_pool(asset(1), asset(2)), Some(&pool));
        assert_eq!(registry.get_pool(asset(2), asset(1)), Some(&pool));
    }

    #[test]
    fn second_creation_fails_in_either_order() {
        let mut registry = PoolRegistry::new();
        let Ok((key, _)) = registry.create_pool(asset(1), asset(2)) else {
            panic!("expected pool creation");
        };
        assert_eq!(
            registry.create_pool(asset(2), asset(1)),
            Err(AmmError::PoolAlreadyExists(key))
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn invalid_pairs_rejected() {
        let mut registry = PoolRegistry::new();
        assert_eq!(
            registry.create_pool(asset(1), asset(1)),
            Err(AmmError::IdenticalAssets)
        );
        assert_eq!(
            registry.create_pool(asset(1), AssetId::NULL),
            Err(AmmError::NullAsset)
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn listing_preserves_creation_order() {
        let mut registry = PoolRegistry::new();
        let mut expected = Vec::new();
        for (a, b) in [(9, 8), (1, 2), (5, 3)] {
            let Ok((key, _)) = registry.create_pool(asset(a), asset(b)) else {
                panic!("expected pool creation");
            };
            expected.push(key);
        }
        assert_eq!(registry.list_pools(), expected.as_slice());
        assert_eq!(registry.books().count(), 3);
    }

    #[test]
    fn missing_pool_is_none() {
        let registry = PoolRegistry::new();
        assert!(registry.get_pool(asset(1), asset(2)).is_none());
    }
}
