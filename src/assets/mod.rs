//! Reference [`AssetTransfer`](crate::traits::AssetTransfer) implementations.

mod in_memory;

pub use in_memory::InMemoryAssets;
