//! Exchange configuration.
//!
//! [`AmmConfig`] carries the owner identity, the custody account that holds
//! pooled assets, and the swap fee rate. It can be built in code or loaded
//! with any `serde` format and then checked with
//! [`validate()`](AmmConfig::validate).

mod amm_config;

pub use amm_config::AmmConfig;
