//! Pure pricing and share arithmetic.
//!
//! The functions here compute amounts from reserves; they never move assets
//! or mutate a pool. The exchange runs them first, settles transfers, and
//! only then commits the staged result.

pub mod liquidity;
pub mod swap;

pub use liquidity::{deposit_amounts, shares_for_payout, shares_to_mint, withdrawal_amounts};
pub use swap::{amount_out, quote_exact_in};
