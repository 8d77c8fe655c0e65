//! Integer arithmetic for AMM calculations.
//!
//! No floating point is used anywhere in the engine. This module provides
//! the truncating primitives every formula is built from
//! ([`floor_mul_div`], [`integer_sqrt`], [`sqrt_of_product`], [`min`]), the
//! [`widening_mul`] into an [`ethnum::U256`] that keeps `a × b` exact for
//! 128-bit operands, and
//! [`CheckedArithmetic`] for overflow-safe updates of domain quantities.

mod checked;
mod integer;

pub use checked::CheckedArithmetic;
pub use ethnum::U256;
pub use integer::{floor_mul_div, integer_sqrt, min, sqrt_of_product, widening_mul};
