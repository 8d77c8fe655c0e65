//! Deterministic integer primitives behind every pricing and share formula.
//!
//! All results are exact floors computed with unsigned integers only, so
//! any two implementations following the same steps agree bit for bit.

use ethnum::U256;

use crate::error::{AmmError, Result};

const TWO: U256 = U256::new(2);

/// Returns `a × b` as an exact 256-bit value.
///
/// ```
/// use pair_amm::math::widening_mul;
///
/// assert_eq!(widening_mul(u128::MAX, 2).into_words(), (1, u128::MAX - 1));
/// ```
#[must_use]
pub fn widening_mul(a: u128, b: u128) -> U256 {
    // two 128-bit factors always fit in 256 bits
    U256::new(a) * U256::new(b)
}

fn narrow(value: U256, context: &'static str) -> Result<u128> {
    match value.into_words() {
        (0, low) => Ok(low),
        _ => Err(AmmError::Overflow(context)),
    }
}

/// Computes `⌊a × b / c⌋` through a 256-bit intermediate.
///
/// # Errors
///
/// - [`AmmError::DivideByZero`] if `c == 0`.
/// - [`AmmError::Overflow`] if the quotient does not fit in 128 bits.
///
/// # Examples
///
/// ```
/// use pair_amm::math::floor_mul_div;
///
/// assert_eq!(floor_mul_div(50, 100, 100), Ok(50));
/// assert_eq!(floor_mul_div(9_970, 150, 159_970), Ok(9));
/// // a × b overflows u128 but the quotient does not
/// assert_eq!(floor_mul_div(u128::MAX, u128::MAX, u128::MAX), Ok(u128::MAX));
/// ```
pub fn floor_mul_div(a: u128, b: u128, c: u128) -> Result<u128> {
    if c == 0 {
        return Err(AmmError::DivideByZero);
    }

    if let Some(product) = a.checked_mul(b) {
        return Ok(product / c);
    }

    let quotient = widening_mul(a, b)
        .checked_div(U256::new(c))
        .ok_or(AmmError::DivideByZero)?;
    narrow(quotient, "mul-div quotient exceeds 128 bits")
}

/// Returns `⌊√x⌋` by the Babylonian method.
///
/// Starts from `y = x`, `z = ⌊(x + 1) / 2⌋` and iterates
/// `z = ⌊(⌊x / z⌋ + z) / 2⌋` while `z < y`. The sequence decreases
/// monotonically onto the floor root.
///
/// # Examples
///
/// ```
/// use pair_amm::math::integer_sqrt;
///
/// assert_eq!(integer_sqrt(0), 0);
/// assert_eq!(integer_sqrt(8), 2);
/// assert_eq!(integer_sqrt(10_000), 100);
/// ```
#[must_use]
pub const fn integer_sqrt(x: u128) -> u128 {
    if x == 0 {
        return 0;
    }
    let mut y = x;
    // ⌊(x + 1) / 2⌋ without overflowing at u128::MAX
    let mut z = x / 2 + (x & 1);
    while z < y {
        y = z;
        z = (x / z + z) / 2;
    }
    y
}

/// Returns `⌊√(a × b)⌋` over the full 256-bit product.
///
/// Runs the same iteration as [`integer_sqrt`], so for products that fit in
/// 128 bits the two agree exactly.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] only if an intermediate sum overflows
/// 256 bits, which the iteration's bounds rule out.
pub fn sqrt_of_product(a: u128, b: u128) -> Result<u128> {
    if let Some(product) = a.checked_mul(b) {
        return Ok(integer_sqrt(product));
    }

    let x = widening_mul(a, b);
    let mut y = x;
    let mut z = (x / TWO)
        .checked_add(x % TWO)
        .ok_or(AmmError::Overflow("sqrt seed overflow"))?;
    while z < y {
        y = z;
        let quotient = x.checked_div(z).ok_or(AmmError::DivideByZero)?;
        z = quotient
            .checked_add(z)
            .ok_or(AmmError::Overflow("sqrt step overflow"))?
            / TWO;
    }
    narrow(y, "square root exceeds 128 bits")
}

/// Returns the smaller of two values.
#[must_use]
pub const fn min(a: u128, b: u128) -> u128 {
    if a < b {
        a
    } else {
        b
    }
}
