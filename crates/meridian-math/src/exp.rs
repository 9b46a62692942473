// crates/meridian-math/src/exp.rs
//
// Rational (4,4) Padé approximation of e^x over the EXP_ONE scale:
//
//   e(x) ≈ (1 + x/2 + 3x²/28 + x³/84 + x⁴/1680)
//        / (1 − x/2 + 3x²/28 − x³/84 + x⁴/1680)
//
// Both sides share the scaling factor 84·10^27, which turns the
// coefficients into the integer terms below. The approximation is
// monotone up to x = 6_101_171_897_009 (e^6.1 ≈ 196.7) and folds back
// beyond it; callers must keep their arguments inside that range.

use primitive_types::{U256, U512};

use crate::{EXP_ONE, SECONDS_PER_YEAR};

/// Largest argument for which [`exponent`] is monotone non-decreasing.
pub const EXPONENT_MONOTONE_LIMIT: u128 = 6_101_171_897_009;

/// `e^x` for `x` in `EXP_ONE` scale, result in `EXP_ONE` scale.
///
/// Intermediate terms are carried in 512-bit space, so no product can
/// overflow for any 128-bit argument. Past [`EXPONENT_MONOTONE_LIMIT`]
/// the rational approximation decreases again; callers must not feed
/// larger arguments.
///
/// # Panics
///
/// Panics if `x` is far enough outside the approximation's domain that
/// the denominator reaches zero (well past the monotone limit).
pub fn exponent(x: u128) -> u64 {
    // x² fits a U256 for any 128-bit x; the remaining terms need U512.
    let x2: U512 = U256::from(x).full_mul(U256::from(x));

    // Even-degree terms: 84e27 + 9_000·x² + (x²/2e11)·(x²/1e11).
    let additive_terms = U512::from(84u128 * 10u128.pow(27))
        + U512::from(9_000u64) * x2
        + (x2 / U512::from(200_000_000_000u64)) * (x2 / U512::from(100_000_000_000u64));

    // Magnitude of the odd-degree terms: x·(4.2e16 + x²/1e9).
    let different_terms =
        U512::from(x) * (U512::from(42u128 * 10u128.pow(15)) + x2 / U512::from(1_000_000_000u64));

    assert!(
        additive_terms > different_terms,
        "exponent argument outside the approximation domain"
    );

    (((additive_terms + different_terms) * U512::from(EXP_ONE))
        / (additive_terms - different_terms))
        .low_u64()
}

/// `e^{r·t}`: the growth factor of a continuously compounding rate
/// `yearly_rate` (in `EXP_ONE` scale) over `seconds`.
pub fn get_continuous_index(yearly_rate: u64, seconds: u32) -> u64 {
    exponent((yearly_rate as u128 * seconds as u128) / SECONDS_PER_YEAR as u128)
}
