// crates/meridian-math/src/lib.rs
//
// meridian-math: Deterministic integer fixed-point kernel.
//
// Every quantity lives in one of three explicit scales:
//   - EXP_ONE (10^12): exponents and the continuous index
//   - BP_ONE  (10^4):  rates in basis points
//   - WAD     (10^18): the natural-log domain
//
// Conversions between scales are exact multiplications by powers of ten.
// All products are carried in 256-bit (or 512-bit) space before the final
// truncation, and every division states its rounding direction in its name.

pub mod exp;
pub mod ln;

use meridian_core::MeridianError;
use primitive_types::{U256, U512};

pub use exp::{exponent, get_continuous_index};
pub use ln::wad_ln;

/// Scale of exponents and indices: 10^12.
pub const EXP_ONE: u128 = 1_000_000_000_000;

/// Basis-point scale: 10_000 bp is 100%.
pub const BP_ONE: u128 = 10_000;

/// Scale of the natural-log domain: 10^18.
pub const WAD: u128 = 1_000_000_000_000_000_000;

/// Exact ratio `WAD / EXP_ONE`, used to lift index-scale values into the
/// log domain and back.
pub const WAD_TO_EXP: u128 = 1_000_000;

/// Seconds in a (non-leap) year, the annualization base for all rates.
pub const SECONDS_PER_YEAR: u32 = 31_536_000;

/// Present value to principal, truncating: `⌊ x · EXP_ONE / index ⌋`.
///
/// The product is carried in 512-bit space, so the only failure is a zero
/// index. The final result truncates to 128 bits; callers bound their
/// inputs via the supply envelopes.
pub fn divide_down(x: U256, index: u128) -> Result<u128, MeridianError> {
    if index == 0 {
        return Err(MeridianError::DivisionByZero);
    }
    Ok((x.full_mul(U256::from(EXP_ONE)) / U512::from(index)).low_u128())
}

/// Like [`divide_down`], but rounding up: `(x · EXP_ONE + index − 1) / index`.
pub fn divide_up(x: U256, index: u128) -> Result<u128, MeridianError> {
    if index == 0 {
        return Err(MeridianError::DivisionByZero);
    }
    let numerator = x.full_mul(U256::from(EXP_ONE)) + U512::from(index - 1);
    Ok((numerator / U512::from(index)).low_u128())
}

/// Principal to present value, truncating: `⌊ x · index / EXP_ONE ⌋`.
///
/// The full product of two 128-bit operands fits a `U256`, so this never
/// overflows.
pub fn multiply_down(x: u128, index: u128) -> U256 {
    U256::from(x) * U256::from(index) / U256::from(EXP_ONE)
}

/// Ceiling counterpart of [`multiply_down`].
pub fn multiply_up(x: u128, index: u128) -> U256 {
    (U256::from(x) * U256::from(index) + U256::from(EXP_ONE - 1)) / U256::from(EXP_ONE)
}

/// Compose an index with a delta index (the growth factor of an elapsed
/// interval, same scale), truncating: `⌊ index · delta_index / EXP_ONE ⌋`.
pub fn multiply_indices_down(index: u128, delta_index: u64) -> U256 {
    U256::from(index) * U256::from(delta_index) / U256::from(EXP_ONE)
}

/// As [`multiply_indices_down`], rounding up. Used where a composed index
/// tracks amounts owed rather than amounts credited.
pub fn multiply_indices_up(index: u128, delta_index: u64) -> U256 {
    (U256::from(index) * U256::from(delta_index) + U256::from(EXP_ONE - 1)) / U256::from(EXP_ONE)
}

/// Basis points to `EXP_ONE` scale: `bp · EXP_ONE / BP_ONE`.
pub fn convert_from_basis_points(bp: u32) -> u64 {
    ((bp as u128 * EXP_ONE) / BP_ONE) as u64
}

/// `EXP_ONE` scale to basis points: `scaled · BP_ONE / EXP_ONE`.
pub fn convert_to_basis_points(scaled: u64) -> u64 {
    ((scaled as u128 * BP_ONE) / EXP_ONE) as u64
}
