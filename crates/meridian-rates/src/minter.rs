// crates/meridian-rates/src/minter.rs
//
// Minter-rate model: the rate outstanding minter debt compounds at is the
// governed base rate, hard-capped by the protocol. No state.

use meridian_core::{Registrar, BASE_MINTER_RATE_KEY};
use primitive_types::U256;

/// Hard cap on the minter rate: 40_000 bp (400%).
pub const MAX_MINTER_RATE: u32 = 40_000;

/// `min(base_minter_rate, MAX_MINTER_RATE)`, in basis points.
pub fn minter_rate(registrar: &dyn Registrar) -> u32 {
    let base = registrar.get(BASE_MINTER_RATE_KEY);
    if base > U256::from(MAX_MINTER_RATE) {
        MAX_MINTER_RATE
    } else {
        base.as_u32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registrar::InMemoryRegistrar;

    #[test]
    fn test_minter_rate_caps_at_maximum() {
        let mut registrar = InMemoryRegistrar::new([1u8; 32]);
        registrar.set(BASE_MINTER_RATE_KEY, U256::from(100_000u64));
        assert_eq!(minter_rate(&registrar), 40_000);
    }

    #[test]
    fn test_minter_rate_passes_base_through_below_cap() {
        let mut registrar = InMemoryRegistrar::new([1u8; 32]);
        registrar.set(BASE_MINTER_RATE_KEY, U256::from(500u64));
        assert_eq!(minter_rate(&registrar), 500);

        registrar.set(BASE_MINTER_RATE_KEY, U256::zero());
        assert_eq!(minter_rate(&registrar), 0);
    }

    #[test]
    fn test_minter_rate_clamp_is_idempotent_at_cap() {
        let mut registrar = InMemoryRegistrar::new([1u8; 32]);
        registrar.set(BASE_MINTER_RATE_KEY, U256::from(40_000u64));
        assert_eq!(minter_rate(&registrar), 40_000);
    }
}
