// crates/meridian-rates/src/earner.rs
//
// Earner-rate safety calculator.
//
// The chosen rate must be provably safe over a look-ahead window W: with
// A = total active owed, E = total earning supply, m = minter rate, the
// earners must not out-accrue the minters, i.e.
//
//   E · e^{re·W/Y} <= A · e^{m·W/Y}
//
// Solving for re gives re = (Y/W) · ln(1 + A·(e^{m·W/Y} − 1)/E), which is
// exactly the log branch below. When A covers E the instantaneous
// proportional rate A·m/E is already safe and avoids the log entirely.

use meridian_core::{MeridianError, MinterGateway, Registrar, MAX_EARNER_RATE_KEY};
use meridian_math::{
    convert_from_basis_points, convert_to_basis_points, get_continuous_index, wad_ln, BP_ONE,
    EXP_ONE, SECONDS_PER_YEAR, WAD_TO_EXP,
};
use primitive_types::{U256, U512};

/// The look-ahead horizon the earner rate is proven safe over: 30 days.
pub const RATE_CONFIDENCE_WINDOW: u32 = 2_592_000;

/// Safety haircut applied on top of the proven-safe rate: 98% in bp.
pub const RATE_SAFETY_MULTIPLIER: u128 = 9_800;

/// The effective earner rate in basis points, bounded by the governance
/// cap `max_rate` and by [`extra_safe_earner_rate`].
pub fn rate(
    max_rate: U256,
    minter_rate: u32,
    total_active_owed: U256,
    total_earning_supply: U256,
) -> Result<U256, MeridianError> {
    // Nothing owed or a zero minter rate: earners accrue nothing.
    if total_active_owed.is_zero() || minter_rate == 0 {
        return Ok(U256::zero());
    }

    // A cap at or below the minter rate is already safe while the owed
    // total covers the earning supply.
    if max_rate <= U256::from(minter_rate) && total_active_owed >= total_earning_supply {
        return Ok(max_rate);
    }

    let extra_safe =
        extra_safe_earner_rate(total_active_owed, total_earning_supply, minter_rate)?;
    Ok(max_rate.min(U256::from(extra_safe)))
}

/// [`safe_earner_rate`] with the 98% haircut, clamped at `u32::MAX`.
pub fn extra_safe_earner_rate(
    total_active_owed: U256,
    total_earning_supply: U256,
    minter_rate: u32,
) -> Result<u32, MeridianError> {
    let safe = safe_earner_rate(total_active_owed, total_earning_supply, minter_rate)? as u128;
    Ok((safe * RATE_SAFETY_MULTIPLIER / BP_ONE).min(u32::MAX as u128) as u32)
}

/// The largest earner rate (in basis points) that cannot out-accrue the
/// minters over [`RATE_CONFIDENCE_WINDOW`], clamped at `u32::MAX`.
pub fn safe_earner_rate(
    total_active_owed: U256,
    total_earning_supply: U256,
    minter_rate: u32,
) -> Result<u32, MeridianError> {
    if total_active_owed.is_zero() || minter_rate == 0 {
        return Ok(0);
    }
    if total_earning_supply.is_zero() {
        return Ok(u32::MAX);
    }

    if total_active_owed <= total_earning_supply {
        // Instantaneous proportional rate: A·m/E.
        let rate =
            total_active_owed.full_mul(U256::from(minter_rate)) / U512::from(total_earning_supply);
        return Ok(if rate > U512::from(u32::MAX) {
            u32::MAX
        } else {
            rate.as_u32()
        });
    }

    // A > E: over the window the minter side grows by δ = e^{m·W/Y};
    // the matching earner rate is (Y/W)·ln(1 + A·(δ−1)/E).
    let minter_rate_scaled = convert_from_basis_points(minter_rate);
    let delta = get_continuous_index(minter_rate_scaled, RATE_CONFIDENCE_WINDOW);

    let growth = total_active_owed
        .full_mul(U256::from(delta as u128 - EXP_ONE))
        / U512::from(total_earning_supply);
    let arg_exp = U512::from(EXP_ONE) + growth;

    // Lift into the log domain. An argument too wide for the domain would
    // annualize far past the clamp anyway.
    let arg_wad = arg_exp * U512::from(WAD_TO_EXP);
    if arg_wad > U512::from(u128::MAX) {
        return Ok(u32::MAX);
    }

    let ln_wad = wad_ln(arg_wad.as_u128())?;
    assert!(ln_wad >= 0, "log of an argument at or above one");
    let ln_exp = (ln_wad as u128) / WAD_TO_EXP;

    let annualized = ln_exp * SECONDS_PER_YEAR as u128 / RATE_CONFIDENCE_WINDOW as u128;
    if annualized > u64::MAX as u128 {
        return Ok(u32::MAX);
    }

    Ok(convert_to_basis_points(annualized as u64) as u32)
}

/// Convenience wrapper reading the cap from the registrar and the minter
/// aggregates from the gateway.
pub fn earner_rate(
    registrar: &dyn Registrar,
    gateway: &dyn MinterGateway,
    total_earning_supply: U256,
) -> Result<U256, MeridianError> {
    rate(
        registrar.get(MAX_EARNER_RATE_KEY),
        gateway.minter_rate(),
        gateway.total_active_owed(),
        total_earning_supply,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_rate_zero_owed_or_zero_minter_rate() {
        assert_eq!(safe_earner_rate(U256::zero(), U256::from(1u8), 1_000).unwrap(), 0);
        assert_eq!(safe_earner_rate(U256::from(1u8), U256::from(1u8), 0).unwrap(), 0);
    }

    #[test]
    fn test_safe_rate_unbounded_without_earning_supply() {
        assert_eq!(
            safe_earner_rate(U256::from(1_000_000u64), U256::zero(), 1_000).unwrap(),
            u32::MAX
        );
    }

    #[test]
    fn test_safe_rate_proportional_when_owed_covers_earners() {
        assert_eq!(
            safe_earner_rate(U256::from(1_000_000u64), U256::from(1_000_000u64), 1_000).unwrap(),
            1_000
        );
        assert_eq!(
            safe_earner_rate(U256::from(500_000u64), U256::from(1_000_000u64), 1_000).unwrap(),
            500
        );
    }

    #[test]
    fn test_safe_rate_log_branch_when_earners_exceed_owed_coverage() {
        assert_eq!(
            safe_earner_rate(U256::from(1_000_000u64), U256::from(500_000u64), 1_000).unwrap(),
            1_914
        );
    }

    #[test]
    fn test_extra_safe_rate_applies_haircut() {
        assert_eq!(
            extra_safe_earner_rate(U256::from(1_000_000u64), U256::from(500_000u64), 1_000)
                .unwrap(),
            1_875
        );
        // ⌊1_914 · 9_800 / 10_000⌋ = 1_875.
        assert_eq!(1_914u32 * 9_800 / 10_000, 1_875);
    }

    #[test]
    fn test_safe_rate_clamps_at_u32_max() {
        // A dwarfing E by thirty orders of magnitude saturates the clamp.
        let owed = U256::from(10u8).pow(U256::from(36u8));
        assert_eq!(safe_earner_rate(owed, U256::from(1u8), 1_000).unwrap(), u32::MAX);
    }

    #[test]
    fn test_rate_zero_cases() {
        let max = U256::from(1_000u64);
        assert_eq!(rate(max, 0, U256::from(1u8), U256::from(1u8)).unwrap(), U256::zero());
        assert_eq!(rate(max, 1_000, U256::zero(), U256::from(1u8)).unwrap(), U256::zero());
    }

    #[test]
    fn test_rate_returns_cap_when_cap_is_safe() {
        // max <= m and A >= E: the cap cannot out-accrue the minters.
        let effective = rate(
            U256::from(500u64),
            1_000,
            U256::from(2_000_000u64),
            U256::from(1_000_000u64),
        )
        .unwrap();
        assert_eq!(effective, U256::from(500u64));
    }

    #[test]
    fn test_rate_bounded_by_extra_safe() {
        // Cap above the extra-safe rate: the haircut rate wins.
        let effective = rate(
            U256::from(10_000u64),
            1_000,
            U256::from(1_000_000u64),
            U256::from(500_000u64),
        )
        .unwrap();
        assert_eq!(effective, U256::from(1_875u64));

        // Cap below it: the cap wins.
        let effective = rate(
            U256::from(1_200u64),
            1_000,
            U256::from(1_000_000u64),
            U256::from(500_000u64),
        )
        .unwrap();
        assert_eq!(effective, U256::from(1_200u64));
    }

    #[test]
    fn test_safe_rate_never_exceeds_window_guarantee() {
        // For a spread of (A, E, m), growing E at the extra-safe rate over
        // the window must stay within what A grows to at the minter rate.
        let cases: &[(u64, u64, u32)] = &[
            (1_000_000, 500_000, 1_000),
            (1_000_000, 999_999, 400),
            (5_000_000, 1_000_000, 2_500),
            (10_000_000, 9_000_000, 40_000),
        ];
        for &(a, e, m) in cases {
            let re = extra_safe_earner_rate(U256::from(a), U256::from(e), m).unwrap();
            let earner_growth =
                get_continuous_index(convert_from_basis_points(re), RATE_CONFIDENCE_WINDOW);
            let minter_growth =
                get_continuous_index(convert_from_basis_points(m), RATE_CONFIDENCE_WINDOW);
            let earners = U256::from(e) * U256::from(earner_growth);
            let minters = U256::from(a) * U256::from(minter_growth);
            assert!(earners <= minters, "unsafe rate for A={a} E={e} m={m}");
        }
    }
}
