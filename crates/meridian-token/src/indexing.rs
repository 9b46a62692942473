// crates/meridian-token/src/indexing.rs
//
// The continuous index: a monotonically non-decreasing accumulator that
// carries the earning cohort's growth. present = principal · index / EXP_ONE.
//
// The index advances lazily: reads compute the would-be value from the
// stored triple (index, rate, timestamp); writes commit a new triple.

use meridian_core::MeridianError;
use meridian_math::{
    convert_from_basis_points, divide_down, divide_up, get_continuous_index,
    multiply_down, multiply_indices_down, EXP_ONE,
};
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// The index every token instance starts at: exactly 1.0 in `EXP_ONE` scale.
pub const INITIAL_INDEX: u128 = EXP_ONE;

/// The time-varying accumulator behind the earning cohort.
///
/// Invariants: `latest_index >= EXP_ONE` and monotonically non-decreasing;
/// `latest_update_timestamp` non-decreasing across commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinuousIndexing {
    /// Index committed at the latest update, in `EXP_ONE` scale.
    latest_index: u128,
    /// Rate the index accrues at since the latest update, in basis points.
    latest_rate: u32,
    /// Timestamp of the latest committed update, in seconds.
    latest_update_timestamp: u64,
}

impl ContinuousIndexing {
    /// A fresh accumulator: index 1.0, rate zero, anchored at `now`.
    pub fn new(now: u64) -> Self {
        Self {
            latest_index: INITIAL_INDEX,
            latest_rate: 0,
            latest_update_timestamp: now,
        }
    }

    /// The index committed at the latest update.
    pub fn latest_index(&self) -> u128 {
        self.latest_index
    }

    /// The rate in force since the latest update, in basis points.
    pub fn latest_rate(&self) -> u32 {
        self.latest_rate
    }

    /// Timestamp of the latest committed update.
    pub fn latest_update_timestamp(&self) -> u64 {
        self.latest_update_timestamp
    }

    /// The index value at `now`, without committing it.
    pub fn current_index(&self, now: u64) -> Result<u128, MeridianError> {
        calculate_current_index(
            self.latest_index,
            self.latest_rate,
            self.latest_update_timestamp,
            now,
        )
    }

    /// Advance the index to `now` and switch to `new_rate`, committing the
    /// new triple. Idempotent when neither the timestamp nor the rate
    /// changes. Returns the committed index.
    pub fn update(&mut self, new_rate: u32, now: u64) -> Result<u128, MeridianError> {
        if now == self.latest_update_timestamp && new_rate == self.latest_rate {
            return Ok(self.latest_index);
        }

        let new_index = self.current_index(now)?;
        self.latest_index = new_index;
        self.latest_rate = new_rate;
        self.latest_update_timestamp = now;

        tracing::debug!(index = new_index, rate = new_rate, now, "index committed");
        Ok(new_index)
    }
}

/// The index grown from `(index, rate_bp)` over `[t0, t1]`.
///
/// Supplying `t1 < t0` is a caller contract violation and aborts with
/// `NegativeTimeElapsed`. The result is capped at `u128::MAX`: a long
/// enough interval at a large rate walks the product past the 128-bit
/// envelope.
pub fn calculate_current_index(
    index: u128,
    rate_bp: u32,
    t0: u64,
    t1: u64,
) -> Result<u128, MeridianError> {
    if t1 < t0 {
        return Err(MeridianError::NegativeTimeElapsed { now: t1, latest: t0 });
    }

    let elapsed = t1 - t0;
    if elapsed == 0 {
        return Ok(index);
    }

    // The growth-factor domain is 32-bit seconds; an interval past
    // u32::MAX (~136 years) saturates rather than wraps.
    let delta = get_continuous_index(
        convert_from_basis_points(rate_bp),
        u32::try_from(elapsed).unwrap_or(u32::MAX),
    );
    let grown = multiply_indices_down(index, delta);

    Ok(if grown > U256::from(u128::MAX) {
        u128::MAX
    } else {
        grown.as_u128()
    })
}

/// Present value to principal, truncated: the credit-side conversion.
pub fn principal_from_present_down(present: U256, index: u128) -> Result<u128, MeridianError> {
    divide_down(present, index)
}

/// Present value to principal, rounded up: the debit-side conversion.
pub fn principal_from_present_up(present: U256, index: u128) -> Result<u128, MeridianError> {
    divide_up(present, index)
}

/// Principal to present value, truncating.
pub fn present_from_principal_down(principal: u128, index: u128) -> U256 {
    multiply_down(principal, index)
}
