// crates/meridian-core/src/traits.rs

use std::time::{SystemTime, UNIX_EPOCH};

use primitive_types::U256;

use crate::types::{Address, RegistrarId};

/// Registrar key holding the governance cap on the earner rate, in basis
/// points. Reads as 1_000 (10%) when governance has not set it.
pub const MAX_EARNER_RATE_KEY: &str = "max_earner_rate";

/// Registrar key holding the base minter rate, in basis points. Reads as
/// 500 (5%) when governance has not set it.
pub const BASE_MINTER_RATE_KEY: &str = "base_minter_rate";

/// A keyed parameter store governed outside the core.
///
/// The core consults exactly two keys ([`MAX_EARNER_RATE_KEY`],
/// [`BASE_MINTER_RATE_KEY`]) and the approved-earners list. Unknown keys
/// read as zero. Implementations are read-only from the core's viewpoint.
pub trait Registrar {
    /// Identifier used to validate which parameter store a token consults.
    fn id(&self) -> RegistrarId;

    /// Value stored under `key`; zero for unknown keys.
    fn get(&self, key: &str) -> U256;

    /// Whether `account` is on the approved-earners list.
    fn is_approved_earner(&self, account: &Address) -> bool;
}

/// Read-only view of the minter gateway's aggregate accounting.
pub trait MinterGateway {
    /// The rate outstanding minter debt compounds at, in basis points.
    fn minter_rate(&self) -> u32;

    /// Total present value owed by active minters.
    fn total_active_owed(&self) -> U256;
}

/// Source of the `now` timestamp supplied to every token operation.
///
/// Successive reads must be non-decreasing; supplying a timestamp earlier
/// than the latest committed update is a caller contract violation.
pub trait HostClock {
    /// Seconds since the Unix epoch.
    fn now_seconds(&self) -> u64;
}

/// [`HostClock`] backed by the operating-system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl HostClock for SystemClock {
    fn now_seconds(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}
