// crates/meridian-core/src/types.rs
//
// Canonical value types shared across the Meridian workspace.
//
// Addresses are opaque 32-byte identifiers supplied by the host ledger;
// the core never inspects them beyond equality and the zero check.

use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// An opaque account identifier supplied by the host ledger.
pub type Address = [u8; 32];

/// The reserved zero address. Minting transfers from it, burning to it;
/// it can never hold a balance.
pub const ZERO_ADDRESS: Address = [0u8; 32];

/// Opaque identifier of the parameter store a token instance is bound to.
pub type RegistrarId = [u8; 32];

/// Events emitted by token operations, in commit order.
///
/// The host drains these after each operation and republishes them on
/// whatever event surface the ledger provides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenEvent {
    /// The continuous index was advanced and committed.
    IndexUpdated {
        /// The newly committed index, in `EXP_ONE` scale.
        index: u128,
        /// The rate the index will accrue at from now on, in basis points.
        rate: u32,
    },
    /// An account entered the earning cohort.
    StartedEarning {
        /// The account that started earning.
        account: Address,
    },
    /// An account left the earning cohort.
    StoppedEarning {
        /// The account that stopped earning.
        account: Address,
    },
    /// Present-value tokens moved. The zero address denotes mint (as
    /// `from`) or burn (as `to`).
    Transfer {
        /// Sending account, or zero for a mint.
        from: Address,
        /// Receiving account, or zero for a burn.
        to: Address,
        /// Present-value amount moved.
        amount: U256,
    },
}
