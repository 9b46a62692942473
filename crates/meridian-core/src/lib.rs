// crates/meridian-core/src/lib.rs
//
// meridian-core: Shared types, errors, and collaborator traits for the
// Meridian Protocol — a yield-bearing fungible token whose supply splits
// into a non-earning cohort (face-value balances) and an earning cohort
// (principal balances grown by a continuously compounding index).
//
// This is the leaf crate the rest of the workspace depends on. It carries
// no arithmetic; the math kernel lives in meridian-math and the token
// state machine in meridian-token.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key types for ergonomic access from downstream crates.
pub use error::MeridianError;
pub use traits::{
    HostClock, MinterGateway, Registrar, SystemClock, BASE_MINTER_RATE_KEY, MAX_EARNER_RATE_KEY,
};
pub use types::{Address, RegistrarId, TokenEvent, ZERO_ADDRESS};
