// crates/meridian-rates/src/lib.rs
//
// meridian-rates: Rate models for the Meridian Protocol.
//
// The earner-rate calculator chooses a rate provably bounded by what
// minters pay over a 30-day confidence window; the minter-rate model is a
// stateless clamp on the governed base rate. Both consume the registrar
// and gateway read-only — the token layer never calls in here, the host
// carries rates over.

pub mod earner;
pub mod minter;
pub mod registrar;

// Re-export key entry points for ergonomic access from downstream crates.
pub use earner::{
    earner_rate, extra_safe_earner_rate, rate, safe_earner_rate, RATE_CONFIDENCE_WINDOW,
    RATE_SAFETY_MULTIPLIER,
};
pub use minter::{minter_rate, MAX_MINTER_RATE};
pub use registrar::{
    InMemoryRegistrar, StaticMinterGateway, DEFAULT_BASE_MINTER_RATE, DEFAULT_MAX_EARNER_RATE,
};
