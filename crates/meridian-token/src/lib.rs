// crates/meridian-token/src/lib.rs
//
// meridian-token: Continuous-indexing state and split-cohort accounting.
//
// Supply splits into two cohorts. Non-earning holders carry face-value
// units aggregated in a single total; earning holders carry principal
// that, multiplied by the monotone index, yields a present value growing
// at a continuously compounded rate. Every operation preserves
//
//   total_supply(now) = total_non_earning
//                     + present(principal_of_total_earning_supply, index(now))
//
// and aborts with no partial state change on failure.

pub mod indexing;
pub mod token;

// Re-export key types for ergonomic access from downstream crates.
pub use indexing::{
    calculate_current_index, present_from_principal_down, principal_from_present_down,
    principal_from_present_up, ContinuousIndexing, INITIAL_INDEX,
};
pub use token::{EarningAccount, TokenState};
