// crates/meridian-core/src/error.rs

use thiserror::Error;

use crate::types::Address;

/// Protocol-wide error type for the Meridian Protocol.
///
/// Every failure aborts the in-flight operation with no partial state
/// change; there is no internal retry. Variants carry structured payloads
/// only — callers dispatch on the kind, not on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MeridianError {
    /// A collaborator presented a parameter store this token is not bound to.
    #[error("registrar does not match the one this token is bound to")]
    InvalidRegistrar,

    /// Start-earning was requested for an address not on the earners list.
    #[error("account {account:02x?} is not an approved earner")]
    NotApprovedEarner {
        /// The account the transition was requested for.
        account: Address,
    },

    /// An external actor tried to stop-earning for a still-approved earner.
    #[error("account {account:02x?} is an approved earner")]
    IsApprovedEarner {
        /// The account the transition was requested for.
        account: Address,
    },

    /// A burn or transfer exceeds what the cohort can cover.
    #[error("insufficient balance")]
    InsufficientBalance,

    /// A zero amount was supplied where a non-zero amount is required.
    #[error("amount must be non-zero")]
    InsufficientAmount,

    /// The zero address was supplied as a recipient.
    #[error("recipient must not be the zero address")]
    InvalidRecipient,

    /// A mint or cohort transition would push a supply total past its envelope.
    #[error("operation overflows the principal of total supply")]
    OverflowsPrincipalOfTotalSupply,

    /// Division by a zero index in the math kernel.
    #[error("division by zero")]
    DivisionByZero,

    /// The natural-log routine was given a non-positive input.
    #[error("natural log input must be positive")]
    InputNotPositive,

    /// The supplied timestamp precedes the latest recorded update.
    #[error("timestamp {now} precedes latest update at {latest}")]
    NegativeTimeElapsed {
        /// The timestamp supplied by the caller.
        now: u64,
        /// The timestamp of the latest committed update.
        latest: u64,
    },
}
