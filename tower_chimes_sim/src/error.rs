// Error types for the tower engine.
//
// `SimError` covers both precondition failures (bad height, bad peg roles,
// empty palette, inconsistent snapshot), which are rejected before any state
// is touched, and `CorruptedState`, which means a move did not match the
// tower it was applied to. Corruption is a bug, never a user error: the
// caller must stop the run.

use thiserror::Error;

use crate::tower::PegId;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("invalid tower height {height} (supported range {min}..={max})")]
    InvalidHeight { height: u32, min: u32, max: u32 },

    #[error("peg roles must be three distinct pegs (got {from} -> {to} via {via})")]
    InvalidRoles { from: PegId, to: PegId, via: PegId },

    #[error("colour palette must have at least one entry")]
    EmptyPalette,

    #[error("invalid tower snapshot: {0}")]
    InvalidSnapshot(&'static str),

    #[error("corrupted tower state: {0}")]
    CorruptedState(Corruption),
}

/// What exactly went wrong when a move could not be applied.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Corruption {
    #[error("expected block {expected} on top of {peg}, but the peg is empty")]
    EmptyPeg { peg: PegId, expected: u32 },

    #[error("expected block {expected} on top of {peg}, found block {found}")]
    UnexpectedBlock { peg: PegId, expected: u32, found: u32 },

    #[error("block {moving} cannot be placed on narrower block {top} on {peg}")]
    WiderOnNarrower { peg: PegId, moving: u32, top: u32 },

    #[error("{peg} has no free slot")]
    PegFull { peg: PegId },

    #[error("move from {peg} onto itself")]
    SamePeg { peg: PegId },
}

impl From<Corruption> for SimError {
    fn from(corruption: Corruption) -> Self {
        SimError::CorruptedState(corruption)
    }
}
