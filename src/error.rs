//! Construction errors.
//!
//! Every failure is detected while building a [`Selector`](crate::Selector);
//! sampling from a built selector cannot fail.

use thiserror::Error;

/// Which overflow bound a weight violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverflowKind {
    /// A single weight is larger than [`MAX_WEIGHT`](crate::MAX_WEIGHT).
    SingleWeight,
    /// Adding a weight would push the running total past
    /// [`MAX_WEIGHT`](crate::MAX_WEIGHT).
    TotalWeight,
}

impl std::fmt::Display for OverflowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SingleWeight => f.write_str("single weight"),
            Self::TotalWeight => f.write_str("total weight"),
        }
    }
}

/// Errors returned while normalizing options or building a selector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// No option had a weight greater than zero.
    #[error("no options found with a weight greater than zero")]
    NoValidOptions,

    /// A floating-point weight was NaN or positive infinity.
    #[error("invalid weight: {weight} is not a finite number")]
    InvalidWeight {
        /// The offending weight, rendered with `Display`.
        weight: String,
    },

    /// A weight, or the sum of weights, exceeds [`MAX_WEIGHT`](crate::MAX_WEIGHT).
    #[error("{kind} overflow: weight {weight} with running total {total} exceeds {max}", max = crate::MAX_WEIGHT)]
    WeightOverflow {
        /// Whether the single weight or the running total overflowed.
        kind: OverflowKind,
        /// The (normalized) weight being added.
        weight: u128,
        /// The running total before `weight` was added.
        total: u64,
    },
}

impl Error {
    /// The overflow kind, if this is a [`Error::WeightOverflow`].
    pub fn overflow_kind(&self) -> Option<OverflowKind> {
        match self {
            Self::WeightOverflow { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

/// Crate result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;
