//! Error types for experiment-combinators
//!
//! Two kinds of failure exist. An experiment that fails at run time is not
//! an error at this level: it produces a record with `status = false`. A
//! collaborator that hands back a malformed record violates the record
//! contract and surfaces as an [`Error`] at the point of aggregation.

use std::sync::PoisonError;

use thiserror::Error;

use crate::record::Section;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Experiment-combinator error types
#[derive(Error, Debug)]
pub enum Error {
    /// Record carries no `status` metadata field
    #[error("Malformed record: metadata has no `status` field")]
    MissingStatus,

    /// Record `status` metadata is not a boolean
    #[error("Malformed record: `status` must be a boolean, found {found}")]
    InvalidStatus {
        /// Rendering of the offending value
        found: String,
    },

    /// A field selected for summarising is absent from a record
    #[error("Malformed record: {section} field `{field}` is missing")]
    MissingField {
        /// Section that was searched
        section: Section,
        /// Name of the missing field
        field: String,
    },

    /// A field selected for summarising holds a non-numeric value
    #[error("Malformed record: {section} field `{field}` is not numeric (found {found})")]
    NonNumericField {
        /// Section holding the field
        section: Section,
        /// Name of the field
        field: String,
        /// Rendering of the offending value
        found: String,
    },

    /// Repetition count must be at least one
    #[error("Invalid repetition count: {0}\nA repeated experiment needs at least one repetition")]
    InvalidRepetitions(usize),

    /// The wrapped multi-record experiment is behind a poisoned lock
    #[error("Underlying experiment lock poisoned (a previous run panicked)")]
    Poisoned,

    /// Configuration could not be parsed
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error reports a collaborator handing back a malformed
    /// record, as opposed to a problem with the combinator itself.
    ///
    /// Contract violations are never folded into a failed run: they
    /// propagate out of [`Experiment::run_experiment`](crate::Experiment::run_experiment).
    #[must_use]
    pub const fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::MissingStatus
                | Self::InvalidStatus { .. }
                | Self::MissingField { .. }
                | Self::NonNumericField { .. }
        )
    }
}

impl<T> From<PoisonError<T>> for Error {
    fn from(_: PoisonError<T>) -> Self {
        Self::Poisoned
    }
}
