//! Error types for network construction and inference.

use thiserror::Error;

/// Errors raised while building a network or answering a query.
///
/// Construction errors abort model creation, so no partially valid
/// [`NetworkModel`](crate::engine::network::NetworkModel) is ever returned.
/// Query errors abort only the failing call; the model is immutable and the
/// query can be retried with corrected inputs.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in the future without breaking changes.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BayesError {
    /// Duplicate name, bad domain, or a parent that is not declared earlier.
    #[error("structure error for variable '{variable}': {reason}")]
    Structure { variable: String, reason: String },

    /// A CPT row is missing, mis-shaped, or does not sum to 1.
    #[error("malformed CPT for variable '{variable}' at parents {combination}: {reason}")]
    MalformedCpt {
        variable: String,
        combination: String,
        reason: String,
    },

    /// Lookup of a variable the model does not contain.
    #[error("unknown variable '{0}'")]
    UnknownVariable(String),

    /// Evidence names an unknown variable or assigns a value outside its domain.
    #[error("invalid evidence for '{variable}': {reason}")]
    InvalidEvidence { variable: String, reason: String },

    /// Query names an unknown variable or a variable already given as evidence.
    #[error("invalid query '{variable}': {reason}")]
    InvalidQuery { variable: String, reason: String },

    /// A CPT lookup for a parent combination that has no row.
    ///
    /// Construction-time validation makes this unreachable for models built
    /// through [`NetworkModel::construct`](crate::engine::network::NetworkModel::construct).
    #[error("missing CPT entry for variable '{variable}' at parents {combination}")]
    MissingCptEntry { variable: String, combination: String },

    /// The evidence has zero (or numerically negligible) joint probability.
    #[error("degenerate evidence while querying '{query}': total probability {total:e}")]
    DegenerateEvidence { query: String, total: f64 },

    /// A human-facing observation string could not be interpreted.
    #[error("invalid observation '{input}' for {field}: expected {expected}")]
    InvalidObservation {
        field: String,
        input: String,
        expected: String,
    },

    /// Network document could not be read or is incompatible.
    #[error("config error: {0}")]
    Config(String),

    /// Internal invariant violation.
    ///
    /// This should be used only for programmer errors, not user errors.
    #[error("internal error: {0}")]
    Internal(String),
}
