//! # Baynet - exact inference for discrete Bayesian networks
//!
//! Baynet answers `P(Query | Evidence)` over a directed acyclic network of
//! discrete random variables with conditional probability tables, using exact
//! enumeration.
//!
//! ## Architecture
//!
//! The system is organized into two modules:
//!
//! - **engine**: Network model, evidence, and the enumeration-ask algorithm
//! - **diagnostics**: The Asia lung-disease network and its tri-state input adapter
//!
//! ## Usage
//!
//! ```rust,ignore
//! use baynet::{enumeration_ask, Evidence, NetworkModel, NodeSpec};
//!
//! let model = NetworkModel::construct(vec![
//!     NodeSpec::boolean_prior("Smoking", 0.5),
//!     NodeSpec::boolean("Cancer", &["Smoking"], vec![(vec![true], 0.1), (vec![false], 0.01)]),
//! ])?;
//!
//! let posterior = enumeration_ask("Cancer", &Evidence::new(), &model)?;
//! assert!((posterior.probability(true) - 0.055).abs() < 1e-12);
//! ```

#![forbid(unsafe_code)]

pub mod engine;
pub mod diagnostics;

// Re-export commonly used types
pub use engine::distribution::{Distribution, Value};
pub use engine::enumeration::{enumeration_ask, InferenceConfig, InferenceEngine};
pub use engine::errors::BayesError;
pub use engine::evidence::Evidence;
pub use engine::network::{CptSpec, NetworkModel, NodeSpec, ParentKey, Variable};

/// Builds a network and answers one query against it.
///
/// Convenience for one-off questions; build the [`NetworkModel`] once and use
/// [`InferenceEngine`] directly when issuing many queries.
///
/// # Example
///
/// ```rust,ignore
/// use baynet::{query, Evidence, NodeSpec};
///
/// let posterior = query(
///     vec![NodeSpec::boolean_prior("Rain", 0.2)],
///     "Rain",
///     &Evidence::new(),
/// )?;
/// ```
pub fn query<I>(specs: I, query: &str, evidence: &Evidence) -> Result<Distribution, BayesError>
where
    I: IntoIterator<Item = NodeSpec>,
{
    let model = NetworkModel::construct(specs)?;
    enumeration_ask(query, evidence, &model)
}
