//! The inference engine for discrete Bayesian networks.
//!
//! This module provides:
//! - **errors**: Error types for construction and query failures
//! - **distribution**: Discrete values and probability distributions
//! - **network**: The validated network model and its CPTs
//! - **evidence**: Observations and their resolution against a model
//! - **enumeration**: Exact enumeration-ask inference
//! - **document**: JSON network documents (requires `serde`)

pub mod errors;
pub mod distribution;
pub mod network;
pub mod evidence;
pub mod enumeration;
#[cfg(feature = "serde")]
pub mod document;
