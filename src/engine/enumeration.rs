//! Exact inference by enumeration.
//!
//! `ask` computes `P(query | evidence)` by summing the full joint distribution
//! over every hidden variable, then normalizing. Variables are visited in the
//! model's topological order, so each variable's parents are already fixed
//! (by evidence or by an enclosing summation) when its CPT row is looked up.
//! Each summation branch works on its own copy of the assignment.
//!
//! Cost is exponential in the number of hidden variables. There is no caching
//! between calls; the engine holds only its configuration.

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::engine::distribution::{Distribution, Value};
use crate::engine::errors::BayesError;
use crate::engine::evidence::{resolve_evidence, Assignment, Evidence};
use crate::engine::network::{NetworkModel, ParentKey, Variable};

/// Totals at or below this are treated as impossible evidence.
pub const DEFAULT_DEGENERATE_EPSILON: f64 = f64::MIN_POSITIVE;

/// Configuration for enumeration inference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InferenceConfig {
    /// Normalization fails when the total weight is at or below this value.
    pub degenerate_epsilon: f64,
    /// Evaluate the per-value weights of the query in parallel.
    ///
    /// Only honored with the `rayon` feature. Results are identical either way.
    pub parallel: bool,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            degenerate_epsilon: DEFAULT_DEGENERATE_EPSILON,
            parallel: cfg!(feature = "rayon"),
        }
    }
}

impl InferenceConfig {
    fn validate(self) -> Result<Self, BayesError> {
        if !self.degenerate_epsilon.is_finite() || self.degenerate_epsilon < 0.0 {
            return Err(BayesError::Config(
                "inference: degenerate_epsilon must be finite and >= 0".into(),
            ));
        }
        Ok(self)
    }
}

/// Stateless enumeration-ask engine.
///
/// A single engine may be shared across threads; every call borrows the model
/// immutably and keeps no state between calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct InferenceEngine {
    config: InferenceConfig,
}

impl InferenceEngine {
    /// Creates an engine with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine with an explicit, validated configuration.
    pub fn with_config(config: InferenceConfig) -> Result<Self, BayesError> {
        Ok(Self { config: config.validate()? })
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Computes the posterior distribution of `query` given `evidence`.
    ///
    /// The result covers the query's whole domain, in domain order, and sums to 1.
    ///
    /// # Errors
    ///
    /// * [`BayesError::InvalidQuery`] - `query` is unknown or already observed in `evidence`
    /// * [`BayesError::InvalidEvidence`] - unknown evidence variable or out-of-domain value
    /// * [`BayesError::DegenerateEvidence`] - the evidence has zero joint probability
    pub fn ask(
        &self,
        query: &str,
        evidence: &Evidence,
        model: &NetworkModel,
    ) -> Result<Distribution, BayesError> {
        let query_idx = model.index_of(query).map_err(|_| BayesError::InvalidQuery {
            variable: query.to_string(),
            reason: "not a variable of this network".into(),
        })?;
        if evidence.contains(query) {
            return Err(BayesError::InvalidQuery {
                variable: query.to_string(),
                reason: "variable is already observed in the evidence".into(),
            });
        }
        let assignment = resolve_evidence(evidence, model)?;
        let variable = &model.variables()[query_idx];

        #[cfg(feature = "tracing")]
        tracing::debug!(
            query,
            observed = evidence.len(),
            hidden = model.len() - evidence.len() - 1,
            "enumeration ask"
        );

        let weights = self.query_weights(model, query_idx, variable, &assignment)?;
        let unnormalized = Distribution::from_domain(variable.domain(), &weights);
        let total = unnormalized.total();
        let posterior = unnormalized
            .normalized(self.config.degenerate_epsilon)
            .ok_or_else(|| BayesError::DegenerateEvidence {
                query: query.to_string(),
                total,
            })?;

        #[cfg(feature = "tracing")]
        tracing::trace!(query, %posterior, total, "posterior");

        Ok(posterior)
    }

    /// Weight `W(v)` of each query value, in domain order.
    fn query_weights(
        &self,
        model: &NetworkModel,
        query_idx: usize,
        variable: &Variable,
        assignment: &Assignment,
    ) -> Result<Vec<f64>, BayesError> {
        let weight = |value_idx: usize| {
            let mut extended = assignment.clone();
            extended[query_idx] = Some(value_idx);
            enumerate_all(model, 0, &extended)
        };
        let n = variable.domain().len();

        #[cfg(feature = "rayon")]
        if self.config.parallel && n > 1 {
            return (0..n).into_par_iter().map(weight).collect();
        }

        (0..n).map(weight).collect()
    }

    /// Most likely value of `query` and its posterior probability.
    ///
    /// Ties go to the first value in the query's declared domain order.
    pub fn most_likely(
        &self,
        query: &str,
        evidence: &Evidence,
        model: &NetworkModel,
    ) -> Result<(Value, f64), BayesError> {
        let posterior = self.ask(query, evidence, model)?;
        posterior
            .most_likely()
            .map(|(v, p)| (v.clone(), p))
            .ok_or_else(|| BayesError::Internal(format!("posterior of '{}' is empty", query)))
    }

    /// Posteriors for several queries against the same evidence, in the given order.
    pub fn ask_many(
        &self,
        queries: &[&str],
        evidence: &Evidence,
        model: &NetworkModel,
    ) -> Result<Vec<(String, Distribution)>, BayesError> {
        queries
            .iter()
            .map(|q| Ok((q.to_string(), self.ask(q, evidence, model)?)))
            .collect()
    }

    /// Joint probability of the evidence with every other variable summed out.
    ///
    /// Empty evidence has probability 1.
    pub fn evidence_probability(
        &self,
        evidence: &Evidence,
        model: &NetworkModel,
    ) -> Result<f64, BayesError> {
        let assignment = resolve_evidence(evidence, model)?;
        enumerate_all(model, 0, &assignment)
    }
}

/// Answers `P(query | evidence)` with the default engine configuration.
pub fn enumeration_ask(
    query: &str,
    evidence: &Evidence,
    model: &NetworkModel,
) -> Result<Distribution, BayesError> {
    InferenceEngine::new().ask(query, evidence, model)
}

/// Sums the joint probability of variables from `position` onward.
///
/// Runs of observed (or already bound) variables are multiplied in a loop;
/// recursion happens only at hidden variables, so stack depth is bounded by
/// the number of hidden variables rather than the network size.
fn enumerate_all(
    model: &NetworkModel,
    mut position: usize,
    assignment: &Assignment,
) -> Result<f64, BayesError> {
    let mut factor = 1.0;

    while let Some(variable) = model.variables().get(position) {
        let row = variable.row_for(&parent_key(model, variable, assignment)?)?;

        match assignment[position] {
            Some(value_idx) => {
                let p = cpt_entry(variable, row, value_idx)?;
                if p == 0.0 {
                    return Ok(0.0);
                }
                factor *= p;
                position += 1;
            }
            None => {
                let mut total = 0.0;
                for value_idx in 0..variable.domain().len() {
                    let p = cpt_entry(variable, row, value_idx)?;
                    if p == 0.0 {
                        continue;
                    }
                    let mut extended = assignment.clone();
                    extended[position] = Some(value_idx);
                    total += p * enumerate_all(model, position + 1, &extended)?;
                }
                return Ok(factor * total);
            }
        }
    }

    Ok(factor)
}

fn cpt_entry(variable: &Variable, row: &Distribution, value_idx: usize) -> Result<f64, BayesError> {
    row.at(value_idx).ok_or_else(|| {
        BayesError::Internal(format!(
            "CPT row of '{}' has no entry at position {}",
            variable.name(),
            value_idx
        ))
    })
}

/// Parent values of `variable` under `assignment`, in declared parent order.
fn parent_key(
    model: &NetworkModel,
    variable: &Variable,
    assignment: &Assignment,
) -> Result<ParentKey, BayesError> {
    variable
        .parent_indices()
        .iter()
        .map(|&pi| {
            let parent = &model.variables()[pi];
            assignment[pi]
                .map(|vi| parent.domain()[vi].clone())
                .ok_or_else(|| {
                    BayesError::Internal(format!(
                        "parent '{}' of '{}' is unbound during enumeration",
                        parent.name(),
                        variable.name()
                    ))
                })
        })
        .collect()
}
