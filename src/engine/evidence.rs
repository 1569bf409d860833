//! Evidence handling.
//!
//! Evidence maps observed variable names to one value each. Unobserved
//! variables are simply absent; there is no "unknown" value. Before
//! inference the evidence is resolved against a model into a dense
//! assignment indexed by topological position.

use std::collections::BTreeMap;

use crate::engine::distribution::Value;
use crate::engine::errors::BayesError;
use crate::engine::network::NetworkModel;

/// Observed values for a subset of a network's variables.
///
/// Backed by an ordered map, so insertion order never affects results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Evidence {
    observations: BTreeMap<String, Value>,
}

impl Evidence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Records an observation, returning the value it replaces.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.observations.insert(name.into(), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.observations.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.observations.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.observations.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Iterates over observations sorted by variable name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.observations.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Evidence {
    /// Parses `NAME=VALUE` pairs, matching each value against the displayed
    /// form of the variable's domain values.
    ///
    /// Matching goes through the model, so a label domain containing `"true"`
    /// resolves to that label rather than to a boolean. Whitespace around the
    /// name and value is ignored. A later pair for the same variable replaces
    /// an earlier one.
    ///
    /// # Errors
    ///
    /// [`BayesError::InvalidEvidence`] if a pair has no `=`, names an unknown
    /// variable, or its value matches no domain value (or more than one).
    pub fn parse_pairs<S: AsRef<str>>(pairs: &[S], model: &NetworkModel) -> Result<Self, BayesError> {
        let mut evidence = Evidence::new();
        for pair in pairs {
            let pair = pair.as_ref();
            let (name, raw) = pair.split_once('=').ok_or_else(|| BayesError::InvalidEvidence {
                variable: pair.to_string(),
                reason: "expected NAME=VALUE".into(),
            })?;
            let (name, raw) = (name.trim(), raw.trim());
            let variable = model.variable(name).map_err(|_| BayesError::InvalidEvidence {
                variable: name.to_string(),
                reason: "not a variable of this network".into(),
            })?;

            let mut matches = variable.domain().iter().filter(|v| v.to_string() == raw);
            let value = match (matches.next(), matches.next()) {
                (Some(value), None) => value.clone(),
                (None, _) => {
                    return Err(BayesError::InvalidEvidence {
                        variable: name.to_string(),
                        reason: format!("value '{}' is not in the domain", raw),
                    })
                }
                (Some(_), Some(_)) => {
                    return Err(BayesError::InvalidEvidence {
                        variable: name.to_string(),
                        reason: format!("value '{}' matches more than one domain value", raw),
                    })
                }
            };
            evidence.insert(name, value);
        }
        Ok(evidence)
    }
}

impl<K, V> FromIterator<(K, V)> for Evidence
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut evidence = Evidence::new();
        evidence.extend(iter);
        evidence
    }
}

impl<K, V> Extend<(K, V)> for Evidence
where
    K: Into<String>,
    V: Into<Value>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

/// Domain index of each variable's value, by topological position.
///
/// `None` marks a variable that is neither observed nor yet bound by an
/// enclosing summation.
pub(crate) type Assignment = Vec<Option<usize>>;

/// Checks evidence against `model` and converts it into an [`Assignment`].
///
/// # Errors
///
/// [`BayesError::InvalidEvidence`] if a name is not a model variable or a value
/// lies outside the variable's domain.
pub(crate) fn resolve_evidence(evidence: &Evidence, model: &NetworkModel) -> Result<Assignment, BayesError> {
    let mut assignment: Assignment = vec![None; model.len()];
    for (name, value) in evidence.iter() {
        let idx = model.index_of(name).map_err(|_| BayesError::InvalidEvidence {
            variable: name.to_string(),
            reason: "not a variable of this network".into(),
        })?;
        let variable = &model.variables()[idx];
        let value_idx = variable.value_index(value).ok_or_else(|| BayesError::InvalidEvidence {
            variable: name.to_string(),
            reason: format!(
                "value '{}' is not in the domain [{}]",
                value,
                variable
                    .domain()
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        })?;
        assignment[idx] = Some(value_idx);
    }
    Ok(assignment)
}
