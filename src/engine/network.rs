//! # Bayesian network model
//!
//! This module holds the immutable DAG of discrete random variables and their
//! conditional probability tables.
//!
//! ## Key Components
//!
//! - **NodeSpec**: one `(name, domain, parents, cpt)` entry of a network specification
//! - **ParentKey**: composite CPT key, one value per parent in declared parent order
//! - **Cpt**: the rows of one variable's conditional probability table
//! - **NetworkModel**: the validated network, stored in topological order
//!
//! ## Validation
//!
//! [`NetworkModel::construct`] checks, per node and in declaration order:
//! 1. the name is new and the domain is non-empty and duplicate-free
//! 2. every parent was declared by an earlier node
//! 3. every parent combination has a CPT row summing to 1 ± 1e-6
//!
//! The first failure aborts construction.
//!
//! ## Example
//!
//! ```rust,ignore
//! use baynet::engine::network::{NetworkModel, NodeSpec};
//!
//! let model = NetworkModel::construct(vec![
//!     NodeSpec::boolean_prior("Smoking", 0.5),
//!     NodeSpec::boolean("Cancer", &["Smoking"], vec![(vec![true], 0.1), (vec![false], 0.01)]),
//! ])?;
//! ```

use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::engine::distribution::{boolean_domain, Distribution, Value, NORMALIZATION_TOLERANCE};
use crate::engine::errors::BayesError;

/// Composite key of a CPT row: the parents' values in declared parent order.
///
/// Root variables use the empty key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ParentKey(SmallVec<[Value; 4]>);

impl ParentKey {
    /// The key of a root variable's single row.
    pub fn empty() -> Self {
        Self(SmallVec::new())
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Value>> for ParentKey {
    fn from(values: Vec<Value>) -> Self {
        Self(SmallVec::from_vec(values))
    }
}

impl From<&[Value]> for ParentKey {
    fn from(values: &[Value]) -> Self {
        Self(values.iter().cloned().collect())
    }
}

impl FromIterator<Value> for ParentKey {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for ParentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", v)?;
        }
        f.write_str(")")
    }
}

/// How the rows of a CPT are written in a node specification.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CptSpec {
    /// Rows of `(parent values, probabilities in domain order)`.
    Table(Vec<(Vec<Value>, Vec<f64>)>),
    /// Rows of `(parent values, P(true))` for a boolean variable; `P(false) = 1 - P(true)`.
    Boolean(Vec<(Vec<Value>, f64)>),
}

/// One node of a network specification, as supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeSpec {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default = "boolean_domain"))]
    pub domain: Vec<Value>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub parents: Vec<String>,
    pub cpt: CptSpec,
}

impl NodeSpec {
    /// A node over an arbitrary domain with explicit table rows.
    pub fn new(
        name: impl Into<String>,
        domain: Vec<Value>,
        parents: &[&str],
        rows: Vec<(Vec<Value>, Vec<f64>)>,
    ) -> Self {
        Self {
            name: name.into(),
            domain,
            parents: parents.iter().map(|p| p.to_string()).collect(),
            cpt: CptSpec::Table(rows),
        }
    }

    /// A boolean node whose parents are all boolean, given as `P(true)` per row.
    pub fn boolean(name: impl Into<String>, parents: &[&str], rows: Vec<(Vec<bool>, f64)>) -> Self {
        Self {
            name: name.into(),
            domain: boolean_domain(),
            parents: parents.iter().map(|p| p.to_string()).collect(),
            cpt: CptSpec::Boolean(
                rows.into_iter()
                    .map(|(key, p)| (key.into_iter().map(Value::Bool).collect(), p))
                    .collect(),
            ),
        }
    }

    /// A root boolean node with prior `P(true) = p`.
    pub fn boolean_prior(name: impl Into<String>, p: f64) -> Self {
        Self {
            name: name.into(),
            domain: boolean_domain(),
            parents: Vec::new(),
            cpt: CptSpec::Boolean(vec![(Vec::new(), p)]),
        }
    }
}

/// The validated conditional probability table of one variable.
#[derive(Debug, Clone, Default)]
pub struct Cpt {
    rows: FxHashMap<ParentKey, Distribution>,
}

impl Cpt {
    /// Returns the distribution for a parent combination, if present.
    pub fn row(&self, key: &ParentKey) -> Option<&Distribution> {
        self.rows.get(key)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates over rows in unspecified order.
    pub fn rows(&self) -> impl Iterator<Item = (&ParentKey, &Distribution)> + '_ {
        self.rows.iter()
    }
}

/// A variable of the network together with its parents and CPT.
#[derive(Debug, Clone)]
pub struct Variable {
    name: String,
    domain: Vec<Value>,
    parents: Vec<String>,
    /// Positions of `parents` in the model's topological order.
    parent_indices: Vec<usize>,
    cpt: Cpt,
}

impl Variable {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared domain, in tie-break order.
    pub fn domain(&self) -> &[Value] {
        &self.domain
    }

    /// Parent names in declared order.
    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    pub fn cpt(&self) -> &Cpt {
        &self.cpt
    }

    /// Position of `value` in the domain.
    pub fn value_index(&self, value: &Value) -> Option<usize> {
        self.domain.iter().position(|v| v == value)
    }

    pub(crate) fn parent_indices(&self) -> &[usize] {
        &self.parent_indices
    }

    /// CPT row lookup that reports a missing combination as an error.
    pub(crate) fn row_for(&self, key: &ParentKey) -> Result<&Distribution, BayesError> {
        self.cpt.row(key).ok_or_else(|| BayesError::MissingCptEntry {
            variable: self.name.clone(),
            combination: key.to_string(),
        })
    }
}

/// An immutable, validated Bayesian network.
///
/// Variables are stored in construction order, which is guaranteed to be
/// topological. The model is `Send + Sync` and may be shared read-only between
/// concurrent queries.
#[derive(Debug, Clone, Default)]
pub struct NetworkModel {
    variables: Vec<Variable>,
    index: FxHashMap<String, usize>,
}

impl NetworkModel {
    /// Builds and validates a network from node specifications in topological order.
    ///
    /// # Errors
    ///
    /// * [`BayesError::Structure`] - duplicate name, bad domain, or a parent not declared earlier
    /// * [`BayesError::MalformedCpt`] - a missing, mis-shaped, or non-normalized CPT row
    pub fn construct<I>(specs: I) -> Result<Self, BayesError>
    where
        I: IntoIterator<Item = NodeSpec>,
    {
        let mut model = NetworkModel::default();

        for spec in specs {
            let variable = model.validate_node(spec)?;
            model.index.insert(variable.name.clone(), model.variables.len());
            model.variables.push(variable);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            variables = model.variables.len(),
            cpt_rows = model.variables.iter().map(|v| v.cpt.len()).sum::<usize>(),
            "constructed network model"
        );

        Ok(model)
    }

    fn validate_node(&self, spec: NodeSpec) -> Result<Variable, BayesError> {
        let NodeSpec { name, domain, parents, cpt } = spec;
        let structure = |reason: String| BayesError::Structure {
            variable: name.clone(),
            reason,
        };

        if self.index.contains_key(&name) {
            return Err(structure("variable is declared more than once".into()));
        }
        if domain.is_empty() {
            return Err(structure("domain is empty".into()));
        }
        let mut seen = FxHashSet::default();
        for v in &domain {
            if !seen.insert(v) {
                return Err(structure(format!("domain lists value '{}' more than once", v)));
            }
        }

        let mut parent_indices = Vec::with_capacity(parents.len());
        for parent in &parents {
            if *parent == name {
                return Err(structure("variable lists itself as a parent".into()));
            }
            let idx = self.index.get(parent).copied().ok_or_else(|| {
                structure(format!("parent '{}' is not declared before this variable", parent))
            })?;
            if parent_indices.contains(&idx) {
                return Err(structure(format!("parent '{}' is listed more than once", parent)));
            }
            parent_indices.push(idx);
        }

        let parent_domains: Vec<&[Value]> = parent_indices
            .iter()
            .map(|&i| self.variables[i].domain.as_slice())
            .collect();
        let rows = build_rows(&name, &domain, &parents, &parent_domains, cpt)?;

        for key in parent_combinations(&parent_domains) {
            let malformed = |reason: String| BayesError::MalformedCpt {
                variable: name.clone(),
                combination: key.to_string(),
                reason,
            };
            let row = rows
                .get(&key)
                .ok_or_else(|| malformed("no distribution given for this combination".into()))?;
            let total = row.total();
            if !row.is_normalized(NORMALIZATION_TOLERANCE) {
                return Err(malformed(format!("probabilities sum to {} instead of 1", total)));
            }
        }

        Ok(Variable {
            name,
            domain,
            parents,
            parent_indices,
            cpt: Cpt { rows },
        })
    }

    /// Returns the variable definition for `name`.
    pub fn variable(&self, name: &str) -> Result<&Variable, BayesError> {
        self.index
            .get(name)
            .map(|&i| &self.variables[i])
            .ok_or_else(|| BayesError::UnknownVariable(name.to_string()))
    }

    /// Variable names in construction order, which is topological.
    pub fn topological_order(&self) -> impl Iterator<Item = &str> + '_ {
        self.variables.iter().map(|v| v.name.as_str())
    }

    /// Variables in topological order.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Looks up the CPT row of `name` for parent values given in declared parent order.
    ///
    /// # Errors
    ///
    /// * [`BayesError::UnknownVariable`] - `name` is not in the model
    /// * [`BayesError::MissingCptEntry`] - no row matches `parent_values` exactly
    pub fn distribution_given_parents(
        &self,
        name: &str,
        parent_values: &[Value],
    ) -> Result<&Distribution, BayesError> {
        self.variable(name)?.row_for(&ParentKey::from(parent_values))
    }

    /// Parent names of `name` in declared order.
    pub fn parents(&self, name: &str) -> Result<&[String], BayesError> {
        Ok(self.variable(name)?.parents())
    }

    /// Variables that list `name` as a parent, in topological order.
    pub fn children(&self, name: &str) -> Result<Vec<&str>, BayesError> {
        let idx = self.index_of(name)?;
        Ok(self
            .variables
            .iter()
            .filter(|v| v.parent_indices.contains(&idx))
            .map(|v| v.name.as_str())
            .collect())
    }

    /// Re-expresses the model as table node specs, rows in parent-combination order.
    ///
    /// Constructing a model from the result reproduces this model.
    pub fn node_specs(&self) -> Vec<NodeSpec> {
        self.variables
            .iter()
            .map(|v| {
                let parent_domains: Vec<&[Value]> = v
                    .parent_indices
                    .iter()
                    .map(|&i| self.variables[i].domain.as_slice())
                    .collect();
                let rows: Vec<(Vec<Value>, Vec<f64>)> = parent_combinations(&parent_domains)
                    .into_iter()
                    .filter_map(|key| {
                        let row = v.cpt.row(&key)?;
                        Some((key.values().to_vec(), row.iter().map(|(_, p)| p).collect::<Vec<f64>>()))
                    })
                    .collect();
                NodeSpec {
                    name: v.name.clone(),
                    domain: v.domain.clone(),
                    parents: v.parents.clone(),
                    cpt: CptSpec::Table(rows),
                }
            })
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub(crate) fn index_of(&self, name: &str) -> Result<usize, BayesError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| BayesError::UnknownVariable(name.to_string()))
    }
}

/// Converts a CPT spec into keyed rows, checking each row's shape.
fn build_rows(
    name: &str,
    domain: &[Value],
    parents: &[String],
    parent_domains: &[&[Value]],
    cpt: CptSpec,
) -> Result<FxHashMap<ParentKey, Distribution>, BayesError> {
    let raw: Vec<(Vec<Value>, Vec<f64>)> = match cpt {
        CptSpec::Table(rows) => rows,
        CptSpec::Boolean(rows) => {
            if domain != boolean_domain().as_slice() {
                return Err(BayesError::MalformedCpt {
                    variable: name.to_string(),
                    combination: ParentKey::empty().to_string(),
                    reason: "boolean rows require the domain [true, false]".into(),
                });
            }
            rows.into_iter()
                .map(|(key, p)| {
                    if !(0.0..=1.0).contains(&p) {
                        return Err(BayesError::MalformedCpt {
                            variable: name.to_string(),
                            combination: ParentKey::from(key).to_string(),
                            reason: format!("P(true) = {} is outside [0, 1]", p),
                        });
                    }
                    Ok((key, vec![p, 1.0 - p]))
                })
                .collect::<Result<_, _>>()?
        }
    };

    let mut rows = FxHashMap::default();
    for (key, probabilities) in raw {
        let key = ParentKey::from(key);
        let malformed = |reason: String| BayesError::MalformedCpt {
            variable: name.to_string(),
            combination: key.to_string(),
            reason,
        };

        if key.len() != parents.len() {
            return Err(malformed(format!(
                "key has {} values but the variable has {} parents",
                key.len(),
                parents.len()
            )));
        }
        for ((value, parent), parent_domain) in key.values().iter().zip(parents).zip(parent_domains) {
            if !parent_domain.contains(value) {
                return Err(malformed(format!(
                    "value '{}' is not in the domain of parent '{}'",
                    value, parent
                )));
            }
        }
        if probabilities.len() != domain.len() {
            return Err(malformed(format!(
                "row has {} probabilities but the domain has {} values",
                probabilities.len(),
                domain.len()
            )));
        }
        if let Some(p) = probabilities.iter().find(|p| !p.is_finite() || **p < 0.0) {
            return Err(malformed(format!("probability {} is not a finite non-negative number", p)));
        }
        if rows.contains_key(&key) {
            return Err(malformed("combination is given more than once".into()));
        }
        let row = Distribution::from_domain(domain, &probabilities);
        rows.insert(key, row);
    }
    Ok(rows)
}

/// Cartesian product of parent domains, first parent varying slowest.
fn parent_combinations(domains: &[&[Value]]) -> Vec<ParentKey> {
    let mut combos = vec![ParentKey::empty()];
    for domain in domains {
        combos = combos
            .into_iter()
            .flat_map(|prefix| {
                domain.iter().map(move |v| {
                    let mut next = prefix.clone();
                    next.0.push(v.clone());
                    next
                })
            })
            .collect();
    }
    combos
}
