//! # Discrete values and distributions
//!
//! - **Value**: one element of a variable's finite domain
//! - **Distribution**: probabilities over a domain, kept in declared domain order
//!
//! Distributions appear both as CPT rows and as inference results. Entry order
//! is significant: it is the tie-break order used by [`Distribution::most_likely`].

use std::fmt;

/// Tolerance used when checking that a distribution sums to one.
pub const NORMALIZATION_TOLERANCE: f64 = 1e-6;

/// A discrete value of a random variable.
///
/// Boolean variables use `Bool`; any other finite domain uses `Label`s.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    Bool(bool),
    Label(String),
}

impl Value {
    /// Returns the boolean payload, if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Label(_) => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Label(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Label(s)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Label(s) => f.write_str(s),
        }
    }
}

/// The boolean domain in declared order: `true` first.
pub fn boolean_domain() -> Vec<Value> {
    vec![Value::Bool(true), Value::Bool(false)]
}

/// A probability distribution over a finite, ordered domain.
///
/// Entries are stored in the owning variable's domain order. Intermediate
/// (un-normalized) weights use the same type; call [`Distribution::normalized`]
/// to turn them into probabilities.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Distribution {
    entries: Vec<(Value, f64)>,
}

impl Distribution {
    /// Creates a distribution from `(value, probability)` pairs, keeping their order.
    pub fn new(entries: Vec<(Value, f64)>) -> Self {
        Self { entries }
    }

    /// Pairs a domain with probabilities given in the same order.
    ///
    /// Extra values on either side are ignored; callers validate lengths.
    pub fn from_domain(domain: &[Value], probabilities: &[f64]) -> Self {
        Self {
            entries: domain
                .iter()
                .cloned()
                .zip(probabilities.iter().copied())
                .collect(),
        }
    }

    /// Returns the probability of `value`, or `None` if it is not in the domain.
    pub fn get(&self, value: &Value) -> Option<f64> {
        self.entries
            .iter()
            .find(|(v, _)| v == value)
            .map(|(_, p)| *p)
    }

    /// Returns the probability of `value`, treating values outside the domain as 0.
    pub fn probability(&self, value: impl Into<Value>) -> f64 {
        self.get(&value.into()).unwrap_or(0.0)
    }

    /// Probability stored at a domain position.
    pub(crate) fn at(&self, index: usize) -> Option<f64> {
        self.entries.get(index).map(|(_, p)| *p)
    }

    /// Iterates over `(value, probability)` pairs in domain order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, f64)> + '_ {
        self.entries.iter().map(|(v, p)| (v, *p))
    }

    /// Iterates over the domain values in order.
    pub fn values(&self) -> impl Iterator<Item = &Value> + '_ {
        self.entries.iter().map(|(v, _)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all entries, accumulated in domain order.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, p)| *p).sum()
    }

    /// Whether the entries sum to one within `tolerance`.
    pub fn is_normalized(&self, tolerance: f64) -> bool {
        (self.total() - 1.0).abs() <= tolerance
    }

    /// Divides every entry by the total.
    ///
    /// Returns `None` when the total is not finite or does not exceed `epsilon`.
    pub fn normalized(&self, epsilon: f64) -> Option<Distribution> {
        let total = self.total();
        if !total.is_finite() || total <= epsilon {
            return None;
        }
        Some(Self {
            entries: self
                .entries
                .iter()
                .map(|(v, p)| (v.clone(), p / total))
                .collect(),
        })
    }

    /// The most probable value and its probability.
    ///
    /// Ties resolve to the first maximal value in domain order.
    pub fn most_likely(&self) -> Option<(&Value, f64)> {
        let mut best: Option<(&Value, f64)> = None;
        for (v, p) in &self.entries {
            match best {
                Some((_, bp)) if *p <= bp => {}
                _ => best = Some((v, *p)),
            }
        }
        best
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (v, p)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", v, p)?;
        }
        f.write_str("}")
    }
}

impl<'a> IntoIterator for &'a Distribution {
    type Item = &'a (Value, f64);
    type IntoIter = std::slice::Iter<'a, (Value, f64)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
