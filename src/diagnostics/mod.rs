//! # Lung-disease diagnostics
//!
//! Adapter between human-facing observations and the inference engine, built
//! around the classic "Asia" chest-clinic network.
//!
//! - **asia_network**: the reference network (visit to Asia, smoking, TB,
//!   lung cancer, bronchitis, a deterministic TB-or-cancer node, X-ray, dyspnea)
//! - **PatientObservations**: tri-state inputs such as `Yes` / `No` / `NA`
//! - **Diagnostics**: picks the most likely of the three diseases
//!
//! Unknown (`NA`) inputs are left out of the evidence entirely.

use std::fmt;

use crate::engine::enumeration::InferenceEngine;
use crate::engine::errors::BayesError;
use crate::engine::evidence::Evidence;
use crate::engine::network::{NetworkModel, NodeSpec};

/// Builds the Asia network.
pub fn asia_network() -> Result<NetworkModel, BayesError> {
    NetworkModel::construct(vec![
        NodeSpec::boolean_prior("Asia", 0.01),
        NodeSpec::boolean_prior("Smoking", 0.5),
        NodeSpec::boolean("TB", &["Asia"], vec![(vec![true], 0.05), (vec![false], 0.01)]),
        NodeSpec::boolean("Cancer", &["Smoking"], vec![(vec![true], 0.1), (vec![false], 0.01)]),
        NodeSpec::boolean("Bronchitis", &["Smoking"], vec![(vec![true], 0.6), (vec![false], 0.3)]),
        // deterministic OR
        NodeSpec::boolean(
            "TBorC",
            &["TB", "Cancer"],
            vec![
                (vec![true, true], 1.0),
                (vec![true, false], 1.0),
                (vec![false, true], 1.0),
                (vec![false, false], 0.0),
            ],
        ),
        NodeSpec::boolean("Xray", &["TBorC"], vec![(vec![true], 0.99), (vec![false], 0.05)]),
        NodeSpec::boolean(
            "Dyspnea",
            &["TBorC", "Bronchitis"],
            vec![
                (vec![true, true], 0.9),
                (vec![true, false], 0.7),
                (vec![false, true], 0.8),
                (vec![false, false], 0.1),
            ],
        ),
    ])
}

/// The diseases the diagnosis chooses between, in tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Disease {
    Tb,
    Cancer,
    Bronchitis,
}

impl Disease {
    pub const ALL: [Disease; 3] = [Disease::Tb, Disease::Cancer, Disease::Bronchitis];

    /// Network variable holding this disease.
    pub fn variable(self) -> &'static str {
        match self {
            Disease::Tb => "TB",
            Disease::Cancer => "Cancer",
            Disease::Bronchitis => "Bronchitis",
        }
    }
}

impl fmt::Display for Disease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.variable())
    }
}

/// An observable input and the words that encode it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    Asia,
    Smoking,
    Xray,
    Dyspnea,
}

impl Observation {
    pub fn variable(self) -> &'static str {
        match self {
            Observation::Asia => "Asia",
            Observation::Smoking => "Smoking",
            Observation::Xray => "Xray",
            Observation::Dyspnea => "Dyspnea",
        }
    }

    /// Words meaning `true` and `false`, lower-case.
    pub fn words(self) -> (&'static str, &'static str) {
        match self {
            Observation::Asia | Observation::Smoking => ("yes", "no"),
            Observation::Xray => ("abnormal", "normal"),
            Observation::Dyspnea => ("present", "absent"),
        }
    }

    /// Parses a tri-state input. Empty and `NA` (any case) mean unobserved.
    pub fn parse(self, input: &str) -> Result<Option<bool>, BayesError> {
        let normalized = input.trim().to_lowercase();
        let (positive, negative) = self.words();
        match normalized.as_str() {
            "" | "na" => Ok(None),
            s if s == positive => Ok(Some(true)),
            s if s == negative => Ok(Some(false)),
            _ => Err(BayesError::InvalidObservation {
                field: self.variable().to_string(),
                input: input.to_string(),
                expected: format!("{}, {}, or NA", capitalize(positive), capitalize(negative)),
            }),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Parsed patient inputs; `None` means not observed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatientObservations {
    pub asia: Option<bool>,
    pub smoking: Option<bool>,
    pub xray: Option<bool>,
    pub dyspnea: Option<bool>,
}

impl PatientObservations {
    /// Parses the four human-facing inputs.
    pub fn parse(asia: &str, smoking: &str, xray: &str, dyspnea: &str) -> Result<Self, BayesError> {
        Ok(Self {
            asia: Observation::Asia.parse(asia)?,
            smoking: Observation::Smoking.parse(smoking)?,
            xray: Observation::Xray.parse(xray)?,
            dyspnea: Observation::Dyspnea.parse(dyspnea)?,
        })
    }

    /// Evidence containing only the observed inputs.
    pub fn to_evidence(&self) -> Evidence {
        [
            (Observation::Asia, self.asia),
            (Observation::Smoking, self.smoking),
            (Observation::Xray, self.xray),
            (Observation::Dyspnea, self.dyspnea),
        ]
        .into_iter()
        .filter_map(|(obs, value)| value.map(|v| (obs.variable(), v)))
        .collect()
    }
}

/// Result of a diagnosis.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Diagnosis {
    /// The most likely disease
    pub disease: Disease,
    /// Its posterior probability of being present
    pub probability: f64,
    /// `P(disease present | evidence)` for every disease, in [`Disease::ALL`] order
    pub posteriors: Vec<(Disease, f64)>,
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} with chance {:.2}%", self.disease, self.probability * 100.0)
    }
}

/// Diagnoses lung diseases from patient observations.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    model: NetworkModel,
    engine: InferenceEngine,
}

impl Diagnostics {
    /// Uses the Asia network and the default engine.
    pub fn new() -> Result<Self, BayesError> {
        Ok(Self::with_engine(asia_network()?, InferenceEngine::new()))
    }

    /// Uses a caller-supplied network, which must contain the Asia variables.
    pub fn with_engine(model: NetworkModel, engine: InferenceEngine) -> Self {
        Self { model, engine }
    }

    pub fn model(&self) -> &NetworkModel {
        &self.model
    }

    /// Parses the four inputs and diagnoses.
    pub fn diagnose(
        &self,
        asia: &str,
        smoking: &str,
        xray: &str,
        dyspnea: &str,
    ) -> Result<Diagnosis, BayesError> {
        self.diagnose_observations(&PatientObservations::parse(asia, smoking, xray, dyspnea)?)
    }

    /// Ranks the diseases by posterior probability given the observations.
    ///
    /// Ties go to the first disease in [`Disease::ALL`] order.
    pub fn diagnose_observations(
        &self,
        observations: &PatientObservations,
    ) -> Result<Diagnosis, BayesError> {
        let evidence = observations.to_evidence();
        let queries = Disease::ALL.map(Disease::variable);
        let posteriors: Vec<(Disease, f64)> = self
            .engine
            .ask_many(&queries, &evidence, &self.model)?
            .into_iter()
            .zip(Disease::ALL)
            .map(|((_, dist), disease)| (disease, dist.probability(true)))
            .collect();

        let (disease, probability) = posteriors
            .iter()
            .copied()
            .fold(None, |best: Option<(Disease, f64)>, (d, p)| match best {
                Some((_, bp)) if p <= bp => best,
                _ => Some((d, p)),
            })
            .ok_or_else(|| BayesError::Internal("no diseases to rank".into()))?;

        #[cfg(feature = "tracing")]
        tracing::debug!(%disease, probability, observed = evidence.len(), "diagnosis");

        Ok(Diagnosis { disease, probability, posteriors })
    }
}
