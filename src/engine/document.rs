//! Network documents.
//!
//! A network specification can be stored as JSON together with version
//! metadata. Loading checks that the document was written by a compatible
//! version of this crate before building the model.

use serde::{Deserialize, Serialize};

use crate::engine::errors::BayesError;
use crate::engine::network::{NetworkModel, NodeSpec};

/// Metadata stored alongside the node specifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Crate version that wrote the document
    pub version: String,
    /// Free-form description of the network
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A serializable network specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkDocument {
    pub metadata: DocumentMetadata,
    /// Node specifications in topological order
    pub nodes: Vec<NodeSpec>,
}

impl NetworkDocument {
    /// Wraps node specifications with metadata for the current crate version.
    pub fn new(nodes: Vec<NodeSpec>, description: Option<String>) -> Self {
        Self {
            metadata: DocumentMetadata {
                version: env!("CARGO_PKG_VERSION").to_string(),
                description,
            },
            nodes,
        }
    }

    /// Captures an existing model as a document.
    pub fn from_model(model: &NetworkModel, description: Option<String>) -> Self {
        Self::new(model.node_specs(), description)
    }

    /// Checks that the document's version series matches this crate's.
    ///
    /// For `0.x` versions the minor number must match; otherwise the major number.
    pub fn validate_compatibility(&self) -> Result<(), BayesError> {
        let current = env!("CARGO_PKG_VERSION");
        if compatibility_series(&self.metadata.version)? != compatibility_series(current)? {
            return Err(BayesError::Config(format!(
                "network document version mismatch: document was written by version {}, current version is {}",
                self.metadata.version, current
            )));
        }
        Ok(())
    }

    /// Validates compatibility and constructs the model.
    pub fn into_model(self) -> Result<NetworkModel, BayesError> {
        self.validate_compatibility()?;
        NetworkModel::construct(self.nodes)
    }
}

fn compatibility_series(version: &str) -> Result<(u64, u64), BayesError> {
    let mut parts = version.split('.').map(str::parse::<u64>);
    match (parts.next(), parts.next()) {
        (Some(Ok(0)), Some(Ok(minor))) => Ok((0, minor)),
        (Some(Ok(major)), Some(Ok(_))) => Ok((major, 0)),
        _ => Err(BayesError::Config(format!("invalid document version '{}'", version))),
    }
}

/// Serializes a document to pretty-printed JSON.
pub fn save_network_json(document: &NetworkDocument) -> Result<String, BayesError> {
    serde_json::to_string_pretty(document)
        .map_err(|e| BayesError::Internal(format!("Failed to serialize network document: {}", e)))
}

/// Parses a document from JSON without building the model.
pub fn load_document_json(json: &str) -> Result<NetworkDocument, BayesError> {
    serde_json::from_str(json)
        .map_err(|e| BayesError::Config(format!("Failed to parse network document: {}", e)))
}

/// Parses a JSON document, checks compatibility, and constructs the model.
pub fn load_network_json(json: &str) -> Result<NetworkModel, BayesError> {
    load_document_json(json)?.into_model()
}
