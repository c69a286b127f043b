//! Error types for pipeline-forge operations.
//!
//! Defines error types for the subsystems that can fail:
//! - Addressed edits into component settings trees
//! - Pipeline model loading and editing
//! - The configuration generation endpoint
//!
//! Rendering itself is infallible and has no error type.

use thiserror::Error;

use crate::model::Signal;
use crate::registry::Category;

/// Errors raised by [`crate::settings::set`] and friends.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("Settings path is empty")]
    EmptyPath,

    #[error("Cannot descend into {found} at segment '{segment}' of '{path}'")]
    NotAContainer {
        path: String,
        segment: String,
        found: &'static str,
    },

    #[error("Segment '{segment}' of '{path}' addresses an array and must be an index")]
    ExpectedIndex { path: String, segment: String },

    #[error("Index {index} in '{path}' is out of range for an array of length {len}")]
    IndexOutOfRange {
        path: String,
        index: usize,
        len: usize,
    },
}

/// Errors that can occur while loading or editing a pipeline model.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("No {category} component at index {index} in the {signal} pipeline")]
    ComponentNotFound {
        signal: Signal,
        category: Category,
        index: usize,
    },

    #[error("No component is selected")]
    NothingSelected,

    #[error("Invalid model shape: {0}")]
    InvalidShape(String),

    #[error("Unknown signal '{0}': expected traces, metrics or logs")]
    UnknownSignal(String),

    #[error("Unknown category '{0}': expected receivers, processors, exporters or connectors")]
    UnknownCategory(String),

    #[error("Invalid number '{0}'")]
    InvalidNumber(String),

    #[error("Settings error: {0}")]
    Path(#[from] PathError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors surfaced by the configuration generation endpoint.
///
/// The `Display` text ends up verbatim in shared output, so messages are
/// short descriptions and never carry parser positions or payload excerpts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
    #[error("request body is not valid JSON")]
    MalformedEnvelope,

    #[error("request body must be a JSON object")]
    EnvelopeNotObject,

    #[error("pipeline_data is not valid JSON")]
    MalformedModelText,

    #[error("pipeline_data is not a valid pipeline model")]
    MalformedModel,

    #[error("request body could not be read")]
    UnreadableBody,
}

/// Errors that can occur during registry construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Component kind '{type_id}' is already registered under {category}")]
    DuplicateKind { category: Category, type_id: String },

    #[error("Default settings for '{0}' must be a map")]
    InvalidDefaults(String),
}
