//! pipeline-forge: OpenTelemetry Collector pipeline builder.
//!
//! This library models collector pipelines per signal, builds component
//! instances from a registry of defaults, and renders the model as
//! deterministic collector configuration YAML.

// Core modules
pub mod cli;
pub mod config;
pub mod deploy;
pub mod endpoint;
pub mod error;
pub mod instrument;
pub mod lint;
pub mod model;
pub mod registry;
pub mod render;
pub mod server;
pub mod settings;

// Re-export commonly used types
pub use error::{EndpointError, ModelError, PathError, RegistryError};
pub use model::{ComponentInstance, Pipeline, PipelineSet, Signal};
pub use registry::{Category, ComponentRegistry};
