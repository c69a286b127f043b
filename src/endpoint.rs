//! Configuration generation endpoint.
//!
//! Accepts a request body of the form `{"pipeline_data": <model>}` where the
//! model is either a JSON object or a JSON string holding the model text,
//! and answers with the rendered configuration.
//!
//! This is the boundary where failures become visible. Any failure turns
//! into a single comment line instead of an error status, so callers must
//! inspect the text they get back.

use serde_json::Value;
use tracing::warn;

use crate::error::EndpointError;
use crate::model::PipelineSet;
use crate::render::{render, EMPTY_MODEL_SENTINEL};

/// Prefix of the line returned when generation fails.
pub const ERROR_PREFIX: &str = "# Error generating YAML: ";

/// Generate configuration text for a request body. Never fails.
pub fn generate_yaml(body: &str) -> String {
    match try_generate(body) {
        Ok(yaml) => yaml,
        Err(err) => {
            warn!(error = %err, "Configuration generation failed");
            error_line(&err)
        }
    }
}

/// The text returned for a failed generation. Carries no trailing newline.
pub fn error_line(err: &EndpointError) -> String {
    format!("{ERROR_PREFIX}{err}")
}

/// Generate configuration text, surfacing failures as typed errors.
///
/// A missing or null `pipeline_data` is the empty model.
pub fn try_generate(body: &str) -> Result<String, EndpointError> {
    let envelope: Value =
        serde_json::from_str(body).map_err(|_| EndpointError::MalformedEnvelope)?;
    let envelope = envelope
        .as_object()
        .ok_or(EndpointError::EnvelopeNotObject)?;

    let model = match envelope.get("pipeline_data") {
        None | Some(Value::Null) => return Ok(EMPTY_MODEL_SENTINEL.to_string()),
        Some(Value::String(text)) => {
            serde_json::from_str::<Value>(text).map_err(|_| EndpointError::MalformedModelText)?
        }
        Some(other) => other.clone(),
    };

    let pipelines = PipelineSet::from_value(&model).map_err(|err| {
        warn!(error = %err, "Rejected pipeline_data");
        EndpointError::MalformedModel
    })?;

    Ok(render(&pipelines))
}
