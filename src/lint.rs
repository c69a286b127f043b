//! Pipeline advisories.
//!
//! Flags wiring mistakes and risky choices in a model before it is
//! deployed. Advisories are informational: nothing here blocks rendering.

use serde::Serialize;
use std::fmt;

use crate::model::{Pipeline, PipelineSet, Signal};
use crate::registry::Category;
use crate::settings::SettingsValue;

/// Batch sizes above this need a memory limiter alongside.
const LARGE_BATCH_SIZE: f64 = 16384.0;

/// The batch processor's default `send_batch_size`.
const DEFAULT_BATCH_SIZE: f64 = 8192.0;

/// Severity of an advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvisoryLevel {
    Error,
    Warning,
    Info,
}

impl fmt::Display for AdvisoryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AdvisoryLevel::Error => "error",
            AdvisoryLevel::Warning => "warning",
            AdvisoryLevel::Info => "info",
        };
        f.write_str(name)
    }
}

/// A single finding about the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advisory {
    pub level: AdvisoryLevel,
    /// The pipeline concerned, if the finding is about one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal: Option<Signal>,
    pub message: String,
}

impl Advisory {
    fn new(level: AdvisoryLevel, signal: Option<Signal>, message: impl Into<String>) -> Self {
        Self {
            level,
            signal,
            message: message.into(),
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}

/// Check every pipeline and return advisories in signal order.
pub fn lint(pipelines: &PipelineSet) -> Vec<Advisory> {
    if pipelines.is_empty() {
        return vec![Advisory::new(
            AdvisoryLevel::Warning,
            None,
            "Pipeline has no components",
        )];
    }

    pipelines
        .iter()
        .filter(|p| !p.is_empty())
        .flat_map(lint_pipeline)
        .collect()
}

/// Returns true if any advisory is an error.
pub fn has_errors(advisories: &[Advisory]) -> bool {
    advisories.iter().any(|a| a.level == AdvisoryLevel::Error)
}

fn lint_pipeline(pipeline: &Pipeline) -> Vec<Advisory> {
    let signal = pipeline.signal();
    let title = title_case(signal.as_str());
    let receivers = pipeline.components(Category::Receiver);
    let exporters = pipeline.components(Category::Exporter);
    let has_processor = |type_id: &str| pipeline.contains(Category::Processor, type_id);
    let has_receiver = |type_id: &str| pipeline.contains(Category::Receiver, type_id);

    let mut out = Vec::new();
    let mut push = |level, message: String| out.push(Advisory::new(level, Some(signal), message));

    if receivers.is_empty() {
        push(
            AdvisoryLevel::Error,
            format!("{title}: No receivers - nothing will send data to your collector"),
        );
    }

    if exporters.is_empty() && !receivers.is_empty() {
        push(
            AdvisoryLevel::Error,
            format!("{title}: No exporters - data has nowhere to go"),
        );
    }

    if !has_processor("memory_limiter") {
        push(
            AdvisoryLevel::Warning,
            format!("{title}: No memory_limiter processor - your collector risks OOM under load"),
        );
    }

    if !has_processor("batch") {
        push(
            AdvisoryLevel::Warning,
            format!("{title}: No batch processor - individual sends are inefficient, consider adding one"),
        );
    }

    if pipeline.contains(Category::Exporter, "debug") {
        push(
            AdvisoryLevel::Info,
            format!("{title}: Debug exporter is great for testing - remember to remove in production"),
        );
    }

    let batch = pipeline
        .components(Category::Processor)
        .iter()
        .find(|c| c.kind == "batch");
    if let Some(batch) = batch {
        if !has_processor("memory_limiter") {
            let size = batch_size(batch.settings.get("send_batch_size"));
            if size > LARGE_BATCH_SIZE {
                push(
                    AdvisoryLevel::Warning,
                    format!(
                        "{title}: Large batch_size ({}) without memory_limiter is risky",
                        display_number(size)
                    ),
                );
            }
        }
    }

    if has_receiver("hostmetrics") && signal != Signal::Metrics {
        push(
            AdvisoryLevel::Warning,
            format!("{title}: hostmetrics receiver only emits metrics, but this is a {signal} pipeline"),
        );
    }

    if signal != Signal::Logs {
        let log_receiver = ["filelog", "journald"].into_iter().find(|r| has_receiver(*r));
        if let Some(receiver) = log_receiver {
            push(
                AdvisoryLevel::Warning,
                format!("{title}: {receiver} receiver only emits logs, but this is a {signal} pipeline"),
            );
        }
    }

    out
}

/// Effective batch size. Missing, zero or unparsable values fall back to
/// the processor default.
fn batch_size(value: Option<&SettingsValue>) -> f64 {
    let size = match value {
        Some(SettingsValue::Number(n)) => n.as_f64(),
        Some(SettingsValue::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    size.filter(|s| *s != 0.0).unwrap_or(DEFAULT_BATCH_SIZE)
}

fn display_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
