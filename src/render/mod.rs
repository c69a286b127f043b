//! Deterministic collector configuration rendering.
//!
//! Turns a [`PipelineSet`] into collector YAML text. Rendering is pure: the
//! same model always yields the same bytes, and the model is never touched.
//!
//! Output layout:
//! - One section per non-empty category (`receivers`, `processors`,
//!   `exporters`, `connectors`), each followed by a blank line
//! - A `service.pipelines` block listing ids per signal in model order
//!
//! A component id used in several signals is declared once; the first
//! occurrence supplies its settings.

mod scalar;

pub use scalar::{format_string, format_value};

use std::collections::HashSet;
use tracing::debug;

use crate::model::PipelineSet;
use crate::registry::Category;
use crate::settings::{clean_settings, is_scalar, SettingsMap, SettingsValue};

/// Output for a model without any receiver, processor or exporter.
pub const EMPTY_MODEL_SENTINEL: &str = "# Add components to your pipeline to generate config\n";

/// Declared components of one category, in first-registration order.
struct Section<'a> {
    category: Category,
    entries: Vec<(&'a str, SettingsMap)>,
    seen: HashSet<&'a str>,
}

impl<'a> Section<'a> {
    fn new(category: Category) -> Self {
        Self {
            category,
            entries: Vec::new(),
            seen: HashSet::new(),
        }
    }

    fn register(&mut self, id: &'a str, settings: &SettingsValue) {
        if self.seen.insert(id) {
            self.entries.push((id, clean_settings(settings)));
        }
    }
}

/// Render the collector configuration for `pipelines`.
pub fn render(pipelines: &PipelineSet) -> String {
    if pipelines.is_empty() {
        return EMPTY_MODEL_SENTINEL.to_string();
    }

    let mut sections = Category::all().map(Section::new);
    for pipeline in pipelines.iter() {
        for section in sections.iter_mut() {
            for instance in pipeline.components(section.category) {
                section.register(&instance.id, &instance.settings);
            }
        }
    }

    let mut out = String::new();
    for section in sections.iter().filter(|s| !s.entries.is_empty()) {
        out.push_str(&format!("{}:\n", section.category.section_name()));
        for (id, settings) in &section.entries {
            out.push_str(&format!("  {id}:\n"));
            render_map(&mut out, settings, 4);
        }
        out.push('\n');
    }

    out.push_str("service:\n  pipelines:\n");
    for pipeline in pipelines.iter().filter(|p| !p.is_empty()) {
        out.push_str(&format!("    {}:\n", pipeline.signal()));
        for role in Category::pipeline_roles() {
            let ids: Vec<&str> = pipeline
                .components(role)
                .iter()
                .map(|c| c.id.as_str())
                .collect();
            if !ids.is_empty() {
                out.push_str(&format!("      {}: [{}]\n", role, ids.join(", ")));
            }
        }
    }

    debug!(
        bytes = out.len(),
        components = sections.iter().map(|s| s.entries.len()).sum::<usize>(),
        "Rendered collector configuration"
    );
    out
}

/// Render the entries of `map` as block YAML at `indent` spaces.
///
/// Null values and empty arrays are omitted. Empty nested maps render as a
/// bare `key:` line.
fn render_map(out: &mut String, map: &SettingsMap, indent: usize) {
    let pad = " ".repeat(indent);

    for (key, value) in map {
        match value {
            SettingsValue::Null => {}
            SettingsValue::Array(items) if items.is_empty() => {}
            SettingsValue::Array(items) if items.iter().all(is_scalar) => {
                let parts: Vec<String> = items.iter().map(format_value).collect();
                out.push_str(&format!("{pad}{key}: [{}]\n", parts.join(", ")));
            }
            SettingsValue::Array(items) => {
                out.push_str(&format!("{pad}{key}:\n"));
                for item in items {
                    render_item(out, item, indent);
                }
            }
            SettingsValue::Object(child) => {
                out.push_str(&format!("{pad}{key}:\n"));
                render_map(out, child, indent + 2);
            }
            scalar => {
                out.push_str(&format!("{pad}{key}: {}\n", format_value(scalar)));
            }
        }
    }
}

/// Render one item of a block list whose key sits at `indent`.
///
/// Map items are rendered as a nested map four columns in, then the first
/// line's leading spaces are replaced with the `- ` marker so the remaining
/// keys align under the first.
fn render_item(out: &mut String, item: &SettingsValue, indent: usize) {
    let pad = " ".repeat(indent);

    let SettingsValue::Object(map) = item else {
        out.push_str(&format!("{pad}  - {}\n", format_value(item)));
        return;
    };

    let mut body = String::new();
    render_map(&mut body, map, indent + 4);
    if body.is_empty() {
        out.push_str(&format!("{pad}  - {{}}\n"));
    } else {
        out.push_str(&format!("{pad}  - {}", &body[indent + 4..]));
    }
}
