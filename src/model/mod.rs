//! Pipeline model.
//!
//! This module provides:
//! - Component instances and per-signal pipelines
//! - The `PipelineSet` holding all three signals
//! - Tolerant loading of persisted and template models
//! - An editing session that tracks the selected component

mod session;

pub use session::{EditorSession, FieldView, Selection};

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::error::ModelError;
use crate::registry::{Category, ComponentRegistry};
use crate::settings::{kind_name, SettingsMap, SettingsValue};

/// A telemetry signal, each with its own pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Traces,
    Metrics,
    Logs,
}

impl Signal {
    /// Returns all signals in configuration order.
    pub fn all() -> [Signal; 3] {
        [Signal::Traces, Signal::Metrics, Signal::Logs]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Traces => "traces",
            Signal::Metrics => "metrics",
            Signal::Logs => "logs",
        }
    }

    fn position(&self) -> usize {
        match self {
            Signal::Traces => 0,
            Signal::Metrics => 1,
            Signal::Logs => 2,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Signal {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "traces" => Ok(Signal::Traces),
            "metrics" => Ok(Signal::Metrics),
            "logs" => Ok(Signal::Logs),
            _ => Err(ModelError::UnknownSignal(s.to_string())),
        }
    }
}

/// A configured occurrence of a component kind inside a pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentInstance {
    /// Component type id, e.g. `otlp`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Instance id, unique among same-category siblings, e.g. `otlp/2`.
    pub id: String,
    /// Settings tree. Always a map.
    pub settings: SettingsValue,
}

impl ComponentInstance {
    pub fn new(kind: impl Into<String>, id: impl Into<String>, settings: SettingsMap) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
            settings: SettingsValue::Object(settings),
        }
    }

    /// Build an instance from loosely shaped data.
    ///
    /// A missing id falls back to the type and vice versa; settings that are
    /// not a map become `{}`. Returns `None` for non-maps and for entries
    /// carrying neither a type nor an id.
    fn from_value(value: &SettingsValue) -> Option<Self> {
        let map = value.as_object()?;
        let text = |key: &str| map.get(key).and_then(SettingsValue::as_str).filter(|s| !s.is_empty());

        let kind = text("type").or_else(|| text("id"))?;
        let id = text("id").unwrap_or(kind);
        let settings = match map.get("settings") {
            Some(SettingsValue::Object(settings)) => settings.clone(),
            _ => SettingsMap::new(),
        };

        Some(Self::new(kind, id, settings))
    }

    /// Position of this instance's id in its type's id sequence: `otlp` is 1,
    /// `otlp/3` is 3. Custom ids have no ordinal.
    fn ordinal(&self) -> Option<u32> {
        if self.id == self.kind {
            return Some(1);
        }
        self.id
            .strip_prefix(self.kind.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .and_then(|n| n.parse().ok())
    }
}

/// Id for the `ordinal`-th instance of `type_id`.
fn ordinal_id(type_id: &str, ordinal: u32) -> String {
    if ordinal == 1 {
        type_id.to_string()
    } else {
        format!("{type_id}/{ordinal}")
    }
}

/// The ordered component lists of one signal.
#[derive(Debug, Clone, Serialize)]
pub struct Pipeline {
    #[serde(skip)]
    signal: Signal,
    receivers: Vec<ComponentInstance>,
    processors: Vec<ComponentInstance>,
    exporters: Vec<ComponentInstance>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    connectors: Vec<ComponentInstance>,
    /// Highest id ordinal issued or seen per (category, type).
    #[serde(skip)]
    counters: HashMap<(Category, String), u32>,
}

impl PartialEq for Pipeline {
    fn eq(&self, other: &Self) -> bool {
        self.signal == other.signal
            && self.receivers == other.receivers
            && self.processors == other.processors
            && self.exporters == other.exporters
            && self.connectors == other.connectors
    }
}

impl Pipeline {
    pub fn new(signal: Signal) -> Self {
        Self {
            signal,
            receivers: Vec::new(),
            processors: Vec::new(),
            exporters: Vec::new(),
            connectors: Vec::new(),
            counters: HashMap::new(),
        }
    }

    pub fn signal(&self) -> Signal {
        self.signal
    }

    /// The instances of one category, in order.
    pub fn components(&self, category: Category) -> &[ComponentInstance] {
        match category {
            Category::Receiver => &self.receivers,
            Category::Processor => &self.processors,
            Category::Exporter => &self.exporters,
            Category::Connector => &self.connectors,
        }
    }

    fn list_mut(&mut self, category: Category) -> &mut Vec<ComponentInstance> {
        match category {
            Category::Receiver => &mut self.receivers,
            Category::Processor => &mut self.processors,
            Category::Exporter => &mut self.exporters,
            Category::Connector => &mut self.connectors,
        }
    }

    pub fn get(&self, category: Category, index: usize) -> Option<&ComponentInstance> {
        self.components(category).get(index)
    }

    pub fn get_mut(&mut self, category: Category, index: usize) -> Option<&mut ComponentInstance> {
        self.list_mut(category).get_mut(index)
    }

    /// Number of receivers, processors and exporters. Connectors are not
    /// counted: they do not make a pipeline on their own.
    pub fn component_count(&self) -> usize {
        self.receivers.len() + self.processors.len() + self.exporters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.component_count() == 0
    }

    /// Returns true if any instance of `category` has type `type_id`.
    pub fn contains(&self, category: Category, type_id: &str) -> bool {
        self.components(category).iter().any(|c| c.kind == type_id)
    }

    /// Append a new instance of `type_id`, starting from a deep copy of the
    /// registry defaults. Unknown kinds start with empty settings.
    ///
    /// The first instance of a type takes the type as its id, later ones
    /// `type/2`, `type/3` and so on. Ordinals are never reissued, even after
    /// the instance holding one is removed, unless loaded data already used
    /// the largest one; then the lowest free ordinal is taken.
    pub fn add_component(
        &mut self,
        registry: &ComponentRegistry,
        category: Category,
        type_id: &str,
    ) -> &ComponentInstance {
        let settings = match registry.lookup(category, type_id) {
            Some(kind) => kind.defaults.as_object().cloned().unwrap_or_default(),
            None => {
                warn!(%category, type_id, "Adding component of unknown kind with empty settings");
                SettingsMap::new()
            }
        };

        let id = self.next_id(category, type_id);
        let list = self.list_mut(category);
        list.push(ComponentInstance::new(type_id, id, settings));
        &list[list.len() - 1]
    }

    fn next_id(&mut self, category: Category, type_id: &str) -> String {
        let taken = match category {
            Category::Receiver => &self.receivers,
            Category::Processor => &self.processors,
            Category::Exporter => &self.exporters,
            Category::Connector => &self.connectors,
        };
        let counter = self
            .counters
            .entry((category, type_id.to_string()))
            .or_insert(0);

        while let Some(next) = counter.checked_add(1) {
            *counter = next;
            let id = ordinal_id(type_id, next);
            if !taken.iter().any(|c| c.id == id) {
                return id;
            }
        }

        // Counter exhausted by loaded data: reuse the lowest free ordinal.
        warn!(%category, type_id, "Id counter exhausted; reusing a free ordinal");
        (1..=u32::MAX)
            .map(|ordinal| ordinal_id(type_id, ordinal))
            .find(|id| !taken.iter().any(|c| &c.id == id))
            .unwrap_or_else(|| format!("{type_id}/{}", taken.len() + 1))
    }

    /// Append an already built instance, e.g. from persisted data.
    pub fn push_instance(&mut self, category: Category, instance: ComponentInstance) {
        self.observe(category, &instance);
        self.list_mut(category).push(instance);
    }

    fn observe(&mut self, category: Category, instance: &ComponentInstance) {
        if let Some(ordinal) = instance.ordinal() {
            let counter = self
                .counters
                .entry((category, instance.kind.clone()))
                .or_insert(0);
            *counter = (*counter).max(ordinal);
        }
    }

    /// Replace the instances of one category. Counters only ever grow.
    fn replace(&mut self, category: Category, instances: Vec<ComponentInstance>) {
        for instance in &instances {
            self.observe(category, instance);
        }
        *self.list_mut(category) = instances;
    }

    /// Remove and return the instance at `index`.
    ///
    /// # Errors
    /// Returns `ComponentNotFound` if `index` is out of range.
    pub fn remove_component(
        &mut self,
        category: Category,
        index: usize,
    ) -> Result<ComponentInstance, ModelError> {
        let signal = self.signal;
        let list = self.list_mut(category);
        if index >= list.len() {
            return Err(ModelError::ComponentNotFound {
                signal,
                category,
                index,
            });
        }
        Ok(list.remove(index))
    }
}

/// Distinct component types per pipeline role, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComponentNames {
    pub receivers: Vec<String>,
    pub processors: Vec<String>,
    pub exporters: Vec<String>,
}

/// The pipelines of all three signals. Every signal is always present.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSet {
    pipelines: [Pipeline; 3],
}

impl Default for PipelineSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl PipelineSet {
    /// Three empty pipelines.
    pub fn empty() -> Self {
        Self {
            pipelines: Signal::all().map(Pipeline::new),
        }
    }

    pub fn pipeline(&self, signal: Signal) -> &Pipeline {
        &self.pipelines[signal.position()]
    }

    pub fn pipeline_mut(&mut self, signal: Signal) -> &mut Pipeline {
        &mut self.pipelines[signal.position()]
    }

    /// Iterate pipelines in signal order.
    pub fn iter(&self) -> impl Iterator<Item = &Pipeline> {
        self.pipelines.iter()
    }

    /// Returns true if no signal has any receiver, processor or exporter.
    pub fn is_empty(&self) -> bool {
        self.pipelines.iter().all(Pipeline::is_empty)
    }

    /// Build a model from a parsed `{ "pipelines": { ... } }` value.
    ///
    /// Null, a missing `pipelines` key, and unknown signals are tolerated.
    ///
    /// # Errors
    /// Returns `InvalidShape` if the root or `pipelines` is not a map, or if
    /// a category of a known signal is not a list.
    pub fn from_value(value: &SettingsValue) -> Result<Self, ModelError> {
        let mut set = Self::empty();
        set.load_template(value)?;
        Ok(set)
    }

    /// Load persisted model text. Malformed or blank text yields the empty
    /// model; nothing is raised to the caller.
    pub fn from_snapshot(text: &str) -> Self {
        if text.trim().is_empty() {
            return Self::empty();
        }

        let parsed = serde_json::from_str::<SettingsValue>(text)
            .map_err(ModelError::from)
            .and_then(|value| Self::from_value(&value));

        match parsed {
            Ok(set) => set,
            Err(err) => {
                warn!(error = %err, "Discarding malformed pipeline snapshot");
                Self::empty()
            }
        }
    }

    /// Overlay a template onto this model.
    ///
    /// Each category list named in the template replaces the corresponding
    /// list with a copy; signals and categories the template does not name
    /// are left untouched. Nothing is modified when the template is invalid.
    ///
    /// # Errors
    /// Same shape errors as [`PipelineSet::from_value`].
    pub fn load_template(&mut self, template: &SettingsValue) -> Result<(), ModelError> {
        for (signal, category, instances) in parse_template(template)? {
            self.pipeline_mut(signal).replace(category, instances);
        }
        Ok(())
    }

    /// One-line description such as `2 receivers → 1 processor → 1 exporter`,
    /// counting distinct component types across all signals.
    pub fn summary(&self) -> String {
        let names = self.component_names();
        let roles = [
            (names.receivers.len(), Category::Receiver),
            (names.processors.len(), Category::Processor),
            (names.exporters.len(), Category::Exporter),
        ];

        roles
            .iter()
            .filter(|(count, _)| *count > 0)
            .map(|(count, category)| {
                let plural = if *count == 1 { "" } else { "s" };
                format!("{} {}{}", count, category.singular(), plural)
            })
            .collect::<Vec<_>>()
            .join(" → ")
    }

    /// Distinct component types per role across all signals.
    pub fn component_names(&self) -> ComponentNames {
        let distinct = |category: Category| {
            let mut seen = HashSet::new();
            self.pipelines
                .iter()
                .flat_map(|p| p.components(category))
                .filter(|c| seen.insert(c.kind.as_str()))
                .map(|c| c.kind.clone())
                .collect::<Vec<_>>()
        };

        ComponentNames {
            receivers: distinct(Category::Receiver),
            processors: distinct(Category::Processor),
            exporters: distinct(Category::Exporter),
        }
    }
}

type ParsedList = (Signal, Category, Vec<ComponentInstance>);

fn parse_template(template: &SettingsValue) -> Result<Vec<ParsedList>, ModelError> {
    let root = match template {
        SettingsValue::Null => return Ok(Vec::new()),
        SettingsValue::Object(root) => root,
        other => {
            return Err(ModelError::InvalidShape(format!(
                "model must be a map, found {}",
                kind_name(other)
            )))
        }
    };

    let pipelines = match root.get("pipelines") {
        None | Some(SettingsValue::Null) => return Ok(Vec::new()),
        Some(SettingsValue::Object(pipelines)) => pipelines,
        Some(other) => {
            return Err(ModelError::InvalidShape(format!(
                "pipelines must be a map, found {}",
                kind_name(other)
            )))
        }
    };

    let mut parsed = Vec::new();
    for (name, pipeline) in pipelines {
        let Ok(signal) = name.parse::<Signal>() else {
            warn!(signal = %name, "Ignoring pipeline for unknown signal");
            continue;
        };
        let Some(pipeline) = pipeline.as_object() else {
            warn!(%signal, "Ignoring pipeline that is not a map");
            continue;
        };

        for category in Category::all() {
            let instances = match pipeline.get(category.section_name()) {
                None | Some(SettingsValue::Null) => continue,
                Some(SettingsValue::Array(items)) => items
                    .iter()
                    .filter_map(ComponentInstance::from_value)
                    .collect(),
                Some(other) => {
                    return Err(ModelError::InvalidShape(format!(
                        "{signal}.{category} must be a list, found {}",
                        kind_name(other)
                    )))
                }
            };
            parsed.push((signal, category, instances));
        }
    }

    Ok(parsed)
}

impl Serialize for PipelineSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct BySignal<'a>(&'a [Pipeline; 3]);

        impl Serialize for BySignal<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.0.len()))?;
                for pipeline in self.0 {
                    map.serialize_entry(pipeline.signal.as_str(), pipeline)?;
                }
                map.end()
            }
        }

        let mut root = serializer.serialize_map(Some(1))?;
        root.serialize_entry("pipelines", &BySignal(&self.pipelines))?;
        root.end()
    }
}

impl<'de> Deserialize<'de> for PipelineSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = SettingsValue::deserialize(deserializer)?;
        Self::from_value(&value).map_err(D::Error::custom)
    }
}
