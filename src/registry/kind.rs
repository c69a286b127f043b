use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;
use crate::settings::{self, SettingsValue};

/// The role a component plays in a collector pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "receivers", alias = "receiver")]
    Receiver,
    #[serde(rename = "processors", alias = "processor")]
    Processor,
    #[serde(rename = "exporters", alias = "exporter")]
    Exporter,
    #[serde(rename = "connectors", alias = "connector")]
    Connector,
}

impl Category {
    /// Returns all categories in configuration section order.
    pub fn all() -> [Category; 4] {
        [
            Category::Receiver,
            Category::Processor,
            Category::Exporter,
            Category::Connector,
        ]
    }

    /// Returns the categories that appear in `service.pipelines`.
    pub fn pipeline_roles() -> [Category; 3] {
        [Category::Receiver, Category::Processor, Category::Exporter]
    }

    /// Returns the top-level configuration section name, e.g. `receivers`.
    pub fn section_name(&self) -> &'static str {
        match self {
            Category::Receiver => "receivers",
            Category::Processor => "processors",
            Category::Exporter => "exporters",
            Category::Connector => "connectors",
        }
    }

    /// Returns the singular noun, e.g. `receiver`.
    pub fn singular(&self) -> &'static str {
        match self {
            Category::Receiver => "receiver",
            Category::Processor => "processor",
            Category::Exporter => "exporter",
            Category::Connector => "connector",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.section_name())
    }
}

impl FromStr for Category {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "receiver" | "receivers" => Ok(Category::Receiver),
            "processor" | "processors" => Ok(Category::Processor),
            "exporter" | "exporters" => Ok(Category::Exporter),
            "connector" | "connectors" => Ok(Category::Connector),
            _ => Err(ModelError::UnknownCategory(s.to_string())),
        }
    }
}

/// How an editable field takes user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Text,
    Number,
    Select,
    Toggle,
}

/// An editable field of a component kind, addressed by a settings path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Dot-separated settings path, e.g. `protocols.grpc.endpoint`.
    pub key: String,
    pub label: String,
    pub input: InputKind,
    /// Value shown when the instance's settings have nothing at `key`.
    pub default: SettingsValue,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl FieldDescriptor {
    fn new(key: &str, label: &str, input: InputKind, default: SettingsValue) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            input,
            default,
            options: Vec::new(),
        }
    }

    pub fn text(key: &str, label: &str, default: &str) -> Self {
        Self::new(key, label, InputKind::Text, SettingsValue::from(default))
    }

    pub fn number(key: &str, label: &str, default: i64) -> Self {
        Self::new(key, label, InputKind::Number, SettingsValue::from(default))
    }

    pub fn select(key: &str, label: &str, default: &str, options: &[&str]) -> Self {
        let mut field = Self::new(key, label, InputKind::Select, SettingsValue::from(default));
        field.options = options.iter().map(|o| o.to_string()).collect();
        field
    }

    pub fn toggle(key: &str, label: &str, default: bool) -> Self {
        Self::new(key, label, InputKind::Toggle, SettingsValue::from(default))
    }
}

/// A registry entry describing one component type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentKind {
    pub category: Category,
    #[serde(rename = "type")]
    pub type_id: String,
    pub label: String,
    /// Settings a new instance starts from. Always a map.
    pub defaults: SettingsValue,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl ComponentKind {
    pub fn new(category: Category, type_id: &str, label: &str, defaults: SettingsValue) -> Self {
        Self {
            category,
            type_id: type_id.to_string(),
            label: label.to_string(),
            defaults,
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Look up the field descriptor for a settings path.
    pub fn field(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Returns true when the default settings hold a map at `path`.
    ///
    /// Toggling such a path switches a whole stanza on (`{}`) or off
    /// (key removed) instead of storing a boolean.
    pub fn is_stanza(&self, path: &str) -> bool {
        settings::get(&self.defaults, path).is_some_and(SettingsValue::is_object)
    }
}
