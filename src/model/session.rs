use serde_json::Number;

use super::{ComponentInstance, PipelineSet, Signal};
use crate::error::ModelError;
use crate::registry::{Category, ComponentKind, ComponentRegistry, FieldDescriptor, InputKind};
use crate::render;
use crate::settings::{self, SettingsValue};

/// The component currently open for editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub category: Category,
    pub index: usize,
}

/// An editable field together with the value currently in effect.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldView<'a> {
    pub field: &'a FieldDescriptor,
    /// The instance's value at the field path, or the field default.
    pub value: SettingsValue,
}

impl FieldView<'_> {
    /// Whether a toggle renders as switched on. A present stanza counts.
    pub fn is_enabled(&self) -> bool {
        match &self.value {
            SettingsValue::Bool(on) => *on,
            SettingsValue::String(s) => s == "true",
            SettingsValue::Object(_) => true,
            _ => false,
        }
    }
}

/// Interactive editing state over a [`PipelineSet`].
///
/// Edits apply to the pipeline of the current signal. After every mutation
/// [`EditorSession::render`] yields the up-to-date configuration.
#[derive(Debug)]
pub struct EditorSession<'r> {
    registry: &'r ComponentRegistry,
    pipelines: PipelineSet,
    signal: Signal,
    selection: Option<Selection>,
}

impl<'r> EditorSession<'r> {
    /// Start a session with an empty model on the traces pipeline.
    pub fn new(registry: &'r ComponentRegistry) -> Self {
        Self::with_pipelines(registry, PipelineSet::empty())
    }

    pub fn with_pipelines(registry: &'r ComponentRegistry, pipelines: PipelineSet) -> Self {
        Self {
            registry,
            pipelines,
            signal: Signal::Traces,
            selection: None,
        }
    }

    pub fn pipelines(&self) -> &PipelineSet {
        &self.pipelines
    }

    pub fn into_pipelines(self) -> PipelineSet {
        self.pipelines
    }

    pub fn signal(&self) -> Signal {
        self.signal
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Change the pipeline being edited. Clears the selection.
    pub fn switch_signal(&mut self, signal: Signal) {
        self.signal = signal;
        self.selection = None;
    }

    /// Add a component of `type_id` to the current pipeline.
    pub fn add(&mut self, category: Category, type_id: &str) -> &ComponentInstance {
        self.pipelines
            .pipeline_mut(self.signal)
            .add_component(self.registry, category, type_id)
    }

    /// Open the component at `index` for editing.
    pub fn select(&mut self, category: Category, index: usize) -> Result<&ComponentInstance, ModelError> {
        let signal = self.signal;
        if self.pipelines.pipeline(signal).get(category, index).is_none() {
            return Err(ModelError::ComponentNotFound {
                signal,
                category,
                index,
            });
        }
        self.selection = Some(Selection { category, index });
        self.selected()
    }

    /// Remove a component from the current pipeline.
    ///
    /// Removing the selected component clears the selection; removing an
    /// earlier sibling keeps the selection on the same component.
    pub fn remove(&mut self, category: Category, index: usize) -> Result<ComponentInstance, ModelError> {
        let removed = self
            .pipelines
            .pipeline_mut(self.signal)
            .remove_component(category, index)?;

        self.selection = match self.selection {
            Some(sel) if sel.category == category && sel.index == index => None,
            Some(sel) if sel.category == category && sel.index > index => Some(Selection {
                category,
                index: sel.index - 1,
            }),
            other => other,
        };
        Ok(removed)
    }

    /// The selected component.
    pub fn selected(&self) -> Result<&ComponentInstance, ModelError> {
        let sel = self.selection.ok_or(ModelError::NothingSelected)?;
        self.pipelines
            .pipeline(self.signal)
            .get(sel.category, sel.index)
            .ok_or(ModelError::NothingSelected)
    }

    fn selected_mut(&mut self) -> Result<(&mut ComponentInstance, Option<&'r ComponentKind>), ModelError> {
        let sel = self.selection.ok_or(ModelError::NothingSelected)?;
        let registry = self.registry;
        let instance = self
            .pipelines
            .pipeline_mut(self.signal)
            .get_mut(sel.category, sel.index)
            .ok_or(ModelError::NothingSelected)?;
        let kind = registry.lookup(sel.category, &instance.kind);
        Ok((instance, kind))
    }

    /// Registry metadata for the selected component, if its kind is known.
    pub fn selected_kind(&self) -> Option<&'r ComponentKind> {
        let sel = self.selection?;
        let instance = self.selected().ok()?;
        self.registry.lookup(sel.category, &instance.kind)
    }

    /// The editable fields of the selected component with their current
    /// values. Empty for unknown kinds.
    pub fn selected_fields(&self) -> Result<Vec<FieldView<'r>>, ModelError> {
        let instance = self.selected()?;
        let Some(kind) = self.selected_kind() else {
            return Ok(Vec::new());
        };

        Ok(kind
            .fields
            .iter()
            .map(|field| FieldView {
                field,
                value: settings::get(&instance.settings, &field.key)
                    .cloned()
                    .unwrap_or_else(|| field.default.clone()),
            })
            .collect())
    }

    /// Store field input on the selected component.
    ///
    /// Input for number fields is parsed into a number, except that empty
    /// input is kept as the empty string so the cleaner drops it. Every
    /// other field, and any path without a descriptor, stores the text.
    pub fn update_field(&mut self, path: &str, input: &str) -> Result<(), ModelError> {
        let (instance, kind) = self.selected_mut()?;
        let input_kind = kind.and_then(|k| k.field(path)).map(|f| f.input);

        let value = match input_kind {
            Some(InputKind::Number) if !input.is_empty() => parse_number(input)?,
            _ => SettingsValue::String(input.to_string()),
        };

        settings::set(&mut instance.settings, path, value)?;
        Ok(())
    }

    /// Store an already typed value on the selected component.
    pub fn set_value(&mut self, path: &str, value: SettingsValue) -> Result<(), ModelError> {
        let (instance, _) = self.selected_mut()?;
        settings::set(&mut instance.settings, path, value)?;
        Ok(())
    }

    /// Flip a toggle on the selected component.
    ///
    /// Paths whose registry default is a map are stanzas: switching on
    /// stores `{}` and switching off removes the key. Other paths store a
    /// boolean.
    pub fn update_toggle(&mut self, path: &str, on: bool) -> Result<(), ModelError> {
        let (instance, kind) = self.selected_mut()?;

        if kind.is_some_and(|k| k.is_stanza(path)) {
            if on {
                settings::set(&mut instance.settings, path, SettingsValue::Object(Default::default()))?;
            } else {
                settings::remove(&mut instance.settings, path);
            }
        } else {
            settings::set(&mut instance.settings, path, SettingsValue::Bool(on))?;
        }
        Ok(())
    }

    /// Render the current model.
    pub fn render(&self) -> String {
        render::render(&self.pipelines)
    }
}

fn parse_number(input: &str) -> Result<SettingsValue, ModelError> {
    let trimmed = input.trim();
    if let Ok(int) = trimmed.parse::<i64>() {
        return Ok(SettingsValue::from(int));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(SettingsValue::Number)
        .ok_or_else(|| ModelError::InvalidNumber(input.to_string()))
}
