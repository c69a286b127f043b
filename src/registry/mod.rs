//! Component registry.
//!
//! This module provides:
//! - The component categories and field descriptors used by the editor
//! - A read-only lookup of known component kinds, built once at startup
//! - The built-in catalog of common collector components
//!
//! The registry is advisory metadata. A lookup miss is an ordinary outcome:
//! instances of unknown kinds still load, edit and render normally.

mod catalog;
mod kind;

pub use catalog::builtin_kinds;
pub use kind::{Category, ComponentKind, FieldDescriptor, InputKind};

use std::collections::HashMap;

use tracing::warn;

use crate::error::RegistryError;

/// Read-only catalog of component kinds, keyed by category and type id.
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    /// Kinds in registration order.
    kinds: Vec<ComponentKind>,
    /// Position of each kind in `kinds`.
    index: HashMap<Category, HashMap<String, usize>>,
}

impl ComponentRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in catalog.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for kind in builtin_kinds() {
            if let Err(err) = registry.register(kind) {
                warn!(error = %err, "Skipping built-in component kind");
            }
        }
        registry
    }

    /// Register a component kind.
    ///
    /// # Errors
    /// Returns `DuplicateKind` if the category already holds this type id,
    /// or `InvalidDefaults` if the default settings are not a map.
    pub fn register(&mut self, kind: ComponentKind) -> Result<(), RegistryError> {
        if !kind.defaults.is_object() {
            return Err(RegistryError::InvalidDefaults(kind.type_id));
        }

        let by_type = self.index.entry(kind.category).or_default();
        if by_type.contains_key(&kind.type_id) {
            return Err(RegistryError::DuplicateKind {
                category: kind.category,
                type_id: kind.type_id,
            });
        }

        by_type.insert(kind.type_id.clone(), self.kinds.len());
        self.kinds.push(kind);
        Ok(())
    }

    /// Look up a component kind. `None` is a normal result for unknown types.
    pub fn lookup(&self, category: Category, type_id: &str) -> Option<&ComponentKind> {
        let position = self.index.get(&category)?.get(type_id)?;
        self.kinds.get(*position)
    }

    /// Iterate the kinds of one category in registration order.
    pub fn kinds(&self, category: Category) -> impl Iterator<Item = &ComponentKind> {
        self.kinds.iter().filter(move |k| k.category == category)
    }

    /// Iterate every kind in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ComponentKind> {
        self.kinds.iter()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
