//! Per-class, per-property metadata store.
//!
//! The compiled descriptor of every property is persisted here under a
//! stable (class, property) slot, together with the append-once "properties
//! seen" list and the per-class additional-model lists. This is the crate's
//! rendition of the decorator metadata side-table the original wrote into.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::reflect::ClassId;
use crate::schema::SchemaObject;

/// Storage for compiled descriptors and per-class bookkeeping.
#[derive(Debug, Default)]
pub struct MetadataStore {
    descriptors: HashMap<ClassId, IndexMap<String, SchemaObject>>,
    seen: HashMap<ClassId, Vec<String>>,
    additional: HashMap<ClassId, Vec<ClassId>>,
}

impl MetadataStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The descriptor stored for a property, if any.
    pub fn descriptor(&self, class: &ClassId, property: &str) -> Option<&SchemaObject> {
        self.descriptors.get(class)?.get(property)
    }

    /// Store (or replace) a property's descriptor.
    pub fn set_descriptor(&mut self, class: &ClassId, property: &str, schema: SchemaObject) {
        self.descriptors
            .entry(class.clone())
            .or_default()
            .insert(property.to_string(), schema);
    }

    /// Append a property to the class's seen list, once.
    pub fn mark_seen(&mut self, class: &ClassId, property: &str) {
        let seen = self.seen.entry(class.clone()).or_default();
        if !seen.iter().any(|p| p == property) {
            seen.push(property.to_string());
        }
    }

    /// Properties compiled for a class, in first-compiled order.
    pub fn properties_seen(&self, class: &ClassId) -> &[String] {
        self.seen.get(class).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Record the models referenced while compiling a class.
    pub fn set_additional_models(&mut self, class: &ClassId, models: Vec<ClassId>) {
        self.additional.insert(class.clone(), models);
    }

    /// Models recorded for a class by its last compilation.
    pub fn additional_models(&self, class: &ClassId) -> &[ClassId] {
        self.additional.get(class).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaType;

    #[test]
    fn test_descriptor_roundtrip() {
        let mut store = MetadataStore::new();
        let class = ClassId::new("Embed");
        assert!(store.descriptor(&class, "name").is_none());

        store.set_descriptor(&class, "name", SchemaObject::of_type(SchemaType::String));
        assert_eq!(
            store.descriptor(&class, "name"),
            Some(&SchemaObject::of_type(SchemaType::String))
        );
    }

    #[test]
    fn test_mark_seen_appends_once() {
        let mut store = MetadataStore::new();
        let class = ClassId::new("Embed");
        store.mark_seen(&class, "name");
        store.mark_seen(&class, "email");
        store.mark_seen(&class, "name");

        assert_eq!(store.properties_seen(&class), ["name", "email"]);
    }

    #[test]
    fn test_additional_models_default_to_empty() {
        let store = MetadataStore::new();
        assert!(store.additional_models(&ClassId::new("Embed")).is_empty());
    }
}
