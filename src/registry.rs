//! The model registry.
//!
//! A process-wide, insertion-ordered catalog of every class (original or
//! synthesized) the compiler has referenced. The caller drains it to emit the
//! full schema document. Constructed once per process and never pruned in
//! production; tests reset it explicitly between cases.

use indexmap::IndexSet;
use tracing::trace;

use crate::reflect::ClassId;

/// Deduplicated, insertion-ordered list of referenced models.
///
/// Identities compare by deterministic name, so the dedup also collapses
/// repeated materializations of the same mapped type. Insertion is a single
/// check-and-append; re-encountering a registered identity is a no-op.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: IndexSet<ClassId>,
}

impl ModelRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model. First-seen wins; returns whether the identity was
    /// newly inserted.
    pub fn insert(&mut self, class: ClassId) -> bool {
        let inserted = self.models.insert(class.clone());
        if inserted {
            trace!(model = class.name(), "registered model");
        }
        inserted
    }

    /// Whether the identity is already registered.
    pub fn contains(&self, class: &ClassId) -> bool {
        self.models.contains(class)
    }

    /// Registered models in first-seen order.
    pub fn models(&self) -> impl Iterator<Item = &ClassId> {
        self.models.iter()
    }

    /// Number of registered models.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether no model has been registered.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Drop all entries. Test lifecycle only; a production registry lives
    /// for the whole process.
    pub fn reset(&mut self) {
        self.models.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_preserves_first_seen_order() {
        let mut registry = ModelRegistry::new();
        assert!(registry.insert(ClassId::new("B")));
        assert!(registry.insert(ClassId::new("A")));
        assert!(registry.insert(ClassId::new("C")));

        let names: Vec<_> = registry.models().map(ClassId::name).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_reinsert_is_a_noop() {
        let mut registry = ModelRegistry::new();
        assert!(registry.insert(ClassId::new("Embed")));
        assert!(!registry.insert(ClassId::new("Embed")));
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(&ClassId::new("Embed")));
    }

    #[test]
    fn test_reset_clears_entries() {
        let mut registry = ModelRegistry::new();
        registry.insert(ClassId::new("Embed"));
        registry.reset();
        assert!(registry.is_empty());
    }
}
