//! The reflection seam.
//!
//! The compiler consumes class shapes through the [`TypeReflector`] trait;
//! the engine that actually inspects source types lives outside this crate.
//! [`StaticReflector`] is an in-memory implementation for embedders that
//! build trees programmatically, and for tests.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::ir::PropertyTree;

/// Identity of a class that can appear in a schema document.
///
/// Identities compare and hash by their deterministic display name, so two
/// materializations of the same mapped type are the same identity regardless
/// of where they were allocated.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(Arc<str>);

impl ClassId {
    /// Create an identity with the given display name.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// The display name, e.g. `Embed` or `Pick<Embed, name>`.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassId({})", self.0)
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque reference token carried by class nodes.
///
/// Only the reflector can resolve one into a [`ClassId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassReference(String);

impl ClassReference {
    /// Create a reference token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClassReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Interface of the external type-reflection engine.
pub trait TypeReflector {
    /// The declared shape of a class: its property trees in declaration
    /// order. `None` if the class is unknown.
    fn class_tree(&self, class: &ClassId) -> Option<Vec<PropertyTree>>;

    /// Resolve an opaque node reference to a class identity.
    fn resolve_reference(&self, reference: &ClassReference) -> Option<ClassId>;
}

/// In-memory reflector over programmatically registered classes.
///
/// Each class is registered under its display name; the reference token for
/// a registered class is its name unless linked explicitly.
#[derive(Debug, Default)]
pub struct StaticReflector {
    classes: IndexMap<ClassId, Vec<PropertyTree>>,
    references: HashMap<ClassReference, ClassId>,
}

impl StaticReflector {
    /// Create an empty reflector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class shape and return its identity.
    pub fn add_class(&mut self, name: &str, tree: Vec<PropertyTree>) -> ClassId {
        let id = ClassId::new(name);
        self.references
            .insert(ClassReference::new(name), id.clone());
        self.classes.insert(id.clone(), tree);
        id
    }

    /// Make an additional reference token resolve to an existing class.
    pub fn link_reference(&mut self, reference: ClassReference, class: ClassId) {
        self.references.insert(reference, class);
    }
}

impl TypeReflector for StaticReflector {
    fn class_tree(&self, class: &ClassId) -> Option<Vec<PropertyTree>> {
        self.classes.get(class).cloned()
    }

    fn resolve_reference(&self, reference: &ClassReference) -> Option<ClassId> {
        self.references.get(reference).cloned()
    }
}
