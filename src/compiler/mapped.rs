//! Mapped-type materialization.
//!
//! Pick, Omit and Partial have no class of their own in the source; the
//! materializer synthesizes one on the fly. Identities are interned by their
//! deterministic display name, so materializing the same
//! `(operator, base, fields)` twice returns the same handle.

use std::fmt;

use indexmap::IndexMap;
use tracing::debug;

use crate::ir::PropertyTree;
use crate::reflect::ClassId;

/// A structural type operator applied to a base class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappedOperator {
    /// Every property of the base becomes optional.
    Partial,
    /// Keep only the named fields.
    Pick,
    /// Drop the named fields.
    Omit,
}

impl fmt::Display for MappedOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MappedOperator::Partial => "Partial",
            MappedOperator::Pick => "Pick",
            MappedOperator::Omit => "Omit",
        };
        f.write_str(name)
    }
}

/// A class synthesized for a mapped type.
#[derive(Debug, Clone)]
pub struct SyntheticClass {
    /// The synthesized identity, named `Partial<Base>`, `Pick<Base, …>` or
    /// `Omit<Base, …>`.
    pub id: ClassId,

    /// The operator that produced it.
    pub operator: MappedOperator,

    /// The base class it derives from.
    pub base: ClassId,

    /// The operator's field set in declaration order; empty for `Partial`.
    pub fields: Vec<String>,

    /// The derived property trees.
    pub tree: Vec<PropertyTree>,
}

/// Interning table of synthesized classes, keyed by deterministic name.
#[derive(Debug, Default)]
pub struct MappedTypeMaterializer {
    interned: IndexMap<String, SyntheticClass>,
}

impl MappedTypeMaterializer {
    /// Create an empty materializer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Synthesize (or look up) the class for `operator` applied to `base`.
    ///
    /// `base_tree` is the base class's declared shape; `fields` is the
    /// operator's field set in declaration order and is ignored for
    /// `Partial`. Repeated calls with the same operator, base and fields
    /// return the identical handle.
    pub fn materialize(
        &mut self,
        operator: MappedOperator,
        base: &ClassId,
        base_tree: &[PropertyTree],
        fields: &[String],
    ) -> ClassId {
        let name = display_name(operator, base.name(), fields);
        if let Some(existing) = self.interned.get(&name) {
            return existing.id.clone();
        }

        let tree = derive_tree(operator, base_tree, fields);
        let id = ClassId::new(&name);
        debug!(
            model = name.as_str(),
            base = base.name(),
            properties = tree.len(),
            "materialized mapped type"
        );
        self.interned.insert(
            name,
            SyntheticClass {
                id: id.clone(),
                operator,
                base: base.clone(),
                fields: fields.to_vec(),
                tree,
            },
        );
        id
    }

    /// Look up a synthesized class by identity.
    pub fn get(&self, class: &ClassId) -> Option<&SyntheticClass> {
        self.interned.get(class.name())
    }

    /// All synthesized classes, in materialization order.
    pub fn synthetic_classes(&self) -> impl Iterator<Item = &SyntheticClass> {
        self.interned.values()
    }
}

/// Deterministic display name for a mapped type.
///
/// Fields are joined in the order given by the type node's field set, not
/// re-sorted.
fn display_name(operator: MappedOperator, base: &str, fields: &[String]) -> String {
    match operator {
        MappedOperator::Partial => format!("{operator}<{base}>"),
        MappedOperator::Pick | MappedOperator::Omit => {
            format!("{operator}<{base}, {}>", fields.join(" | "))
        }
    }
}

fn derive_tree(
    operator: MappedOperator,
    base_tree: &[PropertyTree],
    fields: &[String],
) -> Vec<PropertyTree> {
    match operator {
        MappedOperator::Partial => base_tree
            .iter()
            .cloned()
            .map(|mut property| {
                property.tree.optional = true;
                property
            })
            .collect(),
        MappedOperator::Pick => base_tree
            .iter()
            .filter(|property| fields.contains(&property.name))
            .cloned()
            .collect(),
        MappedOperator::Omit => base_tree
            .iter()
            .filter(|property| !fields.contains(&property.name))
            .cloned()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{RootNode, TypeNode};

    fn embed_tree() -> Vec<PropertyTree> {
        vec![
            PropertyTree::new("name", RootNode::new(TypeNode::string())),
            PropertyTree::new("email", RootNode::new(TypeNode::string())),
        ]
    }

    #[test]
    fn test_partial_name_and_tree() {
        let mut materializer = MappedTypeMaterializer::new();
        let base = ClassId::new("Embed");
        let id = materializer.materialize(MappedOperator::Partial, &base, &embed_tree(), &[]);

        assert_eq!(id.name(), "Partial<Embed>");
        let synthetic = materializer.get(&id).unwrap();
        assert_eq!(synthetic.tree.len(), 2);
        assert!(synthetic.tree.iter().all(|p| p.tree.optional));
    }

    #[test]
    fn test_pick_keeps_named_fields() {
        let mut materializer = MappedTypeMaterializer::new();
        let base = ClassId::new("Embed");
        let id = materializer.materialize(
            MappedOperator::Pick,
            &base,
            &embed_tree(),
            &["name".to_string()],
        );

        assert_eq!(id.name(), "Pick<Embed, name>");
        let synthetic = materializer.get(&id).unwrap();
        assert_eq!(synthetic.tree.len(), 1);
        assert_eq!(synthetic.tree[0].name, "name");
        assert!(!synthetic.tree[0].tree.optional);
    }

    #[test]
    fn test_omit_drops_named_fields() {
        let mut materializer = MappedTypeMaterializer::new();
        let base = ClassId::new("Embed");
        let id = materializer.materialize(
            MappedOperator::Omit,
            &base,
            &embed_tree(),
            &["name".to_string()],
        );

        assert_eq!(id.name(), "Omit<Embed, name>");
        let synthetic = materializer.get(&id).unwrap();
        assert_eq!(synthetic.tree.len(), 1);
        assert_eq!(synthetic.tree[0].name, "email");
    }

    #[test]
    fn test_pick_joins_fields_in_given_order() {
        let mut materializer = MappedTypeMaterializer::new();
        let base = ClassId::new("Embed");
        let id = materializer.materialize(
            MappedOperator::Pick,
            &base,
            &embed_tree(),
            &["email".to_string(), "name".to_string()],
        );
        assert_eq!(id.name(), "Pick<Embed, email | name>");
    }

    #[test]
    fn test_materialize_is_idempotent() {
        let mut materializer = MappedTypeMaterializer::new();
        let base = ClassId::new("Embed");
        let fields = vec!["name".to_string()];

        let first = materializer.materialize(MappedOperator::Pick, &base, &embed_tree(), &fields);
        let second = materializer.materialize(MappedOperator::Pick, &base, &embed_tree(), &fields);

        assert_eq!(first, second);
        assert_eq!(materializer.synthetic_classes().count(), 1);
    }
}
