//! Property-based tests for typetree-openapi.
//!
//! Properties tested:
//! - Registry insertion is deduplicating and order-preserving
//! - Mapped-type names are deterministic and interned
//! - String literals always compile to an anchored pattern that matches
//!   exactly the literal text
//! - Merging an empty fragment is the identity

use proptest::prelude::*;

use typetree_openapi::{
    ClassId, LiteralValue, MappedOperator, MappedTypeMaterializer, ModelCompiler, ModelRegistry,
    PropertyTree, RootNode, SchemaObject, StaticReflector, TypeNode, TypeSlot,
};

fn arb_identifier() -> impl Strategy<Value = String> {
    "[A-Z][a-zA-Z0-9]{0,12}"
}

fn arb_field_name() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z0-9]{0,12}"
}

proptest! {
    #[test]
    fn prop_registry_deduplicates_and_preserves_order(names in proptest::collection::vec(arb_identifier(), 1..20)) {
        let mut registry = ModelRegistry::new();
        for name in &names {
            registry.insert(ClassId::new(name));
        }

        // First-seen order, each name once.
        let mut expected: Vec<&str> = Vec::new();
        for name in &names {
            if !expected.contains(&name.as_str()) {
                expected.push(name);
            }
        }
        let actual: Vec<&str> = registry.models().map(ClassId::name).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn prop_materializer_interns_by_name(
        base in arb_identifier(),
        fields in proptest::collection::vec(arb_field_name(), 0..5),
    ) {
        let mut materializer = MappedTypeMaterializer::new();
        let base_id = ClassId::new(&base);
        let tree: Vec<PropertyTree> = fields
            .iter()
            .map(|name| PropertyTree::new(name.clone(), RootNode::new(TypeNode::string())))
            .collect();

        for operator in [MappedOperator::Partial, MappedOperator::Pick, MappedOperator::Omit] {
            let first = materializer.materialize(operator, &base_id, &tree, &fields);
            let second = materializer.materialize(operator, &base_id, &tree, &fields);
            prop_assert_eq!(&first, &second);
            prop_assert!(materializer.get(&first).is_some());
        }

        // One synthesized class per distinct operator application.
        prop_assert_eq!(materializer.synthetic_classes().count(), 3);
    }

    #[test]
    fn prop_partial_makes_every_property_optional(
        fields in proptest::collection::vec(arb_field_name(), 1..8),
    ) {
        let mut materializer = MappedTypeMaterializer::new();
        let base = ClassId::new("Base");
        let tree: Vec<PropertyTree> = fields
            .iter()
            .map(|name| PropertyTree::new(name.clone(), RootNode::new(TypeNode::string())))
            .collect();

        let id = materializer.materialize(MappedOperator::Partial, &base, &tree, &[]);
        let synthetic = materializer.get(&id).unwrap();
        prop_assert_eq!(synthetic.tree.len(), tree.len());
        prop_assert!(synthetic.tree.iter().all(|p| p.tree.optional));
    }

    #[test]
    fn prop_string_literal_pattern_matches_only_the_literal(text in "[a-zA-Z0-9 .*+()\\[\\]{}|^$?\\\\-]{0,20}") {
        let mut compiler = ModelCompiler::new(StaticReflector::new());
        let node = TypeNode::literal(LiteralValue::String(text.clone()));
        let schema = compiler
            .compile_node(&node, &mut Vec::new())
            .expect("literal compiles");

        let pattern = schema.pattern.expect("literal has a pattern");
        let regex = regex::Regex::new(&pattern).expect("escaped pattern is valid");
        prop_assert!(regex.is_match(&text));

        // An anchored exact match: appending a character must break it.
        let mut longer = text.clone();
        longer.push('x');
        prop_assert!(!regex.is_match(&longer));
    }

    #[test]
    fn prop_merging_empty_fragment_is_identity(pattern in proptest::option::of("[a-z]{1,8}"), required in proptest::option::of(any::<bool>())) {
        let mut schema = SchemaObject {
            ty: TypeSlot::Unset,
            pattern,
            required,
            ..SchemaObject::default()
        };
        let before = schema.clone();
        schema.merge(SchemaObject::default());
        prop_assert_eq!(schema, before);
    }
}
