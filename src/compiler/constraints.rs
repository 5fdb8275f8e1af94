//! Constraint extraction.
//!
//! Translates decorator-declared validator rules into schema constraints.
//! The whole tree is consulted: the root first, then all descendants
//! depth-first left to right. Later-visited nodes overwrite earlier ones on
//! key collision; that ordering is part of the contract.

use crate::ir::{NodeKind, RootNode, TypeNode, ValidatorRule};
use crate::schema::{SchemaObject, SchemaType, TypeSlot};

/// Collect the schema constraints asserted by validators anywhere in the
/// property's tree.
pub(crate) fn extract_constraints(root: &RootNode) -> SchemaObject {
    let mut out = SchemaObject::default();
    for rule in &root.annotations.validators {
        apply_rule(rule, length_target_of_root(root), &mut out);
    }
    for child in &root.children {
        collect(child, &mut out);
    }
    out
}

fn collect(node: &TypeNode, out: &mut SchemaObject) {
    for rule in &node.annotations.validators {
        apply_rule(rule, length_target_of_node(node), out);
    }
    for child in &node.children {
        collect(child, out);
    }
}

/// What a length bound constrains at the node it was declared on.
#[derive(Clone, Copy)]
enum LengthTarget {
    /// `minItems` / `maxItems`.
    Items,
    /// `minLength` / `maxLength`.
    Chars,
    /// The bound has no schema effect here.
    None,
}

/// A length bound on the root constrains the root's sole child.
fn length_target_of_root(root: &RootNode) -> LengthTarget {
    match root.child().map(|child| &child.kind) {
        Some(NodeKind::Array) => LengthTarget::Items,
        Some(NodeKind::String) => LengthTarget::Chars,
        _ => LengthTarget::None,
    }
}

fn length_target_of_node(node: &TypeNode) -> LengthTarget {
    match node.kind {
        NodeKind::Array => LengthTarget::Items,
        NodeKind::String => LengthTarget::Chars,
        _ => LengthTarget::None,
    }
}

fn apply_rule(rule: &ValidatorRule, target: LengthTarget, out: &mut SchemaObject) {
    match rule {
        ValidatorRule::Regexp { pattern } => {
            out.pattern = Some(pattern.clone());
        }
        ValidatorRule::Range { min, max } => {
            if let Some(min) = min {
                out.minimum = Some(*min);
            }
            if let Some(max) = max {
                out.maximum = Some(*max);
            }
        }
        ValidatorRule::IsInteger => {
            out.ty = TypeSlot::Set(SchemaType::Integer);
        }
        ValidatorRule::Length { min, max } => match target {
            LengthTarget::Items => {
                if let Some(min) = min {
                    out.min_items = Some(*min);
                }
                if let Some(max) = max {
                    out.max_items = Some(*max);
                }
            }
            LengthTarget::Chars => {
                if let Some(min) = min {
                    out.min_length = Some(*min);
                }
                if let Some(max) = max {
                    out.max_length = Some(*max);
                }
            }
            LengthTarget::None => {}
        },
        ValidatorRule::IsFqdn | ValidatorRule::IsUrl | ValidatorRule::IsEmail
        | ValidatorRule::IsIso8601 => {
            if let Some(format) = rule.format() {
                out.format = Some(format.to_string());
            }
        }
    }
}
