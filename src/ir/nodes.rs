//! Type node definitions.
//!
//! This module defines the structural type tree the compiler walks. Trees are
//! built once by the external reflection engine and are read-only afterwards;
//! the compiler never mutates them.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::annotations::AnnotationMap;
use crate::reflect::ClassReference;

/// A single node of a structural type tree.
///
/// Children are ordered and empty for leaf kinds. `Array` nodes carry exactly
/// one child (the element type), `Union` and `Intersection` carry their
/// members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeNode {
    /// The kind of type this node denotes.
    pub kind: NodeKind,

    /// Ordered child nodes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TypeNode>,

    /// Annotations attached to this node by the reflector.
    #[serde(default, skip_serializing_if = "AnnotationMap::is_empty")]
    pub annotations: AnnotationMap,
}

impl TypeNode {
    /// Create a leaf node of the given kind.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
            annotations: AnnotationMap::default(),
        }
    }

    /// A `string` node.
    pub fn string() -> Self {
        Self::new(NodeKind::String)
    }

    /// A `number` node.
    pub fn number() -> Self {
        Self::new(NodeKind::Number)
    }

    /// A `boolean` node.
    pub fn boolean() -> Self {
        Self::new(NodeKind::Boolean)
    }

    /// A `record` node (string-keyed map; maps to `object` in schemas).
    pub fn record() -> Self {
        Self::new(NodeKind::Record)
    }

    /// An `any` node.
    pub fn any() -> Self {
        Self::new(NodeKind::Any)
    }

    /// A literal node denoting exactly one scalar value.
    pub fn literal(expected: LiteralValue) -> Self {
        Self::new(NodeKind::Literal { expected })
    }

    /// The literal `null` node.
    pub fn null() -> Self {
        Self::literal(LiteralValue::Null)
    }

    /// An enum node with its name and allowed values in declaration order.
    pub fn enumeration(name: impl Into<String>, allowed_values: Vec<LiteralValue>) -> Self {
        Self::new(NodeKind::Enum {
            name: name.into(),
            allowed_values,
        })
    }

    /// A union node over the given members.
    pub fn union(members: Vec<TypeNode>) -> Self {
        Self {
            kind: NodeKind::Union,
            children: members,
            annotations: AnnotationMap::default(),
        }
    }

    /// An intersection node over the given members.
    pub fn intersection(members: Vec<TypeNode>) -> Self {
        Self {
            kind: NodeKind::Intersection,
            children: members,
            annotations: AnnotationMap::default(),
        }
    }

    /// A class node referencing another class.
    pub fn class(meta: ClassMeta) -> Self {
        Self::new(NodeKind::Class { meta })
    }

    /// An array node with the given element type.
    pub fn array(element: TypeNode) -> Self {
        Self {
            kind: NodeKind::Array,
            children: vec![element],
            annotations: AnnotationMap::default(),
        }
    }

    /// A tuple node with fixed element types.
    pub fn tuple(elements: Vec<TypeNode>) -> Self {
        Self {
            kind: NodeKind::Tuple,
            children: elements,
            annotations: AnnotationMap::default(),
        }
    }

    /// Attach annotations to this node.
    pub fn with_annotations(mut self, annotations: AnnotationMap) -> Self {
        self.annotations = annotations;
        self
    }

    /// Whether this node is the literal `null`.
    pub fn is_null_literal(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Literal {
                expected: LiteralValue::Null
            }
        )
    }
}

/// Kind of a type node.
///
/// This is a closed sum: every dispatch site matches exhaustively, so adding
/// a kind is a compile error until all of them handle it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NodeKind {
    /// A string.
    String,

    /// A number.
    Number,

    /// A boolean.
    Boolean,

    /// A string-keyed map with uniform values.
    Record,

    /// Any value.
    Any,

    /// Exactly one scalar value.
    Literal {
        /// The value this type denotes.
        expected: LiteralValue,
    },

    /// A named enumeration of scalar values.
    Enum {
        /// The enum type name.
        name: String,
        /// Allowed values in declaration order.
        allowed_values: Vec<LiteralValue>,
    },

    /// A union of the node's children.
    Union,

    /// An intersection of the node's children.
    Intersection,

    /// A reference to another class.
    Class {
        /// Reference and mapped-type metadata.
        meta: ClassMeta,
    },

    /// An array of the node's single child.
    Array,

    /// A fixed-length tuple. Not representable as a schema; compiling one
    /// fails.
    Tuple,
}

/// A concrete scalar a literal type can denote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    /// A string literal.
    String(String),
    /// A numeric literal.
    Number(f64),
    /// A boolean literal.
    Boolean(bool),
    /// The `null` literal.
    Null,
}

impl LiteralValue {
    /// Convert to a JSON value, printing integral numbers without a
    /// fractional part (`9001.0` becomes `9001`).
    pub fn to_json(&self) -> Value {
        match self {
            LiteralValue::String(s) => Value::String(s.clone()),
            LiteralValue::Number(n) => {
                if n.fract() == 0.0 && *n >= i64::MIN as f64 && *n <= i64::MAX as f64 {
                    Value::from(*n as i64)
                } else {
                    Value::from(*n)
                }
            }
            LiteralValue::Boolean(b) => Value::Bool(*b),
            LiteralValue::Null => Value::Null,
        }
    }
}

/// Metadata of a class node: the opaque reference plus mapped-type markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMeta {
    /// Opaque reference resolved by the reflector.
    pub reference: ClassReference,

    /// What kind of declaration the reference came from.
    #[serde(default)]
    pub from: ClassOrigin,

    /// `Partial<Base>`: every property of the base becomes optional.
    #[serde(default)]
    pub partial: bool,

    /// `Pick<Base, …>`: keep only the named fields, in declaration order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picked: Option<IndexSet<String>>,

    /// `Omit<Base, …>`: drop the named fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub omitted: Option<IndexSet<String>>,
}

impl ClassMeta {
    /// Plain class reference without mapped-type markers.
    pub fn new(reference: ClassReference) -> Self {
        Self {
            reference,
            from: ClassOrigin::Class,
            partial: false,
            picked: None,
            omitted: None,
        }
    }

    /// Set the declaration origin.
    pub fn with_origin(mut self, from: ClassOrigin) -> Self {
        self.from = from;
        self
    }

    /// Mark as `Partial<Base>`.
    pub fn partial(mut self) -> Self {
        self.partial = true;
        self
    }

    /// Mark as `Pick<Base, fields>`.
    pub fn pick(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.picked = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Mark as `Omit<Base, fields>`.
    pub fn omit(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.omitted = Some(fields.into_iter().map(Into::into).collect());
        self
    }
}

/// Declaration kind a class node was derived from.
///
/// Only nominal classes can be resolved to a schema identity; object literals
/// and interfaces fail compilation when their reference does not resolve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassOrigin {
    /// A named class declaration.
    #[default]
    Class,
    /// An inline object literal.
    Object,
    /// An interface declaration.
    Interface,
}

/// The top-level wrapper around a property's type tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootNode {
    /// Whether the property may be absent.
    #[serde(default)]
    pub optional: bool,

    /// The single wrapped type node.
    pub children: Vec<TypeNode>,

    /// Root-level annotations (doc comment, validators, custom flags).
    #[serde(default, skip_serializing_if = "AnnotationMap::is_empty")]
    pub annotations: AnnotationMap,
}

impl RootNode {
    /// Wrap a type node as a required property tree.
    pub fn new(child: TypeNode) -> Self {
        Self {
            optional: false,
            children: vec![child],
            annotations: AnnotationMap::default(),
        }
    }

    /// Set whether the property may be absent.
    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    /// Attach root-level annotations.
    pub fn with_annotations(mut self, annotations: AnnotationMap) -> Self {
        self.annotations = annotations;
        self
    }

    /// The wrapped top-level node, if present.
    pub fn child(&self) -> Option<&TypeNode> {
        self.children.first()
    }
}

/// One `{ property name, tree }` pair of a class's declared shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyTree {
    /// The declared property name.
    pub name: String,

    /// The property's type tree.
    pub tree: RootNode,
}

impl PropertyTree {
    /// Create a property tree entry.
    pub fn new(name: impl Into<String>, tree: RootNode) -> Self {
        Self {
            name: name.into(),
            tree,
        }
    }
}
