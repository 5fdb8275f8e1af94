//! The schema compiler.
//!
//! [`ModelCompiler`] is the public entry point: it walks a class's property
//! trees, compiles each into an OpenAPI descriptor, materializes mapped
//! types on the way, and persists the merged results into the metadata
//! store. Compilation is a pure, synchronous tree walk; the only shared
//! state is the model registry.

mod comments;
mod constraints;
pub mod mapped;

use serde_json::Value;
use tracing::debug;

use crate::error::SchemaError;
use crate::ir::{ClassMeta, ClassOrigin, LiteralValue, NodeKind, PropertyTree, RootNode, TypeNode};
use crate::reflect::{ClassId, TypeReflector};
use crate::registry::ModelRegistry;
use crate::schema::{schema_path, SchemaObject, SchemaType, TypeSlot};
use crate::store::MetadataStore;

use mapped::{MappedOperator, MappedTypeMaterializer, SyntheticClass};

/// Compiles reflected class shapes into schema descriptors.
///
/// One compiler instance owns the model registry, the mapped-type interning
/// table and the metadata store; it is expected to live for the whole
/// process and to be fed every class that needs documenting.
#[derive(Debug)]
pub struct ModelCompiler<R> {
    reflector: R,
    registry: ModelRegistry,
    materializer: MappedTypeMaterializer,
    store: MetadataStore,
}

impl<R: TypeReflector> ModelCompiler<R> {
    /// Create a compiler over the given reflector.
    pub fn new(reflector: R) -> Self {
        Self {
            reflector,
            registry: ModelRegistry::new(),
            materializer: MappedTypeMaterializer::new(),
            store: MetadataStore::new(),
        }
    }

    /// The underlying reflector.
    pub fn reflector(&self) -> &R {
        &self.reflector
    }

    /// The global model registry.
    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Declared property trees for a class, consulting synthesized classes
    /// before the reflector.
    pub fn class_tree(&self, class: &ClassId) -> Option<Vec<PropertyTree>> {
        if let Some(synthetic) = self.materializer.get(class) {
            return Some(synthetic.tree.clone());
        }
        self.reflector.class_tree(class)
    }

    /// Compile every property of a class and persist the descriptors.
    ///
    /// Descriptors are assembled by merging, in order: the `unknown`
    /// placeholder, the compiled tree fragment, doc-comment fields, the
    /// required/nullable derivation, validator constraints, and finally any
    /// pre-existing per-property override (which therefore always wins).
    pub fn compile_model(&mut self, class: &ClassId) -> Result<(), SchemaError> {
        let trees = self
            .class_tree(class)
            .ok_or_else(|| SchemaError::unresolved(class.name()))?;
        debug!(
            class = class.name(),
            properties = trees.len(),
            "compiling model"
        );

        let mut referenced: Vec<ClassId> = Vec::new();
        for PropertyTree { name, tree } in &trees {
            let existing = self.store.descriptor(class, name).cloned();
            let compiled = self.compile_root(tree, &mut referenced)?;

            let mut descriptor = SchemaObject::of_type(SchemaType::Unknown);
            descriptor.merge(compiled);

            let mut annotation_fields = comments::extract_description(tree.annotations.comment.as_ref());
            if let Some(example) = &tree.annotations.example {
                annotation_fields.example = Some(Value::String(example.clone()));
            }
            descriptor.merge(annotation_fields);
            descriptor.merge(derive_required_nullable(tree));
            descriptor.merge(constraints::extract_constraints(tree));
            if let Some(existing) = existing {
                descriptor.merge(existing);
            }

            self.store.set_descriptor(class, name, descriptor);
            self.store.mark_seen(class, name);
        }
        self.store.set_additional_models(class, referenced);
        Ok(())
    }

    /// Compile the top-level node of a property tree.
    fn compile_root(
        &mut self,
        root: &RootNode,
        referenced: &mut Vec<ClassId>,
    ) -> Result<SchemaObject, SchemaError> {
        let node = root
            .child()
            .ok_or_else(|| SchemaError::unsupported("property tree has no type node"))?;
        self.compile_node(node, referenced)
    }

    /// Compile one type node into a schema fragment.
    ///
    /// `referenced` accumulates, append-once, every class identity the walk
    /// touches; the orchestrator records it as the class's additional-model
    /// list.
    pub fn compile_node(
        &mut self,
        node: &TypeNode,
        referenced: &mut Vec<ClassId>,
    ) -> Result<SchemaObject, SchemaError> {
        match &node.kind {
            NodeKind::String => Ok(SchemaObject::of_type(SchemaType::String)),
            NodeKind::Number => Ok(SchemaObject::of_type(SchemaType::Number)),
            NodeKind::Boolean => Ok(SchemaObject::of_type(SchemaType::Boolean)),
            NodeKind::Record => Ok(SchemaObject::of_type(SchemaType::Object)),
            NodeKind::Any => Ok(SchemaObject::of_type(SchemaType::Any)),
            NodeKind::Literal { expected } => Ok(compile_literal(expected)),
            NodeKind::Enum {
                name,
                allowed_values,
            } => {
                let mut out = SchemaObject::of_type(SchemaType::String);
                out.enum_name = Some(name.clone());
                out.enum_values = Some(allowed_values.iter().map(LiteralValue::to_json).collect());
                Ok(out)
            }
            NodeKind::Union => self.compile_union(node, referenced),
            NodeKind::Intersection => {
                let mut members = Vec::with_capacity(node.children.len());
                for child in &node.children {
                    members.push(self.compile_node(child, referenced)?);
                }
                Ok(SchemaObject {
                    all_of: Some(members),
                    ..SchemaObject::default()
                })
            }
            NodeKind::Array => {
                let element = node
                    .children
                    .first()
                    .ok_or_else(|| SchemaError::unsupported("array node has no element type"))?;
                let items = self.compile_node(element, referenced)?;
                let mut out = SchemaObject::of_type(SchemaType::Array);
                out.items = Some(Box::new(items));
                Ok(out)
            }
            NodeKind::Tuple => Err(SchemaError::unsupported("tuple types are not implemented")),
            NodeKind::Class { meta } => self.compile_class(meta, referenced),
        }
    }

    /// Compile a union, filtering out `null` members first.
    ///
    /// More than one surviving member becomes a `oneOf`; exactly one
    /// survives as its own fragment (with `unknown` filled in underneath if
    /// the member carries no type). A union with no non-null members has no
    /// representable schema and fails.
    fn compile_union(
        &mut self,
        node: &TypeNode,
        referenced: &mut Vec<ClassId>,
    ) -> Result<SchemaObject, SchemaError> {
        let members: Vec<&TypeNode> = node
            .children
            .iter()
            .filter(|child| !child.is_null_literal())
            .collect();

        match members.as_slice() {
            [] => Err(SchemaError::unsupported("union has no non-null members")),
            [single] => {
                let mut fragment = self.compile_node(single, referenced)?;
                if fragment.ty.is_unset() {
                    fragment.ty = TypeSlot::Set(SchemaType::Unknown);
                }
                Ok(fragment)
            }
            _ => {
                let mut compiled = Vec::with_capacity(members.len());
                for member in members {
                    compiled.push(self.compile_node(member, referenced)?);
                }
                Ok(SchemaObject {
                    one_of: Some(compiled),
                    ..SchemaObject::default()
                })
            }
        }
    }

    /// Compile a class node: resolve the reference, materialize mapped
    /// types, and emit an object fragment referencing the target schema.
    fn compile_class(
        &mut self,
        meta: &ClassMeta,
        referenced: &mut Vec<ClassId>,
    ) -> Result<SchemaObject, SchemaError> {
        let Some(class) = self.reflector.resolve_reference(&meta.reference) else {
            return Err(match meta.from {
                ClassOrigin::Object | ClassOrigin::Interface => SchemaError::unsupported(
                    "object literals and interfaces have no nominal schema identity",
                ),
                ClassOrigin::Class => SchemaError::unresolved(meta.reference.as_str()),
            });
        };

        let target = if meta.partial {
            self.materialize(MappedOperator::Partial, &class, &[])?
        } else if let Some(picked) = meta.picked.as_ref().filter(|fields| !fields.is_empty()) {
            let fields: Vec<String> = picked.iter().cloned().collect();
            self.materialize(MappedOperator::Pick, &class, &fields)?
        } else if let Some(omitted) = &meta.omitted {
            let fields: Vec<String> = omitted.iter().cloned().collect();
            self.materialize(MappedOperator::Omit, &class, &fields)?
        } else {
            class
        };

        self.registry.insert(target.clone());
        push_unique(referenced, target.clone());

        Ok(SchemaObject {
            ty: TypeSlot::Set(SchemaType::Object),
            reference: Some(schema_path(target.name())),
            ..SchemaObject::default()
        })
    }

    fn materialize(
        &mut self,
        operator: MappedOperator,
        base: &ClassId,
        fields: &[String],
    ) -> Result<ClassId, SchemaError> {
        let base_tree = self
            .class_tree(base)
            .ok_or_else(|| SchemaError::unresolved(base.name()))?;
        Ok(self
            .materializer
            .materialize(operator, base, &base_tree, fields))
    }

    /// Global, deduplicated, insertion-ordered list of every referenced
    /// model.
    pub fn additional_models(&self) -> impl Iterator<Item = &ClassId> {
        self.registry.models()
    }

    /// Flattened concatenation of the given classes' recorded per-class
    /// model lists. Duplicates across different classes are preserved; only
    /// within-class duplicates were suppressed at registration time.
    pub fn additional_models_for<'a>(
        &self,
        classes: impl IntoIterator<Item = &'a ClassId>,
    ) -> Vec<ClassId> {
        classes
            .into_iter()
            .flat_map(|class| self.store.additional_models(class).iter().cloned())
            .collect()
    }

    /// The persisted descriptor of a property, if compiled.
    pub fn property_schema(&self, class: &ClassId, property: &str) -> Option<&SchemaObject> {
        self.store.descriptor(class, property)
    }

    /// Properties compiled for a class, in first-compiled order.
    pub fn properties_seen(&self, class: &ClassId) -> &[String] {
        self.store.properties_seen(class)
    }

    /// Store an authoritative per-property override. On the next
    /// compilation of the class it is merged last and wins over every
    /// derived field.
    pub fn set_property_override(&mut self, class: &ClassId, property: &str, schema: SchemaObject) {
        self.store.set_descriptor(class, property, schema);
    }

    /// Look up a synthesized mapped-type class by identity.
    pub fn synthetic_class(&self, class: &ClassId) -> Option<&SyntheticClass> {
        self.materializer.get(class)
    }

    /// Drop all registry entries. Test lifecycle only.
    pub fn reset_registry(&mut self) {
        self.registry.reset();
    }
}

/// Decide optionality and nullability from the property's root node.
///
/// `required` mirrors the root's optional flag. `nullable` is emitted only
/// when the root child is the literal `null` or a union containing one;
/// otherwise the key stays absent.
fn derive_required_nullable(root: &RootNode) -> SchemaObject {
    let has_null = root.child().is_some_and(|child| {
        child.is_null_literal()
            || (matches!(child.kind, NodeKind::Union)
                && child.children.iter().any(TypeNode::is_null_literal))
    });

    SchemaObject {
        required: Some(!root.optional),
        nullable: has_null.then_some(true),
        ..SchemaObject::default()
    }
}

fn compile_literal(expected: &LiteralValue) -> SchemaObject {
    let mut out = SchemaObject::default();
    match expected {
        LiteralValue::String(text) => {
            out.ty = TypeSlot::Set(SchemaType::String);
            out.pattern = Some(format!("^{}$", escape_regex(text)));
            out.example = Some(Value::String(text.clone()));
        }
        LiteralValue::Number(_) => {
            out.ty = TypeSlot::Set(SchemaType::Number);
            out.example = Some(expected.to_json());
        }
        LiteralValue::Boolean(value) => {
            out.ty = TypeSlot::Set(SchemaType::Boolean);
            out.example = Some(Value::Bool(*value));
        }
        // Not a scalar: the fragment carries no type at all, and must erase
        // the orchestrator's placeholder.
        LiteralValue::Null => {
            out.ty = TypeSlot::Cleared;
        }
    }
    out
}

fn push_unique(list: &mut Vec<ClassId>, class: ClassId) {
    if !list.contains(&class) {
        list.push(class);
    }
}

/// Escape regex metacharacters so a literal acts as an exact match.
fn escape_regex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(
            c,
            '\\' | '^'
                | '$'
                | '.'
                | '|'
                | '?'
                | '*'
                | '+'
                | '('
                | ')'
                | '['
                | ']'
                | '{'
                | '}'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
