//! Compile reflected type trees into OpenAPI schema descriptors.
//!
//! An external reflection engine hands this crate structural type trees
//! (strings, unions, class references, mapped types and so on) through the
//! [`TypeReflector`] seam; [`ModelCompiler`] walks them and produces
//! [`SchemaObject`] descriptors suitable for an OpenAPI `components/schemas`
//! document.
//!
//! Mapped types (`Partial`, `Pick`, `Omit`) have no declared class of their
//! own; the compiler synthesizes one per distinct application, under a
//! deterministic name like `Pick<Embed, name>`, and tracks every referenced
//! model in an insertion-ordered registry so the embedder can emit `$ref`
//! targets for all of them.
//!
//! # Example
//!
//! ```
//! use typetree_openapi::{
//!     ModelCompiler, PropertyTree, RootNode, StaticReflector, TypeNode,
//! };
//!
//! let mut reflector = StaticReflector::new();
//! let embed = reflector.add_class(
//!     "Embed",
//!     vec![PropertyTree::new("name", RootNode::new(TypeNode::string()))],
//! );
//!
//! let mut compiler = ModelCompiler::new(reflector);
//! compiler.compile_model(&embed)?;
//!
//! let name = compiler.property_schema(&embed, "name").unwrap();
//! assert_eq!(name.required, Some(true));
//! # Ok::<(), typetree_openapi::SchemaError>(())
//! ```

pub mod compiler;
pub mod error;
pub mod ir;
pub mod reflect;
pub mod registry;
pub mod schema;
pub mod store;

pub use compiler::mapped::{MappedOperator, MappedTypeMaterializer, SyntheticClass};
pub use compiler::ModelCompiler;
pub use error::SchemaError;
pub use ir::{
    AnnotationMap, ClassMeta, ClassOrigin, CommentTag, LiteralValue, NodeKind, PropertyComment,
    PropertyTree, RootNode, TypeNode, ValidatorRule,
};
pub use reflect::{ClassId, ClassReference, StaticReflector, TypeReflector};
pub use registry::ModelRegistry;
pub use schema::{schema_path, ExampleValue, SchemaObject, SchemaType, TypeSlot};
pub use store::MetadataStore;
