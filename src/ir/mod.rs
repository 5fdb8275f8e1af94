//! Intermediate representation of reflected types.
//!
//! The node model is shared with the external reflection engine: it builds
//! the trees, the compiler in [`crate::compiler`] walks them.

mod annotations;
mod nodes;

pub use annotations::{AnnotationMap, CommentTag, PropertyComment, ValidatorRule};
pub use nodes::{
    ClassMeta, ClassOrigin, LiteralValue, NodeKind, PropertyTree, RootNode, TypeNode,
};
