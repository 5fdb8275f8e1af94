//! Error types for schema compilation.
//!
//! Failures are immediate and synchronous: compilation is a pure tree walk,
//! so nothing is retried and there is no partial-success mode. Either a
//! property's full descriptor is produced or the whole model compilation
//! fails.

use thiserror::Error;

/// Error raised while compiling a type tree into a schema descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The tree contains a shape that has no nominal schema representation:
    /// tuples, object literals, interfaces, or a union left empty after
    /// null-filtering.
    #[error("unsupported shape: {reason}")]
    UnsupportedShape {
        /// What made the shape unrepresentable.
        reason: String,
    },

    /// A class node's reference could not be resolved by the reflector.
    #[error("could not resolve class for reference {reference}")]
    UnresolvedReference {
        /// The opaque reference token that failed to resolve.
        reference: String,
    },
}

impl SchemaError {
    /// Create an [`SchemaError::UnsupportedShape`] with the given reason.
    pub fn unsupported(reason: impl Into<String>) -> Self {
        SchemaError::UnsupportedShape {
            reason: reason.into(),
        }
    }

    /// Create an [`SchemaError::UnresolvedReference`] for the given token.
    pub fn unresolved(reference: impl Into<String>) -> Self {
        SchemaError::UnresolvedReference {
            reference: reference.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_shape_display() {
        let err = SchemaError::unsupported("tuple types are not implemented");
        assert_eq!(
            err.to_string(),
            "unsupported shape: tuple types are not implemented"
        );
    }

    #[test]
    fn test_unresolved_reference_display() {
        let err = SchemaError::unresolved("ref:Embed");
        assert_eq!(
            err.to_string(),
            "could not resolve class for reference ref:Embed"
        );
    }
}
