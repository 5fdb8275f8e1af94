//! Node annotations.
//!
//! Annotations are attached to type nodes by the reflector: the structured
//! doc comment, decorator-declared validator rules, and custom flags. The
//! compiler only reads them.

use serde::{Deserialize, Serialize};

/// Annotations attached to a single type node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationMap {
    /// Structured doc comment, if the property has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<PropertyComment>,

    /// Validator rules declared on the node, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<ValidatorRule>,

    /// Marks a value that must be masked in logs. Consumed by the validation
    /// pipe, carried here untouched.
    #[serde(default)]
    pub secret: bool,

    /// Explicit example value set by a decorator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,

    /// Source field name override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_property: Option<String>,
}

impl AnnotationMap {
    /// Whether no annotation is set.
    pub fn is_empty(&self) -> bool {
        self.comment.is_none()
            && self.validators.is_empty()
            && !self.secret
            && self.example.is_none()
            && self.from_property.is_none()
    }

    /// Attach a doc comment.
    pub fn with_comment(mut self, comment: PropertyComment) -> Self {
        self.comment = Some(comment);
        self
    }

    /// Append a validator rule.
    pub fn with_validator(mut self, rule: ValidatorRule) -> Self {
        self.validators.push(rule);
        self
    }

    /// Set the explicit example value.
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }
}

/// A property's structured doc comment: an ordered list of tags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyComment {
    /// Tags in declaration order.
    pub tags: Vec<CommentTag>,
}

impl PropertyComment {
    /// Create an empty comment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tag.
    pub fn with_tag(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.tags.push(CommentTag {
            name: name.into(),
            text: text.into(),
        });
        self
    }
}

/// One `@tag text` entry of a doc comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentTag {
    /// The tag name, without the leading `@`.
    pub name: String,

    /// The tag text; may span multiple lines.
    pub text: String,
}

/// A validator rule declared on a node.
///
/// These are the decorator-asserted constraints the extractor translates into
/// schema keys. Bounds are optional on both ends; only present bounds are
/// written to the descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "camelCase")]
pub enum ValidatorRule {
    /// Pattern match: sets `pattern`.
    Regexp {
        /// The pattern source text.
        pattern: String,
    },

    /// Numeric range: sets `minimum` / `maximum`.
    Range {
        /// Lower bound, inclusive.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        /// Upper bound, inclusive.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },

    /// Integer-only: forces `type = "integer"`.
    IsInteger,

    /// Length bound. On strings sets `minLength` / `maxLength`, on arrays
    /// `minItems` / `maxItems`.
    Length {
        /// Lower bound, inclusive.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<u64>,
        /// Upper bound, inclusive.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<u64>,
    },

    /// Fully-qualified domain name: sets `format = "hostname"`.
    IsFqdn,

    /// URL: sets `format = "url"`.
    IsUrl,

    /// Email address: sets `format = "email"`.
    IsEmail,

    /// ISO-8601 timestamp: sets `format = "date-time"`.
    IsIso8601,
}

impl ValidatorRule {
    /// Length rule with both bounds.
    pub fn length(min: u64, max: u64) -> Self {
        ValidatorRule::Length {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Length rule with only a lower bound.
    pub fn min_length(min: u64) -> Self {
        ValidatorRule::Length {
            min: Some(min),
            max: None,
        }
    }

    /// Range rule with both bounds.
    pub fn range(min: f64, max: f64) -> Self {
        ValidatorRule::Range {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Regexp rule from pattern source text.
    pub fn regexp(pattern: impl Into<String>) -> Self {
        ValidatorRule::Regexp {
            pattern: pattern.into(),
        }
    }

    /// The `format` value this rule asserts, if it is a format rule.
    pub fn format(&self) -> Option<&'static str> {
        match self {
            ValidatorRule::IsFqdn => Some("hostname"),
            ValidatorRule::IsUrl => Some("url"),
            ValidatorRule::IsEmail => Some("email"),
            ValidatorRule::IsIso8601 => Some("date-time"),
            _ => None,
        }
    }
}
