//! Schema descriptors.
//!
//! [`SchemaObject`] is the OpenAPI-shaped output of the compiler: a mapping
//! of recognized keys, serialized with their OpenAPI spellings and with
//! absent keys skipped. Descriptors are assembled by merging fragments from
//! independent sources; [`SchemaObject::merge`] implements the last-write-
//! wins rule the orchestrator relies on.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// `$ref` path for a schema component with the given name.
pub fn schema_path(name: &str) -> String {
    format!("#/components/schemas/{name}")
}

/// The `type` value of a schema fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    /// A string.
    String,
    /// A number.
    Number,
    /// A boolean.
    Boolean,
    /// An integer (asserted by a validator, never by the tree itself).
    Integer,
    /// An object.
    Object,
    /// An array.
    Array,
    /// Any value.
    Any,
    /// Placeholder for fragments that carry no type of their own, such as a
    /// multi-member `oneOf`.
    Unknown,
}

/// Three-state slot for the `type` key.
///
/// Merging must distinguish a fragment that says nothing about `type`
/// (`Unset`, the underlying value survives) from one that erases it
/// (`Cleared`, produced by a malformed literal): a null literal must remove
/// the orchestrator's `unknown` placeholder, while a multi-member `oneOf`
/// keeps it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TypeSlot {
    /// The fragment says nothing about `type`.
    #[default]
    Unset,
    /// The fragment explicitly removes `type`.
    Cleared,
    /// The fragment sets `type`.
    Set(SchemaType),
}

impl TypeSlot {
    /// Whether serialization should skip this slot.
    pub fn is_absent(&self) -> bool {
        !matches!(self, TypeSlot::Set(_))
    }

    /// Whether the slot carries no information for merging.
    pub fn is_unset(&self) -> bool {
        matches!(self, TypeSlot::Unset)
    }

    /// The contained type, if set.
    pub fn get(&self) -> Option<SchemaType> {
        match self {
            TypeSlot::Set(ty) => Some(*ty),
            _ => None,
        }
    }
}

impl Serialize for TypeSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TypeSlot::Set(ty) => ty.serialize(serializer),
            // Skipped via skip_serializing_if; serialized as null if forced.
            TypeSlot::Unset | TypeSlot::Cleared => serializer.serialize_unit(),
        }
    }
}

/// A named example, as used in the multi-example `examples` mapping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExampleValue {
    /// The example text; absent for tags that did not parse as
    /// `name: value`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// A JSON-Schema/OpenAPI-compatible schema descriptor.
///
/// Not all keys are mutually exclusive; the orchestrator's merge order
/// decides which source wins on collision.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchemaObject {
    /// The schema type.
    #[serde(rename = "type", skip_serializing_if = "TypeSlot::is_absent")]
    pub ty: TypeSlot,

    /// String format, e.g. `email` or `date-time`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Regular expression the value must match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Inclusive numeric lower bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,

    /// Inclusive numeric upper bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,

    /// Minimum string length.
    #[serde(rename = "minLength", skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,

    /// Maximum string length.
    #[serde(rename = "maxLength", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,

    /// Minimum array length.
    #[serde(rename = "minItems", skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,

    /// Maximum array length.
    #[serde(rename = "maxItems", skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,

    /// Element schema of an array.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaObject>>,

    /// Inline property schemas. Never produced by the compiler itself;
    /// recognized so explicit overrides can carry it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, SchemaObject>>,

    /// Reference to another schema component.
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    /// The value matches exactly one of these schemas.
    #[serde(rename = "oneOf", skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<SchemaObject>>,

    /// The value matches all of these schemas.
    #[serde(rename = "allOf", skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Vec<SchemaObject>>,

    /// Allowed values of an enumeration.
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    /// Name of the enumeration type.
    #[serde(rename = "enumName", skip_serializing_if = "Option::is_none")]
    pub enum_name: Option<String>,

    /// A single example value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,

    /// Named examples, keyed by example name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<IndexMap<String, ExampleValue>>,

    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether the property must be present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    /// Whether the value may be `null`. Absent means "not applicable", which
    /// is distinct from an explicit `false`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
}

impl SchemaObject {
    /// A fragment that only sets `type`.
    pub fn of_type(ty: SchemaType) -> Self {
        Self {
            ty: TypeSlot::Set(ty),
            ..Self::default()
        }
    }

    /// Overlay `other` onto `self`: every key `other` carries overwrites the
    /// corresponding key of `self`; keys `other` says nothing about are left
    /// alone. For `type`, an explicit clear also overwrites.
    pub fn merge(&mut self, other: SchemaObject) {
        if !other.ty.is_unset() {
            self.ty = other.ty;
        }
        if other.format.is_some() {
            self.format = other.format;
        }
        if other.pattern.is_some() {
            self.pattern = other.pattern;
        }
        if other.minimum.is_some() {
            self.minimum = other.minimum;
        }
        if other.maximum.is_some() {
            self.maximum = other.maximum;
        }
        if other.min_length.is_some() {
            self.min_length = other.min_length;
        }
        if other.max_length.is_some() {
            self.max_length = other.max_length;
        }
        if other.min_items.is_some() {
            self.min_items = other.min_items;
        }
        if other.max_items.is_some() {
            self.max_items = other.max_items;
        }
        if other.items.is_some() {
            self.items = other.items;
        }
        if other.properties.is_some() {
            self.properties = other.properties;
        }
        if other.reference.is_some() {
            self.reference = other.reference;
        }
        if other.one_of.is_some() {
            self.one_of = other.one_of;
        }
        if other.all_of.is_some() {
            self.all_of = other.all_of;
        }
        if other.enum_values.is_some() {
            self.enum_values = other.enum_values;
        }
        if other.enum_name.is_some() {
            self.enum_name = other.enum_name;
        }
        if other.example.is_some() {
            self.example = other.example;
        }
        if other.examples.is_some() {
            self.examples = other.examples;
        }
        if other.description.is_some() {
            self.description = other.description;
        }
        if other.required.is_some() {
            self.required = other.required;
        }
        if other.nullable.is_some() {
            self.nullable = other.nullable;
        }
    }
}
