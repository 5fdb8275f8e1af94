//! Doc-comment extraction.
//!
//! Turns a property's structured doc comment into `description`, `example`
//! or `examples` descriptor fields.

use indexmap::IndexMap;
use serde_json::Value;

use crate::ir::PropertyComment;
use crate::schema::{ExampleValue, SchemaObject};

/// Derive description and example fields from a doc comment.
///
/// `example` tags are collected in declaration order and the first
/// `description` tag wins. A single example becomes the `example` key;
/// several become the named `examples` mapping, each tag parsed as
/// `name: value` with multi-line values permitted and an `Unnamed <index>`
/// fallback for tags that do not parse.
pub(crate) fn extract_description(comment: Option<&PropertyComment>) -> SchemaObject {
    let Some(comment) = comment else {
        return SchemaObject::default();
    };

    let mut out = SchemaObject::default();
    out.description = comment
        .tags
        .iter()
        .find(|tag| tag.name == "description")
        .map(|tag| tag.text.clone());

    let examples: Vec<&str> = comment
        .tags
        .iter()
        .filter(|tag| tag.name == "example")
        .map(|tag| tag.text.as_str())
        .collect();

    match examples.as_slice() {
        [] => {}
        [single] => {
            out.example = Some(Value::String((*single).to_string()));
        }
        many => {
            let mut map = IndexMap::new();
            for (index, text) in many.iter().enumerate() {
                match split_named_example(text) {
                    Some((name, value)) => {
                        map.insert(
                            name.to_string(),
                            ExampleValue {
                                value: Some(value.to_string()),
                            },
                        );
                    }
                    None => {
                        map.insert(format!("Unnamed {index}"), ExampleValue { value: None });
                    }
                }
            }
            out.examples = Some(map);
        }
    }

    out
}

/// Split an example tag of the form `name: value`.
///
/// The name runs up to the first colon and must sit on the first line; the
/// value is the remainder with leading whitespace stripped and may span
/// multiple lines.
fn split_named_example(text: &str) -> Option<(&str, &str)> {
    let (name, rest) = text.split_once(':')?;
    if name.is_empty() || name.contains('\n') {
        return None;
    }
    let value = rest.trim_start();
    if value.is_empty() {
        return None;
    }
    Some((name, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_comment_yields_empty_fragment() {
        assert_eq!(extract_description(None), SchemaObject::default());
    }

    #[test]
    fn test_description_without_examples() {
        let comment = PropertyComment::new().with_tag("description", "A test string");
        let out = extract_description(Some(&comment));
        assert_eq!(out.description.as_deref(), Some("A test string"));
        assert!(out.example.is_none());
        assert!(out.examples.is_none());
    }

    #[test]
    fn test_single_example_with_description() {
        let comment = PropertyComment::new()
            .with_tag("description", "This is a test string")
            .with_tag("example", "test");
        let out = extract_description(Some(&comment));
        assert_eq!(out.description.as_deref(), Some("This is a test string"));
        assert_eq!(out.example, Some(json!("test")));
        assert!(out.examples.is_none());
    }

    #[test]
    fn test_first_description_tag_wins() {
        let comment = PropertyComment::new()
            .with_tag("description", "first")
            .with_tag("description", "second");
        let out = extract_description(Some(&comment));
        assert_eq!(out.description.as_deref(), Some("first"));
    }

    #[test]
    fn test_multiple_examples_build_named_mapping() {
        let comment = PropertyComment::new()
            .with_tag("example", "short: a")
            .with_tag("example", "long: b\nc");
        let out = extract_description(Some(&comment));
        assert!(out.example.is_none());

        let examples = out.examples.unwrap();
        let names: Vec<_> = examples.keys().cloned().collect();
        assert_eq!(names, vec!["short", "long"]);
        assert_eq!(examples["short"].value.as_deref(), Some("a"));
        assert_eq!(examples["long"].value.as_deref(), Some("b\nc"));
    }

    #[test]
    fn test_unparsed_examples_get_synthesized_names() {
        let comment = PropertyComment::new()
            .with_tag("example", "no separator")
            .with_tag("example", "named: value");
        let out = extract_description(Some(&comment));
        let examples = out.examples.unwrap();
        assert_eq!(examples["Unnamed 0"].value, None);
        assert_eq!(examples["named"].value.as_deref(), Some("value"));
    }

    #[test]
    fn test_split_rejects_name_spanning_lines() {
        assert_eq!(split_named_example("a\nb: v"), None);
        assert_eq!(split_named_example("a: "), None);
        assert_eq!(split_named_example(": v"), None);
        assert_eq!(split_named_example("a: v"), Some(("a", "v")));
    }
}
