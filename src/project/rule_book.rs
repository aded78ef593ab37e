//! Rule sets for plain JSON objects, keyed by resource type
//!
//! A rule book is loaded from JSON such as:
//!
//! ```json
//! {
//!   "posts": { "attributes": ["title", {"name": "body"}], "relationships": ["tags"] },
//!   "tags":  { "attributes": ["label"] }
//! }
//! ```
//!
//! Objects whose `type` has an entry in the book can serialize themselves, so
//! they are followed through relationship sequences. Objects of unknown type
//! are skipped.

use crate::project::rules::SerializationRules;
use crate::project::serializer::Processed;
use crate::project::source::{Member, Related, Resource, Serializable, Source};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// An attribute entry: a bare field name or `{"name": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeSpec {
    Name(String),
    Named { name: String },
}

impl AttributeSpec {
    pub fn name(&self) -> &str {
        match self {
            AttributeSpec::Name(name) => name,
            AttributeSpec::Named { name } => name,
        }
    }
}

/// Serialization rules for one resource type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeRules {
    pub attributes: Vec<AttributeSpec>,
    pub relationships: Vec<String>,
}

impl TypeRules {
    pub fn to_rules<T>(&self) -> SerializationRules<T> {
        let rules = self
            .attributes
            .iter()
            .fold(SerializationRules::new(), |rules, attr| rules.attribute(attr.name()));
        self.relationships
            .iter()
            .fold(rules, |rules, rel| rules.relationship(rel.as_str()))
    }
}

/// Rules for every resource type a JSON source may contain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleBook {
    types: HashMap<String, TypeRules>,
}

impl RuleBook {
    pub fn new() -> Self {
        RuleBook::default()
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(reader).context("Failed to parse rule book")
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open rule book: {}", path.display()))?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn insert(&mut self, kind: impl Into<String>, rules: TypeRules) {
        self.types.insert(kind.into(), rules);
    }

    pub fn rules_for(&self, kind: &str) -> Option<&TypeRules> {
        self.types.get(kind)
    }

    /// Wrap `value` so it serializes with this book, if its type is known
    pub fn resource<'a>(&'a self, value: &'a Value) -> Option<JsonResource<'a>> {
        let kind = value.as_object()?.get("type")?.as_str()?;
        self.types.contains_key(kind).then_some(JsonResource { value, book: self })
    }
}

/// A plain JSON object serialized with the rules its type has in a [`RuleBook`]
#[derive(Debug, Clone, Copy)]
pub struct JsonResource<'a> {
    value: &'a Value,
    book: &'a RuleBook,
}

impl<'a> JsonResource<'a> {
    pub fn new(value: &'a Value, book: &'a RuleBook) -> Self {
        JsonResource { value, book }
    }

    pub fn value(&self) -> &'a Value {
        self.value
    }

    fn kind(&self) -> Option<&'a str> {
        self.value.get("type").and_then(Value::as_str)
    }
}

impl Source for JsonResource<'_> {
    fn field(&self, name: &str) -> Option<Value> {
        self.value.field(name)
    }

    fn related(&self, name: &str) -> Related<'_> {
        let Some(Value::Array(items)) = self.value.get(name) else {
            return Related::Absent;
        };

        let members = items
            .iter()
            .map(|item| match self.book.resource(item) {
                Some(resource) => Member::Owned(Box::new(resource)),
                None => Member::Plain,
            })
            .collect();
        Related::Many(members)
    }
}

impl Resource for JsonResource<'_> {
    fn rules(&self) -> SerializationRules<Self> {
        self.kind()
            .and_then(|kind| self.book.rules_for(kind))
            .map(TypeRules::to_rules)
            .unwrap_or_default()
    }
}

/// Serialize a plain JSON object with the rules its type has in `book`
pub fn serialize_with(book: &RuleBook, value: &Value) -> Processed {
    JsonResource::new(value, book).serialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::serializer::Serializer;
    use serde_json::json;

    fn book() -> RuleBook {
        serde_json::from_value(json!({
            "posts": {"attributes": ["title", {"name": "body"}], "relationships": ["tags", "author"]},
            "tags": {"attributes": ["label"], "relationships": ["children"]}
        }))
        .unwrap()
    }

    #[test]
    fn test_book_from_json() {
        let book = book();
        let posts = book.rules_for("posts").unwrap();
        assert_eq!(
            posts.attributes,
            vec![AttributeSpec::Name("title".into()), AttributeSpec::Named { name: "body".into() }]
        );
        assert!(book.rules_for("tags").unwrap().relationships.contains(&"children".to_string()));
        assert!(book.rules_for("users").is_none());
    }

    #[test]
    fn test_missing_sections_default() {
        let book = RuleBook::from_reader(r#"{"cars": {}}"#.as_bytes()).unwrap();
        assert_eq!(book.rules_for("cars"), Some(&TypeRules::default()));
    }

    #[test]
    fn test_invalid_book_rejected() {
        assert!(RuleBook::from_reader(r#"{"cars": {"attributes": [1]}}"#.as_bytes()).is_err());
    }

    #[test]
    fn test_known_members_followed() {
        let book = book();
        let post = json!({
            "id": "p1", "type": "posts", "title": "Hello", "body": "World", "extra": true,
            "tags": [
                {"id": "t1", "type": "tags", "label": "rust",
                 "children": [{"id": "t2", "type": "tags", "label": "serde"}]},
                {"id": "x", "type": "unknown"},
                "not an object"
            ],
            "author": {"id": "u1", "type": "users"}
        });

        let processed = serialize_with(&book, &post);
        assert_eq!(processed.data["attributes"], json!({"title": "Hello", "body": "World"}));
        assert_eq!(
            processed.data["relationships"],
            json!({
                "tags": {"data": [{"id": "t1", "type": "tags"}]},
                "author": {"data": null}
            })
        );

        // t1 first, then what t1 collected
        assert_eq!(processed.included.len(), 2);
        assert_eq!(processed.included[0]["id"], "t1");
        assert_eq!(
            processed.included[0]["relationships"]["children"]["data"],
            json!([{"id": "t2", "type": "tags"}])
        );
        assert_eq!(processed.included[1]["attributes"], json!({"label": "serde"}));
    }

    #[test]
    fn test_json_resources_through_serializer() {
        let book = book();
        let values = vec![
            json!({"id": "p1", "type": "posts", "title": "A", "tags": [{"id": "t1", "type": "tags"}]}),
            json!({"id": "p2", "type": "posts", "title": "B", "tags": [{"id": "t1", "type": "tags"}]}),
        ];
        let resources: Vec<JsonResource<'_>> = values.iter().map(|v| JsonResource::new(v, &book)).collect();

        let rules = book.rules_for("posts").unwrap().to_rules();
        let processed = Serializer::new(rules).with_many(&resources).to_processed().unwrap();
        assert_eq!(processed.data.as_array().unwrap().len(), 2);
        assert_eq!(processed.included.len(), 2);
    }

    #[test]
    fn test_unknown_type_has_no_rules() {
        let book = book();
        let value = json!({"id": "1", "type": "cars", "brand": "BMW"});
        assert!(book.resource(&value).is_none());

        let processed = serialize_with(&book, &value);
        assert_eq!(processed.data["attributes"], json!({}));
        assert_eq!(processed.data["relationships"], json!({}));
    }
}
