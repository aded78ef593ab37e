use crate::error::{Error, Result};
use crate::project::rules::{AttributeRule, SerializationRules};
use crate::project::source::{Related, Source};
use crate::types::SerializeConfig;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::HashSet;
use tracing::{debug, trace};

/// A normalized document: primary data plus the flat `included` pool
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Processed {
    pub data: Value,
    pub included: Vec<Value>,
}

impl Processed {
    /// Canonical string form `{"data":...,"included":[...]}`
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Join per-item documents into one with array `data`, keeping every
    /// `included` entry in item order
    pub fn concat(parts: impl IntoIterator<Item = Processed>) -> Processed {
        let mut data = Vec::new();
        let mut included = Vec::new();
        for part in parts {
            data.push(part.data);
            included.extend(part.included);
        }
        Processed {
            data: Value::Array(data),
            included,
        }
    }

    /// Apply the output options of `config`
    pub fn finish(mut self, config: &SerializeConfig) -> Processed {
        if config.dedupe_included {
            self.dedupe_included();
        }
        self
    }

    pub fn into_value(self) -> Value {
        json!({"data": self.data, "included": self.included})
    }

    /// Keep only the first `included` entry for every `(type, id)` pair
    pub fn dedupe_included(&mut self) {
        let mut seen = HashSet::new();
        let before = self.included.len();
        self.included
            .retain(|resource| seen.insert((resource["type"].to_string(), resource["id"].to_string())));
        if before != self.included.len() {
            debug!(removed = before - self.included.len(), "deduplicated included resources");
        }
    }
}

/// What a serializer projects: one object or a sequence of them
enum Input<'a, T> {
    One(&'a T),
    Many(&'a [T]),
}

/// Projects source objects into documents following a rule set.
///
/// A serializer without bound data fails every output call with
/// [`Error::MissingSourceData`].
pub struct Serializer<'a, T> {
    data: Option<Input<'a, T>>,
    rules: SerializationRules<T>,
    config: SerializeConfig,
}

impl<'a, T: Source> Serializer<'a, T> {
    pub fn new(rules: SerializationRules<T>) -> Self {
        Serializer {
            data: None,
            rules,
            config: SerializeConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SerializeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_data(mut self, data: &'a T) -> Self {
        self.data = Some(Input::One(data));
        self
    }

    pub fn with_many(mut self, data: &'a [T]) -> Self {
        self.data = Some(Input::Many(data));
        self
    }

    pub fn rules(&self) -> &SerializationRules<T> {
        &self.rules
    }

    /// Project the bound data into a document
    pub fn to_processed(&self) -> Result<Processed> {
        let input = self.data.as_ref().ok_or(Error::MissingSourceData)?;

        let processed = match input {
            Input::One(item) => self.project(item),
            Input::Many(items) => Processed::concat(items.iter().map(|item| self.project(item))),
        };

        Ok(processed.finish(&self.config))
    }

    pub fn to_json(&self) -> Result<String> {
        self.to_processed()?.to_json()
    }

    /// Project a single object, independent of any bound data
    pub fn project(&self, item: &T) -> Processed {
        let mut included = Vec::new();

        let mut attributes = Map::new();
        for rule in &self.rules.attributes {
            match rule {
                AttributeRule::Field(name) => {
                    if let Some(value) = item.field(name) {
                        attributes.insert(name.clone(), value);
                    }
                }
                AttributeRule::Computed { name, value } => {
                    attributes.insert(name.clone(), value(item));
                }
            }
        }

        let mut relationships = Map::new();
        for rule in &self.rules.relationships {
            let data = match item.related(&rule.name) {
                Related::Many(members) => {
                    let mut references = Vec::with_capacity(members.len());
                    for member in &members {
                        let Some(nested) = member.serializable() else {
                            trace!(relationship = %rule.name, "skipping member without serialization rules");
                            continue;
                        };
                        let Processed { data, included: nested_included } = nested.serialize();
                        references.push(reference_to(&data));
                        included.push(data);
                        included.extend(nested_included);
                    }
                    Value::Array(references)
                }
                Related::Absent => Value::Null,
            };
            relationships.insert(rule.name.clone(), json!({ "data": data }));
        }

        let data = json!({
            "id": item.field("id").unwrap_or(Value::Null),
            "type": item.field("type").unwrap_or(Value::Null),
            "attributes": attributes,
            "relationships": relationships,
        });

        Processed { data, included }
    }
}

/// `{id, type}` reference to a projected resource object
fn reference_to(resource: &Value) -> Value {
    json!({
        "id": resource.get("id").cloned().unwrap_or(Value::Null),
        "type": resource.get("type").cloned().unwrap_or(Value::Null),
    })
}
