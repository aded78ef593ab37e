use serde_json::Value;
use std::fmt;

/// Function computing an attribute from the source object
pub type ComputeFn<T> = Box<dyn Fn(&T) -> Value>;

/// How one attribute of a resource object is produced
pub enum AttributeRule<T> {
    /// Copy the source field of this name verbatim
    Field(String),
    /// Store the result of `value(source)` under `name`
    Computed { name: String, value: ComputeFn<T> },
}

impl<T> AttributeRule<T> {
    pub fn field(name: impl Into<String>) -> Self {
        AttributeRule::Field(name.into())
    }

    pub fn computed<F>(name: impl Into<String>, value: F) -> Self
    where
        F: Fn(&T) -> Value + 'static,
    {
        AttributeRule::Computed {
            name: name.into(),
            value: Box::new(value),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            AttributeRule::Field(name) => name,
            AttributeRule::Computed { name, .. } => name,
        }
    }
}

impl<T> From<&str> for AttributeRule<T> {
    fn from(name: &str) -> Self {
        AttributeRule::field(name)
    }
}

impl<T> fmt::Debug for AttributeRule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeRule::Field(name) => f.debug_tuple("Field").field(name).finish(),
            AttributeRule::Computed { name, .. } => {
                f.debug_struct("Computed").field("name", name).finish_non_exhaustive()
            }
        }
    }
}

/// A relationship field expected to hold a sequence of nested resources
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipRule {
    pub name: String,
}

impl RelationshipRule {
    pub fn new(name: impl Into<String>) -> Self {
        RelationshipRule { name: name.into() }
    }
}

/// Declarative mapping from a source object of type `T` to a resource object
pub struct SerializationRules<T> {
    pub attributes: Vec<AttributeRule<T>>,
    pub relationships: Vec<RelationshipRule>,
}

impl<T> SerializationRules<T> {
    pub fn new() -> Self {
        SerializationRules {
            attributes: Vec::new(),
            relationships: Vec::new(),
        }
    }

    /// Copy the named field into `attributes`
    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.attributes.push(AttributeRule::field(name));
        self
    }

    /// Compute an attribute from the whole source object
    pub fn computed<F>(mut self, name: impl Into<String>, value: F) -> Self
    where
        F: Fn(&T) -> Value + 'static,
    {
        self.attributes.push(AttributeRule::computed(name, value));
        self
    }

    pub fn relationship(mut self, name: impl Into<String>) -> Self {
        self.relationships.push(RelationshipRule::new(name));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.relationships.is_empty()
    }
}

impl<T> Default for SerializationRules<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SerializationRules<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializationRules")
            .field("attributes", &self.attributes)
            .field("relationships", &self.relationships)
            .finish()
    }
}
