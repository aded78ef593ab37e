//! Capabilities a domain type opts into to be projected into a document.

use crate::project::rules::SerializationRules;
use crate::project::serializer::{Processed, Serializer};
use serde_json::Value;

/// Field access on a source object
pub trait Source {
    /// Read a field by name. `None` when the object has no such field.
    fn field(&self, name: &str) -> Option<Value>;

    /// Nested members held by a relationship field
    fn related(&self, _name: &str) -> Related<'_> {
        Related::Absent
    }
}

/// Contents of a relationship field on a source object
pub enum Related<'a> {
    /// The field holds a sequence
    Many(Vec<Member<'a>>),
    /// The field is missing or not a sequence
    Absent,
}

/// One element of a relationship sequence
pub enum Member<'a> {
    Borrowed(&'a dyn Serializable),
    Owned(Box<dyn Serializable + 'a>),
    /// An element that cannot serialize itself; it is skipped
    Plain,
}

impl<'a> Member<'a> {
    pub fn serializable(&self) -> Option<&dyn Serializable> {
        match self {
            Member::Borrowed(item) => Some(*item),
            Member::Owned(item) => Some(&**item),
            Member::Plain => None,
        }
    }
}

/// A value that can render itself, and everything it relates to, as a document
pub trait Serializable {
    fn serialize(&self) -> Processed;
}

/// A source object that carries its own serialization rules
pub trait Resource: Source + Sized {
    fn rules(&self) -> SerializationRules<Self>;
}

impl<T: Resource> Serializable for T {
    fn serialize(&self) -> Processed {
        Serializer::new(self.rules()).project(self)
    }
}

/// Plain JSON objects expose their members as fields. Sequence elements carry
/// no rules of their own, so they never serialize.
impl Source for Value {
    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }

    fn related(&self, name: &str) -> Related<'_> {
        match self.get(name) {
            Some(Value::Array(items)) => Related::Many(items.iter().map(|_| Member::Plain).collect()),
            _ => Related::Absent,
        }
    }
}
