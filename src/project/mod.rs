//! Document projection - turn domain objects into normalized documents
//!
//! A [`Serializer`] walks a source object with a rule set: declared attributes
//! are copied or computed, declared relationships become `{type, id}`
//! references, and every related object that can serialize itself is
//! flattened into the `included` pool.
//!
//! ```rust
//! use kiln::project::{SerializationRules, Serializer};
//! use serde_json::json;
//!
//! let car = json!({"id": 1, "type": "car", "brand": "BMW"});
//! let rules = SerializationRules::new().attribute("brand");
//! let json = Serializer::new(rules).with_data(&car).to_json().unwrap();
//!
//! assert_eq!(
//!     json,
//!     r#"{"data":{"id":1,"type":"car","attributes":{"brand":"BMW"},"relationships":{}},"included":[]}"#
//! );
//! ```

pub mod rule_book;
pub mod rules;
pub mod serializer;
pub mod source;

pub use rule_book::{serialize_with, AttributeSpec, JsonResource, RuleBook, TypeRules};
pub use rules::{AttributeRule, ComputeFn, RelationshipRule, SerializationRules};
pub use serializer::{Processed, Serializer};
pub use source::{Member, Related, Resource, Serializable, Source};
