use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A denormalized resource tree produced by [`crate::parse`]
pub type ParsedNode = Value;

/// One half of a [`ResourceKey`]: a JSON scalar compared without coercion,
/// so the number `7` and the string `"7"` stay distinct
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyPart {
    Str(String),
    /// Numbers compare by their JSON text
    Num(String),
    Bool(bool),
}

impl KeyPart {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(KeyPart::Str(s.clone())),
            Value::Number(n) => Some(KeyPart::Num(n.to_string())),
            Value::Bool(b) => Some(KeyPart::Bool(*b)),
            _ => None,
        }
    }
}

impl fmt::Display for KeyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPart::Str(s) | KeyPart::Num(s) => f.write_str(s),
            KeyPart::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Compound `(type, id)` key addressing a resource inside a document
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceKey {
    pub kind: KeyPart,
    pub id: KeyPart,
}

impl ResourceKey {
    /// Key with string `type` and `id`
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        ResourceKey {
            kind: KeyPart::Str(kind.into()),
            id: KeyPart::Str(id.into()),
        }
    }

    /// Read the key of a resource object or resource identifier.
    ///
    /// `type` and `id` must be strings, numbers or booleans; anything else is
    /// not addressable and yields `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        Some(ResourceKey {
            kind: KeyPart::from_value(obj.get("type")?)?,
            id: KeyPart::from_value(obj.get("id")?)?,
        })
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// Configuration for resolving a document into a nested tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParseConfig {
    /// Deepest level that is still resolved (root = 1). Nodes below it
    /// become `{}`. `None` or `0` resolves everything.
    pub max_depth_level: Option<usize>,
}

impl ParseConfig {
    pub fn with_max_depth_level(mut self, level: usize) -> Self {
        self.max_depth_level = Some(level);
        self
    }

    /// The effective depth limit; `0` counts as unset
    pub fn depth_limit(&self) -> Option<usize> {
        self.max_depth_level.filter(|&max| max > 0)
    }

    /// Whether a node at `level` falls below the configured depth limit
    pub(crate) fn prunes(&self, level: usize) -> bool {
        matches!(self.depth_limit(), Some(max) if level > max)
    }
}

/// Configuration for projecting domain objects into a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerializeConfig {
    /// Drop repeated `(type, id)` entries from `included`, keeping the first
    pub dedupe_included: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_from_identifier() {
        let key = ResourceKey::from_value(&json!({"type": "tasks", "id": "1"})).unwrap();
        assert_eq!(key, ResourceKey::new("tasks", "1"));
        assert_eq!(key.to_string(), "tasks:1");
    }

    #[test]
    fn test_key_compares_scalars_strictly() {
        let numeric = ResourceKey::from_value(&json!({"type": "cars", "id": 7})).unwrap();
        assert_eq!(numeric, ResourceKey::from_value(&json!({"type": "cars", "id": 7})).unwrap());
        assert_ne!(numeric, ResourceKey::new("cars", "7"));
        assert_eq!(numeric.to_string(), "cars:7");
    }

    #[test]
    fn test_key_rejects_non_scalars() {
        assert!(ResourceKey::from_value(&json!({"type": "tasks", "id": null})).is_none());
        assert!(ResourceKey::from_value(&json!({"type": "tasks", "id": [1]})).is_none());
        assert!(ResourceKey::from_value(&json!({"id": "1"})).is_none());
        assert!(ResourceKey::from_value(&json!("tasks:1")).is_none());
    }

    #[test]
    fn test_parse_config_from_camel_case() {
        let config: ParseConfig = serde_json::from_value(json!({"maxDepthLevel": 2})).unwrap();
        assert_eq!(config.max_depth_level, Some(2));

        let config: ParseConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config, ParseConfig::default());
    }

    #[test]
    fn test_prunes_only_below_limit() {
        let config = ParseConfig::default().with_max_depth_level(2);
        assert!(!config.prunes(1));
        assert!(!config.prunes(2));
        assert!(config.prunes(3));
        assert!(!ParseConfig::default().prunes(1000));
    }

    #[test]
    fn test_zero_depth_is_unbounded() {
        let config: ParseConfig = serde_json::from_value(json!({"maxDepthLevel": 0})).unwrap();
        assert_eq!(config.depth_limit(), None);
        assert!(!config.prunes(1));
        assert!(!config.prunes(50));
    }
}
