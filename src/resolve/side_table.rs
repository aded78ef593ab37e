use crate::types::ResourceKey;
use serde_json::Value;
use std::collections::HashMap;

/// Index over a document's `included` pool, keyed by `(type, id)`
#[derive(Debug, Default)]
pub struct SideTable<'a> {
    entries: HashMap<ResourceKey, &'a Value>,
}

impl<'a> SideTable<'a> {
    /// Index the `included` member of a document.
    ///
    /// Entries without a scalar `type` and `id` cannot be addressed and are
    /// left out. On duplicate keys the first entry wins.
    pub fn from_included(included: &'a [Value]) -> Self {
        let mut entries = HashMap::with_capacity(included.len());
        for resource in included {
            if let Some(key) = ResourceKey::from_value(resource) {
                entries.entry(key).or_insert(resource);
            }
        }
        SideTable { entries }
    }

    /// Find the resource an identifier object points at
    pub fn lookup(&self, identifier: &Value) -> Option<(ResourceKey, &'a Value)> {
        let key = ResourceKey::from_value(identifier)?;
        let resource = self.entries.get(&key).copied()?;
        Some((key, resource))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
