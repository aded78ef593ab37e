use crate::resolve::side_table::SideTable;
use crate::types::{ParseConfig, ParsedNode, ResourceKey};
use serde_json::{Map, Value};
use tracing::{debug, trace};

/// Inlines relationship identifiers of a document into a nested tree
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    config: ParseConfig,
}

impl Resolver {
    pub fn new(config: ParseConfig) -> Self {
        Resolver { config }
    }

    pub fn config(&self) -> &ParseConfig {
        &self.config
    }

    /// Resolve a whole document.
    ///
    /// The output mirrors the shape of `data`: an object becomes one node, an
    /// array becomes an array of nodes in the same order. A missing document
    /// or missing `data` yields `{}`.
    pub fn parse(&self, document: Option<&Value>) -> ParsedNode {
        let Some(document) = document.and_then(Value::as_object) else {
            return empty_node();
        };

        let table = match document.get("included") {
            Some(Value::Array(included)) => Some(SideTable::from_included(included)),
            _ => None,
        };

        let mut path = Vec::new();
        match document.get("data") {
            Some(Value::Array(items)) => Value::Array(
                items
                    .iter()
                    .map(|item| self.resolve_node(item, table.as_ref(), 1, &mut path))
                    .collect(),
            ),
            Some(data @ Value::Object(_)) => self.resolve_node(data, table.as_ref(), 1, &mut path),
            _ => empty_node(),
        }
    }

    /// Without a depth limit, back references to included resources already
    /// on the current path are cut so cyclic side-tables still terminate
    fn guards_cycles(&self) -> bool {
        self.config.depth_limit().is_none()
    }

    /// Resolve one resource object found at `level` (root = 1)
    fn resolve_node(
        &self,
        node: &Value,
        table: Option<&SideTable<'_>>,
        level: usize,
        path: &mut Vec<ResourceKey>,
    ) -> ParsedNode {
        if self.config.prunes(level) {
            trace!(level, "depth limit reached, pruning node");
            return empty_node();
        }

        let Some(obj) = node.as_object().filter(|obj| !obj.is_empty()) else {
            return empty_node();
        };

        let mut parsed = Map::new();
        for field in ["id", "type"] {
            if let Some(value) = obj.get(field) {
                parsed.insert(field.to_string(), value.clone());
            }
        }

        let attributes = match obj.get("attributes") {
            Some(Value::Object(attrs)) if !attrs.is_empty() => Value::Object(attrs.clone()),
            _ => empty_node(),
        };
        parsed.insert("attributes".to_string(), attributes);

        if let Some(Value::Object(relationships)) = obj.get("relationships") {
            for (name, entry) in relationships {
                let resolved = self.resolve_relationship(name, entry, table, level, path);
                parsed.insert(name.clone(), resolved);
            }
        }

        Value::Object(parsed)
    }

    /// Resolve a single relationship entry into a node, an array of nodes, or `{}`
    fn resolve_relationship(
        &self,
        name: &str,
        entry: &Value,
        table: Option<&SideTable<'_>>,
        level: usize,
        path: &mut Vec<ResourceKey>,
    ) -> ParsedNode {
        match entry.get("data") {
            None | Some(Value::Null) => empty_node(),
            Some(Value::Array(identifiers)) => {
                let Some(table) = table else {
                    return Value::Array(Vec::new());
                };

                let mut resolved = Vec::with_capacity(identifiers.len());
                for identifier in identifiers {
                    match self.resolve_target(identifier, table, level, path) {
                        Some(node) => resolved.push(node),
                        None => debug!(relationship = name, %identifier, "dropping unresolved identifier"),
                    }
                }
                Value::Array(resolved)
            }
            Some(identifier) => table
                .and_then(|table| self.resolve_target(identifier, table, level, path))
                .unwrap_or_else(|| {
                    debug!(relationship = name, %identifier, "unresolved to-one identifier");
                    empty_node()
                }),
        }
    }

    /// Look up an identifier and resolve the matched resource one level deeper
    fn resolve_target(
        &self,
        identifier: &Value,
        table: &SideTable<'_>,
        level: usize,
        path: &mut Vec<ResourceKey>,
    ) -> Option<ParsedNode> {
        let (key, resource) = table.lookup(identifier)?;

        if !self.guards_cycles() {
            return Some(self.resolve_node(resource, Some(table), level + 1, path));
        }

        if path.contains(&key) {
            debug!(resource = %key, "cycle in included resources, cutting back reference");
            return Some(empty_node());
        }

        path.push(key);
        let resolved = self.resolve_node(resource, Some(table), level + 1, path);
        path.pop();
        Some(resolved)
    }
}

/// Resolve a document into a nested tree using `config`
pub fn parse(document: Option<&Value>, config: &ParseConfig) -> ParsedNode {
    Resolver::new(config.clone()).parse(document)
}

/// Deep copy of a parsed tree; the copy shares no storage with `node`
pub fn clone(node: &ParsedNode) -> ParsedNode {
    node.clone()
}

fn empty_node() -> Value {
    Value::Object(Map::new())
}
