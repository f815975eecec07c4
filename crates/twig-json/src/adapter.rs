//! [`TreeAdapter`] for `serde_json::Value` documents.
//!
//! A node is a JSON object. Its id lives under the configured id field, its
//! children in the array under the configured children field, and every
//! other field is a property.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use serde_json::Value;
use twig_tree::TreeAdapter;

use crate::config::JsonTreeConfig;

/// One field-level change between two versions of a node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum FieldChange {
    Added { key: String, value: Value },
    Removed { key: String, value: Value },
    Modified { key: String, old: Value, new: Value },
}

impl FieldChange {
    pub fn key(&self) -> &str {
        match self {
            FieldChange::Added { key, .. }
            | FieldChange::Removed { key, .. }
            | FieldChange::Modified { key, .. } => key,
        }
    }
}

/// The property changes of one node, ordered by key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PropertyChange {
    pub node_id: String,
    pub changes: Vec<FieldChange>,
}

/// Reads JSON objects as tree nodes.
#[derive(Clone, Debug, Default)]
pub struct JsonTree {
    config: JsonTreeConfig,
}

impl JsonTree {
    pub fn new(config: JsonTreeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &JsonTreeConfig {
        &self.config
    }

    fn properties<'v>(&self, node: &'v Value) -> BTreeMap<&'v str, &'v Value> {
        node.as_object()
            .map(|fields| {
                fields
                    .iter()
                    .filter(|(key, _)| self.config.is_property(key))
                    .map(|(key, value)| (key.as_str(), value))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Field changes from `old` to `new`, sorted by key.
    pub fn field_changes(&self, old: &Value, new: &Value) -> Vec<FieldChange> {
        let old = self.properties(old);
        let new = self.properties(new);
        let keys: BTreeSet<&str> = old.keys().chain(new.keys()).copied().collect();

        keys.into_iter()
            .filter_map(|key| match (old.get(key), new.get(key)) {
                (Some(&before), Some(&after)) if before != after => Some(FieldChange::Modified {
                    key: key.to_string(),
                    old: before.clone(),
                    new: after.clone(),
                }),
                (Some(&before), None) => Some(FieldChange::Removed {
                    key: key.to_string(),
                    value: before.clone(),
                }),
                (None, Some(&after)) => Some(FieldChange::Added {
                    key: key.to_string(),
                    value: after.clone(),
                }),
                _ => None,
            })
            .collect()
    }
}

impl TreeAdapter<Value> for JsonTree {
    type Id = String;
    type Detail = PropertyChange;

    fn children<'n>(&self, node: &'n Value) -> Vec<&'n Value> {
        node.get(&self.config.children_field)
            .and_then(Value::as_array)
            .map(|items| items.iter().collect())
            .unwrap_or_default()
    }

    fn node_id(&self, node: &Value) -> Option<String> {
        match node.get(&self.config.id_field)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    fn property_modify_detail(&self, old: &Value, new: &Value) -> Option<PropertyChange> {
        let changes = self.field_changes(old, new);
        if changes.is_empty() {
            return None;
        }
        Some(PropertyChange {
            node_id: self.node_id(new)?,
            changes,
        })
    }

    fn is_property_changed(&self, old: &Value, new: &Value) -> bool {
        self.properties(old) != self.properties(new)
    }
}
