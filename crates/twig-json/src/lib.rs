//! JSON documents as Twig trees.
//!
//! Wraps `serde_json::Value` in a [`TreeAdapter`](twig_tree::TreeAdapter)
//! so two JSON documents can be diffed node by node. Nodes are objects
//! carrying an id field and a children array; all other fields are
//! compared as properties.
//!
//! # Key Types
//!
//! - [`JsonTree`] -- The adapter
//! - [`JsonTreeConfig`] -- Field names, loadable from TOML
//! - [`PropertyChange`] / [`FieldChange`] -- Property diff of one node

pub mod adapter;
pub mod config;
pub mod error;

use std::path::Path;

use serde_json::Value;
use tracing::debug;
use twig_tree::{DiffOptions, Operation, TreeDiff};

pub use adapter::{FieldChange, JsonTree, PropertyChange};
pub use config::JsonTreeConfig;
pub use error::{JsonTreeError, JsonTreeResult};

/// An operation over a JSON document.
pub type JsonOperation = Operation<String, PropertyChange>;

/// Diff two parsed documents.
pub fn diff_documents(
    old: &Value,
    new: &Value,
    config: &JsonTreeConfig,
    options: DiffOptions,
) -> JsonTreeResult<Vec<JsonOperation>> {
    let adapter = JsonTree::new(config.clone());
    let ops = TreeDiff::with_options(old, new, adapter, options).into_operations()?;
    debug!(operations = ops.len(), "documents diffed");
    Ok(ops)
}

/// Parse and diff two JSON texts.
pub fn diff_json_str(
    old: &str,
    new: &str,
    config: &JsonTreeConfig,
    options: DiffOptions,
) -> JsonTreeResult<Vec<JsonOperation>> {
    let old: Value = serde_json::from_str(old)?;
    let new: Value = serde_json::from_str(new)?;
    diff_documents(&old, &new, config, options)
}

/// Read a JSON document from disk.
pub fn read_document(path: impl AsRef<Path>) -> JsonTreeResult<Value> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
