use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{JsonTreeError, JsonTreeResult};

/// How a JSON document is read as a tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonTreeConfig {
    /// Object field holding the node id.
    pub id_field: String,
    /// Object field holding the array of child nodes.
    pub children_field: String,
    /// Fields left out of property comparison.
    pub ignored_fields: Vec<String>,
}

impl Default for JsonTreeConfig {
    fn default() -> Self {
        Self {
            id_field: "id".into(),
            children_field: "children".into(),
            ignored_fields: Vec::new(),
        }
    }
}

impl JsonTreeConfig {
    /// Parse a config from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> JsonTreeResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| JsonTreeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a config from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> JsonTreeResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        debug!(path = %path.display(), id_field = %config.id_field, "adapter config loaded");
        Ok(config)
    }

    /// Whether `key` takes part in property comparison.
    pub fn is_property(&self, key: &str) -> bool {
        key != self.id_field
            && key != self.children_field
            && !self.ignored_fields.iter().any(|f| f == key)
    }

    /// Reject empty or clashing field names.
    pub fn validate(&self) -> JsonTreeResult<()> {
        if self.id_field.is_empty() || self.children_field.is_empty() {
            return Err(JsonTreeError::Config("field names must not be empty".into()));
        }
        if self.id_field == self.children_field {
            return Err(JsonTreeError::Config(format!(
                "id_field and children_field are both {:?}",
                self.id_field
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults() {
        let config = JsonTreeConfig::default();
        assert_eq!(config.id_field, "id");
        assert_eq!(config.children_field, "children");
        assert!(config.ignored_fields.is_empty());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = JsonTreeConfig::from_toml_str(
            r#"
            id_field = "key"
            ignored_fields = ["updated_at"]
            "#,
        )
        .unwrap();
        assert_eq!(config.id_field, "key");
        assert_eq!(config.children_field, "children");
        assert_eq!(config.ignored_fields, vec!["updated_at".to_string()]);
    }

    #[test]
    fn bad_toml_is_a_config_error() {
        let err = JsonTreeConfig::from_toml_str("id_field = ").unwrap_err();
        assert!(matches!(err, JsonTreeError::Config(_)));
    }

    #[test]
    fn clashing_fields_are_rejected() {
        let err = JsonTreeConfig::from_toml_str("id_field = \"children\"").unwrap_err();
        assert!(matches!(err, JsonTreeError::Config(_)));
    }

    #[test]
    fn validate_checks_edited_configs() {
        let mut config = JsonTreeConfig::default();
        assert!(config.validate().is_ok());
        config.children_field = "id".into();
        assert!(matches!(config.validate(), Err(JsonTreeError::Config(_))));
    }

    #[test]
    fn property_keys() {
        let config = JsonTreeConfig {
            ignored_fields: vec!["rev".into()],
            ..Default::default()
        };
        assert!(config.is_property("title"));
        assert!(!config.is_property("id"));
        assert!(!config.is_property("children"));
        assert!(!config.is_property("rev"));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "children_field = \"nodes\"").unwrap();
        let config = JsonTreeConfig::load(file.path()).unwrap();
        assert_eq!(config.children_field, "nodes");
        assert_eq!(config.id_field, "id");
    }

    #[test]
    fn missing_file_is_io() {
        let err = JsonTreeConfig::load("/nonexistent/twig.toml").unwrap_err();
        assert!(matches!(err, JsonTreeError::Io(_)));
    }
}
