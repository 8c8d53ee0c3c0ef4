use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{FhirResourceError, Result};
use crate::format::ContentType;

/// Configuration handed to every validation call and every validator step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidationConfig {
    /// Encoding assumed for raw text and byte inputs.
    pub content_type: ContentType,
    /// Pick the encoding of file references from their extension.
    pub infer_content_type: bool,
    /// Raw and file inputs above this size are rejected before decoding.
    pub max_input_bytes: Option<usize>,
    /// Free-form settings read by caller-registered validator steps.
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            content_type: ContentType::Json,
            infer_content_type: true,
            max_input_bytes: None,
            extra: BTreeMap::new(),
        }
    }
}

impl ValidationConfig {
    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }

    pub fn with_max_input_bytes(mut self, limit: usize) -> Self {
        self.max_input_bytes = Some(limit);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    pub fn extra(&self, key: &str) -> Option<&serde_json::Value> {
        self.extra.get(key)
    }

    /// Content type used for a file reference at `path`.
    pub fn content_type_for(&self, path: &std::path::Path) -> ContentType {
        if self.infer_content_type {
            ContentType::from_path(path).unwrap_or(self.content_type)
        } else {
            self.content_type
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| FhirResourceError::decode_with_source(ContentType::Json, e))
    }

    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        serde_yaml::from_str(text)
            .map_err(|e| FhirResourceError::decode_with_source(ContentType::Yaml, e))
    }

    /// Load a config document, choosing the parser from the file extension.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| FhirResourceError::io(path, e))?;
        match ContentType::from_path(path).unwrap_or(ContentType::Json) {
            ContentType::Json => Self::from_json_str(&text),
            #[cfg(feature = "yaml")]
            ContentType::Yaml => Self::from_yaml_str(&text),
            #[cfg(not(feature = "yaml"))]
            ContentType::Yaml => Err(FhirResourceError::decode(
                ContentType::Yaml,
                "YAML support is not enabled (build with the `yaml` feature)",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_default_config() {
        let config = ValidationConfig::default();
        assert_eq!(config.content_type, ContentType::Json);
        assert!(config.infer_content_type);
        assert!(config.max_input_bytes.is_none());
    }

    #[test]
    fn test_partial_json_config_fills_defaults() {
        let config = ValidationConfig::from_json_str(r#"{"maxInputBytes": 1024}"#).unwrap();
        assert_eq!(config.max_input_bytes, Some(1024));
        assert_eq!(config.content_type, ContentType::Json);
        assert!(config.infer_content_type);
    }

    #[test]
    fn test_content_type_for_path() {
        let config = ValidationConfig::default();
        assert_eq!(
            config.content_type_for(Path::new("a.yaml")),
            ContentType::Yaml
        );
        assert_eq!(config.content_type_for(Path::new("a.txt")), ContentType::Json);

        let fixed = ValidationConfig {
            infer_content_type: false,
            ..ValidationConfig::default()
        };
        assert_eq!(fixed.content_type_for(Path::new("a.yaml")), ContentType::Json);
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_yaml_config() {
        let config = ValidationConfig::from_yaml_str(
            "contentType: yaml\ninferContentType: false\nextra:\n  allowedStatus: final\n",
        )
        .unwrap();
        assert_eq!(config.content_type, ContentType::Yaml);
        assert!(!config.infer_content_type);
        assert_eq!(config.extra("allowedStatus"), Some(&serde_json::json!("final")));
    }

    #[test]
    fn test_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"maxInputBytes": 64}"#).unwrap();

        let config = ValidationConfig::from_file(&path).unwrap();
        assert_eq!(config.max_input_bytes, Some(64));

        let missing = ValidationConfig::from_file(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(missing, FhirResourceError::Io { .. }));
    }
}
