//! Decode layer: raw text, bytes and files into [`GenericValue`]s.
//!
//! The validation pipeline only needs two things from here: decoding an
//! encoded document into a generic mapping/sequence/scalar tree, and reading
//! a file fully into memory. JSON is always available; YAML is behind the
//! `yaml` feature.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FhirResourceError, Result};
use crate::types::GenericValue;

/// Encoding of a raw document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[default]
    Json,
    Yaml,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Json => "json",
            ContentType::Yaml => "yaml",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" | "application/json" | "application/fhir+json" => Some(ContentType::Json),
            "yaml" | "yml" | "application/yaml" | "application/x-yaml" => Some(ContentType::Yaml),
            _ => None,
        }
    }

    /// Content type implied by a file extension, if it is one we decode.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::parse)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContentType {
    type Err = &'static str;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s).ok_or("Unsupported content type")
    }
}

pub fn decode_str(content_type: ContentType, text: &str) -> Result<GenericValue> {
    decode_bytes(content_type, text.as_bytes())
}

pub fn decode_bytes(content_type: ContentType, bytes: &[u8]) -> Result<GenericValue> {
    match content_type {
        ContentType::Json => serde_json::from_slice(bytes)
            .map_err(|e| FhirResourceError::decode_with_source(content_type, e)),
        ContentType::Yaml => decode_yaml(bytes),
    }
}

#[cfg(feature = "yaml")]
fn decode_yaml(bytes: &[u8]) -> Result<GenericValue> {
    serde_yaml::from_slice(bytes)
        .map_err(|e| FhirResourceError::decode_with_source(ContentType::Yaml, e))
}

#[cfg(not(feature = "yaml"))]
fn decode_yaml(_bytes: &[u8]) -> Result<GenericValue> {
    Err(FhirResourceError::decode(
        ContentType::Yaml,
        "YAML support is not enabled (build with the `yaml` feature)",
    ))
}

/// Read a file fully.
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| FhirResourceError::io(path, e))
}

pub async fn read_file_async(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .map_err(|e| FhirResourceError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_content_type_parse() {
        assert_eq!(ContentType::parse("JSON"), Some(ContentType::Json));
        assert_eq!(
            ContentType::parse("application/fhir+json"),
            Some(ContentType::Json)
        );
        assert_eq!(ContentType::parse("yml"), Some(ContentType::Yaml));
        assert_eq!(ContentType::parse("xml"), None);
        assert!("xml".parse::<ContentType>().is_err());
    }

    #[test]
    fn test_content_type_from_path() {
        assert_eq!(
            ContentType::from_path(Path::new("obs.json")),
            Some(ContentType::Json)
        );
        assert_eq!(
            ContentType::from_path(Path::new("dir/obs.YAML")),
            Some(ContentType::Yaml)
        );
        assert_eq!(ContentType::from_path(Path::new("obs")), None);
    }

    #[test]
    fn test_decode_json() {
        let value = decode_str(ContentType::Json, r#"{"resourceType": "Basic"}"#).unwrap();
        assert_eq!(value, json!({"resourceType": "Basic"}));
    }

    #[test]
    fn test_decode_malformed_json() {
        let err = decode_str(ContentType::Json, "{\"resourceType\": ").unwrap_err();
        assert!(matches!(
            err,
            FhirResourceError::Decode {
                content_type: ContentType::Json,
                ..
            }
        ));
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_decode_yaml() {
        let value = decode_str(ContentType::Yaml, "resourceType: Basic\nid: b1\n").unwrap();
        assert_eq!(value, json!({"resourceType": "Basic", "id": "b1"}));
    }
}
