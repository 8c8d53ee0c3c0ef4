use std::path::{Path, PathBuf};

use crate::core::ValidationConfig;
use crate::error::{FhirResourceError, Result};
use crate::format::{self, ContentType};
use crate::registry::{ModelCatalog, ModelClass};
use crate::types::{FhirModel, GenericValue, TypedInstance, value_kind};

/// The input shapes a validation call accepts.
#[derive(Debug, Clone)]
pub enum ModelInput {
    /// Encoded document text.
    Text(String),
    /// Encoded document bytes.
    Bytes(Vec<u8>),
    /// Already decoded value; must be a mapping.
    Value(GenericValue),
    /// Path to an encoded document.
    File(PathBuf),
    /// An instance that was constructed earlier.
    Instance(TypedInstance),
}

impl ModelInput {
    pub fn instance<M: FhirModel>(model: M) -> Self {
        ModelInput::Instance(TypedInstance::new(model))
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        ModelInput::File(path.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ModelInput::Text(_) => "text",
            ModelInput::Bytes(_) => "bytes",
            ModelInput::Value(_) => "value",
            ModelInput::File(_) => "file",
            ModelInput::Instance(_) => "instance",
        }
    }
}

impl From<String> for ModelInput {
    fn from(text: String) -> Self {
        ModelInput::Text(text)
    }
}

impl From<&str> for ModelInput {
    fn from(text: &str) -> Self {
        ModelInput::Text(text.to_string())
    }
}

impl From<Vec<u8>> for ModelInput {
    fn from(bytes: Vec<u8>) -> Self {
        ModelInput::Bytes(bytes)
    }
}

impl From<&[u8]> for ModelInput {
    fn from(bytes: &[u8]) -> Self {
        ModelInput::Bytes(bytes.to_vec())
    }
}

impl From<GenericValue> for ModelInput {
    fn from(value: GenericValue) -> Self {
        ModelInput::Value(value)
    }
}

impl From<PathBuf> for ModelInput {
    fn from(path: PathBuf) -> Self {
        ModelInput::File(path)
    }
}

impl From<&Path> for ModelInput {
    fn from(path: &Path) -> Self {
        ModelInput::File(path.to_path_buf())
    }
}

impl From<TypedInstance> for ModelInput {
    fn from(instance: TypedInstance) -> Self {
        ModelInput::Instance(instance)
    }
}

/// Input after decoding, before construction.
#[derive(Debug)]
pub(crate) enum Decoded {
    Mapping(GenericValue),
    Instance(TypedInstance),
}

/// Output of normalization: the constructed instance, plus the mapping it
/// was built from when the caller asked to keep it.
#[derive(Debug)]
pub(crate) struct Normalized {
    pub instance: TypedInstance,
    pub raw: Option<GenericValue>,
}

fn check_size(content_type: ContentType, len: usize, config: &ValidationConfig) -> Result<()> {
    match config.max_input_bytes {
        Some(limit) if len > limit => Err(FhirResourceError::decode(
            content_type,
            format!("input of {len} bytes exceeds the {limit} byte limit"),
        )),
        _ => Ok(()),
    }
}

fn decode_raw(
    type_name: &str,
    content_type: ContentType,
    bytes: &[u8],
    config: &ValidationConfig,
) -> Result<GenericValue> {
    check_size(content_type, bytes.len(), config)?;
    let value = format::decode_bytes(content_type, bytes)?;
    if !value.is_object() {
        return Err(FhirResourceError::InvalidShape {
            type_name: type_name.to_string(),
            message: format!("decoded {}, expected a mapping", value_kind(&value)),
        });
    }
    Ok(value)
}

/// Turn any accepted input shape into a mapping or an existing instance.
pub(crate) fn decode_input(
    type_name: &str,
    input: ModelInput,
    config: &ValidationConfig,
) -> Result<Decoded> {
    match input {
        ModelInput::Text(text) => {
            decode_raw(type_name, config.content_type, text.as_bytes(), config).map(Decoded::Mapping)
        }
        ModelInput::Bytes(bytes) => {
            decode_raw(type_name, config.content_type, &bytes, config).map(Decoded::Mapping)
        }
        ModelInput::File(path) => {
            let content_type = config.content_type_for(&path);
            if config.max_input_bytes.is_some() {
                let metadata =
                    std::fs::metadata(&path).map_err(|e| FhirResourceError::io(&path, e))?;
                check_size(
                    content_type,
                    usize::try_from(metadata.len()).unwrap_or(usize::MAX),
                    config,
                )?;
            }
            let bytes = format::read_file(&path)?;
            decode_raw(type_name, content_type, &bytes, config).map(Decoded::Mapping)
        }
        ModelInput::Value(value) if value.is_object() => Ok(Decoded::Mapping(value)),
        ModelInput::Value(value) => Err(FhirResourceError::unsupported_input(
            type_name,
            value_kind(&value),
        )),
        ModelInput::Instance(instance) => Ok(Decoded::Instance(instance)),
    }
}

pub(crate) fn construct(
    class: &ModelClass,
    decoded: Decoded,
    keep_raw: bool,
) -> Result<Normalized> {
    match decoded {
        Decoded::Mapping(value) => {
            let raw = keep_raw.then(|| value.clone());
            let instance = class.construct(value)?;
            Ok(Normalized { instance, raw })
        }
        Decoded::Instance(instance) => Ok(Normalized {
            instance,
            raw: None,
        }),
    }
}

impl ModelCatalog {
    /// Normalize `input` into an instance of `type_name`'s class.
    ///
    /// No tag check is done here; see [`ModelCatalog::validate_as`].
    pub fn normalize(
        &self,
        type_name: &str,
        input: impl Into<ModelInput>,
    ) -> Result<TypedInstance> {
        self.normalize_with(type_name, input, &ValidationConfig::default())
    }

    pub fn normalize_with(
        &self,
        type_name: &str,
        input: impl Into<ModelInput>,
        config: &ValidationConfig,
    ) -> Result<TypedInstance> {
        let class = self.resolve(type_name)?;
        let decoded = decode_input(type_name, input.into(), config)?;
        construct(&class, decoded, false).map(|normalized| normalized.instance)
    }
}
