use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::format::ContentType;

/// Pipeline stage a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureStage {
    Resolve,
    Io,
    Decode,
    Construct,
    TagCheck,
    Chain,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureStage::Resolve => "resolve",
            FailureStage::Io => "io",
            FailureStage::Decode => "decode",
            FailureStage::Construct => "construct",
            FailureStage::TagCheck => "tag-check",
            FailureStage::Chain => "validator-chain",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum FhirResourceError {
    #[error("Unknown model type: {type_name}")]
    UnknownType { type_name: String },

    #[error("Resolution error for {type_name} (module {module}): {message}")]
    Resolution {
        type_name: String,
        module: String,
        message: String,
    },

    #[error("Decode error ({content_type}): {message}")]
    Decode {
        content_type: ContentType,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Invalid shape for {type_name}: {message}")]
    InvalidShape { type_name: String, message: String },

    #[error("Unsupported input for {type_name}: {kind}")]
    UnsupportedInput { type_name: String, kind: String },

    #[error("Type tag mismatch: expected {expected}, got {actual}")]
    TypeTagMismatch { expected: String, actual: String },

    #[error("Validator step '{step}' rejected {type_name}.{field}: {source}")]
    ValidatorStep {
        type_name: String,
        step: String,
        field: String,
        #[source]
        source: StepError,
    },

    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FhirResourceError>;

impl FhirResourceError {
    pub fn unknown_type<S: Into<String>>(type_name: S) -> Self {
        Self::UnknownType {
            type_name: type_name.into(),
        }
    }

    pub fn resolution<S: Into<String>>(type_name: S, module: S, message: S) -> Self {
        Self::Resolution {
            type_name: type_name.into(),
            module: module.into(),
            message: message.into(),
        }
    }

    pub fn decode<S: Into<String>>(content_type: ContentType, message: S) -> Self {
        Self::Decode {
            content_type,
            message: message.into(),
            source: None,
        }
    }

    pub fn decode_with_source(
        content_type: ContentType,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Decode {
            content_type,
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    pub fn invalid_shape<S: Into<String>>(type_name: S, message: S) -> Self {
        Self::InvalidShape {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    pub fn unsupported_input<S: Into<String>>(type_name: S, kind: S) -> Self {
        Self::UnsupportedInput {
            type_name: type_name.into(),
            kind: kind.into(),
        }
    }

    pub fn type_tag_mismatch<S: Into<String>>(expected: S, actual: S) -> Self {
        Self::TypeTagMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn validator_step<S: Into<String>>(
        type_name: S,
        step: S,
        field: S,
        source: StepError,
    ) -> Self {
        Self::ValidatorStep {
            type_name: type_name.into(),
            step: step.into(),
            field: field.into(),
            source,
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Stage of the validation pipeline that produced this error.
    pub fn stage(&self) -> FailureStage {
        match self {
            Self::UnknownType { .. } | Self::Resolution { .. } => FailureStage::Resolve,
            Self::Io { .. } => FailureStage::Io,
            Self::Decode { .. } => FailureStage::Decode,
            Self::InvalidShape { .. } | Self::UnsupportedInput { .. } => FailureStage::Construct,
            Self::Serialization(_) => FailureStage::Construct,
            Self::TypeTagMismatch { .. } => FailureStage::TagCheck,
            Self::ValidatorStep { .. } => FailureStage::Chain,
        }
    }
}

/// Rejection raised by a single validator step.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct StepError {
    pub message: String,
    pub path: Option<String>,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StepError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
            source: None,
        }
    }

    pub fn with_path(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: Some(path.into()),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            path: None,
            source: Some(Box::new(source)),
        }
    }
}

impl From<FhirResourceError> for StepError {
    fn from(err: FhirResourceError) -> Self {
        StepError::with_source(err.to_string(), err)
    }
}
