pub mod dynamic;
pub mod field;
pub mod model;
pub mod primitives;

pub use dynamic::DynamicModel;
pub use field::{FieldDescriptor, FieldShape, check_fields};
pub use model::{FhirModel, Model, ModelKind, TypedInstance, value_kind};
pub use primitives::FhirDateTime;

/// Dynamically shaped decoded value (mapping, sequence or scalar).
pub type GenericValue = serde_json::Value;
