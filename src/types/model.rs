use std::any::Any;
use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Map;

use crate::error::{FhirResourceError, Result};
use crate::types::{FieldDescriptor, GenericValue, check_fields};

/// Whether a record type is a standalone resource or a datatype/backbone
/// element that only appears nested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    Resource,
    Datatype,
}

/// Object-safe view of a constructed record of any catalog type.
pub trait FhirModel: Any + Send + Sync + fmt::Debug {
    /// Catalog name of the class that built this instance.
    fn type_name(&self) -> &'static str;

    /// Type tag the instance carries at runtime.
    fn resource_type(&self) -> &str;

    fn to_value(&self) -> Result<GenericValue>;

    fn clone_model(&self) -> Box<dyn FhirModel>;

    fn model_eq(&self, other: &dyn FhirModel) -> bool;

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

/// A statically typed record with a serde representation and declared fields.
pub trait Model: FhirModel + Serialize + DeserializeOwned + Clone + PartialEq + Sized {
    const TYPE_NAME: &'static str;
    const KIND: ModelKind;

    fn fields() -> &'static [FieldDescriptor];

    fn tag_mut(&mut self) -> &mut Option<String>;

    /// Build the record from a decoded mapping.
    fn from_generic(value: GenericValue) -> Result<Self> {
        let GenericValue::Object(object) = &value else {
            return Err(FhirResourceError::InvalidShape {
                type_name: Self::TYPE_NAME.to_string(),
                message: format!("expected a mapping, got {}", value_kind(&value)),
            });
        };
        check_document_tag(Self::TYPE_NAME, object)?;
        check_fields(Self::TYPE_NAME, Self::fields(), object, Self::TYPE_NAME)?;

        let mut model: Self =
            serde_json::from_value(value).map_err(|e| FhirResourceError::InvalidShape {
                type_name: Self::TYPE_NAME.to_string(),
                message: e.to_string(),
            })?;
        if Self::KIND == ModelKind::Resource && model.tag_mut().is_none() {
            *model.tag_mut() = Some(Self::TYPE_NAME.to_string());
        }
        Ok(model)
    }
}

/// A document's own `resourceType`, when present, must name `type_name`.
pub(crate) fn check_document_tag(
    type_name: &str,
    object: &Map<String, GenericValue>,
) -> Result<()> {
    match object.get("resourceType") {
        None => Ok(()),
        Some(GenericValue::String(tag)) if tag == type_name => Ok(()),
        Some(GenericValue::String(tag)) => Err(FhirResourceError::type_tag_mismatch(
            type_name,
            tag.as_str(),
        )),
        Some(other) => Err(FhirResourceError::InvalidShape {
            type_name: type_name.to_string(),
            message: format!("resourceType must be a string, got {}", value_kind(other)),
        }),
    }
}

/// Serialize a typed record, making sure resources always carry their tag.
pub(crate) fn encode_model<M: Model>(model: &M) -> Result<GenericValue> {
    let mut value = serde_json::to_value(model)?;
    if M::KIND == ModelKind::Resource {
        if let GenericValue::Object(object) = &mut value {
            object
                .entry("resourceType")
                .or_insert_with(|| GenericValue::String(M::TYPE_NAME.to_string()));
        }
    }
    Ok(value)
}

/// Short description of a value's kind for error messages.
pub fn value_kind(value: &GenericValue) -> &'static str {
    match value {
        GenericValue::Null => "null",
        GenericValue::Bool(_) => "boolean",
        GenericValue::Number(_) => "number",
        GenericValue::String(_) => "string",
        GenericValue::Array(_) => "array",
        GenericValue::Object(_) => "mapping",
    }
}

/// A constructed, validated record. Owned by the caller.
#[derive(Debug)]
pub struct TypedInstance(Box<dyn FhirModel>);

impl TypedInstance {
    pub fn new<M: FhirModel>(model: M) -> Self {
        Self(Box::new(model))
    }

    pub fn from_boxed(model: Box<dyn FhirModel>) -> Self {
        Self(model)
    }

    pub fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    pub fn resource_type(&self) -> &str {
        self.0.resource_type()
    }

    pub fn to_value(&self) -> Result<GenericValue> {
        self.0.to_value()
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.0.to_value()?)?)
    }

    pub fn as_model(&self) -> &dyn FhirModel {
        self.0.as_ref()
    }

    pub fn is<M: FhirModel>(&self) -> bool {
        self.0.as_any().is::<M>()
    }

    pub fn downcast_ref<M: FhirModel>(&self) -> Option<&M> {
        self.0.as_any().downcast_ref::<M>()
    }

    pub fn downcast<M: FhirModel>(self) -> Option<M> {
        self.0.into_any().downcast::<M>().ok().map(|model| *model)
    }
}

impl Clone for TypedInstance {
    fn clone(&self) -> Self {
        Self(self.0.clone_model())
    }
}

impl PartialEq for TypedInstance {
    fn eq(&self, other: &Self) -> bool {
        self.0.model_eq(other.0.as_ref())
    }
}

impl fmt::Display for TypedInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.resource_type())?;
        if self.resource_type() != self.type_name() {
            write!(f, " (as {})", self.type_name())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coding, Narrative};
    use serde_json::json;

    #[test]
    fn test_downcast_matches_concrete_type() {
        let coding = Coding::from_generic(json!({"system": "http://loinc.org", "code": "8310-5"}))
            .unwrap();
        let instance = TypedInstance::new(coding.clone());

        assert!(instance.is::<Coding>());
        assert!(!instance.is::<Narrative>());
        assert_eq!(instance.downcast_ref::<Coding>(), Some(&coding));
        assert_eq!(instance.clone().downcast::<Coding>(), Some(coding));
        assert!(instance.downcast::<Narrative>().is_none());
    }

    #[test]
    fn test_datatype_tag_defaults_to_type_name() {
        let coding = Coding::from_generic(json!({"code": "a"})).unwrap();
        assert_eq!(coding.resource_type(), "Coding");
        assert!(coding.to_value().unwrap().get("resourceType").is_none());
    }

    #[test]
    fn test_from_generic_rejects_non_mapping() {
        let err = Coding::from_generic(json!(["code"])).unwrap_err();
        assert!(matches!(err, FhirResourceError::InvalidShape { .. }));
        assert!(err.to_string().contains("array"));
    }

    #[test]
    fn test_from_generic_rejects_foreign_tag() {
        let err =
            Coding::from_generic(json!({"resourceType": "Patient", "code": "a"})).unwrap_err();
        match err {
            FhirResourceError::TypeTagMismatch { expected, actual } => {
                assert_eq!(expected, "Coding");
                assert_eq!(actual, "Patient");
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = Coding::from_generic(json!({"resourceType": ["Coding"]})).unwrap_err();
        assert!(matches!(err, FhirResourceError::InvalidShape { .. }));
    }

    #[test]
    fn test_instance_equality_uses_field_values() {
        let a = TypedInstance::new(Coding::from_generic(json!({"code": "a"})).unwrap());
        let b = TypedInstance::new(Coding::from_generic(json!({"code": "a"})).unwrap());
        let c = TypedInstance::new(Coding::from_generic(json!({"code": "c"})).unwrap());
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
