//! Mapping-backed model used for catalog types without a hand-written struct.

use std::any::Any;

use serde_json::Map;

use crate::error::{FhirResourceError, Result};
use crate::types::model::check_document_tag;
use crate::types::{FhirModel, GenericValue, value_kind};

#[derive(Debug, Clone, PartialEq)]
pub struct DynamicModel {
    type_name: &'static str,
    fields: Map<String, GenericValue>,
}

impl DynamicModel {
    pub fn from_generic(type_name: &'static str, value: GenericValue) -> Result<Self> {
        let GenericValue::Object(fields) = value else {
            return Err(FhirResourceError::InvalidShape {
                type_name: type_name.to_string(),
                message: format!("expected a mapping, got {}", value_kind(&value)),
            });
        };
        check_document_tag(type_name, &fields)?;
        Ok(Self { type_name, fields })
    }

    pub fn get(&self, key: &str) -> Option<&GenericValue> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &Map<String, GenericValue> {
        &self.fields
    }

    pub fn into_fields(self) -> Map<String, GenericValue> {
        self.fields
    }
}

impl FhirModel for DynamicModel {
    fn type_name(&self) -> &'static str {
        self.type_name
    }

    fn resource_type(&self) -> &str {
        self.fields
            .get("resourceType")
            .and_then(GenericValue::as_str)
            .unwrap_or(self.type_name)
    }

    fn to_value(&self) -> Result<GenericValue> {
        Ok(GenericValue::Object(self.fields.clone()))
    }

    fn clone_model(&self) -> Box<dyn FhirModel> {
        Box::new(self.clone())
    }

    fn model_eq(&self, other: &dyn FhirModel) -> bool {
        other
            .as_any()
            .downcast_ref::<Self>()
            .is_some_and(|other| other == self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}
