use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::models::datatypes::{Meta, Narrative};
use crate::models::element::Extension;
use crate::models::{dstu2, fhir_model};
use crate::types::{FieldDescriptor, GenericValue, Model, TypedInstance};

pub(crate) const ID: FieldDescriptor = FieldDescriptor::primitive("id", "id");
pub(crate) const META: FieldDescriptor = FieldDescriptor::complex("meta", "Meta", Meta::fields);
pub(crate) const IMPLICIT_RULES: FieldDescriptor =
    FieldDescriptor::primitive("implicitRules", "uri");
pub(crate) const LANGUAGE: FieldDescriptor = FieldDescriptor::primitive("language", "code");
pub(crate) const TEXT: FieldDescriptor =
    FieldDescriptor::complex("text", "Narrative", Narrative::fields);
pub(crate) const CONTAINED: FieldDescriptor = FieldDescriptor::resource("contained").repeated();
pub(crate) const EXTENSION: FieldDescriptor =
    FieldDescriptor::complex("extension", "Extension", Extension::fields).repeated();
pub(crate) const MODIFIER_EXTENSION: FieldDescriptor =
    FieldDescriptor::complex("modifierExtension", "Extension", Extension::fields).repeated();

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implicit_rules: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(flatten)]
    pub additional: BTreeMap<String, GenericValue>,
}

fhir_model!(Resource, "Resource", Resource, [ID, META, IMPLICIT_RULES, LANGUAGE]);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainResource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implicit_rules: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Narrative>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contained: Vec<ContainedResource>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifier_extension: Vec<Extension>,
    #[serde(flatten)]
    pub additional: BTreeMap<String, GenericValue>,
}

fhir_model!(DomainResource, "DomainResource", Resource, [
    ID,
    META,
    IMPLICIT_RULES,
    LANGUAGE,
    TEXT,
    CONTAINED,
    EXTENSION,
    MODIFIER_EXTENSION,
]);

/// An inline resource in a `contained` slot.
///
/// The slot is polymorphic: the value's own `resourceType` picks the class,
/// looked up in the global DSTU2 catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainedResource(pub TypedInstance);

impl ContainedResource {
    pub fn instance(&self) -> &TypedInstance {
        &self.0
    }

    pub fn resource_type(&self) -> &str {
        self.0.resource_type()
    }

    /// The contained resource's `id`, used by `#id` references.
    pub fn id(&self) -> Option<String> {
        self.0
            .to_value()
            .ok()?
            .get("id")?
            .as_str()
            .map(str::to_string)
    }

    pub fn downcast_ref<M: Model>(&self) -> Option<&M> {
        self.0.downcast_ref::<M>()
    }
}

impl Serialize for ContainedResource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0
            .to_value()
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ContainedResource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = GenericValue::deserialize(deserializer)?;
        dstu2::catalog()
            .validate_any(value)
            .map(ContainedResource)
            .map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FhirResourceError;
    use crate::models::Patient;
    use crate::types::FhirModel;
    use serde_json::json;

    #[test]
    fn test_contained_resource_uses_own_tag() {
        let resource = DomainResource::from_generic(json!({
            "resourceType": "DomainResource",
            "contained": [
                {"resourceType": "Patient", "id": "newborn"},
                {"resourceType": "Flag", "id": "f1", "status": "active"}
            ]
        }))
        .unwrap();

        assert_eq!(resource.contained.len(), 2);
        assert!(resource.contained[0].downcast_ref::<Patient>().is_some());
        assert_eq!(resource.contained[0].id().as_deref(), Some("newborn"));
        assert_eq!(resource.contained[1].resource_type(), "Flag");
        assert_eq!(
            resource.to_value().unwrap()["contained"][1],
            json!({"resourceType": "Flag", "id": "f1", "status": "active"})
        );
    }

    #[test]
    fn test_contained_without_tag_is_rejected() {
        let err = DomainResource::from_generic(json!({"contained": [{"id": "x"}]})).unwrap_err();
        assert!(matches!(err, FhirResourceError::InvalidShape { .. }));
        assert!(err.to_string().contains("contained[0]"));
    }

    #[test]
    fn test_contained_unknown_type_is_rejected() {
        let err =
            DomainResource::from_generic(json!({"contained": [{"resourceType": "Spaceship"}]}))
                .unwrap_err();
        match err {
            FhirResourceError::UnknownType { type_name } => assert_eq!(type_name, "Spaceship"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resource_gets_tag_when_missing() {
        let resource = Resource::from_generic(json!({"id": "r"})).unwrap();
        assert_eq!(resource.resource_type(), "Resource");
        assert_eq!(
            resource.to_value().unwrap(),
            json!({"resourceType": "Resource", "id": "r"})
        );
    }
}
