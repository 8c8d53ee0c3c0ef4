use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::fhir_model;
use crate::types::{FieldDescriptor, GenericValue};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    #[serde(flatten)]
    pub additional: BTreeMap<String, GenericValue>,
}

fhir_model!(Element, "Element", Datatype, [
    FieldDescriptor::primitive("id", "string"),
    FieldDescriptor::complex("extension", "Extension", Extension::fields).repeated(),
]);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackboneElement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifier_extension: Vec<Extension>,
    #[serde(flatten)]
    pub additional: BTreeMap<String, GenericValue>,
}

fhir_model!(BackboneElement, "BackboneElement", Datatype, [
    FieldDescriptor::primitive("id", "string"),
    FieldDescriptor::complex("extension", "Extension", Extension::fields).repeated(),
    FieldDescriptor::complex("modifierExtension", "Extension", Extension::fields).repeated(),
]);

/// An extension; its `value[x]` choice is kept as the raw keyed value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extension {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    pub url: String,
    #[serde(flatten)]
    pub value: BTreeMap<String, GenericValue>,
}

impl Extension {
    /// The `value[x]` entry, as `(suffix, value)`.
    pub fn choice(&self) -> Option<(&str, &GenericValue)> {
        self.value
            .iter()
            .find_map(|(key, value)| key.strip_prefix("value").map(|suffix| (suffix, value)))
    }
}

fhir_model!(Extension, "Extension", Datatype, [
    FieldDescriptor::primitive("id", "string"),
    FieldDescriptor::complex("extension", "Extension", Extension::fields).repeated(),
    FieldDescriptor::primitive("url", "uri").required(),
]);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FhirResourceError;
    use crate::types::{FhirModel, Model};
    use serde_json::json;

    #[test]
    fn test_extension_keeps_value_choice() {
        let ext = Extension::from_generic(json!({
            "url": "http://hl7.org/fhir/StructureDefinition/iso21090-CO-value",
            "valueDecimal": 1
        }))
        .unwrap();
        assert_eq!(ext.choice(), Some(("Decimal", &json!(1))));
        assert_eq!(
            ext.to_value().unwrap(),
            json!({
                "url": "http://hl7.org/fhir/StructureDefinition/iso21090-CO-value",
                "valueDecimal": 1
            })
        );
    }

    #[test]
    fn test_extension_requires_url() {
        let err = Extension::from_generic(json!({"valueString": "x"})).unwrap_err();
        assert!(matches!(err, FhirResourceError::InvalidShape { .. }));
        assert!(err.to_string().contains("Extension.url"));
    }

    #[test]
    fn test_nested_extension_tag_is_checked() {
        let err = Element::from_generic(json!({
            "extension": [{"resourceType": "Coding", "url": "http://x"}]
        }))
        .unwrap_err();
        assert!(matches!(err, FhirResourceError::TypeTagMismatch { .. }));
    }

    #[test]
    fn test_element_rejects_resource_tag() {
        let err = Element::from_generic(json!({"resourceType": "Patient", "id": "p"})).unwrap_err();
        assert!(matches!(
            err,
            FhirResourceError::TypeTagMismatch { ref expected, ref actual }
                if expected == "Element" && actual == "Patient"
        ));

        let element = Element::from_generic(json!({"resourceType": "Element", "id": "e"})).unwrap();
        assert_eq!(element.resource_type(), "Element");
    }
}
