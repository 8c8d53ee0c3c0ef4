//! General-purpose datatypes shared by the typed resources.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::models::fhir_model;
use crate::models::element::Extension;
use crate::types::{FhirDateTime, FieldDescriptor, GenericValue, Model};

const ID: FieldDescriptor = FieldDescriptor::primitive("id", "string");
const EXTENSION: FieldDescriptor =
    FieldDescriptor::complex("extension", "Extension", Extension::fields).repeated();

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<FhirDateTime>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub profile: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security: Vec<Coding>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tag: Vec<Coding>,
    #[serde(flatten)]
    pub additional: BTreeMap<String, GenericValue>,
}

fhir_model!(Meta, "Meta", Datatype, [
    ID,
    EXTENSION,
    FieldDescriptor::primitive("versionId", "id"),
    FieldDescriptor::primitive("lastUpdated", "instant"),
    FieldDescriptor::primitive("profile", "uri").repeated(),
    FieldDescriptor::complex("security", "Coding", Coding::fields).repeated(),
    FieldDescriptor::complex("tag", "Coding", Coding::fields).repeated(),
]);

/// Human-readable XHTML summary of a resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Narrative {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    pub status: String,
    pub div: String,
    #[serde(flatten)]
    pub additional: BTreeMap<String, GenericValue>,
}

fhir_model!(Narrative, "Narrative", Datatype, [
    ID,
    EXTENSION,
    FieldDescriptor::primitive("status", "code").required(),
    FieldDescriptor::primitive("div", "xhtml").required(),
]);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_selected: Option<bool>,
    #[serde(flatten)]
    pub additional: BTreeMap<String, GenericValue>,
}

fhir_model!(Coding, "Coding", Datatype, [
    ID,
    EXTENSION,
    FieldDescriptor::primitive("system", "uri"),
    FieldDescriptor::primitive("version", "string"),
    FieldDescriptor::primitive("code", "code"),
    FieldDescriptor::primitive("display", "string"),
    FieldDescriptor::primitive("userSelected", "boolean"),
]);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeableConcept {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coding: Vec<Coding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub additional: BTreeMap<String, GenericValue>,
}

impl CodeableConcept {
    /// First coding with the given system.
    pub fn coding_for(&self, system: &str) -> Option<&Coding> {
        self.coding
            .iter()
            .find(|coding| coding.system.as_deref() == Some(system))
    }
}

fhir_model!(CodeableConcept, "CodeableConcept", Datatype, [
    ID,
    EXTENSION,
    FieldDescriptor::complex("coding", "Coding", Coding::fields).repeated(),
    FieldDescriptor::primitive("text", "string"),
]);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identifier {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub use_: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<CodeableConcept>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigner: Option<Reference>,
    #[serde(flatten)]
    pub additional: BTreeMap<String, GenericValue>,
}

fhir_model!(Identifier, "Identifier", Datatype, [
    ID,
    EXTENSION,
    FieldDescriptor::primitive("use", "code"),
    FieldDescriptor::complex("type", "CodeableConcept", CodeableConcept::fields),
    FieldDescriptor::primitive("system", "uri"),
    FieldDescriptor::primitive("value", "string"),
    FieldDescriptor::complex("period", "Period", Period::fields),
    FieldDescriptor::complex("assigner", "Reference", Reference::fields),
]);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(flatten)]
    pub additional: BTreeMap<String, GenericValue>,
}

impl Reference {
    /// Local id of a `#id` reference into `contained`.
    pub fn contained_id(&self) -> Option<&str> {
        self.reference.as_deref()?.strip_prefix('#')
    }
}

fhir_model!(Reference, "Reference", Datatype, [
    ID,
    EXTENSION,
    FieldDescriptor::primitive("reference", "string"),
    FieldDescriptor::primitive("display", "string"),
]);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<FhirDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<FhirDateTime>,
    #[serde(flatten)]
    pub additional: BTreeMap<String, GenericValue>,
}

fhir_model!(Period, "Period", Datatype, [
    ID,
    EXTENSION,
    FieldDescriptor::primitive("start", "dateTime"),
    FieldDescriptor::primitive("end", "dateTime"),
]);

/// A measured amount. `value` keeps integers and decimals apart; trailing
/// zeros of a decimal are not kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quantity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(flatten)]
    pub additional: BTreeMap<String, GenericValue>,
}

fhir_model!(Quantity, "Quantity", Datatype, [
    ID,
    EXTENSION,
    FieldDescriptor::primitive("value", "decimal"),
    FieldDescriptor::primitive("comparator", "code"),
    FieldDescriptor::primitive("unit", "string"),
    FieldDescriptor::primitive("system", "uri"),
    FieldDescriptor::primitive("code", "code"),
]);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Range {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<Quantity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<Quantity>,
    #[serde(flatten)]
    pub additional: BTreeMap<String, GenericValue>,
}

fhir_model!(Range, "Range", Datatype, [
    ID,
    EXTENSION,
    FieldDescriptor::complex("low", "Quantity", Quantity::fields),
    FieldDescriptor::complex("high", "Quantity", Quantity::fields),
]);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanName {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub use_: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub family: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub given: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prefix: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suffix: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
    #[serde(flatten)]
    pub additional: BTreeMap<String, GenericValue>,
}

fhir_model!(HumanName, "HumanName", Datatype, [
    ID,
    EXTENSION,
    FieldDescriptor::primitive("use", "code"),
    FieldDescriptor::primitive("text", "string"),
    FieldDescriptor::primitive("family", "string").repeated(),
    FieldDescriptor::primitive("given", "string").repeated(),
    FieldDescriptor::primitive("prefix", "string").repeated(),
    FieldDescriptor::primitive("suffix", "string").repeated(),
    FieldDescriptor::complex("period", "Period", Period::fields),
]);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub use_: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
    #[serde(flatten)]
    pub additional: BTreeMap<String, GenericValue>,
}

fhir_model!(ContactPoint, "ContactPoint", Datatype, [
    ID,
    EXTENSION,
    FieldDescriptor::primitive("system", "code"),
    FieldDescriptor::primitive("value", "string"),
    FieldDescriptor::primitive("use", "code"),
    FieldDescriptor::primitive("rank", "positiveInt"),
    FieldDescriptor::complex("period", "Period", Period::fields),
]);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub use_: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub line: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
    #[serde(flatten)]
    pub additional: BTreeMap<String, GenericValue>,
}

fhir_model!(Address, "Address", Datatype, [
    ID,
    EXTENSION,
    FieldDescriptor::primitive("use", "code"),
    FieldDescriptor::primitive("type", "code"),
    FieldDescriptor::primitive("text", "string"),
    FieldDescriptor::primitive("line", "string").repeated(),
    FieldDescriptor::primitive("city", "string"),
    FieldDescriptor::primitive("district", "string"),
    FieldDescriptor::primitive("state", "string"),
    FieldDescriptor::primitive("postalCode", "string"),
    FieldDescriptor::primitive("country", "string"),
    FieldDescriptor::complex("period", "Period", Period::fields),
]);
