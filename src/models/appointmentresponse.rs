use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::datatypes::{CodeableConcept, Identifier, Meta, Narrative, Reference};
use crate::models::element::Extension;
use crate::models::fhir_model;
use crate::models::resource::{
    CONTAINED, ContainedResource, EXTENSION, ID, IMPLICIT_RULES, LANGUAGE, META,
    MODIFIER_EXTENSION, TEXT,
};
use crate::types::{FhirDateTime, FieldDescriptor, GenericValue};

/// A participant's reply to an appointment request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentResponse {
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
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifier: Vec<Identifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment: Option<Reference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<FhirDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<FhirDateTime>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub participant_type: Vec<CodeableConcept>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<Reference>,
    pub participant_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(flatten)]
    pub additional: BTreeMap<String, GenericValue>,
}

fhir_model!(AppointmentResponse, "AppointmentResponse", Resource, [
    ID,
    META,
    IMPLICIT_RULES,
    LANGUAGE,
    TEXT,
    CONTAINED,
    EXTENSION,
    MODIFIER_EXTENSION,
    FieldDescriptor::complex("identifier", "Identifier", Identifier::fields).repeated(),
    FieldDescriptor::complex("appointment", "Reference", Reference::fields),
    FieldDescriptor::primitive("start", "instant"),
    FieldDescriptor::primitive("end", "instant"),
    FieldDescriptor::complex("participantType", "CodeableConcept", CodeableConcept::fields)
        .repeated(),
    FieldDescriptor::complex("actor", "Reference", Reference::fields),
    FieldDescriptor::primitive("participantStatus", "code").required(),
    FieldDescriptor::primitive("comment", "string"),
]);
