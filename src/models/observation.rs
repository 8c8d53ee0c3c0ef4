//! Observation and its backbone elements.
//!
//! `value[x]` and `effective[x]` are modelled as one optional field per
//! allowed type, as the JSON form carries them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::datatypes::{
    CodeableConcept, Identifier, Meta, Narrative, Period, Quantity, Range, Reference,
};
use crate::models::element::Extension;
use crate::models::fhir_model;
use crate::models::resource::{
    CONTAINED, ContainedResource, EXTENSION, ID, IMPLICIT_RULES, LANGUAGE, META,
    MODIFIER_EXTENSION, TEXT,
};
use crate::types::{FhirDateTime, FieldDescriptor, GenericValue, Model};

const ELEMENT_ID: FieldDescriptor = FieldDescriptor::primitive("id", "string");

const CODE: FieldDescriptor =
    FieldDescriptor::complex("code", "CodeableConcept", CodeableConcept::fields);
const VALUE_QUANTITY: FieldDescriptor =
    FieldDescriptor::complex("valueQuantity", "Quantity", Quantity::fields);
const VALUE_CODEABLE_CONCEPT: FieldDescriptor =
    FieldDescriptor::complex("valueCodeableConcept", "CodeableConcept", CodeableConcept::fields);
const VALUE_RANGE: FieldDescriptor = FieldDescriptor::complex("valueRange", "Range", Range::fields);
const VALUE_PERIOD: FieldDescriptor =
    FieldDescriptor::complex("valuePeriod", "Period", Period::fields);
const DATA_ABSENT_REASON: FieldDescriptor =
    FieldDescriptor::complex("dataAbsentReason", "CodeableConcept", CodeableConcept::fields);
const REFERENCE_RANGE: FieldDescriptor = FieldDescriptor::complex(
    "referenceRange",
    "ObservationReferenceRange",
    ObservationReferenceRange::fields,
)
.repeated();

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
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
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub category: Vec<CodeableConcept>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeableConcept>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encounter: Option<Reference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_date_time: Option<FhirDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_period: Option<Period>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued: Option<FhirDateTime>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub performer: Vec<Reference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_quantity: Option<Quantity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_codeable_concept: Option<CodeableConcept>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_range: Option<Range>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_period: Option<Period>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_date_time: Option<FhirDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_absent_reason: Option<CodeableConcept>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<CodeableConcept>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_site: Option<CodeableConcept>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<CodeableConcept>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specimen: Option<Reference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<Reference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reference_range: Vec<ObservationReferenceRange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related: Vec<ObservationRelated>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub component: Vec<ObservationComponent>,
    #[serde(flatten)]
    pub additional: BTreeMap<String, GenericValue>,
}

impl Observation {
    /// Whichever `value[x]` is set, as `(type suffix, JSON form)`.
    pub fn value(&self) -> Option<(&'static str, GenericValue)> {
        let (kind, value) = if let Some(quantity) = &self.value_quantity {
            ("Quantity", serde_json::to_value(quantity))
        } else if let Some(concept) = &self.value_codeable_concept {
            ("CodeableConcept", serde_json::to_value(concept))
        } else if let Some(text) = &self.value_string {
            ("String", serde_json::to_value(text))
        } else if let Some(range) = &self.value_range {
            ("Range", serde_json::to_value(range))
        } else if let Some(period) = &self.value_period {
            ("Period", serde_json::to_value(period))
        } else {
            ("DateTime", serde_json::to_value(self.value_date_time.as_ref()?))
        };
        value.ok().map(|value| (kind, value))
    }
}

fhir_model!(Observation, "Observation", Resource, [
    ID,
    META,
    IMPLICIT_RULES,
    LANGUAGE,
    TEXT,
    CONTAINED,
    EXTENSION,
    MODIFIER_EXTENSION,
    FieldDescriptor::complex("identifier", "Identifier", Identifier::fields).repeated(),
    FieldDescriptor::primitive("status", "code"),
    FieldDescriptor::complex("category", "CodeableConcept", CodeableConcept::fields).repeated(),
    CODE,
    FieldDescriptor::complex("subject", "Reference", Reference::fields),
    FieldDescriptor::complex("encounter", "Reference", Reference::fields),
    FieldDescriptor::primitive("effectiveDateTime", "dateTime"),
    FieldDescriptor::complex("effectivePeriod", "Period", Period::fields),
    FieldDescriptor::primitive("issued", "instant"),
    FieldDescriptor::complex("performer", "Reference", Reference::fields).repeated(),
    VALUE_QUANTITY,
    VALUE_CODEABLE_CONCEPT,
    FieldDescriptor::primitive("valueString", "string"),
    VALUE_RANGE,
    VALUE_PERIOD,
    FieldDescriptor::primitive("valueDateTime", "dateTime"),
    DATA_ABSENT_REASON,
    FieldDescriptor::complex("interpretation", "CodeableConcept", CodeableConcept::fields),
    FieldDescriptor::primitive("comments", "string"),
    FieldDescriptor::complex("bodySite", "CodeableConcept", CodeableConcept::fields),
    FieldDescriptor::complex("method", "CodeableConcept", CodeableConcept::fields),
    FieldDescriptor::complex("specimen", "Reference", Reference::fields),
    FieldDescriptor::complex("device", "Reference", Reference::fields),
    REFERENCE_RANGE,
    FieldDescriptor::complex("related", "ObservationRelated", ObservationRelated::fields)
        .repeated(),
    FieldDescriptor::complex("component", "ObservationComponent", ObservationComponent::fields)
        .repeated(),
]);

/// Guidance on how to interpret the value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationReferenceRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifier_extension: Vec<Extension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<Quantity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<Quantity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meaning: Option<CodeableConcept>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<Range>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub additional: BTreeMap<String, GenericValue>,
}

fhir_model!(ObservationReferenceRange, "ObservationReferenceRange", Datatype, [
    ELEMENT_ID,
    EXTENSION,
    MODIFIER_EXTENSION,
    FieldDescriptor::complex("low", "Quantity", Quantity::fields),
    FieldDescriptor::complex("high", "Quantity", Quantity::fields),
    FieldDescriptor::complex("meaning", "CodeableConcept", CodeableConcept::fields),
    FieldDescriptor::complex("age", "Range", Range::fields),
    FieldDescriptor::primitive("text", "string"),
]);

/// A link to another observation, e.g. a panel member.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationRelated {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifier_extension: Vec<Extension>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    pub target: Reference,
    #[serde(flatten)]
    pub additional: BTreeMap<String, GenericValue>,
}

fhir_model!(ObservationRelated, "ObservationRelated", Datatype, [
    ELEMENT_ID,
    EXTENSION,
    MODIFIER_EXTENSION,
    FieldDescriptor::primitive("type", "code"),
    FieldDescriptor::complex("target", "Reference", Reference::fields).required(),
]);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationComponent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifier_extension: Vec<Extension>,
    pub code: CodeableConcept,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_quantity: Option<Quantity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_codeable_concept: Option<CodeableConcept>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_range: Option<Range>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_period: Option<Period>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_date_time: Option<FhirDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_absent_reason: Option<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reference_range: Vec<ObservationReferenceRange>,
    #[serde(flatten)]
    pub additional: BTreeMap<String, GenericValue>,
}

fhir_model!(ObservationComponent, "ObservationComponent", Datatype, [
    ELEMENT_ID,
    EXTENSION,
    MODIFIER_EXTENSION,
    CODE.required(),
    VALUE_QUANTITY,
    VALUE_CODEABLE_CONCEPT,
    FieldDescriptor::primitive("valueString", "string"),
    VALUE_RANGE,
    VALUE_PERIOD,
    FieldDescriptor::primitive("valueDateTime", "dateTime"),
    DATA_ABSENT_REASON,
    REFERENCE_RANGE,
]);
