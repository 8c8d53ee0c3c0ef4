use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::datatypes::{
    Address, CodeableConcept, ContactPoint, HumanName, Identifier, Meta, Narrative, Period,
    Reference,
};
use crate::models::element::Extension;
use crate::models::fhir_model;
use crate::models::resource::{
    CONTAINED, ContainedResource, EXTENSION, ID, IMPLICIT_RULES, LANGUAGE, META,
    MODIFIER_EXTENSION, TEXT,
};
use crate::types::{FhirDateTime, FieldDescriptor, GenericValue, Model};

const ELEMENT_ID: FieldDescriptor = FieldDescriptor::primitive("id", "string");
const TELECOM: FieldDescriptor =
    FieldDescriptor::complex("telecom", "ContactPoint", ContactPoint::fields).repeated();

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
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
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<HumanName>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub telecom: Vec<ContactPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<FhirDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deceased_boolean: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deceased_date_time: Option<FhirDateTime>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub address: Vec<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<CodeableConcept>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_birth_boolean: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_birth_integer: Option<i32>,
    /// Attachments, kept in their JSON form.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photo: Vec<GenericValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contact: Vec<PatientContact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animal: Option<GenericValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub communication: Vec<PatientCommunication>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub care_provider: Vec<Reference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub managing_organization: Option<Reference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub link: Vec<PatientLink>,
    #[serde(flatten)]
    pub additional: BTreeMap<String, GenericValue>,
}

impl Patient {
    /// The name marked `official`, else the first one.
    pub fn official_name(&self) -> Option<&HumanName> {
        self.name
            .iter()
            .find(|name| name.use_.as_deref() == Some("official"))
            .or_else(|| self.name.first())
    }
}

fhir_model!(Patient, "Patient", Resource, [
    ID,
    META,
    IMPLICIT_RULES,
    LANGUAGE,
    TEXT,
    CONTAINED,
    EXTENSION,
    MODIFIER_EXTENSION,
    FieldDescriptor::complex("identifier", "Identifier", Identifier::fields).repeated(),
    FieldDescriptor::primitive("active", "boolean"),
    FieldDescriptor::complex("name", "HumanName", HumanName::fields).repeated(),
    TELECOM,
    FieldDescriptor::primitive("gender", "code"),
    FieldDescriptor::primitive("birthDate", "date"),
    FieldDescriptor::primitive("deceasedBoolean", "boolean"),
    FieldDescriptor::primitive("deceasedDateTime", "dateTime"),
    FieldDescriptor::complex("address", "Address", Address::fields).repeated(),
    FieldDescriptor::complex("maritalStatus", "CodeableConcept", CodeableConcept::fields),
    FieldDescriptor::primitive("multipleBirthBoolean", "boolean"),
    FieldDescriptor::primitive("multipleBirthInteger", "integer"),
    FieldDescriptor::primitive("photo", "Attachment").repeated(),
    FieldDescriptor::complex("contact", "PatientContact", PatientContact::fields).repeated(),
    FieldDescriptor::primitive("animal", "PatientAnimal"),
    FieldDescriptor::complex(
        "communication",
        "PatientCommunication",
        PatientCommunication::fields,
    )
    .repeated(),
    FieldDescriptor::complex("careProvider", "Reference", Reference::fields).repeated(),
    FieldDescriptor::complex("managingOrganization", "Reference", Reference::fields),
    FieldDescriptor::complex("link", "PatientLink", PatientLink::fields).repeated(),
]);

/// A guardian, next-of-kin or other contact party.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientContact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifier_extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationship: Vec<CodeableConcept>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<HumanName>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub telecom: Vec<ContactPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<Reference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
    #[serde(flatten)]
    pub additional: BTreeMap<String, GenericValue>,
}

fhir_model!(PatientContact, "PatientContact", Datatype, [
    ELEMENT_ID,
    EXTENSION,
    MODIFIER_EXTENSION,
    FieldDescriptor::complex("relationship", "CodeableConcept", CodeableConcept::fields)
        .repeated(),
    FieldDescriptor::complex("name", "HumanName", HumanName::fields),
    TELECOM,
    FieldDescriptor::complex("address", "Address", Address::fields),
    FieldDescriptor::primitive("gender", "code"),
    FieldDescriptor::complex("organization", "Reference", Reference::fields),
    FieldDescriptor::complex("period", "Period", Period::fields),
]);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientCommunication {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifier_extension: Vec<Extension>,
    pub language: CodeableConcept,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred: Option<bool>,
    #[serde(flatten)]
    pub additional: BTreeMap<String, GenericValue>,
}

fhir_model!(PatientCommunication, "PatientCommunication", Datatype, [
    ELEMENT_ID,
    EXTENSION,
    MODIFIER_EXTENSION,
    FieldDescriptor::complex("language", "CodeableConcept", CodeableConcept::fields).required(),
    FieldDescriptor::primitive("preferred", "boolean"),
]);

/// Link to another patient resource about the same person.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientLink {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifier_extension: Vec<Extension>,
    pub other: Reference,
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(flatten)]
    pub additional: BTreeMap<String, GenericValue>,
}

fhir_model!(PatientLink, "PatientLink", Datatype, [
    ELEMENT_ID,
    EXTENSION,
    MODIFIER_EXTENSION,
    FieldDescriptor::complex("other", "Reference", Reference::fields).required(),
    FieldDescriptor::primitive("type", "code").required(),
]);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FhirResourceError;
    use crate::types::FhirModel;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_patient_example() {
        let value = json!({
            "resourceType": "Patient",
            "id": "example",
            "active": true,
            "name": [
                {"use": "usual", "given": ["Jim"]},
                {"use": "official", "family": ["Chalmers"], "given": ["Peter", "James"]}
            ],
            "telecom": [{"system": "phone", "value": "(03) 5555 6473", "use": "work", "rank": 1}],
            "gender": "male",
            "birthDate": "1974-12-25",
            "address": [{"use": "home", "line": ["534 Erewhon St"], "city": "PleasantVille", "postalCode": "3999"}],
            "contact": [{
                "relationship": [{"coding": [{"system": "http://hl7.org/fhir/patient-contact-relationship", "code": "partner"}]}],
                "name": {"family": ["du", "Marché"], "given": ["Bénédicte"]},
                "gender": "female"
            }],
            "communication": [{"language": {"text": "English"}, "preferred": true}]
        });
        let patient = Patient::from_generic(value.clone()).unwrap();

        let official = patient.official_name().unwrap();
        assert_eq!(official.family, vec!["Chalmers"]);
        assert_eq!(official.given, vec!["Peter", "James"]);
        assert_eq!(
            patient.birth_date.as_ref().and_then(FhirDateTime::date),
            NaiveDate::from_ymd_opt(1974, 12, 25)
        );
        assert_eq!(patient.telecom[0].rank, Some(1));
        assert_eq!(patient.contact[0].gender.as_deref(), Some("female"));
        assert_eq!(patient.to_value().unwrap(), value);
    }

    #[test]
    fn test_communication_language_required() {
        let err = Patient::from_generic(json!({
            "resourceType": "Patient",
            "communication": [{"preferred": true}]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("Patient.communication[0].language"));
    }

    #[test]
    fn test_link_requires_other_and_type() {
        let err = Patient::from_generic(json!({
            "resourceType": "Patient",
            "link": [{"other": {"reference": "Patient/pat2"}}]
        }))
        .unwrap_err();
        assert!(matches!(err, FhirResourceError::InvalidShape { .. }));
        assert!(err.to_string().contains("Patient.link[0].type"));
    }

    #[test]
    fn test_unmodelled_keys_are_kept() {
        let value = json!({
            "resourceType": "Patient",
            "id": "p",
            "deceasedBoolean": false,
            "unknownThing": 1,
            "_birthDate": {"extension": [{"url": "http://example.org/approx", "valueBoolean": true}]},
            "name": [{"family": ["Chalmers"], "nickname": "Pete"}]
        });
        let patient = Patient::from_generic(value.clone()).unwrap();
        assert_eq!(patient.additional.get("unknownThing"), Some(&json!(1)));
        assert_eq!(patient.name[0].additional.get("nickname"), Some(&json!("Pete")));
        assert_eq!(patient.to_value().unwrap(), value);
    }
}
