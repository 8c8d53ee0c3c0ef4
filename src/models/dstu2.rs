//! The DSTU2 type catalog.
//!
//! Each row maps a type name to the model module that defines it. Modules
//! listed in `TYPED_MODULES` build hand-written structs; every other module
//! builds mapping-backed classes for the names the table assigns it.

use once_cell::sync::Lazy;

use crate::models::{
    Address, AppointmentResponse, BackboneElement, CodeableConcept, Coding, ContactPoint,
    DomainResource, Element, Extension, HumanName, Identifier, Meta, Narrative, Observation,
    ObservationComponent, ObservationReferenceRange, ObservationRelated, Patient,
    PatientCommunication, PatientContact, PatientLink, Period, Quantity, Range, Reference,
    Resource,
};
use crate::registry::{ModelCatalog, ModelClass, ModelModule, ModuleLoader};

pub const DSTU2_TYPES: &[(&str, &str)] = &[
    ("Element", ".element"),
    ("Resource", ".resource"),
    ("DomainResource", ".domainresource"),
    ("BackboneElement", ".backboneelement"),
    ("Extension", ".extension"),
    ("Meta", ".meta"),
    ("Narrative", ".narrative"),
    ("Address", ".address"),
    ("Period", ".period"),
    ("Attachment", ".attachment"),
    ("CodeableConcept", ".codeableconcept"),
    ("Coding", ".coding"),
    ("ContactPoint", ".contactpoint"),
    ("HumanName", ".humanname"),
    ("Identifier", ".identifier"),
    ("Reference", ".reference"),
    ("Quantity", ".quantity"),
    ("Range", ".range"),
    ("Ratio", ".ratio"),
    ("Signature", ".signature"),
    ("Timing", ".timing"),
    ("TimingRepeat", ".timing"),
    ("Duration", ".duration"),
    ("Age", ".age"),
    ("Count", ".count"),
    ("Money", ".money"),
    ("Distance", ".distance"),
    ("SampledData", ".sampleddata"),
    ("Annotation", ".annotation"),
    ("Media", ".media"),
    ("Basic", ".basic"),
    ("Binary", ".binary"),
    ("BodySite", ".bodysite"),
    ("Flag", ".flag"),
    ("Location", ".location"),
    ("LocationPosition", ".location"),
    ("Slot", ".slot"),
    ("Schedule", ".schedule"),
    ("Account", ".account"),
    ("AllergyIntolerance", ".allergyintolerance"),
    ("AllergyIntoleranceReaction", ".allergyintolerance"),
    ("Appointment", ".appointment"),
    ("AppointmentParticipant", ".appointment"),
    ("AppointmentResponse", ".appointmentresponse"),
    ("AuditEvent", ".auditevent"),
    ("AuditEventEvent", ".auditevent"),
    ("AuditEventObject", ".auditevent"),
    ("AuditEventObjectDetail", ".auditevent"),
    ("AuditEventParticipant", ".auditevent"),
    ("AuditEventParticipantNetwork", ".auditevent"),
    ("AuditEventSource", ".auditevent"),
    ("Bundle", ".bundle"),
    ("BundleEntry", ".bundle"),
    ("BundleEntryRequest", ".bundle"),
    ("BundleEntryResponse", ".bundle"),
    ("BundleEntrySearch", ".bundle"),
    ("BundleLink", ".bundle"),
    ("CarePlan", ".careplan"),
    ("CarePlanActivity", ".careplan"),
    ("CarePlanActivityDetail", ".careplan"),
    ("CarePlanParticipant", ".careplan"),
    ("CarePlanRelatedPlan", ".careplan"),
    ("Claim", ".claim"),
    ("ClaimCoverage", ".claim"),
    ("ClaimDiagnosis", ".claim"),
    ("ClaimItem", ".claim"),
    ("ClaimItemDetail", ".claim"),
    ("ClaimItemDetailSubDetail", ".claim"),
    ("ClaimItemProsthesis", ".claim"),
    ("ClaimMissingTeeth", ".claim"),
    ("ClaimPayee", ".claim"),
    ("ClaimResponse", ".claimresponse"),
    ("ClaimResponseAddItem", ".claimresponse"),
    ("ClaimResponseAddItemAdjudication", ".claimresponse"),
    ("ClaimResponseAddItemDetail", ".claimresponse"),
    ("ClaimResponseAddItemDetailAdjudication", ".claimresponse"),
    ("ClaimResponseCoverage", ".claimresponse"),
    ("ClaimResponseItem", ".claimresponse"),
    ("ClaimResponseItemAdjudication", ".claimresponse"),
    ("ClaimResponseItemDetail", ".claimresponse"),
    ("ClaimResponseItemDetailAdjudication", ".claimresponse"),
    ("ClaimResponseItemDetailSubDetail", ".claimresponse"),
    ("ClaimResponseItemDetailSubDetailAdjudication", ".claimresponse"),
    ("ClaimResponseNote", ".claimresponse"),
    ("ClinicalImpression", ".clinicalimpression"),
    ("ClinicalImpressionFinding", ".clinicalimpression"),
    ("ClinicalImpressionInvestigations", ".clinicalimpression"),
    ("ClinicalImpressionRuledOut", ".clinicalimpression"),
    ("Communication", ".communication"),
    ("CommunicationPayload", ".communication"),
    ("CommunicationRequest", ".communicationrequest"),
    ("CommunicationRequestPayload", ".communicationrequest"),
    ("Composition", ".composition"),
    ("CompositionAttester", ".composition"),
    ("CompositionEvent", ".composition"),
    ("CompositionSection", ".composition"),
    ("ConceptMap", ".conceptmap"),
    ("ConceptMapContact", ".conceptmap"),
    ("ConceptMapElement", ".conceptmap"),
    ("ConceptMapElementTarget", ".conceptmap"),
    ("ConceptMapElementTargetDependsOn", ".conceptmap"),
    ("Condition", ".condition"),
    ("ConditionEvidence", ".condition"),
    ("ConditionStage", ".condition"),
    ("Conformance", ".conformance"),
    ("ConformanceContact", ".conformance"),
    ("ConformanceDocument", ".conformance"),
    ("ConformanceImplementation", ".conformance"),
    ("ConformanceMessaging", ".conformance"),
    ("ConformanceMessagingEndpoint", ".conformance"),
    ("ConformanceMessagingEvent", ".conformance"),
    ("ConformanceRest", ".conformance"),
    ("ConformanceRestInteraction", ".conformance"),
    ("ConformanceRestOperation", ".conformance"),
    ("ConformanceRestResource", ".conformance"),
    ("ConformanceRestResourceInteraction", ".conformance"),
    ("ConformanceRestResourceSearchParam", ".conformance"),
    ("ConformanceRestSecurity", ".conformance"),
    ("ConformanceRestSecurityCertificate", ".conformance"),
    ("ConformanceSoftware", ".conformance"),
    ("Observation", ".observation"),
    ("ObservationComponent", ".observation"),
    ("ObservationReferenceRange", ".observation"),
    ("ObservationRelated", ".observation"),
    ("Patient", ".patient"),
    ("PatientAnimal", ".patient"),
    ("PatientCommunication", ".patient"),
    ("PatientContact", ".patient"),
    ("PatientLink", ".patient"),
];

const TYPED_MODULES: &[&str] = &[
    ".element",
    ".resource",
    ".domainresource",
    ".backboneelement",
    ".extension",
    ".meta",
    ".narrative",
    ".address",
    ".period",
    ".codeableconcept",
    ".coding",
    ".contactpoint",
    ".humanname",
    ".identifier",
    ".reference",
    ".quantity",
    ".range",
    ".appointmentresponse",
    ".observation",
    ".patient",
];

/// Loader for the module at `path`.
pub fn loader_for(path: &str) -> ModuleLoader {
    if TYPED_MODULES.iter().any(|typed| *typed == path) {
        load_typed_module
    } else {
        load_dynamic_module
    }
}

fn load_typed_module(path: &'static str) -> ModelModule {
    let module = ModelModule::new(path);
    match path {
        ".element" => module.with_class(ModelClass::typed::<Element>()),
        ".resource" => module.with_class(ModelClass::typed::<Resource>()),
        ".domainresource" => module.with_class(ModelClass::typed::<DomainResource>()),
        ".backboneelement" => module.with_class(ModelClass::typed::<BackboneElement>()),
        ".extension" => module.with_class(ModelClass::typed::<Extension>()),
        ".meta" => module.with_class(ModelClass::typed::<Meta>()),
        ".narrative" => module.with_class(ModelClass::typed::<Narrative>()),
        ".address" => module.with_class(ModelClass::typed::<Address>()),
        ".period" => module.with_class(ModelClass::typed::<Period>()),
        ".codeableconcept" => module.with_class(ModelClass::typed::<CodeableConcept>()),
        ".coding" => module.with_class(ModelClass::typed::<Coding>()),
        ".contactpoint" => module.with_class(ModelClass::typed::<ContactPoint>()),
        ".humanname" => module.with_class(ModelClass::typed::<HumanName>()),
        ".identifier" => module.with_class(ModelClass::typed::<Identifier>()),
        ".reference" => module.with_class(ModelClass::typed::<Reference>()),
        ".quantity" => module.with_class(ModelClass::typed::<Quantity>()),
        ".range" => module.with_class(ModelClass::typed::<Range>()),
        ".appointmentresponse" => module.with_class(ModelClass::typed::<AppointmentResponse>()),
        ".observation" => module
            .with_class(ModelClass::typed::<Observation>())
            .with_class(ModelClass::typed::<ObservationComponent>())
            .with_class(ModelClass::typed::<ObservationReferenceRange>())
            .with_class(ModelClass::typed::<ObservationRelated>()),
        ".patient" => module
            .with_class(ModelClass::typed::<Patient>())
            .with_class(ModelClass::typed::<PatientContact>())
            .with_class(ModelClass::typed::<PatientCommunication>())
            .with_class(ModelClass::typed::<PatientLink>())
            .with_class(ModelClass::dynamic("PatientAnimal")),
        _ => module,
    }
}

fn load_dynamic_module(path: &'static str) -> ModelModule {
    DSTU2_TYPES
        .iter()
        .filter(|(_, module)| *module == path)
        .fold(ModelModule::new(path), |module, &(name, _)| {
            module.with_class(ModelClass::dynamic(name))
        })
}

static DSTU2_CATALOG: Lazy<ModelCatalog> = Lazy::new(ModelCatalog::dstu2);

/// Process-wide DSTU2 catalog.
pub fn catalog() -> &'static ModelCatalog {
    &DSTU2_CATALOG
}

impl ModelCatalog {
    /// A fresh catalog over [`DSTU2_TYPES`].
    pub fn dstu2() -> Self {
        Self::from_table(DSTU2_TYPES, loader_for)
    }
}
