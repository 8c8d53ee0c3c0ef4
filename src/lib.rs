//! # OctoFHIR FHIR Resources
//!
//! Lazily resolved FHIR resource model catalog with one uniform validation
//! entry point for every record type.
//!
//! ## Features
//!
//! - **Lazy Catalog**: A closed table of type names; each name's model module
//!   is loaded on first use and the resolved class is cached
//! - **Uniform Dispatch**: Raw text, bytes, decoded values, file paths and
//!   existing instances all go through the same normalize, tag-check and
//!   validator-chain pipeline
//! - **Strict Type Tags**: A record of one type is never accepted where
//!   another is requested
//! - **Typed Models**: Hand-written structs for the common datatypes and
//!   resources, with a mapping-backed model for every other catalog name
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use octofhir_fhir_resources::*;
//! use serde_json::json;
//!
//! # fn example() -> Result<()> {
//! let response = validate_as(
//!     "AppointmentResponse",
//!     json!({
//!         "resourceType": "AppointmentResponse",
//!         "id": "example",
//!         "participantStatus": "accepted"
//!     }),
//! )?;
//! assert_eq!(response.resource_type(), "AppointmentResponse");
//!
//! let typed: AppointmentResponse = catalog().validate_typed(response)?;
//! assert_eq!(typed.participant_status, "accepted");
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod error;
pub mod format;
pub mod models;
pub mod registry;
pub mod types;
pub mod validation;

pub use crate::core::ValidationConfig;
pub use error::{FailureStage, FhirResourceError, Result, StepError};
pub use format::ContentType;
pub use models::dstu2::{DSTU2_TYPES, catalog};
pub use models::{
    Address, AppointmentResponse, BackboneElement, CodeableConcept, Coding, ContactPoint,
    ContainedResource, DomainResource, Element, Extension, HumanName, Identifier, Meta,
    Narrative, Observation, ObservationComponent, ObservationReferenceRange, ObservationRelated,
    Patient, PatientCommunication, PatientContact, PatientLink, Period, Quantity, Range,
    Reference, Resource,
};
pub use registry::{CatalogStats, ModelCatalog, ModelClass, ModelLocator, ModelModule};
pub use types::{
    DynamicModel, FhirDateTime, FhirModel, FieldDescriptor, FieldShape, GenericValue, Model,
    ModelKind, TypedInstance,
};
pub use validation::{FieldContext, ModelInput, StepValue, ValidatorStep};

use std::sync::Arc;

/// Resolve `type_name` in the global DSTU2 catalog.
pub fn resolve(type_name: &str) -> Result<Arc<ModelClass>> {
    catalog().resolve(type_name)
}

/// Validate `input` as `type_name` against the global DSTU2 catalog.
pub fn validate_as(type_name: &str, input: impl Into<ModelInput>) -> Result<TypedInstance> {
    catalog().validate_as(type_name, input)
}
