//! Hand-written record types and the DSTU2 catalog table.
//!
//! Types without a struct here resolve to [`crate::types::DynamicModel`].
//! Keys a struct does not model land in its flattened `additional` map and
//! are written back unchanged.

pub mod appointmentresponse;
pub mod datatypes;
pub mod dstu2;
pub mod element;
pub mod observation;
pub mod patient;
pub mod resource;

pub use appointmentresponse::AppointmentResponse;
pub use datatypes::{
    Address, CodeableConcept, Coding, ContactPoint, HumanName, Identifier, Meta, Narrative,
    Period, Quantity, Range, Reference,
};
pub use element::{BackboneElement, Element, Extension};
pub use observation::{
    Observation, ObservationComponent, ObservationReferenceRange, ObservationRelated,
};
pub use patient::{Patient, PatientCommunication, PatientContact, PatientLink};
pub use resource::{ContainedResource, DomainResource, Resource};

/// Implements [`crate::types::Model`] and [`crate::types::FhirModel`] for a
/// struct with a `resource_type: Option<String>` field.
macro_rules! fhir_model {
    ($ty:ident, $name:literal, $kind:ident, [$($field:expr),* $(,)?]) => {
        impl $crate::types::Model for $ty {
            const TYPE_NAME: &'static str = $name;
            const KIND: $crate::types::ModelKind = $crate::types::ModelKind::$kind;

            fn fields() -> &'static [$crate::types::FieldDescriptor] {
                const FIELDS: &[$crate::types::FieldDescriptor] = &[$($field),*];
                FIELDS
            }

            fn tag_mut(&mut self) -> &mut Option<String> {
                &mut self.resource_type
            }
        }

        impl $crate::types::FhirModel for $ty {
            fn type_name(&self) -> &'static str {
                $name
            }

            fn resource_type(&self) -> &str {
                self.resource_type.as_deref().unwrap_or($name)
            }

            fn to_value(&self) -> $crate::error::Result<$crate::types::GenericValue> {
                $crate::types::model::encode_model(self)
            }

            fn clone_model(&self) -> Box<dyn $crate::types::FhirModel> {
                Box::new(self.clone())
            }

            fn model_eq(&self, other: &dyn $crate::types::FhirModel) -> bool {
                $crate::types::FhirModel::as_any(other)
                    .downcast_ref::<Self>()
                    .is_some_and(|other| other == self)
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }

            fn into_any(self: Box<Self>) -> Box<dyn std::any::Any> {
                self
            }
        }
    };
}

pub(crate) use fhir_model;
