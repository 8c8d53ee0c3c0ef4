mod common;

use common::{fixture, fixture_json, write_temp};
use octofhir_fhir_resources::*;
use serde_json::json;

#[test]
fn test_appointment_response_from_raw_value() {
    let instance = validate_as(
        "AppointmentResponse",
        json!({
            "resourceType": "AppointmentResponse",
            "id": "example",
            "participantStatus": "accepted"
        }),
    )
    .unwrap();

    let response = instance.downcast_ref::<AppointmentResponse>().unwrap();
    assert_eq!(response.id.as_deref(), Some("example"));
    assert_eq!(response.participant_status, "accepted");

    assert_eq!(
        instance.to_value().unwrap(),
        json!({
            "resourceType": "AppointmentResponse",
            "id": "example",
            "participantStatus": "accepted"
        })
    );
}

#[test]
fn test_every_input_shape_gives_the_same_instance() {
    let catalog = ModelCatalog::dstu2();
    let path = fixture("appointmentresponse-example.json");
    let text = std::fs::read_to_string(&path).unwrap();

    let from_file = catalog
        .validate_as("AppointmentResponse", path.as_path())
        .unwrap();
    let from_text = catalog
        .validate_as("AppointmentResponse", text.as_str())
        .unwrap();
    let from_bytes = catalog
        .validate_as("AppointmentResponse", text.as_bytes())
        .unwrap();
    let from_value = catalog
        .validate_as(
            "AppointmentResponse",
            fixture_json("appointmentresponse-example.json"),
        )
        .unwrap();
    let from_instance = catalog
        .validate_as("AppointmentResponse", from_value.clone())
        .unwrap();

    assert_eq!(from_file, from_text);
    assert_eq!(from_text, from_bytes);
    assert_eq!(from_bytes, from_value);
    assert_eq!(from_value, from_instance);
}

#[test]
fn test_round_trip_is_stable() {
    let catalog = ModelCatalog::dstu2();
    let first = catalog
        .validate_as(
            "AppointmentResponse",
            fixture_json("appointmentresponse-example.json"),
        )
        .unwrap();
    let encoded = first.to_json_string().unwrap();
    let second = catalog
        .validate_as("AppointmentResponse", encoded)
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(
        second.to_value().unwrap(),
        fixture_json("appointmentresponse-example.json")
    );
}

#[test]
fn test_observation_file_with_contained_patient() {
    let instance = validate_as(
        "Observation",
        ModelInput::file(fixture("observation-example-f202.json")),
    )
    .unwrap();
    let observation = instance.downcast_ref::<Observation>().unwrap();

    assert_eq!(observation.status.as_deref(), Some("final"));
    let subject = observation.subject.as_ref().unwrap();
    let contained = observation
        .contained
        .iter()
        .find(|c| c.id().as_deref() == subject.contained_id())
        .unwrap();
    let newborn = contained.downcast_ref::<Patient>().unwrap();
    assert_eq!(newborn.gender.as_deref(), Some("male"));
    assert_eq!(
        observation
            .effective_date_time
            .as_ref()
            .and_then(FhirDateTime::datetime)
            .map(|dt| dt.timestamp()),
        Some(1_463_610_802)
    );
}

#[test]
fn test_file_holding_a_list_is_invalid_shape() {
    let err = validate_as(
        "Observation",
        ModelInput::file(fixture("observation-list.json")),
    )
    .unwrap_err();
    assert!(matches!(err, FhirResourceError::InvalidShape { .. }));
    assert_eq!(err.stage(), FailureStage::Construct);
}

#[test]
fn test_temp_file_observation() {
    let file = write_temp(
        ".json",
        r#"{"resourceType": "Observation", "id": "tmp", "status": "preliminary"}"#,
    );
    let instance = validate_as("Observation", file.path()).unwrap();
    assert_eq!(instance.resource_type(), "Observation");

    let broken = write_temp(".json", r#"{"resourceType": "Observation", "#);
    let err = validate_as("Observation", broken.path()).unwrap_err();
    assert!(matches!(err, FhirResourceError::Decode { .. }));
}

#[cfg(feature = "yaml")]
#[test]
fn test_yaml_file_is_picked_by_extension() {
    let patient: Patient = catalog()
        .validate_typed(ModelInput::file(fixture("patient-example.yaml")))
        .unwrap();
    assert_eq!(patient.id.as_deref(), Some("example"));
    assert_eq!(patient.official_name().unwrap().family, vec!["Chalmers"]);
}

#[cfg(feature = "yaml")]
#[test]
fn test_yaml_text_needs_content_type() {
    let text = "resourceType: Flag\nid: f1\nstatus: active\n";
    let config = ValidationConfig::default().with_content_type(ContentType::Yaml);
    let instance = catalog().validate_as_with("Flag", text, &config).unwrap();
    assert_eq!(instance.to_value().unwrap()["status"], json!("active"));

    let err = catalog().validate_as("Flag", text).unwrap_err();
    assert!(matches!(err, FhirResourceError::Decode { .. }));
}

#[test]
fn test_patient_requested_observation_given() {
    let err = validate_as(
        "Patient",
        json!({"resourceType": "Observation", "id": "o1", "status": "final"}),
    )
    .unwrap_err();
    match err {
        FhirResourceError::TypeTagMismatch { expected, actual } => {
            assert_eq!(expected, "Patient");
            assert_eq!(actual, "Observation");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_element_and_patient_are_not_interchangeable() {
    let catalog = ModelCatalog::dstu2();

    let element = catalog
        .validate_as("Element", json!({"id": "e1"}))
        .unwrap();
    let err = catalog.validate_as("Patient", element).unwrap_err();
    assert!(matches!(
        err,
        FhirResourceError::TypeTagMismatch { ref expected, ref actual }
            if expected == "Patient" && actual == "Element"
    ));

    let patient = catalog
        .validate_as("Patient", json!({"resourceType": "Patient", "id": "p1"}))
        .unwrap();
    let err = catalog.validate_as("Element", patient).unwrap_err();
    assert!(matches!(
        err,
        FhirResourceError::TypeTagMismatch { ref expected, ref actual }
            if expected == "Element" && actual == "Patient"
    ));
}

#[test]
fn test_retagged_instance_is_not_accepted_as_another_type() {
    let catalog = ModelCatalog::dstu2();

    let err = catalog
        .normalize("Element", json!({"resourceType": "Patient", "id": "e"}))
        .unwrap_err();
    assert!(matches!(err, FhirResourceError::TypeTagMismatch { .. }));

    let element = Element {
        resource_type: Some("Patient".to_string()),
        id: Some("e".to_string()),
        ..Element::default()
    };
    let err = catalog
        .validate_as("Patient", TypedInstance::new(element))
        .unwrap_err();
    assert!(matches!(
        err,
        FhirResourceError::TypeTagMismatch { ref expected, ref actual }
            if expected == "Patient" && actual == "Element"
    ));
}

#[test]
fn test_tag_mismatch_reported_before_required_fields() {
    let err = validate_as(
        "AppointmentResponse",
        json!({"resourceType": "Observation", "id": "o"}),
    )
    .unwrap_err();
    assert_eq!(err.stage(), FailureStage::TagCheck);
    assert!(matches!(
        err,
        FhirResourceError::TypeTagMismatch { ref expected, ref actual }
            if expected == "AppointmentResponse" && actual == "Observation"
    ));
}

#[test]
fn test_unmodelled_keys_survive_round_trip() {
    let document = json!({
        "resourceType": "Patient",
        "id": "p",
        "deceasedBoolean": false,
        "unknownThing": 1
    });
    let instance = validate_as("Patient", document.clone()).unwrap();
    assert_eq!(instance.to_value().unwrap(), document);

    let again = validate_as("Patient", instance.to_json_string().unwrap()).unwrap();
    assert_eq!(again, instance);
}

#[test]
fn test_dynamic_types_preserve_documents() {
    let document = fixture_json("flag-example.json");
    let instance = validate_as("Flag", document.clone()).unwrap();
    assert!(instance.is::<DynamicModel>());
    assert_eq!(instance.to_value().unwrap(), document);
}

#[test]
fn test_unknown_type_and_unsupported_input() {
    let err = validate_as("Spaceship", json!({"resourceType": "Spaceship"})).unwrap_err();
    assert!(matches!(err, FhirResourceError::UnknownType { .. }));
    assert_eq!(err.stage(), FailureStage::Resolve);

    let err = validate_as("Patient", json!(42)).unwrap_err();
    match err {
        FhirResourceError::UnsupportedInput { type_name, kind } => {
            assert_eq!(type_name, "Patient");
            assert_eq!(kind, "number");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_validate_any_dispatches_on_tag() {
    let instance = catalog()
        .validate_any(fixture_json("observation-example-f202.json"))
        .unwrap();
    assert!(instance.is::<Observation>());

    let instance = catalog()
        .validate_any(r#"{"resourceType": "Flag", "status": "active"}"#)
        .unwrap();
    assert_eq!(instance.type_name(), "Flag");
}

#[test]
fn test_validate_typed_returns_struct() {
    let coding: Coding = catalog()
        .validate_typed(json!({"system": "http://loinc.org", "code": "8310-5"}))
        .unwrap();
    assert_eq!(coding.code.as_deref(), Some("8310-5"));

    // Flag has no hand-written struct
    let err = catalog()
        .validate_typed::<Patient>(json!({"resourceType": "Flag"}))
        .unwrap_err();
    assert!(matches!(err, FhirResourceError::TypeTagMismatch { .. }));
}

#[test]
fn test_validator_chain_runs_in_order_with_context() {
    fn observation_module(path: &'static str) -> ModelModule {
        let record = ValidatorStep::new("record-order", |value, ctx, _config, _field| {
            let mut seen = ctx
                .get("steps")
                .and_then(|v| v.as_array().cloned())
                .unwrap_or_default();
            seen.push(json!("record-order"));
            ctx.insert("steps", json!(seen));
            Ok(value)
        });
        let require_status = ValidatorStep::new("require-status", |value, ctx, config, _field| {
            let mut seen = ctx
                .get("steps")
                .and_then(|v| v.as_array().cloned())
                .unwrap_or_default();
            seen.push(json!("require-status"));
            ctx.insert("steps", json!(seen));

            let raw = value.to_generic()?;
            let allowed = config
                .extra("allowedStatus")
                .and_then(|v| v.as_array())
                .cloned()
                .unwrap_or_default();
            match raw.get("status") {
                Some(status) if allowed.is_empty() || allowed.contains(status) => Ok(value),
                Some(status) => Err(StepError::with_path(
                    format!("status {status} is not allowed"),
                    "Observation.status",
                )),
                None => Err(StepError::with_path("status is required", "Observation.status")),
            }
        });
        ModelModule::new(path).with_class(
            ModelClass::typed::<Observation>()
                .with_validator(record)
                .with_validator(require_status),
        )
    }

    let catalog = ModelCatalog::new([(
        "Observation",
        ModelLocator::new(".observation", observation_module),
    )]);
    let config = ValidationConfig::default().with_extra("allowedStatus", json!(["final"]));

    let mut context = FieldContext::new();
    let field = FieldDescriptor::root("Observation");
    let instance = catalog
        .validate_field(
            "Observation",
            json!({"resourceType": "Observation", "status": "final"}),
            &mut context,
            &config,
            &field,
        )
        .unwrap();
    assert!(instance.is::<Observation>());
    assert_eq!(
        context.get("steps"),
        Some(&json!(["record-order", "require-status"]))
    );

    let err = catalog
        .validate_as_with(
            "Observation",
            json!({"resourceType": "Observation", "status": "draft"}),
            &config,
        )
        .unwrap_err();
    match err {
        FhirResourceError::ValidatorStep {
            type_name,
            step,
            source,
            ..
        } => {
            assert_eq!(type_name, "Observation");
            assert_eq!(step, "require-status");
            assert_eq!(source.path.as_deref(), Some("Observation.status"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_validate_file_async() {
    let config = ValidationConfig::default();
    let instance = catalog()
        .validate_file_async(
            "AppointmentResponse",
            &fixture("appointmentresponse-example.json"),
            &config,
        )
        .await
        .unwrap();
    assert_eq!(instance.resource_type(), "AppointmentResponse");

    let err = catalog()
        .validate_file_async("Spaceship", &fixture("missing.json"), &config)
        .await
        .unwrap_err();
    assert!(matches!(err, FhirResourceError::UnknownType { .. }));

    let err = catalog()
        .validate_file_async("Patient", &fixture("missing.json"), &config)
        .await
        .unwrap_err();
    assert_eq!(err.stage(), FailureStage::Io);
}
