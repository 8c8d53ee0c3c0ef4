use criterion::{Criterion, criterion_group, criterion_main};
use octofhir_fhir_resources::*;
use serde_json::json;
use std::hint::black_box;

fn observation_document() -> GenericValue {
    let components: Vec<_> = (0..20)
        .map(|i| {
            json!({
                "code": {"coding": [{"system": "http://loinc.org", "code": format!("{i}-0")}]},
                "valueQuantity": {"value": i, "unit": "mmHg"}
            })
        })
        .collect();

    json!({
        "resourceType": "Observation",
        "id": "bench",
        "status": "final",
        "code": {"coding": [{"system": "http://loinc.org", "code": "85354-9"}]},
        "effectiveDateTime": "2016-05-18T22:33:22Z",
        "component": components
    })
}

fn bench_resolve_cached(c: &mut Criterion) {
    let catalog = ModelCatalog::dstu2();
    catalog.resolve("Patient").unwrap();

    c.bench_function("resolve_cached", |b| {
        b.iter(|| black_box(catalog.resolve(black_box("Patient")).unwrap()))
    });
}

fn bench_resolve_cold(c: &mut Criterion) {
    let catalog = ModelCatalog::dstu2();

    c.bench_function("resolve_cold", |b| {
        b.iter(|| {
            catalog.reset();
            black_box(catalog.resolve(black_box("Observation")).unwrap())
        })
    });
}

fn bench_validate_typed(c: &mut Criterion) {
    let catalog = ModelCatalog::dstu2();
    let document = observation_document();

    c.bench_function("validate_as_observation", |b| {
        b.iter(|| black_box(catalog.validate_as("Observation", document.clone()).unwrap()))
    });
}

fn bench_validate_text(c: &mut Criterion) {
    let catalog = ModelCatalog::dstu2();
    let text = observation_document().to_string();

    c.bench_function("validate_as_observation_text", |b| {
        b.iter(|| black_box(catalog.validate_as("Observation", text.as_str()).unwrap()))
    });
}

fn bench_validate_dynamic(c: &mut Criterion) {
    let catalog = ModelCatalog::dstu2();
    let document = json!({
        "resourceType": "Flag",
        "id": "bench",
        "status": "active",
        "code": {"text": "Big dog"}
    });

    c.bench_function("validate_as_dynamic", |b| {
        b.iter(|| black_box(catalog.validate_as("Flag", document.clone()).unwrap()))
    });
}

criterion_group!(
    benches,
    bench_resolve_cached,
    bench_resolve_cold,
    bench_validate_typed,
    bench_validate_text,
    bench_validate_dynamic
);
criterion_main!(benches);
