//! Validator performance benchmarks.
//!
//! Measures schema checks, full validation runs and checksum calculation.

use std::io::Cursor;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::{json, Map, Value};

use dandi::record::{
    compute_digest, AssetRecord, AssetRef, BlobDigest, RecordId, RecordKind, RecordStatus,
};
use dandi::schema::{SchemaOracle, SchemaRegistry, ValidationMode};
use dandi::store::MemoryStore;
use dandi::validation::child_invalid_error;
use dandi::Validator;

fn asset_metadata() -> Map<String, Value> {
    json!({
        "schemaVersion": "0.6.0",
        "identifier": "bfc23fb6-192d-4c5b-8a67-8d2e0e2bbfd0",
        "contentSize": 1024,
        "encodingFormat": "application/x-nwb",
        "path": "sub-01/sub-01_ecephys.nwb",
        "contentUrl": ["https://api.dandiarchive.org/api/assets/bfc23fb6/download/"],
        "digest": {"dandi:dandi-etag": "e-1", "dandi:sha2-256": "f00"}
    })
    .as_object()
    .cloned()
    .unwrap_or_default()
}

fn dandiset_metadata(contributors: usize) -> Map<String, Value> {
    let contributor: Vec<Value> = (0..contributors)
        .map(|i| {
            json!({
                "schemaKey": "Person",
                "name": format!("Person, {}", i),
                "roleName": ["dcite:Author"]
            })
        })
        .collect();
    json!({
        "schemaVersion": "0.6.0",
        "identifier": "DANDI:000123",
        "name": "Benchmark dandiset",
        "description": "A dandiset used for benchmarking.",
        "contributor": contributor,
        "license": ["spdx:CC-BY-4.0"],
        "citation": "Benchmark (2024)",
        "version": "draft",
        "url": "https://dandiarchive.org/dandiset/000123/draft"
    })
    .as_object()
    .cloned()
    .unwrap_or_default()
}

/// Benchmark the schema oracle directly.
fn bench_schema_oracle(c: &mut Criterion) {
    let mut group = c.benchmark_group("schema_oracle");
    let registry = SchemaRegistry::builtin();
    let mode = ValidationMode::default();

    let asset = asset_metadata();
    group.bench_function("valid_asset", |b| {
        b.iter(|| black_box(registry.validate(RecordKind::Asset, Some("0.6.0"), &asset, mode)))
    });

    let mut broken = asset_metadata();
    broken.remove("encodingFormat");
    broken.insert("keywords".to_string(), json!("foo"));
    group.bench_function("invalid_asset", |b| {
        b.iter(|| black_box(registry.validate(RecordKind::Asset, Some("0.6.0"), &broken, mode)))
    });

    group.bench_function("unknown_version", |b| {
        b.iter(|| black_box(registry.validate(RecordKind::Asset, Some("xxx"), &asset, mode)))
    });

    for contributors in [1, 10, 100] {
        let dandiset = dandiset_metadata(contributors);
        group.bench_with_input(
            BenchmarkId::new("dandiset_contributors", contributors),
            &dandiset,
            |b, dandiset| {
                b.iter(|| {
                    black_box(registry.validate(RecordKind::Version, Some("0.6.0"), dandiset, mode))
                })
            },
        );
    }

    group.finish();
}

/// Benchmark a full validate-and-persist cycle.
fn bench_validate_asset(c: &mut Criterion) {
    let store = MemoryStore::new().with(AssetRecord::new(
        "a1",
        &Value::Object(asset_metadata()),
        BlobDigest::new(Some("f00".into()), Some("e-1".into())),
    ));
    let validator = Validator::new(store);
    let id = RecordId::new("a1");

    c.bench_function("validate_asset", |b| b.iter(|| black_box(validator.validate_asset(&id))));
}

/// Benchmark child aggregation over many assets.
fn bench_child_aggregation(c: &mut Criterion) {
    let children: Vec<AssetRef> = (0..1000)
        .map(|i| AssetRef {
            id: RecordId::new(format!("asset-{}", i)),
            status: if i % 10 == 0 { RecordStatus::Invalid } else { RecordStatus::Valid },
        })
        .collect();

    c.bench_function("child_invalid_1000", |b| {
        b.iter(|| black_box(child_invalid_error(&children)))
    });
}

/// Benchmark checksum calculation.
fn bench_digest(c: &mut Criterion) {
    let mut group = c.benchmark_group("digest");
    for size in [64 * 1024usize, 1024 * 1024] {
        let data = vec![0xA5u8; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| black_box(compute_digest(Cursor::new(data), data.len() as u64)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_schema_oracle,
    bench_validate_asset,
    bench_child_aggregation,
    bench_digest,
);
criterion_main!(benches);
