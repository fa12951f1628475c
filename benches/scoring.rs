//! Performance benchmarks for parsing and scoring large SBOMs.
//!
//! Run with: cargo bench --bench scoring

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sbom_score::parsers::{detect, parse_bytes};
use sbom_score::scorer::{score, Category, CheckFilter};
use std::fmt::Write;
use std::hint::black_box;

/// Generate a CycloneDX 1.6 JSON document with `count` library components
/// chained into a dependency list.
fn generate_cyclonedx(count: usize) -> Vec<u8> {
    let mut components = String::new();
    let mut dependencies = String::new();
    for i in 0..count {
        if i > 0 {
            components.push(',');
            dependencies.push(',');
        }
        let version = format!("1.{}.{}", i % 10, i % 100);
        let _ = write!(
            components,
            r#"{{"type":"library","bom-ref":"comp-{i}","name":"component-{i}","version":"{version}",
               "supplier":{{"name":"Vendor {v}"}},
               "purl":"pkg:npm/component-{i}@{version}",
               "hashes":[{{"alg":"SHA-256","content":"{i:064x}"}}],
               "licenses":[{{"license":{{"id":"{lic}"}}}}]}}"#,
            v = i % 7,
            lic = if i % 5 == 0 { "GPL-2.0" } else { "MIT" },
        );
        let next = if i + 1 < count {
            format!(r#""comp-{}""#, i + 1)
        } else {
            String::new()
        };
        let _ = write!(dependencies, r#"{{"ref":"comp-{i}","dependsOn":[{next}]}}"#);
    }
    format!(
        r#"{{"bomFormat":"CycloneDX","specVersion":"1.6","version":1,
            "serialNumber":"urn:uuid:3e671687-395b-41f5-a30f-a58921a69b79",
            "metadata":{{"timestamp":"2024-06-01T00:00:00Z",
              "tools":{{"components":[{{"type":"application","name":"bench","version":"1.0.0"}}]}},
              "authors":[{{"name":"Bench","email":"bench@example.com"}}],
              "component":{{"type":"application","bom-ref":"root","name":"root","version":"1.0.0"}}}},
            "components":[{components}],
            "dependencies":[{dependencies}]}}"#
    )
    .into_bytes()
}

fn bench_detect(c: &mut Criterion) {
    let input = generate_cyclonedx(1000);
    c.bench_function("detect_cyclonedx_1000", |b| {
        b.iter(|| detect(black_box(&input)));
    });
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_cyclonedx");
    group.sample_size(20);

    for size in [100, 1000, 5000] {
        let input = generate_cyclonedx(size);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| parse_bytes(black_box(input)));
        });
    }

    group.finish();
}

fn bench_score(c: &mut Criterion) {
    let mut group = c.benchmark_group("score");
    group.sample_size(20);

    for size in [100, 1000, 5000] {
        let Ok(doc) = parse_bytes(&generate_cyclonedx(size)) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::new("all", size), &doc, |b, doc| {
            b.iter(|| score(black_box(doc), &CheckFilter::All));
        });
        let ntia = CheckFilter::Categories(vec![Category::Ntia]);
        group.bench_with_input(BenchmarkId::new("ntia", size), &doc, |b, doc| {
            b.iter(|| score(black_box(doc), &ntia));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_detect, bench_parse, bench_score);
criterion_main!(benches);
