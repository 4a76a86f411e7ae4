use std::sync::Arc;

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use malaysia_load_synth::domain::{Frequency, GenerationRequest};
use malaysia_load_synth::engine::{LoadModel, PatternEngine};
use malaysia_load_synth::roster::RosterBuilder;
use malaysia_load_synth::{Generator, GeneratorSettings, ReferenceCatalog};
use tokio_util::sync::CancellationToken;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn bench_engine(c: &mut Criterion) {
    let catalog = ReferenceCatalog::malaysia();
    let request = GenerationRequest::new(13, date(2024, 1, 1), date(2024, 1, 2), Frequency::Hourly)
        .unwrap();
    let buildings = RosterBuilder::new(&catalog).build(&request, 1).unwrap();
    let engine = PatternEngine::new();
    let ts = date(2024, 6, 14).and_hms_opt(13, 30, 0).unwrap();

    c.bench_function("value_at", |b| {
        b.iter(|| {
            for building in &buildings {
                black_box(engine.value_at(building, black_box(ts)));
            }
        })
    });
}

fn bench_generate(c: &mut Criterion) {
    let generator = Generator::new(Arc::new(ReferenceCatalog::malaysia()), GeneratorSettings::default())
        .unwrap();
    let mut group = c.benchmark_group("generate_month_hourly");
    group.sample_size(10);

    for buildings in [10usize, 100] {
        let request = GenerationRequest::new(buildings, date(2024, 1, 1), date(2024, 1, 31), Frequency::Hourly)
            .unwrap()
            .with_seed(42);
        group.throughput(Throughput::Elements((buildings * (30 * 24 + 1)) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(buildings), &request, |b, request| {
            b.iter(|| generator.generate(request, &CancellationToken::new()).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_engine, bench_generate);
criterion_main!(benches);
