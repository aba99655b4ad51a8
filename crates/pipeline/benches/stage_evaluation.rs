//! Benchmarks for stage evaluation
//!
//! Run with: cargo bench --package pipeline

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use descriptors::{names, DescriptorMap};
use pipeline::PipelineConfig;
use sources::Candidate;

fn synthetic_candidates(size: usize) -> Vec<Candidate> {
    (0..size)
        .map(|i| {
            let f = i as f64;
            if i % 25 == 0 {
                return Candidate::unparsed(format!("bad{i}"));
            }
            Candidate::parsed(
                format!("mol{i}"),
                DescriptorMap::new()
                    .with(names::MOLECULAR_WEIGHT, 150.0 + (f * 7.0) % 500.0)
                    .with(names::LOGP, (f * 0.37) % 7.0 - 1.0)
                    .with(names::H_BOND_DONORS, (i % 7) as f64)
                    .with(names::H_BOND_ACCEPTORS, (i % 12) as f64)
                    .with(names::SA_SCORE, 1.0 + (f * 0.13) % 8.0)
                    .with(names::SOLUBILITY, (f * 0.011) % 1.0)
                    .with(names::TOXICITY, (f * 0.017) % 1.0)
                    .with(names::PK_PROFILE, (f * 0.023) % 1.0),
            )
        })
        .collect()
}

fn bench_default_pipeline(c: &mut Criterion) {
    let candidates = synthetic_candidates(20_000);

    let sequential = PipelineConfig::default().build_pipeline().unwrap();
    c.bench_function("default_pipeline_sequential_20k", |b| {
        b.iter(|| black_box(sequential.run(black_box(&candidates))))
    });

    let mut config = PipelineConfig::default();
    config.parallel = true;
    let parallel = config.build_pipeline().unwrap();
    c.bench_function("default_pipeline_parallel_20k", |b| {
        b.iter(|| black_box(parallel.run(black_box(&candidates))))
    });
}

criterion_group!(benches, bench_default_pipeline);
criterion_main!(benches);
