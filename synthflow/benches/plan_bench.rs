//! Benchmarks for plan construction.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use synthflow::config::{Feature, SynthConfig};
use synthflow::core::{LabelRange, RunMode, TargetFamily};
use synthflow::pipeline::build_pipeline;

fn plan_benchmark(c: &mut Criterion) {
    for family in TargetFamily::ALL {
        let config = SynthConfig::new(family);
        c.bench_function(&format!("build_pipeline/{family}"), |b| {
            b.iter(|| build_pipeline(black_box(&config)))
        });
    }

    let config = SynthConfig::new(TargetFamily::QlfK6n10)
        .with_feature(Feature::Dsp, false)
        .with_mode(RunMode::Describe);
    c.bench_function("describe/qlf_k6n10", |b| {
        b.iter(|| {
            build_pipeline(black_box(&config))
                .map(|definition| definition.report(LabelRange::full()))
        })
    });
}

criterion_group!(benches, plan_benchmark);
criterion_main!(benches);
