//! Benchmarks for pipeline execution.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;
use stepchain::pipeline::PipelineBuilder;

fn pipeline_benchmark(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    let pipeline = PipelineBuilder::new("bench")
        .then_sync("start", |_| Ok(json!(0)))
        .then_sync("inc", |v| Ok(json!(v.as_i64().unwrap_or(0) + 1)))
        .then("double", |v| async move { Ok(json!(v.as_i64().unwrap_or(0) * 2)) })
        .build()
        .unwrap();

    c.bench_function("three_step_run", |b| {
        b.iter(|| runtime.block_on(pipeline.run(black_box(None))))
    });
}

criterion_group!(benches, pipeline_benchmark);
criterion_main!(benches);
