use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use serde_json::{Value, json};
use transcript_navigator::grouping::group_with_stats;

/// Generate a history of N records cycling through the recognized record shapes
fn generate_history(num_records: usize) -> Vec<Value> {
    (0..num_records)
        .map(|i| match i % 6 {
            0 => json!({"customer": format!("Customer question {}", i)}),
            1 => json!({"ai_agent": format!("Agent answer {}", i)}),
            2 => json!({"role": "user", "content": format!("Follow-up {}", i)}),
            3 => json!({"role": "assistant", "content": format!("Reply {}", i)}),
            4 => json!({"user": format!("Combined {}", i), "assistant": "Combined reply"}),
            _ => json!({"unrecognized": i}),
        })
        .collect()
}

/// Generate a history of N bare strings alternating customer and agent
fn generate_bare_history(num_records: usize) -> Vec<Value> {
    (0..num_records).map(|i| json!(format!("Message {}", i))).collect()
}

fn bench_group_mixed_shapes(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_mixed_shapes");

    for size in [10, 100, 1_000, 10_000].iter() {
        let history = generate_history(*size);

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| group_with_stats(black_box(&history)));
        });
    }

    group.finish();
}

fn bench_group_bare_strings(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_bare_strings");

    for size in [100, 10_000].iter() {
        let history = generate_bare_history(*size);

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| group_with_stats(black_box(&history)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_group_mixed_shapes, bench_group_bare_strings);
criterion_main!(benches);
