//! Classification and analysis performance benchmarks.
//!
//! Measures rule resolution, record walking and heuristic analysis over
//! generated recordings.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use fieldscope::analyzer::HeuristicAnalyzer;
use fieldscope::classify::walk_record;
use fieldscope::{Classifier, FieldValue, Inspector};
use serde_json::json;

/// Generate a recording with the given number of steps.
fn generate_recording(steps: usize) -> FieldValue {
    let actions = ["click", "input", "scroll", "hover", "teleport"];

    let steps: Vec<serde_json::Value> = (0..steps)
        .map(|i| {
            json!({
                "type": actions[i % actions.len()],
                "timestamp": 1_718_000_000 + i,
                "screenshot": format!("https://cdn.example.com/capture/{}", i),
                "rect": {"top": i % 800, "left": i % 1200, "width": 120, "height": 32},
                "title": format!("Step {}", i),
                "attributes": {"id": format!("el-{}", i), "class": "btn"},
                "notes": "recorded"
            })
        })
        .collect();

    json!({ "steps": steps }).into()
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    let classifier = Classifier::default();

    let cases = [
        ("image", "screenshot.png", FieldValue::from("x")),
        ("action", "type", FieldValue::from("click")),
        ("url_by_value", "href", FieldValue::from("https://example.com")),
        ("catch_all", "anything_unmatched_xyz", FieldValue::from(42i64)),
    ];

    for (name, key, value) in cases.iter() {
        group.bench_function(*name, |b| {
            b.iter(|| black_box(classifier.resolve(black_box(key), black_box(value))))
        });
    }

    group.finish();
}

fn bench_classify_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify_record");
    let inspector = Inspector::new();

    for steps in [10, 100, 1_000].iter() {
        let record = generate_recording(*steps);
        let fields = walk_record(&record).len();

        group.throughput(Throughput::Elements(fields as u64));
        group.bench_with_input(BenchmarkId::new("steps", steps), &record, |b, record| {
            b.iter(|| black_box(inspector.classify_record(record)))
        });
    }

    group.finish();
}

fn bench_heuristic(c: &mut Criterion) {
    let mut group = c.benchmark_group("heuristic_analysis");
    let analyzer = HeuristicAnalyzer::new();

    let rect: FieldValue = json!({"top": 0, "left": 0, "width": -5, "height": 10}).into();
    let action = FieldValue::from("teleport");
    let image = FieldValue::from("https://cdn.example.com/a.png");

    group.bench_function("rect", |b| b.iter(|| black_box(analyzer.evaluate("rect", &rect))));
    group.bench_function("action", |b| b.iter(|| black_box(analyzer.evaluate("type", &action))));
    group.bench_function("image", |b| b.iter(|| black_box(analyzer.evaluate("imgSave", &image))));

    group.finish();
}

criterion_group!(benches, bench_resolve, bench_classify_record, bench_heuristic);
criterion_main!(benches);
