use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use edge_event_filter::bench_support::{init_tracing, EventBenchFixture, EventShape};
use serde_json::json;

const EVENTS_PER_FIXTURE: usize = 256;
const BENCH_LOG_LEVEL: &str = "info";

fn fixture(remove_null: bool, remove_empty: bool, shape: EventShape) -> EventBenchFixture {
    let options = json!({
        "conf": { "removeNull": remove_null, "removeEmpty": remove_empty },
        "pid": "bench",
        "pipeIdx": 0,
        "cid": "w0"
    });
    EventBenchFixture::new(options, shape, EVENTS_PER_FIXTURE).expect("bench fixture")
}

fn bench_apply(c: &mut Criterion) {
    init_tracing(BENCH_LOG_LEVEL);

    let mut group = c.benchmark_group("filter_apply");
    group
        .sample_size(200)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1));

    let policies = [
        ("disabled", false, false),
        ("null_only", true, false),
        ("empty_only", false, true),
        ("null_or_empty", true, true),
    ];

    for fields in [8usize, 32, 128] {
        let shape = EventShape {
            fields,
            ..EventShape::default()
        };
        for (label, remove_null, remove_empty) in policies {
            let fixture = fixture(remove_null, remove_empty, shape);
            group.bench_with_input(BenchmarkId::new(label, fields), &fixture, |b, fixture| {
                b.iter_batched(
                    || fixture.events.clone(),
                    |mut events| {
                        for event in events.iter_mut() {
                            black_box(fixture.filter.apply(event));
                        }
                        events
                    },
                    BatchSize::SmallInput,
                );
            });
        }
    }

    group.finish();
}

fn bench_payload(c: &mut Criterion) {
    init_tracing(BENCH_LOG_LEVEL);

    let mut group = c.benchmark_group("filter_payload");
    group.measurement_time(Duration::from_secs(5));

    let fixture = fixture(true, true, EventShape::default());
    let payloads = fixture.payloads().expect("bench payloads");

    group.bench_function(BenchmarkId::new("null_or_empty", "json"), |b| {
        b.iter(|| {
            for payload in &payloads {
                black_box(fixture.filter.process_payload(black_box(payload)));
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_apply, bench_payload);
criterion_main!(benches);
