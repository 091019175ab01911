//! Benchmarks for runnel-operators.
//!
//! Measures the per-value cost of operator chains driven by synchronous
//! sources.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use runnel_core::{ints, range, single, vector, Lifetime, Producer};
use runnel_operators::{combine, filter, flatten_latest, map, merge_all, take, ProducerExt};
use std::cell::Cell;
use std::rc::Rc;

fn drain<T: 'static>(producer: Producer<T>) -> usize {
    let count = Rc::new(Cell::new(0usize));
    let count_clone = count.clone();
    let mut lifetime = Lifetime::new();
    producer.start_with_next_into(move |_| count_clone.set(count_clone.get() + 1), &mut lifetime);
    count.get()
}

fn bench_map_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_filter");

    for size in [10, 100, 1000, 10000] {
        group.bench_with_input(BenchmarkId::new("chain", size), &size, |b, &size| {
            b.iter(|| {
                let producer = ints(0, size)
                    | filter(|x: &i32| x % 2 == 0)
                    | map(|x: i32| x * 10);
                drain(black_box(producer))
            })
        });
    }

    group.finish();
}

fn bench_operator_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("operator_depth");

    for depth in [1, 4, 16] {
        group.bench_with_input(BenchmarkId::new("map", depth), &depth, |b, &depth| {
            b.iter(|| {
                let mut producer = ints(0, 1000);
                for _ in 0..depth {
                    producer = producer.map(|x| x + 1);
                }
                drain(black_box(producer))
            })
        });
    }

    group.finish();
}

fn bench_take(c: &mut Criterion) {
    let mut group = c.benchmark_group("take");

    group.bench_function("take_10_of_100000", |b| {
        b.iter(|| drain(black_box(ints(0, 100_000) | take(10))))
    });

    group.bench_function("take_10_of_endless", |b| {
        b.iter(|| drain(black_box(range(0u64..) | take(10))))
    });

    group.finish();
}

fn bench_merge_combine(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_combine");

    for inputs in [2, 8, 32] {
        let producers: Vec<Producer<i32>> = (0..inputs).map(|_| ints(0, 100)).collect();
        group.bench_with_input(
            BenchmarkId::new("merge_all", inputs),
            &producers,
            |b, producers| b.iter(|| drain(merge_all(black_box(producers.clone())))),
        );
    }

    group.bench_function("combine_pair", |b| {
        b.iter(|| drain(combine(ints(0, 100), ints(0, 100))))
    });

    group.finish();
}

fn bench_flatten_latest(c: &mut Criterion) {
    let mut group = c.benchmark_group("flatten_latest");

    group.bench_function("switch_1000", |b| {
        b.iter(|| {
            let producer = ints(0, 1000) | map(|x: i32| single(x)) | flatten_latest();
            drain(black_box(producer))
        })
    });

    group.bench_function("nested_vectors", |b| {
        b.iter(|| {
            let producer = ints(0, 100) | map(|x: i32| vector(vec![x; 10])) | flatten_latest();
            drain(black_box(producer))
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_map_filter,
    bench_operator_depth,
    bench_take,
    bench_merge_combine,
    bench_flatten_latest,
);

criterion_main!(benches);
