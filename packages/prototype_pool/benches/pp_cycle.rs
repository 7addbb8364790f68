//! Benchmarks for the hot paths of `PrototypePool`.
#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use prototype_pool::fake::{FakeHost, FakePrototype};
use prototype_pool::{Orientation, Position, PrototypePool};

criterion_group!(benches, entrypoint);
criterion_main!(benches);

const WARM_COUNT: usize = 1024;

fn warm_pool() -> (PrototypePool<FakeHost>, FakePrototype) {
    let mut host = FakeHost::new();
    let prototype = host.define_prototype("Bench");

    let mut pool = PrototypePool::new(host);
    pool.refill(prototype, WARM_COUNT, Position::ORIGIN)
        .unwrap();

    (pool, prototype)
}

fn entrypoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("pp_cycle");

    group.bench_function("acquire_release_one", |b| {
        let (mut pool, prototype) = warm_pool();

        b.iter(|| {
            let instance = pool
                .acquire(
                    black_box(prototype),
                    Position::ORIGIN,
                    Orientation::IDENTITY,
                )
                .unwrap();
            black_box(pool.release(black_box(instance)));
        });
    });

    group.bench_function("acquire_release_all", |b| {
        let (mut pool, prototype) = warm_pool();
        let mut out = Vec::with_capacity(WARM_COUNT);

        b.iter(|| {
            for _ in 0..WARM_COUNT {
                out.push(
                    pool.acquire(prototype, Position::ORIGIN, Orientation::IDENTITY)
                        .unwrap(),
                );
            }

            for instance in out.drain(..) {
                black_box(pool.release(instance));
            }
        });
    });

    group.bench_function("release_foreign", |b| {
        let (mut pool, prototype) = warm_pool();
        let foreign = pool.free_instances(prototype).next().unwrap();

        b.iter(|| black_box(pool.release(black_box(foreign))));
    });

    group.bench_function("refill_satisfied", |b| {
        let (mut pool, prototype) = warm_pool();

        b.iter(|| {
            pool.refill(black_box(prototype), WARM_COUNT, Position::ORIGIN)
                .unwrap();
        });
    });

    group.finish();
}
