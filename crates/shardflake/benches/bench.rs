use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use shardflake::{
    BasicShardedGenerator, ClassicId, ClusterId, LockShardedGenerator, LockTagGenerator, RegionId,
    TimeSource, WallClock,
};
use std::time::Instant;

struct FixedMockTime {
    millis: u64,
}

impl TimeSource for FixedMockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

// IDs generated per iteration. Matches the ClusterId sequence capacity so a
// fixed mock clock never stalls on the hot path.
const TOTAL_IDS: usize = 1024;

/// Benchmarks the pure encoding/state-machine cost: the clock never
/// advances and the sequence never overflows.
fn bench_hot_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("fixed_clock");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function("basic", |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();
            for _ in 0..iters {
                let generator =
                    BasicShardedGenerator::<ClusterId, _>::new(1, FixedMockTime { millis: 42 })
                        .expect("shard fits layout");
                for _ in 0..TOTAL_IDS {
                    black_box(generator.next_id().expect("fixed clock never regresses"));
                }
            }
            start.elapsed()
        });
    });

    group.bench_function("lock", |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();
            for _ in 0..iters {
                let generator =
                    LockShardedGenerator::<ClusterId, _>::new(1, FixedMockTime { millis: 42 })
                        .expect("shard fits layout");
                for _ in 0..TOTAL_IDS {
                    black_box(generator.next_id().expect("fixed clock never regresses"));
                }
            }
            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks realistic wall-clock behavior, including the occasional
/// millisecond-boundary stall.
fn bench_wall_clock(c: &mut Criterion) {
    let mut group = c.benchmark_group("wall_clock");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function("lock", |b| {
        let generator = LockShardedGenerator::<ClassicId, _>::new(1, WallClock::default())
            .expect("shard fits layout");
        b.iter(|| {
            for _ in 0..TOTAL_IDS {
                black_box(generator.next_id().expect("wall clock within tolerance"));
            }
        });
    });

    group.bench_function("tag", |b| {
        let generator = LockTagGenerator::<RegionId, _>::new(WallClock::default());
        b.iter(|| {
            for tag in 0..TOTAL_IDS as i64 {
                black_box(
                    generator
                        .next_id(tag % 8)
                        .expect("wall clock within tolerance"),
                );
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_hot_path, bench_wall_clock);
criterion_main!(benches);
