use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use dino_core::{HeadlessFrontend, Interpreter, InterpreterConfig, Location, World};

const LAP: [&str; 8] = [
    "MOVE RIGHT",
    "DIG DOWN",
    "MOUND DOWN",
    "GROW UP",
    "CUT UP",
    "PAINT k",
    "JUMP LEFT 3",
    "UNDO",
];

fn bench_commands(c: &mut Criterion) {
    let mut group = c.benchmark_group("commands");

    for size in [10i64, 32, 64, 100] {
        group.bench_with_input(BenchmarkId::new("grid", size), &size, |b, &size| {
            b.iter_batched(
                || {
                    let world = World::new(size, size).expect("bench grid size is valid");
                    Interpreter::new(world, InterpreterConfig::headless(), HeadlessFrontend)
                },
                |mut interp| {
                    let location = Location::new("bench", 1);
                    for _ in 0..16 {
                        for line in LAP {
                            interp
                                .execute_line(line, &location, 0)
                                .expect("bench script runs");
                        }
                    }
                    interp
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(interp_benches, bench_commands);
criterion_main!(interp_benches);
