// Benchmarks for schedule generation and application.
//
// Run with: cargo bench -p tower_chimes_sim --bench schedule
//
// `generate` measures the lazy iterator alone; `solve` adds the checked
// `TowerSystem::apply()` for every move.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use tower_chimes_sim::tower::PegId;
use tower_chimes_sim::{SolveRun, TowerSystem, generate_moves};

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for height in [8u32, 12, 16] {
        group.bench_with_input(BenchmarkId::from_parameter(height), &height, |b, &h| {
            b.iter(|| {
                let moves = generate_moves(black_box(h), PegId::First, PegId::Third, PegId::Second)
                    .unwrap();
                moves.fold(0u32, |acc, m| acc.wrapping_add(m.block))
            });
        });
    }
    group.finish();
}

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve");
    for height in [8u32, 12, 16] {
        group.bench_with_input(BenchmarkId::from_parameter(height), &height, |b, &h| {
            b.iter(|| {
                let mut tower = TowerSystem::new(black_box(h), 3).unwrap();
                let mut run = SolveRun::for_tower(&tower).unwrap();
                run.run_to_end(&mut tower).unwrap()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_generate, bench_solve);
criterion_main!(benches);
