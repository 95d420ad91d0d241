//! Criterion benchmarks for the tour solver.
//!
//! Uses seeded random city layouts to measure one generation step and
//! a short batch run at several instance sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use salesman_ga::runner::create_rng;
use salesman_ga::{step, City, FitnessEvaluator, Population, Solver, SolverConfig};

fn random_cities(n: usize, seed: u64) -> Vec<City> {
    let mut rng = create_rng(seed);
    (0..n)
        .map(|_| City::new(rng.random_range(0.0..1000.0), rng.random_range(0.0..1000.0)))
        .collect()
}

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("step");
    group.sample_size(20);

    for (cities, pop) in [(20usize, 50usize), (100, 100), (300, 200)] {
        let evaluator = FitnessEvaluator::new(random_cities(cities, 42));
        let config = SolverConfig::default();
        let mut rng = create_rng(42);
        let population = Population::initialize(&evaluator, pop, &mut rng)
            .expect("non-empty instance");

        group.bench_with_input(
            BenchmarkId::new(format!("c{}_p{}", cities, pop), cities),
            &(evaluator, config, population),
            |b, (e, cfg, p)| {
                b.iter(|| {
                    let mut p = p.clone();
                    step(&mut p, black_box(e), cfg, &mut rng).expect("valid config");
                    black_box(p)
                })
            },
        );
    }
    group.finish();
}

fn bench_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("run");
    group.sample_size(10);

    for &n in &[20usize, 50] {
        let cities = random_cities(n, 7);
        let config = SolverConfig::default()
            .with_population_size(50)
            .with_max_generations(100)
            .with_seed(7);
        group.bench_with_input(BenchmarkId::from_parameter(n), &(cities, config), |b, (cs, cfg)| {
            b.iter(|| {
                let mut solver =
                    Solver::with_cities(cs.iter().copied(), cfg.clone()).expect("valid config");
                black_box(solver.run().expect("cities present"))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_step, bench_run);
criterion_main!(benches);
