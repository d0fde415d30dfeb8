//! Criterion benchmarks for the permutation DE strategies.
//!
//! Uses points on a circle so that instances of any size are cheap to build
//! and have a known optimum (the polygon perimeter).

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_permde::de::permutation::{decode_ranks, movements_between, normalize_labels};
use u_permde::de::{
    AdjacencySet, DeConfig, DeRunner, ListOfMovements, PermutationMatrix, RelativePositionIndex,
};
use u_permde::exact::{HamiltonianSolver, SubSolverConfig};
use u_permde::random::{create_rng, random_tour};
use u_permde::tsp::TspProblem;

// ===========================================================================
// Instances
// ===========================================================================

fn circle(n: usize) -> TspProblem {
    let pts: Vec<(f64, f64)> = (0..n)
        .map(|i| {
            let a = i as f64 * std::f64::consts::TAU / n as f64;
            (1000.0 * a.cos(), 1000.0 * a.sin())
        })
        .collect();
    let rows: Vec<Vec<f64>> = pts
        .iter()
        .map(|p| {
            pts.iter()
                .map(|q| ((p.0 - q.0).powi(2) + (p.1 - q.1).powi(2)).sqrt().round())
                .collect()
        })
        .collect();
    TspProblem::from_matrix(&rows).expect("square matrix")
}

fn config() -> DeConfig {
    DeConfig::default()
        .with_population_size(30)
        .with_max_generations(50)
        .with_seed(42)
}

// ===========================================================================
// Primitives
// ===========================================================================

fn bench_primitives(c: &mut Criterion) {
    let mut group = c.benchmark_group("primitives");
    for &n in &[100, 1000] {
        let mut rng = create_rng(1);
        let a = random_tour(n, &mut rng);
        let b = random_tour(n, &mut rng);
        group.bench_with_input(BenchmarkId::new("movements", n), &(a.clone(), b), |bch, (a, b)| {
            bch.iter(|| black_box(movements_between(black_box(a), black_box(b))))
        });
        group.bench_with_input(BenchmarkId::new("decode", n), &a, |bch, a| {
            bch.iter(|| black_box(decode_ranks(&normalize_labels(black_box(a)))))
        });
    }
    group.finish();
}

// ===========================================================================
// Full runs
// ===========================================================================

fn bench_de_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("de_circle");
    group.sample_size(10);

    for &n in &[20, 50] {
        let problem = circle(n);
        let config = config();

        group.bench_with_input(BenchmarkId::new("list-movements", n), &problem, |b, p| {
            b.iter(|| black_box(DeRunner::run(black_box(p), &ListOfMovements::new(), &config)))
        });
        group.bench_with_input(BenchmarkId::new("permutation-matrix", n), &problem, |b, p| {
            b.iter(|| black_box(DeRunner::run(black_box(p), &PermutationMatrix, &config)))
        });
        group.bench_with_input(
            BenchmarkId::new("relative-position-index", n),
            &problem,
            |b, p| {
                b.iter(|| {
                    black_box(DeRunner::run(
                        black_box(p),
                        &RelativePositionIndex::new(),
                        &config,
                    ))
                })
            },
        );
    }
    group.finish();
}

fn bench_hybrid(c: &mut Criterion) {
    let mut group = c.benchmark_group("code_circle");
    group.sample_size(10);

    for &n in &[10, 14] {
        let problem = circle(n);
        let strategy = AdjacencySet::new(SubSolverConfig::default().with_time_limit_ms(1_000));
        let config = config().with_max_generations(5);
        group.bench_with_input(BenchmarkId::from_parameter(n), &problem, |b, p| {
            b.iter(|| black_box(DeRunner::run(black_box(p), &strategy, &config)))
        });
    }
    group.finish();
}

fn bench_exact(c: &mut Criterion) {
    let mut group = c.benchmark_group("exact_circle");
    group.sample_size(10);

    for &n in &[8, 12] {
        let problem = circle(n);
        let solver = HamiltonianSolver::new(SubSolverConfig::default().with_time_limit_ms(5_000));
        group.bench_with_input(BenchmarkId::from_parameter(n), &problem, |b, p| {
            b.iter(|| black_box(solver.solve_complete(black_box(p))))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_primitives,
    bench_de_strategies,
    bench_hybrid,
    bench_exact
);
criterion_main!(benches);
