//! Properties shared by all variation strategies.

use proptest::prelude::*;
use rand::Rng;
use std::time::{Duration, Instant};
use u_permde::de::permutation::{
    decode_ranks, edge_incidence, is_permutation, movements_between, normalize_labels, Movement,
};
use u_permde::de::{
    crossover_mask, AdjacencySet, ListOfMovements, MutationType, PermutationMatrix,
    RelativePositionIndex, Strategy, VariationStrategy,
};
use u_permde::exact::SubSolverConfig;
use u_permde::random::{create_rng, random_tour};
use u_permde::tsp::TspProblem;

fn uniform(n: usize) -> TspProblem {
    TspProblem::from_matrix(&vec![vec![1.0; n]; n]).unwrap()
}

fn square() -> TspProblem {
    TspProblem::from_matrix(&[
        vec![0.0, 1.0, 10.0, 1.0],
        vec![1.0, 0.0, 1.0, 10.0],
        vec![10.0, 1.0, 0.0, 1.0],
        vec![1.0, 10.0, 1.0, 0.0],
    ])
    .unwrap()
}

/// Random points in a 1000 x 1000 square, rounded Euclidean costs.
fn scattered(n: usize, seed: u64) -> TspProblem {
    let mut rng = create_rng(seed);
    let pts: Vec<(f64, f64)> = (0..n)
        .map(|_| (rng.random_range(0.0..1000.0), rng.random_range(0.0..1000.0)))
        .collect();
    let rows: Vec<Vec<f64>> = pts
        .iter()
        .map(|a| {
            pts.iter()
                .map(|b| ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt().round())
                .collect()
        })
        .collect();
    TspProblem::from_matrix(&rows).unwrap()
}

fn all_strategies() -> Vec<Strategy> {
    vec![
        AdjacencySet::new(SubSolverConfig::default().with_time_limit_ms(2_000)).into(),
        ListOfMovements::new().with_mutation_type(MutationType::Truncate).into(),
        ListOfMovements::new().into(),
        ListOfMovements::new().with_mutation_type(MutationType::RandomSubset).into(),
        PermutationMatrix.into(),
        RelativePositionIndex::new().into(),
    ]
}

/// Draws a target and the partners a strategy asks for.
fn draw(strategy: &Strategy, n: usize, seed: u64) -> (Vec<usize>, Vec<Vec<usize>>) {
    let mut rng = create_rng(seed);
    let demand = strategy.demand();
    let target = random_tour(n, &mut rng);
    let count = demand.population + usize::from(demand.random_tour);
    let partners = (0..count).map(|_| random_tour(n, &mut rng)).collect();
    (target, partners)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn every_strategy_yields_a_permutation(n in 4usize..10, seed in any::<u64>()) {
        let problem = uniform(n);
        for strategy in all_strategies() {
            let (target, partners) = draw(&strategy, n, seed);
            let refs: Vec<&[usize]> = partners.iter().map(Vec::as_slice).collect();
            let trial = strategy
                .produce_trial(&problem, &target, &refs, &mut create_rng(seed ^ 0x5eed))
                .unwrap();
            prop_assert!(is_permutation(&trial, n), "{}: {:?}", strategy.name(), trial);
        }
    }

    #[test]
    fn mask_keeps_target_edges(n in 4usize..40, seed in any::<u64>()) {
        let mut rng = create_rng(seed);
        let tours: Vec<Vec<usize>> = (0..4).map(|_| random_tour(n, &mut rng)).collect();
        let mask = crossover_mask(&tours[0], &tours[1], &tours[2], &tours[3]);
        prop_assert!(mask.contains_all(&edge_incidence(&tours[0])));
        prop_assert!(mask.contains_all(&edge_incidence(&tours[3])));
    }

    #[test]
    fn rank_decoding_inverts_normalization(n in 2usize..60, seed in any::<u64>()) {
        let tour = random_tour(n, &mut create_rng(seed));
        prop_assert_eq!(decode_ranks(&normalize_labels(&tour)), tour);
    }
}

#[test]
fn movements_full_factor_reaches_b() {
    let a = [0, 1, 2, 3, 4];
    let b = [4, 3, 2, 1, 0];
    let strategy = ListOfMovements::new()
        .with_mutation_type(MutationType::Truncate)
        .with_factor(1.0);
    let kept = strategy.reduce(movements_between(&a, &b), &mut create_rng(0));
    assert_eq!(
        kept,
        vec![
            Movement {
                source: 4,
                target: 0
            },
            Movement {
                source: 3,
                target: 1
            },
        ]
    );
    let trial = strategy
        .produce_trial(&uniform(5), &a, &[&a, &b, &a], &mut create_rng(0))
        .unwrap();
    assert_eq!(trial, b.to_vec());
}

#[test]
fn permutation_matrix_known_square() {
    let p = square();
    let a = [0, 1, 2, 3];
    let b = [2, 0, 3, 1];
    let c = [1, 3, 0, 2];
    // map = [3, 2, 1, 0]: the trial is A reversed.
    let trial = PermutationMatrix
        .produce_trial(&p, &a, &[&a, &b, &c], &mut create_rng(0))
        .unwrap();
    assert_eq!(trial, vec![3, 2, 1, 0]);
    assert_eq!(p.evaluate(&trial), 4.0);
}

#[test]
fn hybrid_trial_is_optimal_over_small_square() {
    let p = square();
    let target = [0, 2, 1, 3];
    let strategy = AdjacencySet::new(SubSolverConfig::default());
    let trial = strategy
        .produce_trial(
            &p,
            &target,
            &[&[0, 1, 3, 2], &[0, 1, 2, 3], &[1, 2, 3, 0]],
            &mut create_rng(0),
        )
        .unwrap();
    assert!(is_permutation(&trial, 4));
    assert_eq!(p.evaluate(&trial), 4.0);
}

#[test]
fn hybrid_improves_random_targets_at_48_nodes() {
    let n = 48;
    let problem = scattered(n, 48);
    let strategy = AdjacencySet::new(SubSolverConfig::default().with_time_limit_ms(500));
    let mut rng = create_rng(7);
    let started = Instant::now();
    let mut improved = 0;
    for _ in 0..5 {
        let tours: Vec<Vec<usize>> = (0..4).map(|_| random_tour(n, &mut rng)).collect();
        let partners: Vec<&[usize]> = tours[1..].iter().map(Vec::as_slice).collect();
        let trial = strategy
            .produce_trial(&problem, &tours[0], &partners, &mut rng)
            .unwrap();
        assert!(is_permutation(&trial, n));
        let (trial_cost, target_cost) = (problem.evaluate(&trial), problem.evaluate(&tours[0]));
        assert!(trial_cost <= target_cost);
        if trial_cost < target_cost {
            improved += 1;
        }
    }
    assert!(started.elapsed() < Duration::from_secs(10));
    assert!(improved >= 1);
}
