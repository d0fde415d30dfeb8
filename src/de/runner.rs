//! Generational DE loop over tours.

use super::config::{Algorithm, AlgorithmParams, DeConfig, TARGET_TOLERANCE};
use super::permutation::is_permutation;
use super::types::VariationStrategy;
use crate::error::DeError;
use crate::exact::HamiltonianSolver;
use crate::random::{create_rng, random_tour};
use crate::tsp::{TspProblem, Violation};
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// A tour of the population with its cost.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Member {
    /// The tour.
    pub tour: Vec<usize>,
    /// Its cost under the instance.
    pub cost: f64,
}

impl Member {
    fn evaluate(problem: &TspProblem, tour: Vec<usize>) -> Self {
        let cost = problem.evaluate(&tour);
        Self { tour, cost }
    }
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Termination {
    /// `max_generations` generations were executed.
    GenerationLimit,
    /// The best cost came within tolerance of `target_value`.
    TargetReached,
    /// `time_limit_ms` elapsed.
    TimeLimit,
    /// The cancellation flag was raised.
    Cancelled,
}

/// Result of a DE run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeResult {
    /// The best tour found.
    pub best_tour: Vec<usize>,

    /// Cost of the best tour.
    pub best_cost: f64,

    /// Number of generations executed.
    pub generations: usize,

    /// Why the run stopped.
    pub termination: Termination,

    /// Best cost after initialization, then after each generation.
    pub cost_history: Vec<f64>,

    /// Number of times the best tour strictly improved after initialization.
    pub improvements: usize,

    /// The population when the run stopped, in slot order.
    pub population: Vec<Member>,
}

impl DeResult {
    /// Whether the run was cancelled externally.
    pub fn cancelled(&self) -> bool {
        self.termination == Termination::Cancelled
    }
}

/// Executes differential evolution with a given strategy.
pub struct DeRunner;

impl DeRunner {
    /// Runs DE until a termination criterion holds.
    ///
    /// # Errors
    ///
    /// [`DeError::Config`] when the configuration does not suit the strategy
    /// (checked before any tour is created), or any error a strategy returns
    /// while producing a trial.
    pub fn run<S: VariationStrategy>(
        problem: &TspProblem,
        strategy: &S,
        config: &DeConfig,
    ) -> Result<DeResult, DeError> {
        Self::run_with_cancel(problem, strategy, config, None)
    }

    /// Runs DE with an optional cancellation token.
    ///
    /// The flag is checked at the start of every generation; a generation in
    /// progress always completes.
    pub fn run_with_cancel<S: VariationStrategy>(
        problem: &TspProblem,
        strategy: &S,
        config: &DeConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<DeResult, DeError> {
        let demand = strategy.demand();
        config.validate(demand)?;

        let started = Instant::now();
        let mut rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };

        let n = problem.node_count();
        let pop_size = config.population_size;
        info!(
            nodes = n,
            population = pop_size,
            max_generations = ?config.max_generations,
            "starting differential evolution"
        );

        // Initialize population
        let mut population: Vec<Member> = (0..pop_size)
            .map(|_| Member::evaluate(problem, random_tour(n, &mut rng)))
            .collect();

        let mut best = population[0].clone();
        for member in &population[1..] {
            if member.cost < best.cost {
                best = member.clone();
            }
        }

        let mut cost_history = vec![best.cost];
        let mut improvements = 0usize;
        let mut generations = 0usize;
        let mut offspring: Vec<Member> = Vec::with_capacity(pop_size);
        let mut chosen: Vec<usize> = Vec::with_capacity(demand.population);

        let termination = loop {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    break Termination::Cancelled;
                }
            }
            if config.max_generations.is_some_and(|max| generations >= max) {
                break Termination::GenerationLimit;
            }
            if config
                .target_value
                .is_some_and(|target| best.cost - target <= TARGET_TOLERANCE)
            {
                break Termination::TargetReached;
            }
            if config
                .time_limit_ms
                .is_some_and(|ms| started.elapsed().as_millis() >= u128::from(ms))
            {
                break Termination::TimeLimit;
            }

            offspring.clear();
            for (i, member) in population.iter().enumerate() {
                select_partners(i, pop_size, demand.population, &mut rng, &mut chosen);
                let fresh = demand.random_tour.then(|| random_tour(n, &mut rng));

                let mut partners: Vec<&[usize]> =
                    chosen.iter().map(|&k| population[k].tour.as_slice()).collect();
                if let Some(tour) = &fresh {
                    partners.push(tour);
                }

                let trial = strategy.produce_trial(problem, &member.tour, &partners, &mut rng)?;
                debug_assert!(is_permutation(&trial, n), "trial is not a permutation");
                let trial = Member::evaluate(problem, trial);

                // Selection
                if trial.cost < member.cost {
                    if trial.cost < best.cost {
                        best = trial.clone();
                        improvements += 1;
                    }
                    offspring.push(trial);
                } else {
                    offspring.push(member.clone());
                }
            }

            debug_assert_eq!(offspring.len(), pop_size, "population size changed");
            std::mem::swap(&mut population, &mut offspring);
            generations += 1;
            cost_history.push(best.cost);
            debug!(generation = generations, best_cost = best.cost, "generation finished");
        };

        info!(
            generations,
            best_cost = best.cost,
            ?termination,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "differential evolution finished"
        );

        Ok(DeResult {
            best_tour: best.tour,
            best_cost: best.cost,
            generations,
            termination,
            cost_history,
            improvements,
            population,
        })
    }
}

/// Draws `count` distinct member indices, none equal to `target`.
///
/// Each index is drawn uniformly from `0..pop_size` and redrawn while it
/// collides with the target or an earlier pick. The caller guarantees
/// `pop_size > count`.
pub fn select_partners<R: Rng + ?Sized>(
    target: usize,
    pop_size: usize,
    count: usize,
    rng: &mut R,
    chosen: &mut Vec<usize>,
) {
    chosen.clear();
    while chosen.len() < count {
        let k = rng.random_range(0..pop_size);
        if k != target && !chosen.contains(&k) {
            chosen.push(k);
        }
    }
}

// ============================================================================
// Named entry point
// ============================================================================

/// Outcome of [`solve_instance`].
#[derive(Debug, Clone)]
pub struct RunReport {
    /// The algorithm that produced the tour.
    pub algorithm: Algorithm,
    /// Best tour found.
    pub tour: Vec<usize>,
    /// Its cost.
    pub cost: f64,
    /// Whether the tour is a valid Hamiltonian cycle of the instance.
    pub feasibility: Result<(), Violation>,
    /// Generations executed (`0` for the exact algorithm).
    pub generations: usize,
}

impl RunReport {
    /// `"Feasible"` or `"Infeasible"`.
    pub fn status(&self) -> &'static str {
        if self.feasibility.is_ok() {
            "Feasible"
        } else {
            "Infeasible"
        }
    }
}

/// Runs `algorithm` on `problem` with the given parameters.
///
/// # Errors
///
/// Configuration errors from [`AlgorithmParams::build`] and any error raised
/// during the run.
pub fn solve_instance(
    problem: &TspProblem,
    algorithm: Algorithm,
    params: &AlgorithmParams,
) -> Result<RunReport, DeError> {
    let (tour, generations) = match algorithm {
        Algorithm::Exact => {
            let solver = HamiltonianSolver::new(params.exact_config());
            (solver.solve_complete(problem)?, 0)
        }
        _ => {
            let (config, strategy) = params.build(algorithm)?;
            let result = DeRunner::run(problem, &strategy, &config)?;
            (result.best_tour, result.generations)
        }
    };

    let cost = problem.evaluate(&tour);
    let feasibility = problem.check_feasibility(&tour);
    info!(%algorithm, cost, feasible = feasibility.is_ok(), "instance solved");

    Ok(RunReport {
        algorithm,
        tour,
        cost,
        feasibility,
        generations,
    })
}
