//! Hamiltonian-cycle solving over a restricted edge set.
//!
//! [`HamiltonianSolver`] turns an edge-activation mask into an
//! [`EdgeModel`], seeds it with a warm-start tour and solves it with
//! [`SubtourElimination`] as the lazy-constraint callback. The callback walks
//! the components of every integer-feasible 2-factor; the shortest cycle is
//! either cut off (`Σ x_e ≤ |S| − 1` over the edges inside `S`) or, when it
//! already spans all nodes, accepted as the tour.
//!
//! The model is marked single-cycle, so the branch-and-bound already refuses
//! edges that close a path early. The callback stays in place as the final
//! acceptance check and is what records the tour.

use super::model::{EdgeModel, LazyCut};
use super::solver::{EdgeSelectionSolver, LazyConstraints, SolveStatus, SolverConfig};
use crate::error::DeError;
use crate::relation::SymmetricRelation;
use crate::tsp::TspProblem;
use tracing::{debug, info, trace, warn};

/// Limits and output level of the sub-solver.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubSolverConfig {
    /// Wall-clock limit per solve in milliseconds. `None` = unbounded.
    pub time_limit_ms: Option<u64>,

    /// Maximum explored search nodes per solve. `None` = unbounded.
    pub node_limit: Option<u64>,

    /// Seed for the solver's tie-breaking.
    pub seed: u64,

    /// `0` logs solve summaries at debug level, anything higher at info.
    pub verbosity: u8,
}

impl SubSolverConfig {
    /// Sets the per-solve time limit.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Sets the per-solve node limit.
    pub fn with_node_limit(mut self, nodes: u64) -> Self {
        self.node_limit = Some(nodes);
        self
    }

    /// Sets the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the verbosity.
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }
}

/// Lazy subtour elimination for degree-2 edge selections.
#[derive(Debug, Clone)]
pub struct SubtourElimination {
    node_count: usize,
    tour: Option<Vec<usize>>,
}

impl SubtourElimination {
    /// Creates the callback for an `node_count`-node model.
    pub fn new(node_count: usize) -> Self {
        Self {
            node_count,
            tour: None,
        }
    }

    /// The most recently accepted tour.
    pub fn tour(&self) -> Option<&[usize]> {
        self.tour.as_deref()
    }

    /// Consumes the callback, returning the accepted tour.
    pub fn into_tour(self) -> Option<Vec<usize>> {
        self.tour
    }
}

impl LazyConstraints for SubtourElimination {
    fn separate(&mut self, model: &EdgeModel, selected: &[usize]) -> Option<LazyCut> {
        let cycle = shortest_cycle(model, selected);
        if cycle.len() < self.node_count {
            trace!(size = cycle.len(), "subtour cut");
            Some(LazyCut {
                limit: cycle.len() - 1,
                nodes: cycle,
            })
        } else {
            self.tour = Some(cycle);
            None
        }
    }
}

/// Shortest cycle of a selection, in walk order.
///
/// Components are walked starting from the lowest unvisited node, each step
/// moving to the lowest-index unvisited neighbour until none is left. On
/// equal lengths the first component found wins.
pub fn shortest_cycle(model: &EdgeModel, selected: &[usize]) -> Vec<usize> {
    let n = model.node_count();
    let mut neighbors = vec![Vec::with_capacity(2); n];
    for &e in selected {
        let edge = model.edges()[e];
        neighbors[edge.u].push(edge.v);
        neighbors[edge.v].push(edge.u);
    }
    for list in &mut neighbors {
        list.sort_unstable();
    }

    let mut seen = vec![false; n];
    let mut walk = Vec::with_capacity(n);
    let mut best: Option<(usize, usize)> = None;

    for first in 0..n {
        if seen[first] {
            continue;
        }
        let begin = walk.len();
        let mut node = first;
        loop {
            walk.push(node);
            seen[node] = true;
            match neighbors[node].iter().find(|&&next| !seen[next]) {
                Some(&next) => node = next,
                None => break,
            }
        }
        let len = walk.len() - begin;
        if best.map_or(true, |(_, best_len)| len < best_len) {
            best = Some((begin, len));
        }
    }

    match best {
        Some((begin, len)) => walk[begin..begin + len].to_vec(),
        None => Vec::new(),
    }
}

/// Exact Hamiltonian-cycle solver over a subset of the instance's edges.
#[derive(Debug, Clone, Default)]
pub struct HamiltonianSolver {
    config: SubSolverConfig,
}

impl HamiltonianSolver {
    /// Creates a solver with the given configuration.
    pub fn new(config: SubSolverConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &SubSolverConfig {
        &self.config
    }

    /// Finds the cheapest tour using only edges set in `active`.
    ///
    /// `warm_start`, when it only uses active edges, is the initial
    /// incumbent, so the result is never worse than it. A warm start that
    /// leaves the mask is ignored.
    ///
    /// # Errors
    ///
    /// [`DeError::Solver`] when the limits expire before any tour is found
    /// or the active edges admit no Hamiltonian cycle; [`DeError::Config`]
    /// when the mask size differs from the instance.
    pub fn solve(
        &self,
        problem: &TspProblem,
        active: &SymmetricRelation<bool>,
        warm_start: Option<&[usize]>,
    ) -> Result<Vec<usize>, DeError> {
        let n = problem.node_count();
        if active.size() != n {
            return Err(DeError::config(format!(
                "edge mask has size {}, instance has {n} nodes",
                active.size()
            )));
        }
        if n < 3 {
            // Fewer than three nodes have a single possible closed tour.
            return Ok(warm_start.map_or_else(|| (0..n).collect(), <[usize]>::to_vec));
        }

        let mut model = EdgeModel::new(n);
        model.set_single_cycle(true);
        for (i, j) in active.pairs() {
            model.add_edge(i, j, problem.cost(i, j));
        }
        if let Some(tour) = warm_start {
            match model.tour_edges(tour) {
                Some(edges) if tour.len() == n => model.set_start(edges),
                _ => warn!("warm start is not a tour over the active edges; ignored"),
            }
        }

        let solver = EdgeSelectionSolver::new(SolverConfig {
            time_limit_ms: self.config.time_limit_ms,
            node_limit: self.config.node_limit,
            seed: self.config.seed,
        });
        let mut lazy = SubtourElimination::new(n);
        let solution = solver.solve(&model, &mut lazy);

        if self.config.verbosity > 0 {
            info!(
                status = ?solution.status,
                edges = model.edges().len(),
                nodes = solution.nodes_explored,
                cuts = solution.cuts_added,
                elapsed_ms = solution.elapsed_ms,
                "sub-solve finished"
            );
        } else {
            debug!(
                status = ?solution.status,
                edges = model.edges().len(),
                nodes = solution.nodes_explored,
                cuts = solution.cuts_added,
                elapsed_ms = solution.elapsed_ms,
                "sub-solve finished"
            );
        }

        match (solution.status, lazy.into_tour()) {
            (SolveStatus::Optimal | SolveStatus::Feasible, Some(tour)) => Ok(tour),
            (status, _) => Err(DeError::solver(format!(
                "no tour over {} active edges ({status:?} after {} nodes)",
                model.edges().len(),
                solution.nodes_explored
            ))),
        }
    }

    /// Solves the whole instance: every edge active, no warm start.
    pub fn solve_complete(&self, problem: &TspProblem) -> Result<Vec<usize>, DeError> {
        let n = problem.node_count();
        let mut active = SymmetricRelation::dense(n, true);
        for i in 0..n {
            active.set(i, i, false);
        }
        self.solve(problem, &active, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::de::permutation::{edge_incidence, is_permutation};
    use crate::random::create_rng;
    use rand::Rng;

    /// Points on a line: the optimal tour costs twice the span.
    fn line(n: usize) -> TspProblem {
        let rows: Vec<Vec<f64>> = (0..n)
            .map(|i| (0..n).map(|j| (i as f64 - j as f64).abs()).collect())
            .collect();
        TspProblem::from_matrix(&rows).unwrap()
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

    fn limited() -> SubSolverConfig {
        SubSolverConfig::default().with_time_limit_ms(5_000)
    }

    #[test]
    fn test_shortest_cycle_two_triangles() {
        let mut m = EdgeModel::new(7);
        let mut sel = Vec::new();
        // 4-cycle 0-1-2-3 and triangle 4-5-6
        for (a, b) in [(0, 1), (1, 2), (2, 3), (3, 0), (4, 5), (5, 6), (6, 4)] {
            sel.push(m.add_edge(a, b, 1.0));
        }
        assert_eq!(shortest_cycle(&m, &sel), vec![4, 5, 6]);
    }

    #[test]
    fn test_shortest_cycle_first_on_ties() {
        let mut m = EdgeModel::new(6);
        let mut sel = Vec::new();
        for (a, b) in [(3, 4), (4, 5), (5, 3), (0, 2), (2, 1), (1, 0)] {
            sel.push(m.add_edge(a, b, 1.0));
        }
        assert_eq!(shortest_cycle(&m, &sel), vec![0, 1, 2]);
    }

    #[test]
    fn test_callback_cut_and_accept() {
        let mut m = EdgeModel::new(6);
        let split: Vec<usize> = [(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)]
            .iter()
            .map(|&(a, b)| m.add_edge(a, b, 1.0))
            .collect();
        let mut lazy = SubtourElimination::new(6);
        let cut = lazy.separate(&m, &split).unwrap();
        assert_eq!(cut.nodes, vec![0, 1, 2]);
        assert_eq!(cut.limit, 2);
        assert!(lazy.tour().is_none());

        let ring: Vec<usize> = [(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0)]
            .iter()
            .map(|&(a, b)| m.add_edge(a, b, 1.0))
            .collect();
        assert!(lazy.separate(&m, &ring).is_none());
        assert_eq!(lazy.tour(), Some(&[0, 1, 2, 3, 4, 5][..]));
    }

    #[test]
    fn test_solve_complete_line() {
        let p = line(7);
        let tour = HamiltonianSolver::new(limited()).solve_complete(&p).unwrap();
        assert!(is_permutation(&tour, 7));
        assert_eq!(p.evaluate(&tour), 12.0);
    }

    #[test]
    fn test_solve_complete_finds_tour_quickly() {
        let p = scattered(60, 4);
        let config = SubSolverConfig::default().with_time_limit_ms(1_000);
        let tour = HamiltonianSolver::new(config).solve_complete(&p).unwrap();
        assert_eq!(p.check_feasibility(&tour), Ok(()));
    }

    #[test]
    fn test_solve_complete_hundreds_of_nodes() {
        let p = scattered(300, 8);
        let config = SubSolverConfig::default().with_time_limit_ms(1_000);
        match HamiltonianSolver::new(config).solve_complete(&p) {
            Ok(tour) => assert!(is_permutation(&tour, 300)),
            Err(err) => assert!(matches!(err, DeError::Solver { .. })),
        }
    }

    #[test]
    fn test_solve_rejects_subtours() {
        // Two far-apart clusters: the cheapest 2-factor is two triangles,
        // the cheapest tour must bridge them.
        let coords: [(f64, f64); 6] = [
            (0.0, 0.0),
            (1.0, 0.0),
            (0.0, 1.0),
            (50.0, 0.0),
            (51.0, 0.0),
            (50.0, 1.0),
        ];
        let rows: Vec<Vec<f64>> = coords
            .iter()
            .map(|a| {
                coords
                    .iter()
                    .map(|b| ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt().round())
                    .collect()
            })
            .collect();
        let p = TspProblem::from_matrix(&rows).unwrap();
        let tour = HamiltonianSolver::new(limited()).solve_complete(&p).unwrap();
        assert!(is_permutation(&tour, 6));
        assert_eq!(p.check_feasibility(&tour), Ok(()));
    }

    #[test]
    fn test_restricted_never_worse_than_warm_start() {
        let p = line(8);
        let warm = vec![0, 4, 1, 5, 2, 6, 3, 7];
        let mask = edge_incidence(&warm).union(&edge_incidence(&(0..8).collect::<Vec<_>>()));
        let tour = HamiltonianSolver::new(limited())
            .solve(&p, &mask, Some(&warm))
            .unwrap();
        assert!(p.evaluate(&tour) <= p.evaluate(&warm));
        assert!(mask.contains_all(&edge_incidence(&tour)));
    }

    #[test]
    fn test_only_warm_start_edges() {
        let p = line(6);
        let warm = vec![3, 0, 5, 1, 4, 2];
        let mask = edge_incidence(&warm);
        let tour = HamiltonianSolver::default()
            .solve(&p, &mask, Some(&warm))
            .unwrap();
        assert_eq!(p.evaluate(&tour), p.evaluate(&warm));
    }

    #[test]
    fn test_infeasible_mask_fails() {
        let p = line(5);
        let mut mask = SymmetricRelation::dense(5, false);
        for (a, b) in [(0, 1), (1, 2), (2, 3), (3, 4)] {
            mask.set(a, b, true);
        }
        let err = HamiltonianSolver::default().solve(&p, &mask, None).unwrap_err();
        assert!(matches!(err, DeError::Solver { .. }));
    }

    #[test]
    fn test_limit_without_incumbent_fails() {
        let p = line(9);
        let config = SubSolverConfig::default().with_node_limit(1);
        let err = HamiltonianSolver::new(config).solve_complete(&p).unwrap_err();
        assert!(matches!(err, DeError::Solver { .. }));
    }

    #[test]
    fn test_mask_size_mismatch() {
        let p = line(4);
        let mask = SymmetricRelation::dense(5, true);
        assert!(matches!(
            HamiltonianSolver::default().solve(&p, &mask, None),
            Err(DeError::Config { .. })
        ));
    }

    #[test]
    fn test_tiny_instances() {
        let p = line(2);
        let mask = SymmetricRelation::dense(2, true);
        assert_eq!(
            HamiltonianSolver::default().solve(&p, &mask, Some(&[1, 0])).unwrap(),
            vec![1, 0]
        );
    }
}
