//! Branch-and-bound solver for [`EdgeModel`] with lazy constraints.
//!
//! The search is a depth-first walk over partial selections, kept on an
//! explicit stack so that its depth never grows with the number of edges.
//! At each search node the solver picks the unsaturated node with the fewest
//! usable edges and branches over them, cheapest first (ties in a seeded
//! random order): child `i` includes the `i`-th edge and excludes the ones
//! tried before it. An edge is usable while it is undecided, both endpoints
//! have degree below 2, it violates no lazy cut and, on a
//! [`single_cycle`](EdgeModel::single_cycle) model, it does not close a path
//! into a cycle shorter than the node count.
//!
//! A search node is pruned when some unsaturated node has fewer usable edges
//! than it still needs, or when the degree bound cannot beat the incumbent.
//! The degree bound adds, for every node below degree 2, its cheapest usable
//! edges for the missing degree, halves the total, and adds the cost of the
//! current selection.
//!
//! Every complete selection (all degrees equal to 2) is an integer-feasible
//! candidate and is handed to [`LazyConstraints::separate`]. A returned cut
//! rejects the candidate and stays active for the rest of the search;
//! otherwise the candidate becomes the incumbent.

use super::model::{EdgeModel, LazyCut};
use crate::random::{create_rng, shuffle};
use std::cmp::Ordering;
use std::time::Instant;

/// Improvements smaller than this are ignored.
const EPSILON: f64 = 1e-9;

/// Callback invoked on integer-feasible candidates.
pub trait LazyConstraints {
    /// Inspects a complete selection (indices into [`EdgeModel::edges`]).
    ///
    /// Returns a cut violated by the selection to reject it, or `None` to
    /// accept it as the new incumbent.
    fn separate(&mut self, model: &EdgeModel, selected: &[usize]) -> Option<LazyCut>;
}

/// Status of the solver after execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Search completed; the incumbent is optimal.
    Optimal,
    /// A limit stopped the search; the incumbent may not be optimal.
    Feasible,
    /// Search completed without any accepted candidate.
    Infeasible,
    /// A limit stopped the search before any candidate was accepted.
    LimitReached,
}

/// Solver limits.
#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    /// Wall-clock limit in milliseconds. `None` = unbounded.
    pub time_limit_ms: Option<u64>,
    /// Maximum number of explored search nodes. `None` = unbounded.
    pub node_limit: Option<u64>,
    /// Seed for ordering equal-cost edges.
    pub seed: u64,
}

/// Outcome of [`EdgeSelectionSolver::solve`].
#[derive(Debug, Clone)]
pub struct EdgeSolution {
    /// Final status.
    pub status: SolveStatus,
    /// Selected edge indices of the incumbent.
    pub selected: Option<Vec<usize>>,
    /// Objective value of the incumbent.
    pub objective: Option<f64>,
    /// Number of search nodes explored.
    pub nodes_explored: u64,
    /// Number of lazy cuts added.
    pub cuts_added: usize,
    /// Solve time in milliseconds.
    pub elapsed_ms: u64,
}

impl EdgeSolution {
    /// Whether an incumbent exists.
    pub fn is_solution_found(&self) -> bool {
        matches!(self.status, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

/// Exact solver for edge-selection models.
#[derive(Debug, Clone, Default)]
pub struct EdgeSelectionSolver {
    config: SolverConfig,
}

impl EdgeSelectionSolver {
    /// Creates a solver with the given limits.
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Solves `model`, consulting `lazy` on every candidate.
    ///
    /// The model's start assignment, if it is degree-feasible and accepted by
    /// `lazy`, seeds the incumbent before the search begins.
    pub fn solve<C: LazyConstraints>(&self, model: &EdgeModel, lazy: &mut C) -> EdgeSolution {
        let started = Instant::now();
        let n = model.node_count();
        let edges = model.edges();

        let mut order: Vec<usize> = (0..edges.len()).collect();
        shuffle(&mut order, &mut create_rng(self.config.seed));
        let mut rank = vec![0usize; edges.len()];
        for (position, &e) in order.iter().enumerate() {
            rank[e] = position;
        }

        let mut incident = vec![Vec::new(); n];
        for (e, edge) in edges.iter().enumerate() {
            incident[edge.u].push(e);
            incident[edge.v].push(e);
        }
        let structurally_feasible = n >= 3 && incident.iter().all(|list| list.len() >= 2);

        let mut search = Search {
            model,
            lazy,
            rank,
            incident,
            state: vec![EdgeState::Free; edges.len()],
            degree: vec![0; n],
            end: (0..n).collect(),
            joins: Vec::with_capacity(n),
            selected: Vec::with_capacity(n),
            cost: 0.0,
            cuts: Vec::new(),
            edge_cuts: vec![Vec::new(); edges.len()],
            usable_count: vec![0; n],
            cheapest: vec![[f64::INFINITY; 2]; n],
            incumbent: None,
            nodes: 0,
            stopped: false,
            started,
            config: &self.config,
        };

        if structurally_feasible {
            if let Some(start) = model.start() {
                search.try_start(start);
            }
            search.run();
        }

        let status = match (search.stopped, search.incumbent.is_some()) {
            (false, true) => SolveStatus::Optimal,
            (false, false) => SolveStatus::Infeasible,
            (true, true) => SolveStatus::Feasible,
            (true, false) => SolveStatus::LimitReached,
        };
        let (selected, objective) = match search.incumbent {
            Some((sel, obj)) => (Some(sel), Some(obj)),
            None => (None, None),
        };

        EdgeSolution {
            status,
            selected,
            objective,
            nodes_explored: search.nodes,
            cuts_added: search.cuts.len(),
            elapsed_ms: started.elapsed().as_millis() as u64,
        }
    }
}

// ============================================================================
// Search state
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EdgeState {
    Free,
    Selected,
    Excluded,
}

/// A lazy cut during search: `count` selected edges inside, at most `limit`.
struct CutState {
    limit: usize,
    count: usize,
}

/// Path ends overwritten when an edge joined two fragments.
struct Join {
    u: usize,
    far_u: usize,
    v: usize,
    far_v: usize,
}

/// One level of the explicit search stack.
struct Frame {
    /// Usable edges of the branching node, in trial order.
    candidates: Vec<usize>,
    next: usize,
    /// Edge included for the child currently below this frame.
    included: Option<usize>,
    /// Edges excluded for the later children.
    excluded: Vec<usize>,
}

struct Search<'a, C> {
    model: &'a EdgeModel,
    lazy: &'a mut C,
    /// Seeded tie-break position of each edge.
    rank: Vec<usize>,
    incident: Vec<Vec<usize>>,
    state: Vec<EdgeState>,
    degree: Vec<u8>,
    /// For a node of degree below 2: the other end of its path.
    end: Vec<usize>,
    joins: Vec<Option<Join>>,
    selected: Vec<usize>,
    cost: f64,
    cuts: Vec<CutState>,
    /// Cuts containing each edge.
    edge_cuts: Vec<Vec<usize>>,
    usable_count: Vec<usize>,
    cheapest: Vec<[f64; 2]>,
    incumbent: Option<(Vec<usize>, f64)>,
    nodes: u64,
    stopped: bool,
    started: Instant,
    config: &'a SolverConfig,
}

impl<C: LazyConstraints> Search<'_, C> {
    fn run(&mut self) {
        let mut stack: Vec<Frame> = Vec::new();
        if let Some(root) = self.enter() {
            stack.push(root);
        }
        while let Some(frame) = stack.last_mut() {
            if self.stopped {
                break;
            }
            if let Some(previous) = frame.included.take() {
                self.unselect(previous);
                self.state[previous] = EdgeState::Excluded;
                frame.excluded.push(previous);
            }
            let Some(&e) = frame.candidates.get(frame.next) else {
                for &e in &frame.excluded {
                    self.state[e] = EdgeState::Free;
                }
                stack.pop();
                continue;
            };
            frame.next += 1;
            // A cut added below this frame may have retired the edge.
            if !self.usable(e) {
                continue;
            }
            self.select(e);
            frame.included = Some(e);
            if let Some(child) = self.enter() {
                stack.push(child);
            }
        }
    }

    /// Visits the current selection. Returns the frame to branch on, or
    /// `None` when the node is a leaf, is pruned, or a limit is hit.
    fn enter(&mut self) -> Option<Frame> {
        if self.limit_reached() {
            self.stopped = true;
            return None;
        }
        self.nodes += 1;

        let model = self.model;
        let n = model.node_count();
        if self.selected.len() == n {
            self.candidate();
            return None;
        }

        self.usable_count.iter_mut().for_each(|c| *c = 0);
        self.cheapest.iter_mut().for_each(|c| *c = [f64::INFINITY; 2]);
        for (e, edge) in model.edges().iter().enumerate() {
            if !self.usable(e) {
                continue;
            }
            for node in [edge.u, edge.v] {
                self.usable_count[node] += 1;
                let low = &mut self.cheapest[node];
                if edge.cost < low[0] {
                    low[1] = low[0];
                    low[0] = edge.cost;
                } else if edge.cost < low[1] {
                    low[1] = edge.cost;
                }
            }
        }

        let mut bound = 0.0;
        let mut branch_on: Option<(usize, usize)> = None;
        for node in 0..n {
            let need = 2 - usize::from(self.degree[node]);
            if need == 0 {
                continue;
            }
            let count = self.usable_count[node];
            if count < need {
                return None;
            }
            bound += self.cheapest[node][..need].iter().sum::<f64>();
            let slack = count - need;
            if branch_on.map_or(true, |(_, best)| slack < best) {
                branch_on = Some((node, slack));
            }
        }
        if let Some((_, best)) = &self.incumbent {
            if self.cost + bound / 2.0 > best - EPSILON {
                return None;
            }
        }

        let (node, _) = branch_on?;
        let edges = model.edges();
        let mut candidates: Vec<usize> = self.incident[node]
            .iter()
            .copied()
            .filter(|&e| self.usable(e))
            .collect();
        candidates.sort_by(|&a, &b| {
            edges[a]
                .cost
                .partial_cmp(&edges[b].cost)
                .unwrap_or(Ordering::Equal)
                .then(self.rank[a].cmp(&self.rank[b]))
        });
        Some(Frame {
            candidates,
            next: 0,
            included: None,
            excluded: Vec::new(),
        })
    }

    fn usable(&self, e: usize) -> bool {
        if self.state[e] != EdgeState::Free {
            return false;
        }
        let edge = self.model.edges()[e];
        self.degree[edge.u] < 2
            && self.degree[edge.v] < 2
            && self.edge_cuts[e]
                .iter()
                .all(|&c| self.cuts[c].count < self.cuts[c].limit)
            && !self.closes_early(edge.u, edge.v)
    }

    /// Whether `{u, v}` joins both ends of one path before it spans all nodes.
    fn closes_early(&self, u: usize, v: usize) -> bool {
        self.model.single_cycle()
            && self.end[u] == v
            && self.selected.len() + 1 < self.model.node_count()
    }

    fn select(&mut self, e: usize) {
        let edge = self.model.edges()[e];
        let (u, v) = (edge.u, edge.v);
        let (far_u, far_v) = (self.end[u], self.end[v]);
        let join = if far_u == v {
            None
        } else {
            self.end[far_u] = far_v;
            self.end[far_v] = far_u;
            Some(Join { u, far_u, v, far_v })
        };
        self.joins.push(join);
        self.state[e] = EdgeState::Selected;
        self.selected.push(e);
        self.degree[u] += 1;
        self.degree[v] += 1;
        self.cost += edge.cost;
        for &c in &self.edge_cuts[e] {
            self.cuts[c].count += 1;
        }
    }

    /// Reverts the most recent [`select`](Self::select), which chose `e`.
    fn unselect(&mut self, e: usize) {
        let edge = self.model.edges()[e];
        if let Some(Some(join)) = self.joins.pop() {
            self.end[join.far_u] = join.u;
            self.end[join.far_v] = join.v;
        }
        self.state[e] = EdgeState::Free;
        self.selected.pop();
        self.degree[edge.u] -= 1;
        self.degree[edge.v] -= 1;
        self.cost -= edge.cost;
        for &c in &self.edge_cuts[e] {
            self.cuts[c].count -= 1;
        }
    }

    fn candidate(&mut self) {
        if let Some((_, best)) = &self.incumbent {
            if self.cost > best - EPSILON {
                return;
            }
        }
        match self.lazy.separate(self.model, &self.selected) {
            Some(cut) => self.add_cut(cut),
            None => {
                // Recompute to shed accumulated select/unselect rounding.
                let cost = self.model.objective(&self.selected);
                self.incumbent = Some((self.selected.clone(), cost));
            }
        }
    }

    fn try_start(&mut self, start: &[usize]) {
        let n = self.model.node_count();
        let mut degree = vec![0usize; n];
        let mut used = vec![false; self.model.edges().len()];
        for &e in start {
            let Some(edge) = self.model.edges().get(e) else {
                return;
            };
            if used[e] {
                return;
            }
            used[e] = true;
            degree[edge.u] += 1;
            degree[edge.v] += 1;
        }
        if degree.iter().any(|&d| d != 2) {
            return;
        }
        match self.lazy.separate(self.model, start) {
            Some(cut) => self.add_cut(cut),
            None => {
                let cost = self.model.objective(start);
                self.incumbent = Some((start.to_vec(), cost));
            }
        }
    }

    /// Registers a cut, counting the edges of the current selection it covers.
    fn add_cut(&mut self, cut: LazyCut) {
        let n = self.model.node_count();
        let mut member = vec![false; n];
        for &node in &cut.nodes {
            if node < n {
                member[node] = true;
            }
        }
        let id = self.cuts.len();
        for (e, edge) in self.model.edges().iter().enumerate() {
            if member[edge.u] && member[edge.v] {
                self.edge_cuts[e].push(id);
            }
        }
        let count = self
            .selected
            .iter()
            .filter(|&&e| {
                let edge = self.model.edges()[e];
                member[edge.u] && member[edge.v]
            })
            .count();
        self.cuts.push(CutState {
            limit: cut.limit,
            count,
        });
    }

    fn limit_reached(&self) -> bool {
        if let Some(limit) = self.config.node_limit {
            if self.nodes >= limit {
                return true;
            }
        }
        self.config
            .time_limit_ms
            .is_some_and(|ms| self.started.elapsed().as_millis() >= u128::from(ms))
    }
}
