//! Binary edge-selection model.
//!
//! One binary variable per undirected edge `{u, v}`, objective
//! `min Σ cost_e · x_e`, and the degree constraint `Σ_{e ∋ v} x_e = 2` for
//! every node. Additional constraints arrive lazily as [`LazyCut`]s during
//! the search. A model marked [`single_cycle`](EdgeModel::set_single_cycle)
//! also asks the solver never to close a cycle shorter than `node_count`.

use crate::relation::SymmetricRelation;

/// An edge variable of the model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// Lower endpoint.
    pub u: usize,
    /// Higher endpoint.
    pub v: usize,
    /// Objective coefficient.
    pub cost: f64,
}

/// A lazily added constraint: at most `limit` selected edges may have both
/// endpoints in `nodes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LazyCut {
    /// The node subset.
    pub nodes: Vec<usize>,
    /// Maximum number of selected edges inside the subset.
    pub limit: usize,
}

/// The edge-selection program.
#[derive(Debug, Clone)]
pub struct EdgeModel {
    node_count: usize,
    edges: Vec<Edge>,
    index: SymmetricRelation<Option<usize>>,
    start: Option<Vec<usize>>,
    single_cycle: bool,
}

impl EdgeModel {
    /// Creates a model over `node_count` nodes with no edges.
    pub fn new(node_count: usize) -> Self {
        Self {
            node_count,
            edges: Vec::new(),
            index: SymmetricRelation::sparse(node_count, None),
            start: None,
            single_cycle: false,
        }
    }

    /// Adds the variable for edge `{a, b}` and returns its index.
    ///
    /// Adding an existing edge returns the existing index unchanged.
    ///
    /// # Panics
    /// Panics on a self-loop or an endpoint out of range.
    pub fn add_edge(&mut self, a: usize, b: usize, cost: f64) -> usize {
        assert_ne!(a, b, "self-loops are not edges");
        if let Some(existing) = *self.index.get(a, b) {
            return existing;
        }
        let id = self.edges.len();
        self.edges.push(Edge {
            u: a.min(b),
            v: a.max(b),
            cost,
        });
        self.index.set(a, b, Some(id));
        id
    }

    /// Index of the variable for `{a, b}`, if the edge is in the model.
    pub fn edge_index(&self, a: usize, b: usize) -> Option<usize> {
        *self.index.get(a, b)
    }

    /// Edge variables of a closed tour, or `None` if the tour uses an edge
    /// that is not in the model.
    pub fn tour_edges(&self, tour: &[usize]) -> Option<Vec<usize>> {
        let n = tour.len();
        (0..n)
            .map(|i| {
                let (a, b) = (tour[i], tour[(i + 1) % n]);
                if a == b || a >= self.node_count || b >= self.node_count {
                    None
                } else {
                    self.edge_index(a, b)
                }
            })
            .collect()
    }

    /// Sets a start assignment (indices of edges at 1).
    pub fn set_start(&mut self, edges: Vec<usize>) {
        self.start = Some(edges);
    }

    /// The start assignment, if any.
    pub fn start(&self) -> Option<&[usize]> {
        self.start.as_deref()
    }

    /// Requires the selection to form one cycle through every node.
    ///
    /// The solver then rejects, while branching, any edge that would close
    /// a cycle over fewer than `node_count` nodes.
    pub fn set_single_cycle(&mut self, single_cycle: bool) {
        self.single_cycle = single_cycle;
    }

    /// Whether only Hamiltonian selections are allowed.
    pub fn single_cycle(&self) -> bool {
        self.single_cycle
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Edge variables in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Objective value of a selection.
    pub fn objective(&self, selected: &[usize]) -> f64 {
        selected.iter().map(|&e| self.edges[e].cost).sum()
    }
}
