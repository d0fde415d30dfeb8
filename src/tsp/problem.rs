//! TSP instance: symmetric cost matrix, tour evaluation, feasibility.

use crate::error::DeError;
use crate::relation::SymmetricRelation;
use thiserror::Error;

/// Why a tour is not a valid Hamiltonian cycle of the instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Violation {
    /// The tour does not visit exactly `expected` positions.
    #[error("expected a tour with {expected} nodes, but the tour has {found} nodes")]
    WrongLength {
        /// Number of nodes in the instance.
        expected: usize,
        /// Length of the tour.
        found: usize,
    },

    /// A label outside `0..n`.
    #[error("node {0} is not a valid node")]
    InvalidNode(usize),

    /// A node that is missing (count 0) or duplicated (count > 1).
    #[error("node {node} appears {count} times in this tour")]
    NodeCount {
        /// The offending node.
        node: usize,
        /// How many times it appears.
        count: usize,
    },
}

/// A symmetric TSP instance.
///
/// Costs live in a [`SymmetricRelation<f64>`]; pairs absent from a sparse
/// relation cost zero.
#[derive(Debug, Clone)]
pub struct TspProblem {
    name: Option<String>,
    costs: SymmetricRelation<f64>,
}

impl TspProblem {
    /// Wraps an existing cost relation.
    pub fn new(costs: SymmetricRelation<f64>) -> Self {
        Self { name: None, costs }
    }

    /// Builds a dense instance from a full square matrix.
    ///
    /// Only the upper triangle (`row <= column`) is read.
    pub fn from_matrix(rows: &[Vec<f64>]) -> Result<Self, DeError> {
        let n = rows.len();
        let mut costs = SymmetricRelation::dense(n, 0.0);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(DeError::config(format!(
                    "cost matrix row {i} has {} entries, expected {n}",
                    row.len()
                )));
            }
            for (j, &w) in row.iter().enumerate().skip(i) {
                costs.set(i, j, w);
            }
        }
        Ok(Self::new(costs))
    }

    /// Builds a sparse instance from weighted edges. Unlisted pairs cost zero.
    pub fn from_edges<I>(n: usize, edges: I) -> Result<Self, DeError>
    where
        I: IntoIterator<Item = (usize, usize, f64)>,
    {
        let mut costs = SymmetricRelation::sparse(n, 0.0);
        for (i, j, w) in edges {
            if i >= n || j >= n {
                return Err(DeError::config(format!(
                    "edge ({i}, {j}) out of range for {n} nodes"
                )));
            }
            costs.set(i, j, w);
        }
        Ok(Self::new(costs))
    }

    /// Attaches an instance name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Instance name, if the source provided one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.costs.size()
    }

    /// Cost of travelling between `source` and `target`.
    pub fn cost(&self, source: usize, target: usize) -> f64 {
        *self.costs.get(source, target)
    }

    /// The underlying cost relation.
    pub fn costs(&self) -> &SymmetricRelation<f64> {
        &self.costs
    }

    /// Length of the closed tour: sum of consecutive costs, wrapping from the
    /// last node back to the first. Tours of length 0 or 1 cost 0.
    pub fn evaluate(&self, tour: &[usize]) -> f64 {
        if tour.len() < 2 {
            return 0.0;
        }
        tour.iter()
            .zip(tour.iter().cycle().skip(1))
            .map(|(&a, &b)| self.cost(a, b))
            .sum()
    }

    /// Checks that `tour` visits every node exactly once.
    pub fn check_feasibility(&self, tour: &[usize]) -> Result<(), Violation> {
        let n = self.node_count();
        if tour.len() != n {
            return Err(Violation::WrongLength {
                expected: n,
                found: tour.len(),
            });
        }
        let mut counter = vec![0usize; n];
        for &node in tour {
            if node >= n {
                return Err(Violation::InvalidNode(node));
            }
            counter[node] += 1;
        }
        match counter.iter().position(|&c| c != 1) {
            Some(node) => Err(Violation::NodeCount {
                node,
                count: counter[node],
            }),
            None => Ok(()),
        }
    }
}
