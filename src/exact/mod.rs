//! Exact sub-solver for tours restricted to an edge subset.
//!
//! Builds a binary program with one variable per active edge, degree
//! constraints of 2 at every node, and subtour-elimination constraints added
//! lazily whenever a candidate selection splits into several cycles.
//!
//! # Components
//!
//! - [`EdgeModel`]: variables, objective, and start assignment
//! - [`EdgeSelectionSolver`]: depth-first branch-and-bound with a
//!   [`LazyConstraints`] callback
//! - [`SubtourElimination`]: the callback for Hamiltonian cycles
//! - [`HamiltonianSolver`]: instance + edge mask + warm start → tour
//!
//! # References
//!
//! - Dantzig, Fulkerson & Johnson (1954), "Solution of a Large-Scale
//!   Traveling-Salesman Problem"

mod model;
mod solver;
mod subtour;

pub use model::{Edge, EdgeModel, LazyCut};
pub use solver::{EdgeSelectionSolver, EdgeSolution, LazyConstraints, SolveStatus, SolverConfig};
pub use subtour::{shortest_cycle, HamiltonianSolver, SubSolverConfig, SubtourElimination};
