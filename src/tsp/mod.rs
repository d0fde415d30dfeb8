//! Traveling salesman problem.
//!
//! - [`TspProblem`]: symmetric cost matrix, tour evaluation and feasibility
//! - [`loader`]: TSPLIB coordinate instances (`EUC_2D`, `ATT`)

pub mod loader;
mod problem;

pub use loader::{load_tsplib, parse_tsplib, EdgeWeightType};
pub use problem::{TspProblem, Violation};
