//! Differential evolution over permutation spaces, applied to the symmetric
//! traveling salesman problem.
//!
//! Provides a generational DE engine with four interchangeable ways of
//! taking the "difference" of two tours:
//!
//! - **Adjacency-set hybrid (`code`)**: unions of edge sets define a
//!   restricted instance that an exact sub-solver optimizes, warm-started
//!   from the target tour.
//! - **List of movements**: the minimal swap sequence between two tours,
//!   partially replayed onto a third.
//! - **Permutation matrix**: the relocation map between two tours applied
//!   to a third.
//! - **Relative position index**: classic continuous DE on normalized node
//!   labels, decoded back by rank order.
//!
//! Supporting modules: [`tsp`] (instances, TSPLIB loading, feasibility),
//! [`exact`] (branch-and-bound with lazy subtour elimination),
//! [`relation`] (symmetric pair relations), and [`random`] (seeded RNG).
//!
//! # Example
//!
//! ```
//! use u_permde::de::{Algorithm, AlgorithmParams, solve_instance};
//! use u_permde::tsp::parse_tsplib;
//!
//! let text = "NAME: square\nDIMENSION: 4\nEDGE_WEIGHT_TYPE: EUC_2D\n\
//!             NODE_COORD_SECTION\n1 0 0\n2 10 0\n3 10 10\n4 0 10\nEOF\n";
//! let problem = parse_tsplib(text).unwrap();
//!
//! let mut params = AlgorithmParams::default();
//! params.set("iterations-limit", "20").unwrap();
//! let report = solve_instance(&problem, Algorithm::PermutationMatrix, &params).unwrap();
//! assert!(report.feasibility.is_ok());
//! ```

pub mod de;
pub mod error;
pub mod exact;
pub mod random;
pub mod relation;
pub mod tsp;

pub use error::DeError;
