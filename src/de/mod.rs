//! Differential evolution over permutations.
//!
//! Classic DE builds a trial vector from a target and a scaled difference
//! of population members. Tours have no vector arithmetic, so each
//! [`VariationStrategy`] picks its own notion of "difference" and guarantees
//! that the trial is again a permutation. [`DeRunner`] owns the rest:
//! population, partner selection, greedy one-to-one replacement, and
//! termination.
//!
//! # Strategies
//!
//! - [`AdjacencySet`]: edge-set union, trials solved exactly by
//!   [`crate::exact::HamiltonianSolver`]
//! - [`ListOfMovements`]: swap sequences
//! - [`PermutationMatrix`]: relocation maps
//! - [`RelativePositionIndex`]: continuous embedding with rank decoding
//!
//! # References
//!
//! - Storn & Price (1997), "Differential Evolution – A Simple and Efficient
//!   Heuristic for Global Optimization over Continuous Spaces"
//! - Santucci, Baioletti & Milani (2016), "Algebraic differential evolution
//!   algorithm for the permutation flowshop scheduling problem"

mod config;
pub mod permutation;
mod runner;
mod strategies;
mod types;

pub use config::{Algorithm, AlgorithmParams, DeConfig, TARGET_TOLERANCE};
pub use runner::{
    select_partners, solve_instance, DeResult, DeRunner, Member, RunReport, Termination,
};
pub use strategies::{
    crossover_mask, AdjacencySet, ListOfMovements, MutationType, PermutationMatrix,
    RelativePositionIndex, Strategy,
};
pub use types::{PartnerDemand, VariationStrategy};
