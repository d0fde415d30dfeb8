//! Adjacency-set hybrid: DE over edge sets, trials solved exactly.

use crate::de::permutation::edge_incidence;
use crate::de::types::{check_partners, PartnerDemand, VariationStrategy};
use crate::error::DeError;
use crate::exact::{HamiltonianSolver, SubSolverConfig};
use crate::relation::SymmetricRelation;
use crate::tsp::TspProblem;
use rand::Rng;

/// Edge-union DE with an exact sub-solver.
///
/// The difference of two members is the symmetric difference of their edge
/// sets; adding it to a random tour and crossing with the target is a union
/// of edge sets. The resulting mask is handed to [`HamiltonianSolver`] with
/// the target as warm start, so the trial is the best tour over the mask and
/// never costs more than the target.
///
/// Partners: two population members `x1`, `x2`, then a random tour `x3`.
#[derive(Debug, Clone, Default)]
pub struct AdjacencySet {
    solver: HamiltonianSolver,
}

impl AdjacencySet {
    /// Creates the strategy with the given sub-solver configuration.
    pub fn new(config: SubSolverConfig) -> Self {
        Self {
            solver: HamiltonianSolver::new(config),
        }
    }

    /// The sub-solver used for trials.
    pub fn solver(&self) -> &HamiltonianSolver {
        &self.solver
    }
}

/// Edge mask `E(target) ∪ (E(x3) ∪ (E(x1) xor E(x2)))`.
///
/// Every edge of `target` is in the mask, so the target itself is a tour
/// over it.
pub fn crossover_mask(
    target: &[usize],
    x1: &[usize],
    x2: &[usize],
    x3: &[usize],
) -> SymmetricRelation<bool> {
    let difference = edge_incidence(x1).symmetric_difference(&edge_incidence(x2));
    let mutant = edge_incidence(x3).union(&difference);
    edge_incidence(target).union(&mutant)
}

impl VariationStrategy for AdjacencySet {
    fn demand(&self) -> PartnerDemand {
        PartnerDemand {
            population: 2,
            random_tour: true,
        }
    }

    fn produce_trial<R: Rng + ?Sized>(
        &self,
        problem: &TspProblem,
        target: &[usize],
        partners: &[&[usize]],
        _rng: &mut R,
    ) -> Result<Vec<usize>, DeError> {
        check_partners("code", self.demand(), partners, target.len())?;
        let mask = crossover_mask(target, partners[0], partners[1], partners[2]);
        self.solver.solve(problem, &mask, Some(target))
    }
}
