//! The four variation strategies.
//!
//! | Strategy | Difference of two tours | Partners |
//! |---|---|---|
//! | [`AdjacencySet`] | symmetric difference of edge sets | 2 + random tour |
//! | [`ListOfMovements`] | minimal swap sequence | 3 |
//! | [`PermutationMatrix`] | position relocation map | 3 |
//! | [`RelativePositionIndex`] | difference of normalized label vectors | 3 |

mod adjacency;
mod movements;
mod position_index;
mod relocation;

pub use adjacency::{crossover_mask, AdjacencySet};
pub use movements::{ListOfMovements, MutationType};
pub use position_index::RelativePositionIndex;
pub use relocation::PermutationMatrix;

use super::types::{PartnerDemand, VariationStrategy};
use crate::error::DeError;
use crate::tsp::TspProblem;
use rand::Rng;

/// Any of the built-in strategies, selected at runtime.
#[derive(Debug, Clone)]
pub enum Strategy {
    /// Edge-union hybrid with exact sub-solves.
    AdjacencySet(AdjacencySet),
    /// Swap-sequence DE.
    ListOfMovements(ListOfMovements),
    /// Relocation-map DE.
    PermutationMatrix(PermutationMatrix),
    /// Continuous DE with rank decoding.
    RelativePositionIndex(RelativePositionIndex),
}

impl Strategy {
    /// Name of the strategy as accepted by [`crate::de::Algorithm`].
    pub fn name(&self) -> &'static str {
        match self {
            Self::AdjacencySet(_) => "code",
            Self::ListOfMovements(_) => "list-movements",
            Self::PermutationMatrix(_) => "permutation-matrix",
            Self::RelativePositionIndex(_) => "relative-position-index",
        }
    }
}

impl VariationStrategy for Strategy {
    fn demand(&self) -> PartnerDemand {
        match self {
            Self::AdjacencySet(s) => s.demand(),
            Self::ListOfMovements(s) => s.demand(),
            Self::PermutationMatrix(s) => s.demand(),
            Self::RelativePositionIndex(s) => s.demand(),
        }
    }

    fn produce_trial<R: Rng + ?Sized>(
        &self,
        problem: &TspProblem,
        target: &[usize],
        partners: &[&[usize]],
        rng: &mut R,
    ) -> Result<Vec<usize>, DeError> {
        match self {
            Self::AdjacencySet(s) => s.produce_trial(problem, target, partners, rng),
            Self::ListOfMovements(s) => s.produce_trial(problem, target, partners, rng),
            Self::PermutationMatrix(s) => s.produce_trial(problem, target, partners, rng),
            Self::RelativePositionIndex(s) => s.produce_trial(problem, target, partners, rng),
        }
    }
}

impl From<AdjacencySet> for Strategy {
    fn from(s: AdjacencySet) -> Self {
        Self::AdjacencySet(s)
    }
}

impl From<ListOfMovements> for Strategy {
    fn from(s: ListOfMovements) -> Self {
        Self::ListOfMovements(s)
    }
}

impl From<PermutationMatrix> for Strategy {
    fn from(s: PermutationMatrix) -> Self {
        Self::PermutationMatrix(s)
    }
}

impl From<RelativePositionIndex> for Strategy {
    fn from(s: RelativePositionIndex) -> Self {
        Self::RelativePositionIndex(s)
    }
}
