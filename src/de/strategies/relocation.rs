//! Permutation-matrix DE: differences as position relocation maps.

use crate::de::permutation::{relocate, relocation_map};
use crate::de::types::{check_partners, PartnerDemand, VariationStrategy};
use crate::error::DeError;
use crate::tsp::TspProblem;
use rand::Rng;

/// Relocation-map DE.
///
/// Partners `A`, `B`, `C` in draw order. The map sending each position of
/// `B` to the position of the same node in `C` plays the role of the
/// permutation matrix `P` with `P·B = C`; the trial is `P·A`. Deterministic
/// given its partners.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PermutationMatrix;

impl VariationStrategy for PermutationMatrix {
    fn demand(&self) -> PartnerDemand {
        PartnerDemand {
            population: 3,
            random_tour: false,
        }
    }

    fn produce_trial<R: Rng + ?Sized>(
        &self,
        _problem: &TspProblem,
        target: &[usize],
        partners: &[&[usize]],
        _rng: &mut R,
    ) -> Result<Vec<usize>, DeError> {
        check_partners("permutation-matrix", self.demand(), partners, target.len())?;
        let map = relocation_map(partners[1], partners[2]);
        Ok(relocate(partners[0], &map))
    }
}
