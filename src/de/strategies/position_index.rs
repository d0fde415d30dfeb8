//! Relative-position-index DE: classic DE on a continuous embedding.

use crate::de::permutation::{decode_ranks, normalize_labels};
use crate::de::types::{check_partners, PartnerDemand, VariationStrategy};
use crate::error::DeError;
use crate::tsp::TspProblem;
use rand::Rng;

/// Continuous DE with rank decoding.
///
/// Every tour is embedded as `v / (n - 1)` per position. With partners
/// `p1`, `p2`, `base` in draw order, the mutant is `base + F · (p1 - p2)`.
/// Binomial crossover with rate `CR` mixes mutant and target values, and a
/// forced index guarantees at least one mutant coordinate. Ranking the
/// result gives the trial permutation.
///
/// # References
///
/// Storn & Price (1997), "Differential Evolution – A Simple and Efficient
/// Heuristic for Global Optimization over Continuous Spaces"
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelativePositionIndex {
    /// Mutation factor `F`.
    pub factor: f64,

    /// Crossover rate `CR` in `[0, 1]`.
    pub crossover_rate: f64,
}

impl Default for RelativePositionIndex {
    fn default() -> Self {
        Self {
            factor: 0.5,
            crossover_rate: 0.9,
        }
    }
}

impl RelativePositionIndex {
    /// Creates the strategy with `F = 0.5`, `CR = 0.9`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_factor(mut self, f: f64) -> Self {
        self.factor = f.max(0.0);
        self
    }

    pub fn with_crossover_rate(mut self, cr: f64) -> Self {
        self.crossover_rate = cr.clamp(0.0, 1.0);
        self
    }
}

impl VariationStrategy for RelativePositionIndex {
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
        rng: &mut R,
    ) -> Result<Vec<usize>, DeError> {
        check_partners("relative-position-index", self.demand(), partners, target.len())?;
        let n = target.len();
        if n == 0 {
            return Ok(Vec::new());
        }

        let p1 = normalize_labels(partners[0]);
        let p2 = normalize_labels(partners[1]);
        let base = normalize_labels(partners[2]);
        let own = normalize_labels(target);

        let forced = rng.random_range(0..n);
        let values: Vec<f64> = (0..n)
            .map(|j| {
                let r = rng.random_range(0.0..1.0);
                if r <= self.crossover_rate || j == forced {
                    base[j] + self.factor * (p1[j] - p2[j])
                } else {
                    own[j]
                }
            })
            .collect();

        Ok(decode_ranks(&values))
    }
}
