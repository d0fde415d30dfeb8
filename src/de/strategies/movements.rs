//! List-of-movements DE: differences as swap sequences.

use crate::de::permutation::{apply_movements, movements_between, Movement};
use crate::de::types::{check_partners, PartnerDemand, VariationStrategy};
use crate::error::DeError;
use crate::random::shuffle;
use crate::tsp::TspProblem;
use rand::Rng;

/// How the movement list is reduced before it is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MutationType {
    /// Keep the first `ceil(F · len)` movements.
    Truncate,
    /// Keep each movement independently with probability `F`, in order.
    #[default]
    Bernoulli,
    /// Shuffle the list, then keep the first `ceil(F · len)`.
    RandomSubset,
}

impl TryFrom<u8> for MutationType {
    type Error = DeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Truncate),
            2 => Ok(Self::Bernoulli),
            3 => Ok(Self::RandomSubset),
            other => Err(DeError::config(format!(
                "mutation type must be 1, 2 or 3, got {other}"
            ))),
        }
    }
}

/// Swap-sequence DE.
///
/// With partners `p0, p1, p2` in draw order, the difference is the minimal
/// movement list turning `p2` into `p1`. It is reduced according to
/// [`MutationType`] and the factor `F`, then replayed onto the first draw,
/// `p0`. Any sequence of swaps keeps `p0` a permutation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListOfMovements {
    /// Mutation factor `F` in `[0, 1]`.
    pub factor: f64,

    /// Reduction rule.
    pub mutation_type: MutationType,
}

impl Default for ListOfMovements {
    fn default() -> Self {
        Self {
            factor: 0.5,
            mutation_type: MutationType::Bernoulli,
        }
    }
}

impl ListOfMovements {
    /// Creates the strategy with the default factor and reduction.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_factor(mut self, f: f64) -> Self {
        self.factor = f.clamp(0.0, 1.0);
        self
    }

    pub fn with_mutation_type(mut self, mutation_type: MutationType) -> Self {
        self.mutation_type = mutation_type;
        self
    }

    /// Reduces `movements` according to the mutation type.
    pub fn reduce<R: Rng + ?Sized>(
        &self,
        mut movements: Vec<Movement>,
        rng: &mut R,
    ) -> Vec<Movement> {
        match self.mutation_type {
            MutationType::Truncate => {
                movements.truncate(self.kept(movements.len()));
                movements
            }
            MutationType::Bernoulli => movements
                .into_iter()
                .filter(|_| rng.random_range(0.0..1.0) <= self.factor)
                .collect(),
            MutationType::RandomSubset => {
                shuffle(&mut movements, rng);
                movements.truncate(self.kept(movements.len()));
                movements
            }
        }
    }

    /// `ceil(F · len)`, never above `len`.
    fn kept(&self, len: usize) -> usize {
        ((self.factor * len as f64).ceil() as usize).min(len)
    }
}

impl VariationStrategy for ListOfMovements {
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
        check_partners("list-movements", self.demand(), partners, target.len())?;
        let movements = movements_between(partners[2], partners[1]);
        let kept = self.reduce(movements, rng);
        Ok(apply_movements(partners[0], &kept))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::de::permutation::is_permutation;
    use crate::random::{create_rng, random_tour};

    fn moves(len: usize) -> Vec<Movement> {
        (0..len)
            .map(|i| Movement {
                source: i + 1,
                target: i,
            })
            .collect()
    }

    #[test]
    fn test_mutation_type_from_number() {
        assert_eq!(MutationType::try_from(1).unwrap(), MutationType::Truncate);
        assert_eq!(MutationType::try_from(2).unwrap(), MutationType::Bernoulli);
        assert_eq!(MutationType::try_from(3).unwrap(), MutationType::RandomSubset);
        assert!(MutationType::try_from(4).is_err());
        assert!(MutationType::try_from(0).is_err());
    }

    #[test]
    fn test_truncate_keeps_ceil() {
        let s = ListOfMovements::new()
            .with_mutation_type(MutationType::Truncate)
            .with_factor(0.5);
        let mut rng = create_rng(0);
        assert_eq!(s.reduce(moves(5), &mut rng), moves(3));
        assert_eq!(s.reduce(moves(4), &mut rng), moves(2));
        assert!(s.reduce(Vec::new(), &mut rng).is_empty());
    }

    #[test]
    fn test_truncate_full_and_zero() {
        let mut rng = create_rng(0);
        let all = ListOfMovements::new()
            .with_mutation_type(MutationType::Truncate)
            .with_factor(1.0);
        assert_eq!(all.reduce(moves(6), &mut rng), moves(6));
        let none = all.with_factor(0.0);
        assert!(none.reduce(moves(6), &mut rng).is_empty());
    }

    #[test]
    fn test_bernoulli_preserves_order() {
        let s = ListOfMovements::new().with_factor(0.5);
        let mut rng = create_rng(9);
        let kept = s.reduce(moves(40), &mut rng);
        assert!(kept.len() < 40);
        for w in kept.windows(2) {
            assert!(w[0].target < w[1].target);
        }
    }

    #[test]
    fn test_random_subset_size() {
        let s = ListOfMovements::new()
            .with_mutation_type(MutationType::RandomSubset)
            .with_factor(0.3);
        let kept = s.reduce(moves(10), &mut create_rng(2));
        assert_eq!(kept.len(), 3);
    }

    #[test]
    fn test_reverse_five_full_factor() {
        let a = [0, 1, 2, 3, 4];
        let b = [4, 3, 2, 1, 0];
        let s = ListOfMovements::new()
            .with_mutation_type(MutationType::Truncate)
            .with_factor(1.0);
        let problem = TspProblem::from_matrix(&vec![vec![1.0; 5]; 5]).unwrap();
        let trial = s
            .produce_trial(&problem, &a, &[&a, &b, &a], &mut create_rng(0))
            .unwrap();
        assert_eq!(trial, b.to_vec());
    }

    #[test]
    fn test_difference_runs_from_last_draw_to_second() {
        // p2 -> p1 is a single swap of positions 0 and 1, replayed onto p0.
        let p0 = [3, 2, 1, 0];
        let p1 = [1, 0, 2, 3];
        let p2 = [0, 1, 2, 3];
        let s = ListOfMovements::new()
            .with_mutation_type(MutationType::Truncate)
            .with_factor(1.0);
        let problem = TspProblem::from_matrix(&vec![vec![1.0; 4]; 4]).unwrap();
        let trial = s
            .produce_trial(&problem, &p0, &[&p0, &p1, &p2], &mut create_rng(0))
            .unwrap();
        assert_eq!(trial, vec![2, 3, 1, 0]);

        // The first draw receives the swap; p2 itself is never modified.
        let onto_p2 = s
            .produce_trial(&problem, &p0, &[&p2, &p1, &p2], &mut create_rng(0))
            .unwrap();
        assert_eq!(onto_p2, p1.to_vec());
    }

    #[test]
    fn test_trials_are_permutations() {
        let problem = TspProblem::from_matrix(&vec![vec![1.0; 12]; 12]).unwrap();
        let mut rng = create_rng(21);
        for mt in [
            MutationType::Truncate,
            MutationType::Bernoulli,
            MutationType::RandomSubset,
        ] {
            let s = ListOfMovements::new().with_mutation_type(mt).with_factor(0.7);
            for _ in 0..20 {
                let t = random_tour(12, &mut rng);
                let p: Vec<Vec<usize>> = (0..3).map(|_| random_tour(12, &mut rng)).collect();
                let trial = s
                    .produce_trial(&problem, &t, &[&p[0], &p[1], &p[2]], &mut rng)
                    .unwrap();
                assert!(is_permutation(&trial, 12));
            }
        }
    }

    #[test]
    fn test_factor_clamped() {
        assert_eq!(ListOfMovements::new().with_factor(1.5).factor, 1.0);
        assert_eq!(ListOfMovements::new().with_factor(-0.5).factor, 0.0);
    }
}
