//! Core trait for permutation DE.

use crate::error::DeError;
use crate::tsp::TspProblem;
use rand::Rng;

/// What a strategy needs from the controller for each trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartnerDemand {
    /// Distinct population members to draw, none equal to the target.
    pub population: usize,

    /// Whether a fresh uniformly random tour is appended after them.
    pub random_tour: bool,
}

/// A DE variation scheme over tours.
///
/// Implementors turn a target tour and its partners into a trial tour. The
/// trial must be a permutation of `0..n` for every valid input; the
/// controller never repairs it.
///
/// # Partner order
///
/// `partners` holds the members drawn by the controller in draw order,
/// followed by the random tour when [`PartnerDemand::random_tour`] is set.
/// Its length is always `population + random_tour as usize`.
///
/// # Examples
///
/// ```ignore
/// struct CopyFirst;
///
/// impl VariationStrategy for CopyFirst {
///     fn demand(&self) -> PartnerDemand {
///         PartnerDemand { population: 1, random_tour: false }
///     }
///
///     fn produce_trial<R: Rng + ?Sized>(
///         &self,
///         _problem: &TspProblem,
///         _target: &[usize],
///         partners: &[&[usize]],
///         _rng: &mut R,
///     ) -> Result<Vec<usize>, DeError> {
///         Ok(partners[0].to_vec())
///     }
/// }
/// ```
pub trait VariationStrategy {
    /// Partners required per trial.
    fn demand(&self) -> PartnerDemand;

    /// Builds the trial tour for `target`.
    ///
    /// All randomness must come from `rng` so that runs are reproducible.
    fn produce_trial<R: Rng + ?Sized>(
        &self,
        problem: &TspProblem,
        target: &[usize],
        partners: &[&[usize]],
        rng: &mut R,
    ) -> Result<Vec<usize>, DeError>;
}

/// Checks that `partners` has the shape `demand` promises.
pub(crate) fn check_partners(
    strategy: &str,
    demand: PartnerDemand,
    partners: &[&[usize]],
    n: usize,
) -> Result<(), DeError> {
    let expected = demand.population + usize::from(demand.random_tour);
    if partners.len() != expected {
        return Err(DeError::config(format!(
            "{strategy} needs {expected} partner tours, got {}",
            partners.len()
        )));
    }
    if let Some(bad) = partners.iter().find(|p| p.len() != n) {
        return Err(DeError::config(format!(
            "{strategy} got a partner tour of length {}, expected {n}",
            bad.len()
        )));
    }
    Ok(())
}
