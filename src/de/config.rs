//! DE configuration and the named-parameter surface.

use super::strategies::{
    AdjacencySet, ListOfMovements, MutationType, PermutationMatrix, RelativePositionIndex,
    Strategy,
};
use super::types::{PartnerDemand, VariationStrategy};
use crate::error::DeError;
use crate::exact::SubSolverConfig;
use std::fmt;
use std::str::FromStr;

/// Best costs within this distance of the target count as reaching it.
pub const TARGET_TOLERANCE: f64 = 0.01;

/// Configuration of the generational loop.
///
/// # Examples
///
/// ```
/// use u_permde::de::DeConfig;
///
/// let config = DeConfig::default()
///     .with_population_size(40)
///     .with_max_generations(200)
///     .with_target_value(7542.0)
///     .with_seed(1);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeConfig {
    /// Number of tours in the population.
    pub population_size: usize,

    /// Generation limit. `None` = unbounded.
    pub max_generations: Option<usize>,

    /// Stop once the best cost is within [`TARGET_TOLERANCE`] of this value.
    pub target_value: Option<f64>,

    /// Wall-clock limit in milliseconds. `None` = unbounded.
    pub time_limit_ms: Option<u64>,

    /// Random seed for reproducibility. `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for DeConfig {
    fn default() -> Self {
        Self {
            population_size: 30,
            max_generations: Some(50),
            target_value: None,
            time_limit_ms: None,
            seed: None,
        }
    }
}

impl DeConfig {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = Some(n);
        self
    }

    /// Removes the generation limit.
    pub fn unbounded(mut self) -> Self {
        self.max_generations = None;
        self
    }

    pub fn with_target_value(mut self, target: f64) -> Self {
        self.target_value = Some(target);
        self
    }

    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration for a strategy with the given demand.
    ///
    /// The population must hold the target plus every partner, since
    /// partners are distinct members other than the target.
    pub fn validate(&self, demand: PartnerDemand) -> Result<(), DeError> {
        let required = demand.population + 1;
        if self.population_size < required {
            return Err(DeError::config(format!(
                "population_size must be at least {required}, got {}",
                self.population_size
            )));
        }
        if let Some(target) = self.target_value {
            if target.is_nan() {
                return Err(DeError::config("target_value must be a number"));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Algorithm selection
// ============================================================================

/// An algorithm selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    /// `code`: adjacency-set hybrid.
    Code,
    /// `list-movements`
    ListMovements,
    /// `permutation-matrix`
    PermutationMatrix,
    /// `relative-position-index`
    RelativePositionIndex,
    /// `exact`: one sub-solve over the complete instance.
    Exact,
}

impl Algorithm {
    /// All algorithms, in documentation order.
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Code,
        Algorithm::ListMovements,
        Algorithm::PermutationMatrix,
        Algorithm::RelativePositionIndex,
        Algorithm::Exact,
    ];

    /// The canonical name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::ListMovements => "list-movements",
            Self::PermutationMatrix => "permutation-matrix",
            Self::RelativePositionIndex => "relative-position-index",
            Self::Exact => "exact",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = DeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DeError::config(format!("unknown algorithm '{wanted}'")))
    }
}

// ============================================================================
// Named parameters
// ============================================================================

/// Parameters of every algorithm, settable by name.
///
/// | Name | Field | Notes |
/// |---|---|---|
/// | `population-size` | `population_size` | |
/// | `iterations-limit` | `iterations_limit` | `-1` = unbounded |
/// | `time-limit` | `time_limit_ms` | milliseconds |
/// | `target-value` | `target_value` | |
/// | `seed` | `seed` | |
/// | `mutation-factor` | `mutation_factor` | `F` |
/// | `crossover-factor` | `crossover_factor` | `CR` |
/// | `mutation-type` | `mutation_type` | `1`, `2` or `3` |
/// | `submip-time-limit` | `submip_time_limit_ms` | milliseconds per sub-solve |
/// | `verbose` | `verbose` | `0` or higher |
///
/// [`Default`] carries the DE defaults. [`Algorithm::Exact`] reads
/// `time-limit` and `iterations-limit` as the limits of its single solve
/// (the latter as a node limit), so use
/// [`for_algorithm`](Self::for_algorithm) to start it unbounded.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlgorithmParams {
    pub population_size: usize,
    pub iterations_limit: Option<usize>,
    pub time_limit_ms: Option<u64>,
    pub target_value: Option<f64>,
    pub seed: u64,
    pub mutation_factor: f64,
    pub crossover_factor: f64,
    pub mutation_type: MutationType,
    pub submip_time_limit_ms: Option<u64>,
    pub verbose: u8,
}

impl Default for AlgorithmParams {
    fn default() -> Self {
        Self {
            population_size: 30,
            iterations_limit: Some(50),
            time_limit_ms: None,
            target_value: None,
            seed: 0,
            mutation_factor: 0.5,
            crossover_factor: 0.9,
            mutation_type: MutationType::Bernoulli,
            submip_time_limit_ms: None,
            verbose: 0,
        }
    }
}

impl AlgorithmParams {
    /// Defaults suited to `algorithm`: the DE defaults, except that the exact
    /// algorithm has no iteration limit.
    pub fn for_algorithm(algorithm: Algorithm) -> Self {
        let mut params = Self::default();
        if algorithm == Algorithm::Exact {
            params.iterations_limit = None;
        }
        params
    }

    /// Sets the parameter `name` from its textual `value`.
    ///
    /// # Errors
    ///
    /// [`DeError::Config`] for an unknown name, an unparsable value, or a
    /// factor that is not a finite number.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), DeError> {
        let value = value.trim();
        match name.trim() {
            "population-size" => self.population_size = parse(name, value)?,
            "iterations-limit" => {
                let limit: i64 = parse(name, value)?;
                self.iterations_limit = if limit < 0 {
                    None
                } else {
                    Some(usize::try_from(limit).map_err(|_| invalid(name, value))?)
                };
            }
            "time-limit" => self.time_limit_ms = Some(parse(name, value)?),
            "target-value" => self.target_value = Some(parse(name, value)?),
            "seed" => self.seed = parse(name, value)?,
            "mutation-factor" => self.mutation_factor = parse_factor(name, value)?,
            "crossover-factor" => self.crossover_factor = parse_factor(name, value)?,
            "mutation-type" => {
                self.mutation_type = MutationType::try_from(parse::<u8>(name, value)?)?
            }
            "submip-time-limit" => self.submip_time_limit_ms = Some(parse(name, value)?),
            "verbose" => self.verbose = parse(name, value)?,
            other => return Err(DeError::config(format!("unknown parameter '{other}'"))),
        }
        Ok(())
    }

    /// Loop configuration shared by all DE variants.
    pub fn de_config(&self) -> DeConfig {
        DeConfig {
            population_size: self.population_size,
            max_generations: self.iterations_limit,
            target_value: self.target_value,
            time_limit_ms: self.time_limit_ms,
            seed: Some(self.seed),
        }
    }

    /// Per-trial sub-solver configuration of the hybrid.
    pub fn sub_solver_config(&self) -> SubSolverConfig {
        SubSolverConfig {
            time_limit_ms: self.submip_time_limit_ms,
            node_limit: None,
            seed: self.seed,
            verbosity: self.verbose,
        }
    }

    /// Solver configuration of [`Algorithm::Exact`].
    ///
    /// `time-limit` bounds the solve, falling back to `submip-time-limit`,
    /// and `iterations-limit` caps the explored search nodes.
    pub fn exact_config(&self) -> SubSolverConfig {
        SubSolverConfig {
            time_limit_ms: self.time_limit_ms.or(self.submip_time_limit_ms),
            node_limit: self.iterations_limit.map(|limit| limit as u64),
            seed: self.seed,
            verbosity: self.verbose,
        }
    }

    /// Builds the loop configuration and strategy for a DE algorithm.
    ///
    /// # Errors
    ///
    /// [`DeError::Config`] for [`Algorithm::Exact`], which has no strategy,
    /// or when the population is too small for the strategy.
    pub fn build(&self, algorithm: Algorithm) -> Result<(DeConfig, Strategy), DeError> {
        let strategy: Strategy = match algorithm {
            Algorithm::Code => AdjacencySet::new(self.sub_solver_config()).into(),
            Algorithm::ListMovements => ListOfMovements::new()
                .with_factor(self.mutation_factor)
                .with_mutation_type(self.mutation_type)
                .into(),
            Algorithm::PermutationMatrix => PermutationMatrix.into(),
            Algorithm::RelativePositionIndex => RelativePositionIndex::new()
                .with_factor(self.mutation_factor)
                .with_crossover_rate(self.crossover_factor)
                .into(),
            Algorithm::Exact => {
                return Err(DeError::config("'exact' is not a differential evolution algorithm"))
            }
        };
        let config = self.de_config();
        config.validate(strategy.demand())?;
        Ok((config, strategy))
    }
}

fn parse<T: FromStr>(name: &str, value: &str) -> Result<T, DeError> {
    value.parse().map_err(|_| invalid(name, value))
}

fn parse_factor(name: &str, value: &str) -> Result<f64, DeError> {
    let factor: f64 = parse(name, value)?;
    if factor.is_finite() {
        Ok(factor)
    } else {
        Err(invalid(name, value))
    }
}

fn invalid(name: &str, value: &str) -> DeError {
    DeError::config(format!("invalid value '{value}' for parameter '{name}'"))
}
