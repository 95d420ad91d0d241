//! Solver configuration.
//!
//! [`SolverConfig`] holds the population size, the operator constants and
//! the termination settings used by batch runs.

use crate::error::ConfigError;

/// Configuration for the tour solver.
///
/// # Defaults
///
/// ```
/// use salesman_ga::SolverConfig;
///
/// let config = SolverConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert!((config.crossover_ratio - 0.2).abs() < 1e-12);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use salesman_ga::SolverConfig;
///
/// let config = SolverConfig::default()
///     .with_population_size(30)
///     .with_max_generations(1_000)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverConfig {
    /// Number of salesmen (tours) evolved together.
    pub population_size: usize,

    /// Fraction of the city count swapped toward the best tour per
    /// individual and generation.
    pub crossover_ratio: f64,

    /// Fraction of the city count swapped per mutation unit.
    ///
    /// Each individual draws 0, 1 or 2 units per generation, plus a bonus
    /// when it lags far behind the best.
    pub mutation_step: f64,

    /// Probability that a non-best individual is mutated in a generation.
    pub mutation_probability: f64,

    /// Fitness ratio to the best above which bonus mutation units apply.
    pub underperformance_threshold: f64,

    /// Ratio subtracted before scaling the bonus: `floor((ratio - offset) * 10)`.
    pub underperformance_offset: f64,

    /// Generation cap for [`Solver::run`](crate::Solver::run).
    pub max_generations: usize,

    /// Generations without a better best before a batch run stops.
    ///
    /// Set to 0 to disable.
    pub stagnation_limit: usize,

    /// Whether to re-score the population in parallel using rayon.
    ///
    /// Only takes effect with the `parallel` feature. Scoring draws no
    /// random numbers, so seeded runs stay reproducible either way.
    pub parallel: bool,

    /// Random seed. `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            crossover_ratio: 0.2,
            mutation_step: 0.1,
            mutation_probability: 0.5,
            underperformance_threshold: 1.49,
            underperformance_offset: 1.2,
            max_generations: 500,
            stagnation_limit: 0,
            parallel: false,
            seed: None,
        }
    }
}

impl SolverConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the crossover ratio.
    pub fn with_crossover_ratio(mut self, ratio: f64) -> Self {
        self.crossover_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation step.
    pub fn with_mutation_step(mut self, step: f64) -> Self {
        self.mutation_step = step.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation probability.
    pub fn with_mutation_probability(mut self, p: f64) -> Self {
        self.mutation_probability = p.clamp(0.0, 1.0);
        self
    }

    /// Sets the threshold and offset of the adaptive mutation bonus.
    pub fn with_underperformance(mut self, threshold: f64, offset: f64) -> Self {
        self.underperformance_threshold = threshold;
        self.underperformance_offset = offset;
        self
    }

    /// Sets the generation cap for batch runs.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the stagnation limit (0 to disable).
    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    /// Enables or disables parallel scoring.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Small population, short batch runs.
    ///
    /// - Population: 30, Generations: 200, Stagnation limit: 50
    pub fn fast() -> Self {
        Self {
            population_size: 30,
            max_generations: 200,
            stagnation_limit: 50,
            ..Self::default()
        }
    }

    /// Moderate population and generation count.
    ///
    /// - Population: 100, Generations: 1000, Stagnation limit: 200
    pub fn balanced() -> Self {
        Self {
            population_size: 100,
            max_generations: 1_000,
            stagnation_limit: 200,
            ..Self::default()
        }
    }

    /// Large population, long batch runs.
    ///
    /// - Population: 250, Generations: 5000, Stagnation limit: 1000
    pub fn quality() -> Self {
        Self {
            population_size: 250,
            max_generations: 5_000,
            stagnation_limit: 1_000,
            ..Self::default()
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        for (name, value) in [
            ("crossover_ratio", self.crossover_ratio),
            ("mutation_step", self.mutation_step),
            ("mutation_probability", self.mutation_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::RatioOutOfRange { name, value });
            }
        }
        if self.underperformance_threshold.is_nan() || self.underperformance_threshold <= 0.0 {
            return Err(ConfigError::NonPositive {
                name: "underperformance_threshold",
                value: self.underperformance_threshold,
            });
        }
        Ok(())
    }
}
