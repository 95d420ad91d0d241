//! Generation loop and run state.
//!
//! [`step`] advances a population by one generation:
//! crossover → mutation → re-scoring → sorting.
//!
//! [`Solver`] owns everything a run needs (cities, population, generation
//! counter, random source) and moves from Idle to Running on the first
//! step request.

use crate::config::SolverConfig;
use crate::error::{ConfigError, SolverError};
use crate::fitness::{Fitness, FitnessEvaluator};
use crate::geometry::City;
use crate::operators::{adaptive_mutation, crossover_amount, crossover_from_best};
use crate::population::Population;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::instrument;

/// Creates the solver's random source from a seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Advances `population` by exactly one generation.
///
/// 1. Crossover from the best salesman into all salesmen
/// 2. Adaptive mutation of all but the best
/// 3. Re-score every salesman
/// 4. Sort ascending by fitness
///
/// The caller owns the generation counter.
///
/// # Errors
/// Returns the [`SolverConfig::validate`] error, leaving `population`
/// untouched, if `config` is invalid.
pub fn step<R: Rng>(
    population: &mut Population,
    evaluator: &FitnessEvaluator,
    config: &SolverConfig,
    rng: &mut R,
) -> Result<(), ConfigError> {
    config.validate()?;
    let amount = crossover_amount(evaluator.city_count(), config.crossover_ratio);
    crossover_from_best(population, amount, rng);
    adaptive_mutation(population, config, rng);
    population.evaluate(evaluator, config.parallel);
    population.sort_by_fitness();
    Ok(())
}

/// Population summary after a generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationStats {
    /// Completed generations.
    pub generation: usize,
    pub best: Fitness,
    pub worst: Fitness,
    /// Rounded mean fitness.
    pub average: Fitness,
    pub city_count: usize,
}

/// Result of a batch run.
#[derive(Debug, Clone)]
pub struct SolveResult {
    /// Best tour at the end of the run.
    pub best_tour: Vec<usize>,

    /// Fitness of `best_tour`.
    pub best_fitness: Fitness,

    /// Generation counter at the end of the run.
    pub generations: usize,

    /// Whether the run stopped because the best fitness stopped improving.
    pub stagnated: bool,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Best fitness before the run's first step and after each step.
    pub fitness_history: Vec<Fitness>,
}

#[derive(Debug)]
enum RunState {
    Idle {
        cities: Vec<City>,
    },
    Running {
        evaluator: FitnessEvaluator,
        population: Population,
    },
}

/// Owns the state of one solver run.
///
/// # Usage
///
/// ```
/// use salesman_ga::{City, Solver, SolverConfig};
///
/// let config = SolverConfig::default().with_population_size(20).with_seed(42);
/// let cities = vec![
///     City::new(0.0, 0.0),
///     City::new(0.0, 1.0),
///     City::new(1.0, 0.0),
///     City::new(1.0, 1.0),
/// ];
/// let mut solver = Solver::with_cities(cities, config).unwrap();
/// for _ in 0..10 {
///     solver.step().unwrap();
/// }
/// assert_eq!(solver.generation(), 10);
/// assert_eq!(solver.best_tour().unwrap().len(), 4);
/// ```
#[derive(Debug)]
pub struct Solver {
    config: SolverConfig,
    state: RunState,
    generation: usize,
    rng: StdRng,
}

impl Solver {
    /// Creates an idle solver with no cities.
    pub fn new(config: SolverConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };
        Ok(Self {
            config,
            state: RunState::Idle { cities: Vec::new() },
            generation: 0,
            rng,
        })
    }

    /// Creates an idle solver with the given cities.
    ///
    /// Cities with coordinates identical to an earlier city are dropped.
    pub fn with_cities(
        cities: impl IntoIterator<Item = City>,
        config: SolverConfig,
    ) -> Result<Self, SolverError> {
        let mut solver = Self::new(config)?;
        for city in cities {
            solver.add_city(city)?;
        }
        Ok(solver)
    }

    /// The validated configuration this solver was built with.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Appends a city while the run is idle.
    ///
    /// Returns `Ok(false)` if a city with the same coordinates already exists.
    ///
    /// # Errors
    /// [`SolverError::RunInProgress`] once the first generation has been
    /// requested.
    pub fn add_city(&mut self, city: City) -> Result<bool, SolverError> {
        match &mut self.state {
            RunState::Idle { cities } => {
                if cities.contains(&city) {
                    tracing::warn!(x = city.x, y = city.y, "city already placed");
                    return Ok(false);
                }
                cities.push(city);
                Ok(true)
            }
            RunState::Running { .. } => Err(SolverError::RunInProgress),
        }
    }

    /// Cities placed so far, or the fixed list once running.
    pub fn cities(&self) -> &[City] {
        match &self.state {
            RunState::Idle { cities } => cities,
            RunState::Running { evaluator, .. } => evaluator.cities(),
        }
    }

    /// Whether the population has been seeded.
    pub fn is_running(&self) -> bool {
        matches!(self.state, RunState::Running { .. })
    }

    /// Completed generations.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// The live population, `None` while idle.
    pub fn population(&self) -> Option<&Population> {
        match &self.state {
            RunState::Running { population, .. } => Some(population),
            RunState::Idle { .. } => None,
        }
    }

    /// Largest city-pair distance of the running instance.
    pub fn max_distance(&self) -> Option<f64> {
        match &self.state {
            RunState::Running { evaluator, .. } => Some(evaluator.max_distance()),
            RunState::Idle { .. } => None,
        }
    }

    /// City order of the best salesman, `None` while idle.
    pub fn best_tour(&self) -> Option<&[usize]> {
        self.population().map(Population::best_tour)
    }

    /// Best fitness, `None` while idle.
    pub fn best_fitness(&self) -> Option<Fitness> {
        self.population().map(Population::best_fitness)
    }

    /// Worst fitness, `None` while idle.
    pub fn worst_fitness(&self) -> Option<Fitness> {
        self.population().map(Population::worst_fitness)
    }

    /// Rounded mean fitness, `None` while idle.
    pub fn average_fitness(&self) -> Option<Fitness> {
        self.population().map(Population::average_fitness)
    }

    /// Summary of the current population, `None` while idle.
    pub fn stats(&self) -> Option<GenerationStats> {
        let population = self.population()?;
        Some(GenerationStats {
            generation: self.generation,
            best: population.best_fitness(),
            worst: population.worst_fitness(),
            average: population.average_fitness(),
            city_count: self.cities().len(),
        })
    }

    /// Seeds the population if the run is still idle.
    ///
    /// # Errors
    /// [`ConfigError::NoCities`] if no city has been added. The solver stays
    /// idle in that case.
    pub fn initialize(&mut self) -> Result<&Population, SolverError> {
        if let RunState::Idle { cities } = &mut self.state {
            if cities.is_empty() {
                return Err(ConfigError::NoCities.into());
            }
            let evaluator = FitnessEvaluator::new(std::mem::take(cities));
            let population =
                Population::initialize(&evaluator, self.config.population_size, &mut self.rng)?;
            tracing::info!(
                cities = evaluator.city_count(),
                population = population.len(),
                max_distance = evaluator.max_distance(),
                "population initialized"
            );
            self.state = RunState::Running {
                evaluator,
                population,
            };
        }
        match &self.state {
            RunState::Running { population, .. } => Ok(population),
            RunState::Idle { .. } => Err(ConfigError::NoCities.into()),
        }
    }

    /// Advances one generation, initializing first if idle.
    #[instrument(level = "debug", skip(self), fields(generation = self.generation))]
    pub fn step(&mut self) -> Result<&Population, SolverError> {
        self.initialize()?;
        let RunState::Running {
            evaluator,
            population,
        } = &mut self.state
        else {
            return Err(ConfigError::NoCities.into());
        };

        step(population, evaluator, &self.config, &mut self.rng)?;
        self.generation += 1;

        tracing::debug!(
            generation = self.generation,
            best = population.best_fitness(),
            worst = population.worst_fitness(),
            average = population.average_fitness(),
            "generation complete"
        );
        Ok(population)
    }

    /// Steps up to `max_generations` times.
    pub fn run(&mut self) -> Result<SolveResult, SolverError> {
        self.run_with_cancel(None)
    }

    /// Steps up to `max_generations` times with an optional cancellation token.
    ///
    /// The flag is checked between generations; a generation always runs to
    /// completion. Stops early once the best fitness has not improved for
    /// `stagnation_limit` generations (when non-zero).
    #[instrument(level = "debug", skip(self, cancel))]
    pub fn run_with_cancel(
        &mut self,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SolveResult, SolverError> {
        let mut best = self.initialize()?.best_fitness();
        let capacity = self.config.max_generations.saturating_add(1).min(1024);
        let mut fitness_history = Vec::with_capacity(capacity);
        fitness_history.push(best);

        let mut stagnation_counter = 0usize;
        let mut stagnated = false;
        let mut cancelled = false;

        for _ in 0..self.config.max_generations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            let gen_best = self.step()?.best_fitness();
            fitness_history.push(gen_best);

            if gen_best < best {
                best = gen_best;
                stagnation_counter = 0;
            } else {
                stagnation_counter += 1;
            }

            if self.config.stagnation_limit > 0 && stagnation_counter >= self.config.stagnation_limit
            {
                stagnated = true;
                break;
            }
        }

        let population = self.initialize()?;
        Ok(SolveResult {
            best_tour: population.best_tour().to_vec(),
            best_fitness: population.best_fitness(),
            generations: self.generation,
            stagnated,
            cancelled,
            fitness_history,
        })
    }

    /// Clears cities, population and the generation counter.
    pub fn reset(&mut self) {
        tracing::info!(generation = self.generation, "run reset");
        self.state = RunState::Idle { cities: Vec::new() };
        self.generation = 0;
    }
}

// ============================================================================
// Tests
// ============================================================================
