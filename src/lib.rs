//! Genetic search for short closed tours over 2D cities (Euclidean TSP).
//!
//! A fixed-size population of candidate tours ("salesmen") is evolved one
//! generation at a time:
//!
//! - **Crossover**: every tour swaps cities into the positions they hold in
//!   the current best tour.
//! - **Mutation**: every tour except the best receives random swaps, more
//!   of them the further it lags behind the best.
//! - **Scoring**: tour length plus a flat penalty for visiting a city twice.
//!   Lower is better.
//!
//! The best tour is never mutated, so the best fitness never gets worse
//! from one generation to the next. The search is not exact and has no
//! convergence detection of its own; callers step until they are satisfied
//! or use [`Solver::run`] with a generation cap and stagnation limit.
//!
//! # Key Types
//!
//! - [`Solver`]: Owns cities, population, generation counter and RNG
//! - [`SolverConfig`]: Population size, operator constants, presets
//! - [`Population`] / [`Salesman`]: The evolving tours
//! - [`FitnessEvaluator`]: Scores tours against the fixed city list
//!
//! # Example
//!
//! ```
//! use salesman_ga::{City, Solver, SolverConfig};
//!
//! let cities = (0..8).map(|i| City::new((i * 7 % 5) as f64, i as f64));
//! let config = SolverConfig::fast().with_seed(42);
//! let mut solver = Solver::with_cities(cities, config).unwrap();
//! let result = solver.run().unwrap();
//! assert_eq!(result.best_tour.len(), 8);
//! ```

pub mod config;
pub mod error;
pub mod fitness;
pub mod geometry;
pub mod operators;
pub mod population;
pub mod runner;

pub use config::SolverConfig;
pub use error::{ConfigError, SolverError};
pub use fitness::{Fitness, FitnessEvaluator};
pub use geometry::City;
pub use population::{Population, Salesman};
pub use runner::{step, GenerationStats, SolveResult, Solver};
