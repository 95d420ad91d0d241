//! Salesmen and the population they evolve in.
//!
//! A [`Salesman`] is one candidate tour with its cached fitness. The
//! [`Population`] keeps a fixed number of them for the whole run and is
//! re-sorted by fitness after every generation.

use crate::error::ConfigError;
use crate::fitness::{Fitness, FitnessEvaluator};
use rand::Rng;

/// One candidate tour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Salesman {
    /// City indices in visiting order. Normally a permutation of
    /// `0..city_count`, but may briefly hold duplicates.
    pub tour: Vec<usize>,

    /// Score of `tour` as of the last evaluation. Lower is better.
    pub fitness: Fitness,

    /// Slot assigned at initialization. Stable across sorting; used for
    /// reporting only.
    pub index: usize,
}

impl Salesman {
    /// Re-scores the tour.
    pub fn evaluate(&mut self, evaluator: &FitnessEvaluator) {
        self.fitness = evaluator.evaluate(&self.tour);
    }
}

/// Builds a uniformly random tour visiting each of `city_count` cities once.
///
/// Draws from a shrinking pool of remaining cities.
pub fn random_tour<R: Rng>(city_count: usize, rng: &mut R) -> Vec<usize> {
    let mut pool: Vec<usize> = (0..city_count).collect();
    let mut tour = Vec::with_capacity(city_count);
    while !pool.is_empty() {
        let pick = rng.random_range(0..pool.len());
        tour.push(pool.remove(pick));
    }
    tour
}

/// Fixed-size collection of salesmen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Population {
    salesmen: Vec<Salesman>,
}

impl Population {
    /// Creates `size` random tours over the evaluator's cities and scores them.
    ///
    /// # Errors
    /// [`ConfigError::NoCities`] if the evaluator holds no cities,
    /// [`ConfigError::EmptyPopulation`] if `size` is zero.
    pub fn initialize<R: Rng>(
        evaluator: &FitnessEvaluator,
        size: usize,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        if evaluator.city_count() == 0 {
            return Err(ConfigError::NoCities);
        }
        if size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }

        let salesmen = (0..size)
            .map(|index| {
                let tour = random_tour(evaluator.city_count(), rng);
                let fitness = evaluator.evaluate(&tour);
                Salesman {
                    tour,
                    fitness,
                    index,
                }
            })
            .collect();

        Ok(Self { salesmen })
    }

    /// Wraps existing salesmen, e.g. a population restored by the caller.
    ///
    /// # Errors
    /// [`ConfigError::EmptyPopulation`] if `salesmen` is empty.
    pub fn from_salesmen(salesmen: Vec<Salesman>) -> Result<Self, ConfigError> {
        if salesmen.is_empty() {
            return Err(ConfigError::EmptyPopulation);
        }
        Ok(Self { salesmen })
    }

    /// Number of salesmen. Constant for the run.
    pub fn len(&self) -> usize {
        self.salesmen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.salesmen.is_empty()
    }

    /// Salesmen in population order (best first after a generation).
    pub fn iter(&self) -> std::slice::Iter<'_, Salesman> {
        self.salesmen.iter()
    }

    pub fn salesmen(&self) -> &[Salesman] {
        &self.salesmen
    }

    pub(crate) fn salesmen_mut(&mut self) -> &mut [Salesman] {
        &mut self.salesmen
    }

    /// Position of the lowest-fitness salesman; ties go to the first.
    pub fn best_index(&self) -> usize {
        let mut best = 0;
        for (i, s) in self.salesmen.iter().enumerate().skip(1) {
            if s.fitness < self.salesmen[best].fitness {
                best = i;
            }
        }
        best
    }

    /// The lowest-fitness salesman.
    pub fn best(&self) -> &Salesman {
        &self.salesmen[self.best_index()]
    }

    /// City order of the best salesman.
    pub fn best_tour(&self) -> &[usize] {
        &self.best().tour
    }

    /// Lowest fitness in the population.
    pub fn best_fitness(&self) -> Fitness {
        self.best().fitness
    }

    /// Highest fitness in the population.
    pub fn worst_fitness(&self) -> Fitness {
        self.salesmen.iter().map(|s| s.fitness).max().unwrap_or(0)
    }

    /// Mean fitness, rounded to the nearest integer.
    pub fn average_fitness(&self) -> Fitness {
        if self.salesmen.is_empty() {
            return 0;
        }
        let sum: f64 = self.salesmen.iter().map(|s| s.fitness as f64).sum();
        (sum / self.salesmen.len() as f64).round() as Fitness
    }

    /// Re-scores every salesman.
    pub fn evaluate(&mut self, evaluator: &FitnessEvaluator, parallel: bool) {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            if parallel {
                self.salesmen
                    .par_iter_mut()
                    .for_each(|s| s.evaluate(evaluator));
                return;
            }
        }
        #[cfg(not(feature = "parallel"))]
        let _ = parallel;

        for s in self.salesmen.iter_mut() {
            s.evaluate(evaluator);
        }
    }

    /// Sorts ascending by fitness (best first).
    pub fn sort_by_fitness(&mut self) {
        self.salesmen.sort_by_key(|s| s.fitness);
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a Salesman;
    type IntoIter = std::slice::Iter<'a, Salesman>;

    fn into_iter(self) -> Self::IntoIter {
        self.salesmen.iter()
    }
}
