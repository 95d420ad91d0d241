//! Tour scoring.
//!
//! Fitness is the rounded tour length plus a flat penalty for any tour that
//! visits a city more than once. Lower is better. Malformed tours are never
//! rejected: crossover and mutation may break the permutation invariant for
//! a generation, and the penalty is what pushes such tours to the back of
//! the population.

use crate::geometry::{max_distance, tour_length, City};
use std::collections::HashSet;

/// Integer fitness score. Lower is better.
pub type Fitness = u64;

/// Returns `true` if any city index occurs more than once in `tour`.
pub fn has_duplicates(tour: &[usize]) -> bool {
    let mut seen = HashSet::with_capacity(tour.len());
    !tour.iter().all(|city| seen.insert(*city))
}

/// Scores tours against a fixed city list.
///
/// Owns the city list for the lifetime of a run and caches the largest
/// pairwise distance, which is the unit of the duplicate penalty.
#[derive(Debug, Clone)]
pub struct FitnessEvaluator {
    cities: Vec<City>,
    max_distance: f64,
}

impl FitnessEvaluator {
    /// Fixes the city list and computes the penalty unit.
    pub fn new(cities: Vec<City>) -> Self {
        let max_distance = max_distance(&cities);
        Self {
            cities,
            max_distance,
        }
    }

    /// The fixed city list.
    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    /// Number of cities.
    pub fn city_count(&self) -> usize {
        self.cities.len()
    }

    /// Largest distance between any two cities.
    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    /// Penalty added to any tour containing duplicates: `city_count * max_distance`.
    ///
    /// Flat regardless of how many duplicates the tour holds.
    pub fn duplicate_penalty(&self) -> f64 {
        self.cities.len() as f64 * self.max_distance
    }

    /// Scores `tour`: `round(tour_length + penalty)`.
    ///
    /// Accepts tours with duplicated or missing cities. Every entry must
    /// still be a valid index into the city list.
    pub fn evaluate(&self, tour: &[usize]) -> Fitness {
        let penalty = if has_duplicates(tour) {
            self.duplicate_penalty()
        } else {
            0.0
        };
        (tour_length(&self.cities, tour) + penalty).round() as Fitness
    }
}
