//! Genetic operators over tours.
//!
//! Both operators work in place by swapping tour positions, so a tour that
//! starts as a permutation stays one. Duplicates already present in a tour
//! are carried along and left to the fitness penalty.
//!
//! # Crossover
//!
//! - [`crossover_from_best`]: pulls cities into the positions they hold in
//!   the best tour, one random position at a time
//!
//! # Mutation
//!
//! - [`adaptive_mutation`]: random swaps on every salesman except the best,
//!   more of them the further a salesman lags behind
//! - [`swap_mutation`]: a single random swap

use crate::config::SolverConfig;
use crate::fitness::Fitness;
use crate::population::Population;
use rand::Rng;

// ============================================================================
// Crossover
// ============================================================================

/// Number of crossover swaps per salesman: `floor(city_count * ratio)`.
pub fn crossover_amount(city_count: usize, ratio: f64) -> usize {
    (city_count as f64 * ratio).floor() as usize
}

/// Moves genes from the best tour into every tour of the population.
///
/// For each salesman, `amount` times: pick a random position `p`, look up
/// the city the best tour holds at `p`, find that city's first position in
/// the salesman's own tour and swap it into `p`. Cities missing from a tour
/// are skipped.
///
/// The best tour is copied before the pass, so its own turn is a no-op.
pub fn crossover_from_best<R: Rng>(population: &mut Population, amount: usize, rng: &mut R) {
    if amount == 0 || population.is_empty() {
        return;
    }
    let best = population.best_tour().to_vec();
    if best.is_empty() {
        return;
    }

    for salesman in population.salesmen_mut() {
        let tour = &mut salesman.tour;
        for _ in 0..amount {
            let to_cross = rng.random_range(0..best.len());
            let target = best[to_cross];
            let Some(from) = tour.iter().position(|&city| city == target) else {
                continue;
            };
            if to_cross < tour.len() {
                tour.swap(from, to_cross);
            }
        }
    }
}

// ============================================================================
// Mutation
// ============================================================================

/// Bonus mutation units for a salesman scoring `fitness` against `best`.
///
/// `floor((ratio - offset) * 10)` once `fitness / best` exceeds the
/// threshold, otherwise 0. A zero best fitness yields no bonus.
pub fn underperformance_bonus(fitness: Fitness, best: Fitness, config: &SolverConfig) -> usize {
    if best == 0 {
        return 0;
    }
    let ratio = fitness as f64 / best as f64;
    if ratio > config.underperformance_threshold {
        ((ratio - config.underperformance_offset) * 10.0).floor().max(0.0) as usize
    } else {
        0
    }
}

/// Swaps to apply for `units` mutation units:
/// `floor(city_count * units * step)`.
pub fn mutation_amount(city_count: usize, units: usize, step: f64) -> usize {
    (city_count as f64 * (units as f64 * step)).floor() as usize
}

/// Randomly disturbs every salesman except the current best.
///
/// Each salesman draws 0, 1 or 2 base units, adds its
/// [`underperformance_bonus`], and with `mutation_probability` receives
/// [`mutation_amount`] random swaps. Random draws happen for the best
/// salesman too, so the sequence consumed per generation only depends on
/// the population size.
///
/// # Panics
/// Panics if `mutation_probability` lies outside `0.0..=1.0`. Call
/// [`SolverConfig::validate`] first, as [`step`](crate::step) does.
pub fn adaptive_mutation<R: Rng>(population: &mut Population, config: &SolverConfig, rng: &mut R) {
    if population.is_empty() {
        return;
    }
    let best_id = population.best_index();
    let best_fitness = population.best_fitness();

    for (i, salesman) in population.salesmen_mut().iter_mut().enumerate() {
        let bonus = underperformance_bonus(salesman.fitness, best_fitness, config);
        let units = rng.random_range(0..3) + bonus;
        let amount = mutation_amount(salesman.tour.len(), units, config.mutation_step);
        let mutate = rng.random_bool(config.mutation_probability);

        if i == best_id || !mutate {
            continue;
        }

        tracing::trace!(salesman = salesman.index, swaps = amount, "mutating");
        for _ in 0..amount {
            swap_mutation(&mut salesman.tour, rng);
        }
    }
}

/// Swap mutation: exchange two random positions. The positions may coincide.
///
/// # Complexity
/// O(1)
pub fn swap_mutation<R: Rng>(tour: &mut [usize], rng: &mut R) {
    let n = tour.len();
    if n < 2 {
        return;
    }
    let from = rng.random_range(0..n);
    let to = rng.random_range(0..n);
    tour.swap(from, to);
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::Salesman;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn is_valid_permutation(perm: &[usize], n: usize) -> bool {
        let set: HashSet<usize> = perm.iter().copied().collect();
        perm.len() == n && set.len() == n && perm.iter().all(|&v| v < n)
    }

    fn population(tours: Vec<(Vec<usize>, Fitness)>) -> Population {
        Population::from_salesmen(
            tours
                .into_iter()
                .enumerate()
                .map(|(index, (tour, fitness))| Salesman {
                    tour,
                    fitness,
                    index,
                })
                .collect(),
        )
        .unwrap()
    }

    // ---- Crossover ----

    #[test]
    fn test_crossover_amount() {
        assert_eq!(crossover_amount(4, 0.2), 0);
        assert_eq!(crossover_amount(5, 0.2), 1);
        assert_eq!(crossover_amount(24, 0.2), 4);
    }

    #[test]
    fn test_crossover_leaves_best_untouched() {
        let mut rng = StdRng::seed_from_u64(42);
        let best = vec![4, 2, 0, 1, 3, 5];
        let mut pop = population(vec![
            (vec![0, 1, 2, 3, 4, 5], 50),
            (best.clone(), 10),
            (vec![5, 4, 3, 2, 1, 0], 60),
        ]);
        for _ in 0..20 {
            crossover_from_best(&mut pop, 3, &mut rng);
        }
        assert_eq!(pop.salesmen()[1].tour, best);
    }

    #[test]
    fn test_crossover_converges_towards_best() {
        let mut rng = StdRng::seed_from_u64(7);
        let best: Vec<usize> = vec![3, 7, 1, 0, 6, 2, 5, 4];
        let mut pop = population(vec![(best.clone(), 1), ((0..8).collect(), 100)]);
        for _ in 0..200 {
            crossover_from_best(&mut pop, 2, &mut rng);
        }
        // Each swap fixes the chosen position; with enough draws every
        // position is eventually fixed.
        assert_eq!(pop.salesmen()[1].tour, best);
    }

    #[test]
    fn test_crossover_tolerates_missing_city() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut pop = population(vec![
            (vec![0, 1, 2, 3, 4], 10),
            (vec![1, 1, 2, 3, 4], 90),
        ]);
        for _ in 0..50 {
            crossover_from_best(&mut pop, 5, &mut rng);
        }
        let tour = &pop.salesmen()[1].tour;
        assert_eq!(tour.len(), 5);
        assert!(!tour.contains(&0));
    }

    #[test]
    fn test_crossover_single_salesman() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut pop = population(vec![(vec![2, 0, 3, 1, 4], 10)]);
        crossover_from_best(&mut pop, 1, &mut rng);
        assert_eq!(pop.salesmen()[0].tour, vec![2, 0, 3, 1, 4]);
    }

    // ---- Mutation ----

    #[test]
    fn test_underperformance_bonus() {
        let config = SolverConfig::default();
        assert_eq!(underperformance_bonus(100, 100, &config), 0);
        assert_eq!(underperformance_bonus(149, 100, &config), 0);
        // ratio 1.5: (1.5 - 1.2) * 10 = 3.0000000000000004
        assert_eq!(underperformance_bonus(150, 100, &config), 3);
        // ratio 2.0: floor(0.8 * 10) = 8
        assert_eq!(underperformance_bonus(200, 100, &config), 8);
        assert_eq!(underperformance_bonus(50, 0, &config), 0);
    }

    #[test]
    fn test_mutation_amount() {
        assert_eq!(mutation_amount(10, 0, 0.1), 0);
        assert_eq!(mutation_amount(10, 1, 0.1), 1);
        assert_eq!(mutation_amount(20, 2, 0.1), 4);
        assert_eq!(mutation_amount(4, 2, 0.1), 0);
        assert_eq!(mutation_amount(50, 8, 0.1), 40);
    }

    #[test]
    fn test_mutation_skips_best() {
        let mut rng = StdRng::seed_from_u64(42);
        let config = SolverConfig::default().with_mutation_probability(1.0);
        let best: Vec<usize> = (0..20).collect();
        let mut pop = population(vec![
            (best.clone(), 100),
            ((0..20).rev().collect(), 400),
            ((0..20).collect(), 300),
        ]);
        for _ in 0..20 {
            adaptive_mutation(&mut pop, &config, &mut rng);
        }
        assert_eq!(pop.salesmen()[0].tour, best);
        assert_ne!(pop.salesmen()[2].tour, best);
        for s in pop.iter() {
            assert!(is_valid_permutation(&s.tour, 20));
        }
    }

    #[test]
    fn test_mutation_disabled_by_probability() {
        let mut rng = StdRng::seed_from_u64(42);
        let config = SolverConfig::default().with_mutation_probability(0.0);
        let mut pop = population(vec![((0..10).collect(), 10), ((0..10).collect(), 90)]);
        let before = pop.clone();
        adaptive_mutation(&mut pop, &config, &mut rng);
        assert_eq!(pop, before);
    }

    #[test]
    fn test_mutation_single_salesman_never_fires() {
        let mut rng = StdRng::seed_from_u64(42);
        let config = SolverConfig::default().with_mutation_probability(1.0);
        let mut pop = population(vec![((0..10).rev().collect(), 10)]);
        let before = pop.clone();
        for _ in 0..10 {
            adaptive_mutation(&mut pop, &config, &mut rng);
        }
        assert_eq!(pop, before);
    }

    #[test]
    fn test_swap_mutation() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let mut perm: Vec<usize> = (0..10).collect();
            swap_mutation(&mut perm, &mut rng);
            assert!(is_valid_permutation(&perm, 10));
        }
        let mut single = vec![0];
        swap_mutation(&mut single, &mut rng);
        assert_eq!(single, vec![0]);
    }

    proptest! {
        #[test]
        fn prop_operators_preserve_permutations(n in 2usize..40, seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let tours = (0..6)
                .map(|i| (crate::population::random_tour(n, &mut rng), 100 + i as Fitness * 40))
                .collect();
            let mut pop = population(tours);
            let config = SolverConfig::default();
            crossover_from_best(&mut pop, crossover_amount(n, 0.2), &mut rng);
            adaptive_mutation(&mut pop, &config, &mut rng);
            for s in pop.iter() {
                prop_assert!(is_valid_permutation(&s.tour, n));
            }
        }
    }
}
