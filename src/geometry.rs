//! Planar geometry over the fixed city list.
//!
//! All distances are Euclidean. Tours are slices of city indices into a
//! `&[City]` that never changes during a run.

/// A city at a fixed 2D coordinate.
///
/// Cities are identified by their position in the run's city list, not by
/// their coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct City {
    pub x: f64,
    pub y: f64,
}

impl City {
    /// A city at `(x, y)`.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Euclidean distance between cities `a` and `b`.
///
/// # Panics
/// Panics if either index is out of bounds for `cities`.
#[inline]
pub fn distance(cities: &[City], a: usize, b: usize) -> f64 {
    let (p, q) = (cities[a], cities[b]);
    ((p.x - q.x).powi(2) + (p.y - q.y).powi(2)).sqrt()
}

/// Length of a tour.
///
/// Sums the edges between consecutive entries, then, for tours of more
/// than two entries, adds the edge from the first city to the city stored
/// at position `cities.len() - 1` of the tour. For a full-length tour that
/// is the last stop; the rule is kept as-is for tours of any other length.
pub fn tour_length(cities: &[City], tour: &[usize]) -> f64 {
    let mut length: f64 = tour
        .windows(2)
        .map(|w| distance(cities, w[0], w[1]))
        .sum();

    if tour.len() > 2 {
        let closing = cities.len().checked_sub(1).and_then(|i| tour.get(i));
        if let Some(&last) = closing {
            length += distance(cities, tour[0], last);
        }
    }

    length
}

/// Largest distance over all city pairs. Zero for fewer than two cities.
///
/// # Complexity
/// O(n²)
pub fn max_distance(cities: &[City]) -> f64 {
    let n = cities.len();
    let mut max = 0.0_f64;
    for i in 0..n {
        for j in (i + 1)..n {
            max = max.max(distance(cities, i, j));
        }
    }
    max
}
