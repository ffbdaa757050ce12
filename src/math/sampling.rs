use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{GenError, Result};

/// How a weighted draw was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Draw {
    Weighted(usize),
    /// Weights carried no mass; the index was drawn uniformly.
    Fallback(usize),
}

impl Draw {
    pub fn index(self) -> usize {
        match self {
            Draw::Weighted(i) | Draw::Fallback(i) => i,
        }
    }

    pub fn is_fallback(self) -> bool {
        matches!(self, Draw::Fallback(_))
    }
}

/// Uniform pick from a non-empty slice.
pub fn uniform_choice<T: Copy, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Option<T> {
    items.choose(rng).copied()
}

/// Draw an index proportionally to `weights`. A zero or non-finite total
/// degrades to a uniform draw over all indices.
pub fn weighted_index<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> Result<Draw> {
    if weights.is_empty() {
        return Err(GenError::Sampling("no weights to draw from".to_string()));
    }
    let total: f64 = weights.iter().sum();
    if !(total.is_finite() && total > 0.0) {
        return Ok(Draw::Fallback(rng.gen_range(0..weights.len())));
    }
    let dist = WeightedIndex::new(weights).map_err(|e| GenError::Sampling(e.to_string()))?;
    Ok(Draw::Weighted(dist.sample(rng)))
}
