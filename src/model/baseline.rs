//! Comparison generators without risk guidance.

use std::collections::{BTreeMap, BTreeSet};

use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

use crate::error::{GenError, Result};
use crate::math::transition::TransitionMatrix;
use crate::model::{transition_walk, TrajectorySampler};
use crate::trajectory::{LocationId, TrajectoryMatrix};

/// Every cell independently uniform over the known vocabulary.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformIid;

impl TrajectorySampler for UniformIid {
    fn name(&self) -> &'static str {
        "uniform_iid"
    }

    fn sample<R: Rng + ?Sized>(&self, real: &TrajectoryMatrix, rng: &mut R) -> Result<TrajectoryMatrix> {
        let vocab = real.vocabulary();
        if vocab.is_empty() {
            return Err(GenError::EmptyVocabulary);
        }
        let (users, timesteps) = real.shape();
        let mut fake = TrajectoryMatrix::unknown(users, timesteps);
        for u in 0..users {
            for t in 0..timesteps {
                fake.set(u, t, vocab[rng.gen_range(0..vocab.len())]);
            }
        }
        Ok(fake)
    }
}

/// Every cell independently drawn from the marginal location frequencies.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmpiricalIid;

impl TrajectorySampler for EmpiricalIid {
    fn name(&self) -> &'static str {
        "empirical_iid"
    }

    fn sample<R: Rng + ?Sized>(&self, real: &TrajectoryMatrix, rng: &mut R) -> Result<TrajectoryMatrix> {
        let counts = real.location_counts();
        if counts.is_empty() {
            return Err(GenError::EmptyVocabulary);
        }
        let (locs, freq): (Vec<LocationId>, Vec<usize>) = counts.into_iter().unzip();
        let dist = WeightedIndex::new(&freq).map_err(|e| GenError::Sampling(e.to_string()))?;

        let (users, timesteps) = real.shape();
        let mut fake = TrajectoryMatrix::unknown(users, timesteps);
        for u in 0..users {
            for t in 0..timesteps {
                fake.set(u, t, locs[dist.sample(rng)]);
            }
        }
        Ok(fake)
    }
}

/// Pure Markov chain over the whole vocabulary.
#[derive(Debug, Clone)]
pub struct RandomWalk {
    pub transitions: TransitionMatrix,
}

impl RandomWalk {
    pub fn fit(real: &TrajectoryMatrix) -> Self {
        Self { transitions: TransitionMatrix::estimate(real) }
    }
}

impl TrajectorySampler for RandomWalk {
    fn name(&self) -> &'static str {
        "random_walk"
    }

    fn sample<R: Rng + ?Sized>(&self, real: &TrajectoryMatrix, rng: &mut R) -> Result<TrajectoryMatrix> {
        let vocab = real.vocabulary();
        if vocab.is_empty() {
            return Err(GenError::EmptyVocabulary);
        }
        let vocab = vocab.as_slice();
        transition_walk(real, &self.transitions, rng, move |_, _| Ok(vocab)).map(|(fake, _)| fake)
    }
}

/// Per-segment location sets: the real ones and their disjoint stand-ins.
///
/// A user's fake set has `min(|real|, |complement|)` entries, where the
/// complement is the vocabulary minus the real set. When the user visited
/// more than half the vocabulary in a segment, `fake[seg][&u]` is shorter
/// than `real[seg][&u]`, and it is empty when every location was visited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComplementDraws {
    pub real: Vec<BTreeMap<usize, BTreeSet<LocationId>>>,
    pub fake: Vec<BTreeMap<usize, Vec<LocationId>>>,
}

/// For each segment and user, draw as many locations as the user visited,
/// uniformly and without replacement, from locations the user never visited
/// in that segment. The draw is capped at the complement size.
pub fn set_complement<R: Rng + ?Sized>(
    real: &TrajectoryMatrix,
    segments: usize,
    rng: &mut R,
) -> Result<ComplementDraws> {
    let timesteps = real.timesteps();
    if segments == 0 || timesteps % segments != 0 {
        return Err(GenError::UnevenSegments { timesteps, segments });
    }
    let vocab: BTreeSet<LocationId> = real.vocabulary().into_iter().collect();
    if vocab.is_empty() {
        return Err(GenError::EmptyVocabulary);
    }
    let seg_len = timesteps / segments;

    let mut draws = ComplementDraws::default();
    for seg in 0..segments {
        let mut real_sets = BTreeMap::new();
        let mut fake_sets = BTreeMap::new();
        for u in 0..real.users() {
            let visited = real.distinct_in(u, seg * seg_len, (seg + 1) * seg_len);
            let pool: Vec<LocationId> = vocab.difference(&visited).copied().collect();
            let k = visited.len().min(pool.len());
            let picked: Vec<LocationId> = pool.choose_multiple(rng, k).copied().collect();
            real_sets.insert(u, visited);
            fake_sets.insert(u, picked);
        }
        draws.real.push(real_sets);
        draws.fake.push(fake_sets);
    }
    info!(segments, users = real.users(), "set-complement draws complete");
    Ok(draws)
}
