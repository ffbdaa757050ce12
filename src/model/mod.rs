pub mod baseline;
pub mod guided;
pub mod risk_domain;

use rand::Rng;
use tracing::{info, warn};

use crate::error::{GenError, Result};
use crate::math::sampling::{uniform_choice, weighted_index};
use crate::math::transition::TransitionMatrix;
use crate::trajectory::{LocationId, TrajectoryMatrix};

/// Consume a real trajectory matrix, produce a synthetic one of the same shape.
pub trait TrajectorySampler {
    fn name(&self) -> &'static str;

    fn sample<R: Rng + ?Sized>(&self, real: &TrajectoryMatrix, rng: &mut R) -> Result<TrajectoryMatrix>;
}

/// How the cells of a random walk were drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// t == 0 draws.
    pub seeded: usize,
    pub weighted: usize,
    /// Transition weights into the candidates summed to zero.
    pub fallback: usize,
}

/// Time-major Markov walk: at `t == 0` a uniform pick from the candidates,
/// afterwards a pick weighted by the transition row of the previous fake cell.
///
/// `candidates(user, t)` yields the allowed locations for one cell.
pub(crate) fn transition_walk<'c, R, F>(
    real: &TrajectoryMatrix,
    transitions: &TransitionMatrix,
    rng: &mut R,
    mut candidates: F,
) -> Result<(TrajectoryMatrix, WalkStats)>
where
    R: Rng + ?Sized,
    F: FnMut(usize, usize) -> Result<&'c [LocationId]>,
{
    let (users, timesteps) = real.shape();
    let mut fake = TrajectoryMatrix::unknown(users, timesteps);
    let mut stats = WalkStats::default();
    let mut weights = Vec::new();

    for t in 0..timesteps {
        for u in 0..users {
            let domain = candidates(u, t)?;
            let loc = if t == 0 {
                stats.seeded += 1;
                uniform_choice(domain, rng)
                    .ok_or_else(|| GenError::EmptyCandidateSet { user: u, timestep: t })?
            } else {
                if domain.is_empty() {
                    return Err(GenError::EmptyCandidateSet { user: u, timestep: t });
                }
                transitions.weights_into(fake.get(u, t - 1), domain, &mut weights);
                let draw = weighted_index(&weights, rng)?;
                if draw.is_fallback() {
                    stats.fallback += 1;
                } else {
                    stats.weighted += 1;
                }
                domain[draw.index()]
            };
            fake.set(u, t, loc);
        }
    }

    info!(users, timesteps, weighted = stats.weighted, fallback = stats.fallback, "walk complete");
    if stats.fallback > 0 && stats.fallback >= stats.weighted {
        warn!(
            fallback = stats.fallback,
            weighted = stats.weighted,
            "most steps fell back to uniform draws; transition data is sparse"
        );
    }
    Ok((fake, stats))
}
