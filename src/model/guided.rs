//! Risk-guided fake trajectory generation.
//!
//! Each fake trajectory is a first-order Markov walk over the empirical
//! transition matrix, constrained at every step to the risk band that holds
//! the user's real location on that day. When the real location is unknown
//! the whole day's vocabulary is allowed.

use ndarray::Array2;
use rand::Rng;
use tracing::info;

use crate::error::{GenError, Result};
use crate::math::transition::TransitionMatrix;
use crate::model::risk_domain::RiskDomainTable;
use crate::model::{transition_walk, TrajectorySampler, WalkStats};
use crate::trajectory::{LocationId, TrajectoryMatrix};

/// Half-hour slots.
pub const DEFAULT_STEPS_PER_DAY: usize = 48;

#[derive(Debug, Clone)]
pub struct GuidedSampler {
    pub transitions: TransitionMatrix,
    pub domains: RiskDomainTable,
    pub steps_per_day: usize,
}

impl GuidedSampler {
    pub fn new(transitions: TransitionMatrix, domains: RiskDomainTable, steps_per_day: usize) -> Result<Self> {
        if steps_per_day == 0 {
            return Err(GenError::ZeroStepsPerDay);
        }
        Ok(Self { transitions, domains, steps_per_day })
    }

    /// Estimate transitions from `real` and partition `risk` (`locations x days`).
    pub fn fit(
        real: &TrajectoryMatrix,
        risk: &Array2<f64>,
        levels: usize,
        steps_per_day: usize,
    ) -> Result<Self> {
        let transitions = TransitionMatrix::estimate(real);
        let domains = RiskDomainTable::build(risk, levels)?;
        info!(
            loc_num = transitions.loc_num(),
            days = domains.days(),
            levels,
            "guided sampler fitted"
        );
        Self::new(transitions, domains, steps_per_day)
    }

    /// Allowed fake locations for cell `(user, t)`.
    pub fn candidates(&self, real: &TrajectoryMatrix, user: usize, t: usize) -> Result<&[LocationId]> {
        let day = t / self.steps_per_day;
        let domain = self.domains.day(day).ok_or_else(|| GenError::DayOutOfRange {
            timestep: t,
            day,
            days: self.domains.days(),
        })?;
        match real.known(user, t) {
            None => Ok(domain.all_locations()),
            Some(loc) => {
                let loc = loc as LocationId;
                domain.band_members(loc).ok_or_else(|| GenError::UnknownLocation { day, location: loc })
            }
        }
    }

    pub fn sample_with_stats<R: Rng + ?Sized>(
        &self,
        real: &TrajectoryMatrix,
        rng: &mut R,
    ) -> Result<(TrajectoryMatrix, WalkStats)> {
        transition_walk(real, &self.transitions, rng, move |u, t| self.candidates(real, u, t))
    }
}

impl TrajectorySampler for GuidedSampler {
    fn name(&self) -> &'static str {
        "guided"
    }

    fn sample<R: Rng + ?Sized>(&self, real: &TrajectoryMatrix, rng: &mut R) -> Result<TrajectoryMatrix> {
        self.sample_with_stats(real, rng).map(|(fake, _)| fake)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn timesteps_past_the_risk_table_are_rejected() {
        let real = TrajectoryMatrix::from_rows(&[vec![0, 1, 0]]).unwrap();
        let risk = array![[0.1], [0.9]];
        let sampler = GuidedSampler::fit(&real, &risk, 2, 2).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = sampler.sample(&real, &mut rng).unwrap_err();
        assert!(matches!(err, GenError::DayOutOfRange { timestep: 2, day: 1, days: 1 }));
    }

    #[test]
    fn location_outside_risk_vocabulary_is_rejected() {
        let real = TrajectoryMatrix::from_rows(&[vec![0, 5]]).unwrap();
        let risk = array![[0.1], [0.9]];
        let sampler = GuidedSampler::fit(&real, &risk, 2, 48).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = sampler.sample(&real, &mut rng).unwrap_err();
        assert!(matches!(err, GenError::UnknownLocation { day: 0, location: 5 }));
    }

    #[test]
    fn unknown_real_cell_allows_the_whole_day() {
        let real = TrajectoryMatrix::from_rows(&[vec![-1, -1]]).unwrap();
        let risk = array![[0.3], [0.1], [0.2]];
        let sampler = GuidedSampler::fit(&real, &risk, 3, 48).unwrap();
        let c = sampler.candidates(&real, 0, 1).unwrap();
        assert_eq!(c, &[1, 2, 0]);
    }

    #[test]
    fn zero_steps_per_day_is_rejected() {
        let real = TrajectoryMatrix::from_rows(&[vec![0, 1]]).unwrap();
        let risk = array![[0.1], [0.9]];
        let err = GuidedSampler::fit(&real, &risk, 2, 0).unwrap_err();
        assert!(matches!(err, GenError::ZeroStepsPerDay));
    }
}
