//! Synthetic mobility data for tests and demos.
//!
//! Not meant to be realistic, only to exercise the generators end to end
//! while no real dataset is at hand.

use ndarray::Array2;
use rand::Rng;

use crate::trajectory::{LocationId, TrajectoryMatrix, UNKNOWN_LOCATION};

/// Users hop along a ring of `n_loc` locations: mostly staying, sometimes
/// moving to a neighbour, with a share of cells left unknown.
pub fn synthetic_trajectories<R: Rng + ?Sized>(
    users: usize,
    timesteps: usize,
    n_loc: usize,
    missing_rate: f64,
    rng: &mut R,
) -> TrajectoryMatrix {
    let mut traj = TrajectoryMatrix::unknown(users, timesteps);
    if n_loc == 0 {
        return traj;
    }
    for u in 0..users {
        let mut here = rng.gen_range(0..n_loc);
        for t in 0..timesteps {
            let roll: f64 = rng.gen();
            if roll < 0.2 {
                here = (here + 1) % n_loc;
            } else if roll < 0.3 {
                here = (here + n_loc - 1) % n_loc;
            }
            let cell = if rng.gen_bool(missing_rate.clamp(0.0, 1.0)) {
                UNKNOWN_LOCATION
            } else {
                here as LocationId
            };
            traj.set(u, t, cell);
        }
    }
    traj
}

/// `n_loc x days` risk scores: a per-location base level with a slow daily drift.
pub fn synthetic_risk(n_loc: usize, days: usize) -> Array2<f64> {
    let mut risk = Array2::<f64>::zeros((n_loc, days));
    for l in 0..n_loc {
        for d in 0..days {
            let base = (l as f64 * 0.37).sin().abs();
            let drift = 0.1 * ((d as f64 + l as f64) * 0.5).cos();
            risk[[l, d]] = base + drift;
        }
    }
    risk
}
