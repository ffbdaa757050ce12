use ndarray::{Array2, ArrayView1};

use crate::trajectory::{LocationId, TrajectoryMatrix};

/// First-order Markov estimate of aggregate mobility: `p[src][dst]`.
///
/// Built once from observed consecutive pairs and never refined afterwards.
#[derive(Debug, Clone)]
pub struct TransitionMatrix {
    probs: Array2<f64>,
}

impl TransitionMatrix {
    /// Count `(t, t+1)` pairs where both cells are known, then row-normalize.
    /// Rows with no outgoing observation become uniform over all locations.
    pub fn estimate(traj: &TrajectoryMatrix) -> Self {
        let loc_num = traj.max_location().map_or(0, |m| m as usize + 1);
        let mut probs = Array2::<f64>::zeros((loc_num, loc_num));

        for t in 0..traj.timesteps().saturating_sub(1) {
            for u in 0..traj.users() {
                if let (Some(src), Some(dst)) = (traj.known(u, t), traj.known(u, t + 1)) {
                    probs[[src, dst]] += 1.0;
                }
            }
        }

        let uniform = if loc_num > 0 { 1.0 / loc_num as f64 } else { 0.0 };
        for mut row in probs.rows_mut() {
            let sum = row.sum();
            if sum > 0.0 {
                row.mapv_inplace(|c| c / sum);
            } else {
                row.fill(uniform);
            }
        }
        Self { probs }
    }

    pub fn from_probs(probs: Array2<f64>) -> Self {
        Self { probs }
    }

    pub fn loc_num(&self) -> usize {
        self.probs.nrows()
    }

    /// `P(dst | src)`; 0 for ids outside the estimated vocabulary.
    pub fn prob(&self, src: LocationId, dst: LocationId) -> f64 {
        let n = self.loc_num() as LocationId;
        if src < 0 || dst < 0 || src >= n || dst >= n {
            return 0.0;
        }
        self.probs[[src as usize, dst as usize]]
    }

    pub fn row(&self, src: usize) -> ArrayView1<'_, f64> {
        self.probs.row(src)
    }

    /// Transition weights from `src` restricted to `candidates`, in candidate order.
    pub fn weights_into(&self, src: LocationId, candidates: &[LocationId], out: &mut Vec<f64>) {
        out.clear();
        out.extend(candidates.iter().map(|&dst| self.prob(src, dst)));
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.probs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_only_known_pairs() {
        let traj = TrajectoryMatrix::from_rows(&[vec![0, 1, -1, 1], vec![1, 1, 0, -1]]).unwrap();
        let tm = TransitionMatrix::estimate(&traj);
        assert_eq!(tm.loc_num(), 2);
        // 0->1 once; 1->1 once, 1->0 once
        assert!((tm.prob(0, 1) - 1.0).abs() < 1e-12);
        assert!((tm.prob(1, 1) - 0.5).abs() < 1e-12);
        assert!((tm.prob(1, 0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn unseen_source_row_is_uniform() {
        let traj = TrajectoryMatrix::from_rows(&[vec![0, 0, 3]]).unwrap();
        let tm = TransitionMatrix::estimate(&traj);
        assert_eq!(tm.loc_num(), 4);
        for dst in 0..4 {
            assert!((tm.prob(2, dst) - 0.25).abs() < 1e-12);
        }
        assert_eq!(tm.prob(7, 0), 0.0);
        assert_eq!(tm.prob(-1, 0), 0.0);
    }

    #[test]
    fn all_unknown_input_gives_empty_matrix() {
        let traj = TrajectoryMatrix::unknown(2, 3);
        assert_eq!(TransitionMatrix::estimate(&traj).loc_num(), 0);
    }
}
