use fakeloc::{TrajectoryMatrix, TransitionMatrix};
use proptest::prelude::*;

fn trajectories() -> impl Strategy<Value = Vec<Vec<i64>>> {
    (1usize..5, 1usize..12).prop_flat_map(|(users, timesteps)| {
        prop::collection::vec(prop::collection::vec(-1i64..6, timesteps), users)
    })
}

proptest! {
    #[test]
    fn every_row_sums_to_one(rows in trajectories()) {
        let traj = TrajectoryMatrix::from_rows(&rows).unwrap();
        let tm = TransitionMatrix::estimate(&traj);
        let expected = traj.max_location().map_or(0, |m| m as usize + 1);
        prop_assert_eq!(tm.loc_num(), expected);
        for src in 0..tm.loc_num() {
            let sum: f64 = tm.row(src).sum();
            prop_assert!((sum - 1.0).abs() < 1e-9, "row {} sums to {}", src, sum);
        }
    }

    #[test]
    fn probabilities_stay_in_unit_interval(rows in trajectories()) {
        let traj = TrajectoryMatrix::from_rows(&rows).unwrap();
        let tm = TransitionMatrix::estimate(&traj);
        prop_assert!(tm.as_array().iter().all(|&p| (0.0..=1.0).contains(&p)));
    }
}

#[test]
fn unknown_cells_break_transition_chains() {
    // 0 -> -1 -> 1 must not count as 0 -> 1
    let traj = TrajectoryMatrix::from_rows(&[vec![0, -1, 1], vec![1, 0, 0]]).unwrap();
    let tm = TransitionMatrix::estimate(&traj);
    assert_eq!(tm.prob(0, 1), 0.0);
    assert!((tm.prob(0, 0) - 1.0).abs() < 1e-12);
    assert!((tm.prob(1, 0) - 1.0).abs() < 1e-12);
}
