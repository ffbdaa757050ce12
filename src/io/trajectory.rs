use anyhow::Context;
use ndarray::Array2;
use ndarray_npy::read_npy;

use crate::trajectory::{LocationId, TrajectoryMatrix};

/// Load a `users x timesteps` int64 trajectory matrix from `.npy`.
pub fn load_trajectory_npy(path: &str) -> anyhow::Result<TrajectoryMatrix> {
    let cells: Array2<LocationId> = read_npy(path)
        .with_context(|| format!("Failed to read trajectory NPY: {}", path))?;
    anyhow::ensure!(cells.nrows() > 0 && cells.ncols() > 0, "trajectory matrix is empty: {}", path);
    Ok(TrajectoryMatrix::new(cells))
}
