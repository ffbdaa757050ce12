use std::collections::{BTreeMap, BTreeSet};

use ndarray::{s, Array2};

use crate::error::{GenError, Result};

/// Location id as stored in trajectory cells. Negative values mean "unknown".
pub type LocationId = i64;

/// Sentinel written for timesteps with no known location.
pub const UNKNOWN_LOCATION: LocationId = -1;

/// `users x timesteps` matrix of location ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrajectoryMatrix {
    cells: Array2<LocationId>,
}

impl TrajectoryMatrix {
    pub fn new(cells: Array2<LocationId>) -> Self {
        Self { cells }
    }

    /// Every row must have the same length.
    pub fn from_rows(rows: &[Vec<LocationId>]) -> Result<Self> {
        let users = rows.len();
        let timesteps = rows.first().map_or(0, |r| r.len());
        if let Some(bad) = rows.iter().find(|r| r.len() != timesteps) {
            return Err(GenError::ShapeMismatch {
                expected: (users, timesteps),
                actual: (users, bad.len()),
            });
        }
        let flat: Vec<LocationId> = rows.iter().flatten().copied().collect();
        let cells = Array2::from_shape_vec((users, timesteps), flat).map_err(|_| {
            GenError::ShapeMismatch { expected: (users, timesteps), actual: (users, timesteps) }
        })?;
        Ok(Self { cells })
    }

    /// A matrix of the given shape with every cell unknown.
    pub fn unknown(users: usize, timesteps: usize) -> Self {
        Self { cells: Array2::from_elem((users, timesteps), UNKNOWN_LOCATION) }
    }

    pub fn users(&self) -> usize {
        self.cells.nrows()
    }

    pub fn timesteps(&self) -> usize {
        self.cells.ncols()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.cells.dim()
    }

    pub fn get(&self, user: usize, t: usize) -> LocationId {
        self.cells[[user, t]]
    }

    /// The cell as a usable index, `None` when unknown.
    pub fn known(&self, user: usize, t: usize) -> Option<usize> {
        let loc = self.cells[[user, t]];
        (loc >= 0).then_some(loc as usize)
    }

    pub fn set(&mut self, user: usize, t: usize, loc: LocationId) {
        self.cells[[user, t]] = loc;
    }

    pub fn as_array(&self) -> &Array2<LocationId> {
        &self.cells
    }

    /// Keep only the first `timesteps` columns.
    pub fn truncated(&self, timesteps: usize) -> Self {
        let end = timesteps.min(self.timesteps());
        Self { cells: self.cells.slice(s![.., ..end]).to_owned() }
    }

    /// Largest valid location id, if any cell is known.
    pub fn max_location(&self) -> Option<LocationId> {
        self.cells.iter().copied().filter(|&l| l >= 0).max()
    }

    /// Distinct valid locations, ascending.
    pub fn vocabulary(&self) -> Vec<LocationId> {
        let set: BTreeSet<LocationId> = self.cells.iter().copied().filter(|&l| l >= 0).collect();
        set.into_iter().collect()
    }

    /// Occurrence count per valid location, ascending by id.
    pub fn location_counts(&self) -> BTreeMap<LocationId, usize> {
        let mut counts = BTreeMap::new();
        for &loc in self.cells.iter().filter(|&&l| l >= 0) {
            *counts.entry(loc).or_insert(0) += 1;
        }
        counts
    }

    /// Distinct valid locations of one user over `[start, end)`, ascending.
    pub fn distinct_in(&self, user: usize, start: usize, end: usize) -> BTreeSet<LocationId> {
        self.cells
            .slice(s![user, start..end])
            .iter()
            .copied()
            .filter(|&l| l >= 0)
            .collect()
    }

    pub fn known_cells(&self) -> usize {
        self.cells.iter().filter(|&&l| l >= 0).count()
    }
}

impl From<Array2<LocationId>> for TrajectoryMatrix {
    fn from(cells: Array2<LocationId>) -> Self {
        Self::new(cells)
    }
}
