//! On-disk cache for generated fake trajectories.
//!
//! Generation is stochastic, so a cached artifact freezes one realization.
//! An existing file is returned as-is unless the caller forces regeneration.
//! Files are plain 2-D int64 `.npy` arrays with no checksum or version; a
//! write interrupted midway leaves an invalid file that loading rejects.

use std::path::{Path, PathBuf};

use ndarray::Array2;
use ndarray_npy::{read_npy, write_npy};
use tracing::{info, warn};

use crate::error::{GenError, Result};
use crate::trajectory::{LocationId, TrajectoryMatrix};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(PathBuf);

impl CacheKey {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    /// Loaded from disk, nothing generated.
    Hit,
    /// No artifact existed.
    Generated,
    /// An artifact existed but regeneration was forced.
    Regenerated,
}

impl CacheOutcome {
    pub fn is_hit(self) -> bool {
        self == CacheOutcome::Hit
    }
}

#[derive(Debug, Clone)]
pub struct Artifact {
    pub trajectories: TrajectoryMatrix,
    pub outcome: CacheOutcome,
}

/// `CacheKey -> Artifact` store backed by the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArtifactCache;

impl ArtifactCache {
    pub fn contains(&self, key: &CacheKey) -> bool {
        key.path().is_file()
    }

    pub fn load(&self, key: &CacheKey) -> Result<TrajectoryMatrix> {
        let cells: Array2<LocationId> = read_npy(key.path())
            .map_err(|source| GenError::CacheRead { path: key.path().to_path_buf(), source })?;
        Ok(TrajectoryMatrix::new(cells))
    }

    pub fn store(&self, key: &CacheKey, traj: &TrajectoryMatrix) -> Result<()> {
        if let Some(parent) = key.path().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        write_npy(key.path(), traj.as_array())
            .map_err(|source| GenError::CacheWrite { path: key.path().to_path_buf(), source })
    }

    /// Return the cached matrix for `key`, or run `generate` and persist its result.
    ///
    /// A cached matrix must have `expected_shape`; a mismatch means the cache
    /// belongs to other input and is reported rather than replaced.
    pub fn get_or_generate<F>(
        &self,
        key: &CacheKey,
        force_regenerate: bool,
        expected_shape: (usize, usize),
        generate: F,
    ) -> Result<Artifact>
    where
        F: FnOnce() -> Result<TrajectoryMatrix>,
    {
        let present = self.contains(key);
        if present && !force_regenerate {
            let trajectories = self.load(key)?;
            if trajectories.shape() != expected_shape {
                return Err(GenError::CacheShapeMismatch {
                    path: key.path().to_path_buf(),
                    cached: trajectories.shape(),
                    expected: expected_shape,
                });
            }
            info!(path = %key.path().display(), "loaded cached fake trajectories");
            return Ok(Artifact { trajectories, outcome: CacheOutcome::Hit });
        }
        if present {
            warn!(path = %key.path().display(), "forced regeneration; overwriting cached trajectories");
        }

        let trajectories = generate()?;
        self.store(key, &trajectories)?;
        info!(path = %key.path().display(), "stored fake trajectories");
        let outcome = if present { CacheOutcome::Regenerated } else { CacheOutcome::Generated };
        Ok(Artifact { trajectories, outcome })
    }
}
