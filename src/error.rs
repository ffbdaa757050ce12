//! Errors raised by the generation engine.
//!
//! Invariant violations (a location in two bands, a real location without a
//! hyperedge, a stale cache of the wrong shape) are surfaced, never patched
//! over. Sparse statistics are not errors: they fall back to uniform draws.

use std::path::PathBuf;

use thiserror::Error;

use crate::trajectory::LocationId;

pub type Result<T> = std::result::Result<T, GenError>;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("location {location} assigned to more than one risk band on day {day}")]
    DuplicateAssignment { day: usize, location: LocationId },

    #[error("risk band count must be >= 1")]
    ZeroRiskLevels,

    #[error("timestep {timestep} falls on day {day}, but the risk table only covers {days} day(s)")]
    DayOutOfRange { timestep: usize, day: usize, days: usize },

    #[error("location {location} is not part of the risk partition for day {day}")]
    UnknownLocation { day: usize, location: LocationId },

    #[error("empty candidate set for user {user} at timestep {timestep}")]
    EmptyCandidateSet { user: usize, timestep: usize },

    #[error("the {strategy} strategy needs a risk matrix")]
    MissingRiskMatrix { strategy: &'static str },

    #[error("trajectory matrix holds no valid location")]
    EmptyVocabulary,

    #[error("weighted draw failed: {0}")]
    Sampling(String),

    #[error("shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch { expected: (usize, usize), actual: (usize, usize) },

    #[error("{timesteps} timesteps cannot be split into {segments} equal segments")]
    UnevenSegments { timesteps: usize, segments: usize },

    #[error("block length must be >= 1")]
    ZeroBlockLength,

    #[error("steps per day must be >= 1")]
    ZeroStepsPerDay,

    #[error("no hyperedge index table for segment {segment}")]
    MissingSegmentTable { segment: usize },

    #[error(
        "real location {location} of user {user} has no hyperedge in segment {segment}, block {block}"
    )]
    MissingRealHyperedge { segment: usize, user: usize, location: LocationId, block: usize },

    #[error("failed to read cached trajectories at {path:?}: {source}")]
    CacheRead {
        path: PathBuf,
        #[source]
        source: ndarray_npy::ReadNpyError,
    },

    #[error("failed to write cached trajectories at {path:?}: {source}")]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: ndarray_npy::WriteNpyError,
    },

    #[error("cached trajectories at {path:?} have shape {cached:?}, input has {expected:?}")]
    CacheShapeMismatch { path: PathBuf, cached: (usize, usize), expected: (usize, usize) },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
