//! Projection of trajectories onto spatio-temporal hyperedge ids.
//!
//! The time axis is cut into `S` equal segments and each segment into blocks
//! of `L` timesteps. Within a block a user contributes one id per distinct
//! location, looked up by `(location, block index within the segment)`.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info};

use crate::error::{GenError, Result};
use crate::trajectory::{LocationId, TrajectoryMatrix};

pub type HyperedgeId = i64;

/// Externally built `(location, block) -> hyperedge id` lookup, one map per segment.
#[derive(Debug, Clone, Default)]
pub struct HyperedgeIndexTable {
    segments: Vec<HashMap<(LocationId, usize), HyperedgeId>>,
}

impl HyperedgeIndexTable {
    pub fn with_segments(count: usize) -> Self {
        Self { segments: vec![HashMap::new(); count] }
    }

    /// Grows the segment list as needed. Returns the id previously stored, if any.
    pub fn insert(
        &mut self,
        segment: usize,
        location: LocationId,
        block: usize,
        id: HyperedgeId,
    ) -> Option<HyperedgeId> {
        if self.segments.len() <= segment {
            self.segments.resize_with(segment + 1, HashMap::new);
        }
        self.segments[segment].insert((location, block), id)
    }

    pub fn segment(&self, segment: usize) -> Option<&HashMap<(LocationId, usize), HyperedgeId>> {
        self.segments.get(segment)
    }

    pub fn get(&self, segment: usize, location: LocationId, block: usize) -> Option<HyperedgeId> {
        self.segments.get(segment)?.get(&(location, block)).copied()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }
}

/// Per segment, user id -> ordered hyperedge ids.
pub type SegmentIds = BTreeMap<usize, Vec<HyperedgeId>>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HyperedgeSequences {
    pub real: Vec<SegmentIds>,
    pub fake: Vec<SegmentIds>,
}

impl HyperedgeSequences {
    /// Total ids per segment as `(real, fake)`.
    pub fn counts(&self) -> Vec<(usize, usize)> {
        self.real
            .iter()
            .zip(&self.fake)
            .map(|(r, f)| {
                (r.values().map(Vec::len).sum(), f.values().map(Vec::len).sum())
            })
            .collect()
    }
}

/// Segment and block geometry for one projection pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segmentation {
    pub segments: usize,
    pub segment_len: usize,
    pub block_len: usize,
    pub blocks_per_segment: usize,
}

impl Segmentation {
    pub fn new(timesteps: usize, segments: usize, block_len: usize) -> Result<Self> {
        if segments == 0 || timesteps % segments != 0 {
            return Err(GenError::UnevenSegments { timesteps, segments });
        }
        if block_len == 0 {
            return Err(GenError::ZeroBlockLength);
        }
        let segment_len = timesteps / segments;
        Ok(Self { segments, segment_len, block_len, blocks_per_segment: segment_len / block_len })
    }

    /// Absolute `[start, end)` timesteps of a block.
    pub fn block_span(&self, segment: usize, block: usize) -> (usize, usize) {
        let start = segment * self.segment_len + block * self.block_len;
        (start, start + self.block_len)
    }
}

/// Map real and fake trajectories to hyperedge ids.
///
/// Fake locations without a hyperedge are dropped. A real location without
/// one means the index table is inconsistent with the data and is an error.
pub fn project(
    real: &TrajectoryMatrix,
    fake: &TrajectoryMatrix,
    segments: usize,
    block_len: usize,
    table: &HyperedgeIndexTable,
) -> Result<HyperedgeSequences> {
    if real.shape() != fake.shape() {
        return Err(GenError::ShapeMismatch { expected: real.shape(), actual: fake.shape() });
    }
    let geom = Segmentation::new(real.timesteps(), segments, block_len)?;

    let mut out = HyperedgeSequences::default();
    for seg in 0..geom.segments {
        let index = table.segment(seg).ok_or_else(|| GenError::MissingSegmentTable { segment: seg })?;
        let mut real_ids = SegmentIds::new();
        let mut fake_ids = SegmentIds::new();
        let mut dropped = 0usize;

        for u in 0..real.users() {
            let r_ids = real_ids.entry(u).or_insert_with(Vec::new);
            let f_ids = fake_ids.entry(u).or_insert_with(Vec::new);
            for block in 0..geom.blocks_per_segment {
                let (start, end) = geom.block_span(seg, block);
                for loc in fake.distinct_in(u, start, end) {
                    match index.get(&(loc, block)) {
                        Some(&id) => f_ids.push(id),
                        None => dropped += 1,
                    }
                }
                for loc in real.distinct_in(u, start, end) {
                    let id = index.get(&(loc, block)).copied().ok_or_else(|| {
                        GenError::MissingRealHyperedge { segment: seg, user: u, location: loc, block }
                    })?;
                    r_ids.push(id);
                }
            }
        }
        debug!(segment = seg, dropped_fake = dropped, "segment projected");
        out.real.push(real_ids);
        out.fake.push(fake_ids);
    }
    info!(
        segments = geom.segments,
        blocks_per_segment = geom.blocks_per_segment,
        users = real.users(),
        "hyperedge projection complete"
    );
    Ok(out)
}
