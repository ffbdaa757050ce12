use std::collections::HashMap;

use ndarray::{Array2, ArrayView1};
use tracing::debug;

use crate::error::{GenError, Result};
use crate::trajectory::LocationId;

pub const DEFAULT_RISK_LEVELS: usize = 5;

/// Locations sharing one risk quantile on one day. Band 0 is the lowest risk.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskBand {
    pub band_id: usize,
    /// Ordered by ascending risk.
    pub locations: Vec<LocationId>,
}

/// One day's partition: forward array of bands plus the inverse index.
#[derive(Debug, Clone)]
pub struct DayDomain {
    bands: Vec<RiskBand>,
    loc2band: HashMap<LocationId, usize>,
    all: Vec<LocationId>,
}

impl DayDomain {
    /// Sort by ascending risk and split into `levels` contiguous groups. The
    /// first `n % levels` groups take one extra location.
    pub fn partition(day: usize, risk: ArrayView1<'_, f64>, levels: usize) -> Result<Self> {
        if levels == 0 {
            return Err(GenError::ZeroRiskLevels);
        }
        let mut order: Vec<usize> = (0..risk.len()).collect();
        // stable: ties keep ascending location id
        order.sort_by(|&a, &b| risk[a].total_cmp(&risk[b]));

        let n = order.len();
        let base = n / levels;
        let extra = n % levels;

        let mut bands = Vec::with_capacity(levels);
        let mut start = 0;
        for band_id in 0..levels {
            let len = base + usize::from(band_id < extra);
            let locations = order[start..start + len].iter().map(|&l| l as LocationId).collect();
            bands.push(RiskBand { band_id, locations });
            start += len;
        }
        Self::from_bands(day, bands)
    }

    /// Build the inverse index, rejecting any location listed twice.
    pub fn from_bands(day: usize, bands: Vec<RiskBand>) -> Result<Self> {
        let mut loc2band = HashMap::new();
        let mut all = Vec::new();
        for band in &bands {
            for &loc in &band.locations {
                if loc2band.insert(loc, band.band_id).is_some() {
                    return Err(GenError::DuplicateAssignment { day, location: loc });
                }
                all.push(loc);
            }
        }
        Ok(Self { bands, loc2band, all })
    }

    pub fn bands(&self) -> &[RiskBand] {
        &self.bands
    }

    pub fn band_of(&self, loc: LocationId) -> Option<usize> {
        self.loc2band.get(&loc).copied()
    }

    /// Locations sharing `loc`'s band.
    pub fn band_members(&self, loc: LocationId) -> Option<&[LocationId]> {
        let band = self.band_of(loc)?;
        self.bands.get(band).map(|b| b.locations.as_slice())
    }

    /// Union of every band, in band order.
    pub fn all_locations(&self) -> &[LocationId] {
        &self.all
    }
}

/// Per-day risk partitions, computed once and read-only afterwards.
#[derive(Debug, Clone)]
pub struct RiskDomainTable {
    days: Vec<DayDomain>,
}

impl RiskDomainTable {
    /// `risk` is `locations x days`.
    pub fn build(risk: &Array2<f64>, levels: usize) -> Result<Self> {
        let mut days = Vec::with_capacity(risk.ncols());
        for (day, column) in risk.columns().into_iter().enumerate() {
            let domain = DayDomain::partition(day, column, levels)?;
            debug!(day, locations = domain.all_locations().len(), "risk bands partitioned");
            days.push(domain);
        }
        Ok(Self { days })
    }

    pub fn day(&self, day: usize) -> Option<&DayDomain> {
        self.days.get(day)
    }

    pub fn days(&self) -> usize {
        self.days.len()
    }
}
