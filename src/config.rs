use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::model::guided::DEFAULT_STEPS_PER_DAY;
use crate::model::risk_domain::DEFAULT_RISK_LEVELS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Guided,
    UniformIid,
    EmpiricalIid,
    RandomWalk,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Guided => "guided",
            Strategy::UniformIid => "uniform_iid",
            Strategy::EmpiricalIid => "empirical_iid",
            Strategy::RandomWalk => "random_walk",
        }
    }

    /// Only the guided walk consults the risk matrix.
    pub fn needs_risk(&self) -> bool {
        matches!(self, Strategy::Guided)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub strategy: Strategy,
    pub steps_per_day: usize, // 48 half-hour slots
    pub risk_levels: usize,

    // Projection
    pub segments: usize,
    pub block_len: usize,

    pub seed: u64,
    // Ignore an existing cache artifact and overwrite it.
    pub force_regenerate: bool,
    // Truncate the input to its first N days.
    pub max_days: Option<usize>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Guided,
            steps_per_day: DEFAULT_STEPS_PER_DAY,
            risk_levels: DEFAULT_RISK_LEVELS,
            segments: 1,
            block_len: 1,
            seed: 0,
            force_regenerate: false,
            max_days: None,
        }
    }
}

impl GeneratorConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read generator config: {}", path.display()))?;
        let cfg: Self = serde_json::from_str(&text)
            .with_context(|| format!("Invalid generator config: {}", path.display()))?;
        cfg.check()?;
        Ok(cfg)
    }

    pub fn check(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.steps_per_day >= 1, "steps_per_day must be >= 1");
        anyhow::ensure!(self.risk_levels >= 1, "risk_levels must be >= 1");
        anyhow::ensure!(self.segments >= 1, "segments must be >= 1");
        anyhow::ensure!(self.block_len >= 1, "block_len must be >= 1");
        if let Some(d) = self.max_days {
            anyhow::ensure!(d >= 1, "max_days must be >= 1 when set");
            anyhow::ensure!(
                d.checked_mul(self.steps_per_day).is_some(),
                "max_days * steps_per_day overflows ({} * {})",
                d,
                self.steps_per_day
            );
        }
        Ok(())
    }

    /// Timestep budget implied by `max_days`. An overflowing product means no
    /// budget that any real matrix could reach, so nothing is truncated.
    pub fn max_timesteps(&self) -> Option<usize> {
        self.max_days.and_then(|d| d.checked_mul(self.steps_per_day))
    }
}
