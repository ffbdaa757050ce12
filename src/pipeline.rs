//! End-to-end flow: fit, generate (or reuse the cache), project.

use ndarray::Array2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::info;

use crate::config::{GeneratorConfig, Strategy};
use crate::error::{GenError, Result};
use crate::io::cache::{Artifact, ArtifactCache, CacheKey};
use crate::math::transition::TransitionMatrix;
use crate::metrics::{band_fidelity, exact_overlap_rate};
use crate::model::baseline::{EmpiricalIid, RandomWalk, UniformIid};
use crate::model::guided::GuidedSampler;
use crate::model::risk_domain::RiskDomainTable;
use crate::model::TrajectorySampler;
use crate::projection::{project, HyperedgeIndexTable, HyperedgeSequences};
use crate::trajectory::TrajectoryMatrix;

/// Run the configured strategy on `real` without touching any cache.
/// `domains` is the partitioned risk matrix; only the guided walk reads it.
pub fn sample_fake<R: Rng + ?Sized>(
    real: &TrajectoryMatrix,
    domains: Option<&RiskDomainTable>,
    cfg: &GeneratorConfig,
    rng: &mut R,
) -> Result<TrajectoryMatrix> {
    match cfg.strategy {
        Strategy::Guided => {
            let domains =
                domains.ok_or_else(|| GenError::MissingRiskMatrix { strategy: cfg.strategy.as_str() })?;
            let transitions = TransitionMatrix::estimate(real);
            GuidedSampler::new(transitions, domains.clone(), cfg.steps_per_day)?.sample(real, rng)
        }
        Strategy::UniformIid => UniformIid.sample(real, rng),
        Strategy::EmpiricalIid => EmpiricalIid.sample(real, rng),
        Strategy::RandomWalk => RandomWalk::fit(real).sample(real, rng),
    }
}

/// Cached variant of [`sample_fake`]: an existing artifact under `key` is
/// returned unchanged unless `cfg.force_regenerate` is set.
pub fn generate_fake<R: Rng + ?Sized>(
    real: &TrajectoryMatrix,
    domains: Option<&RiskDomainTable>,
    cfg: &GeneratorConfig,
    key: &CacheKey,
    rng: &mut R,
) -> Result<Artifact> {
    ArtifactCache.get_or_generate(key, cfg.force_regenerate, real.shape(), || {
        info!(
            strategy = cfg.strategy.as_str(),
            users = real.users(),
            timesteps = real.timesteps(),
            "generating fake trajectories"
        );
        sample_fake(real, domains, cfg, rng)
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationSummary {
    pub strategy: Strategy,
    pub seed: u64,
    pub users: usize,
    pub timesteps: usize,
    pub locations: usize,
    pub risk_days: usize,
    pub risk_levels: usize,
    pub cache_hit: bool,
    pub band_fidelity: Option<f64>,
    pub exact_overlap: Option<f64>,
    /// `(real, fake)` id counts per segment.
    pub segment_counts: Vec<(usize, usize)>,
}

#[derive(Debug, Clone)]
pub struct GenerationOutput {
    pub fake: TrajectoryMatrix,
    pub sequences: HyperedgeSequences,
    pub summary: GenerationSummary,
}

/// Fit, generate or load the fake matrix, then project both matrices onto
/// hyperedge ids. The generator is seeded from `cfg.seed`.
pub fn plausible_hyperedges(
    real: &TrajectoryMatrix,
    risk: Option<&Array2<f64>>,
    table: &HyperedgeIndexTable,
    cfg: &GeneratorConfig,
    key: &CacheKey,
) -> Result<GenerationOutput> {
    let truncated;
    let real = match cfg.max_timesteps() {
        Some(limit) if limit < real.timesteps() => {
            truncated = real.truncated(limit);
            &truncated
        }
        _ => real,
    };

    // Partitioned once; the guided walk and the fidelity check share it.
    let domains = risk.map(|r| RiskDomainTable::build(r, cfg.risk_levels)).transpose()?;

    let mut rng = ChaCha8Rng::seed_from_u64(cfg.seed);
    let artifact = generate_fake(real, domains.as_ref(), cfg, key, &mut rng)?;
    let sequences = project(real, &artifact.trajectories, cfg.segments, cfg.block_len, table)?;

    let fidelity = match &domains {
        Some(d) => band_fidelity(real, &artifact.trajectories, d, cfg.steps_per_day)?,
        None => None,
    };

    let summary = GenerationSummary {
        strategy: cfg.strategy,
        seed: cfg.seed,
        users: real.users(),
        timesteps: real.timesteps(),
        locations: real.vocabulary().len(),
        risk_days: domains.as_ref().map_or(0, |d| d.days()),
        risk_levels: cfg.risk_levels,
        cache_hit: artifact.outcome.is_hit(),
        band_fidelity: fidelity,
        exact_overlap: exact_overlap_rate(real, &artifact.trajectories),
        segment_counts: sequences.counts(),
    };
    info!(cache_hit = summary.cache_hit, fidelity = ?summary.band_fidelity, "generation finished");

    Ok(GenerationOutput { fake: artifact.trajectories, sequences, summary })
}
