use anyhow::Context;

use crate::pipeline::GenerationSummary;

fn fmt_rate(v: Option<f64>) -> String {
    v.map_or_else(|| "n/a".to_string(), |r| format!("{:.6}", r))
}

/// Write a plain-text report of one generation run to `out_dir/fakeloc_<run_id>.txt`.
pub fn write_generation_log(
    out_dir: impl AsRef<std::path::Path>,
    run_id: &str,
    summary: &GenerationSummary,
) -> anyhow::Result<std::path::PathBuf> {
    use std::io::Write;

    std::fs::create_dir_all(out_dir.as_ref()).context("create logs dir failed")?;
    let path = out_dir.as_ref().join(format!("fakeloc_{}.txt", run_id));
    let mut f = std::fs::File::create(&path)
        .with_context(|| format!("create generation log file failed (path={:?})", path))?;

    writeln!(f, "run_id={}", run_id)?;
    writeln!(f, "strategy={}", summary.strategy.as_str())?;
    writeln!(f, "seed={}", summary.seed)?;
    writeln!(f, "users={}", summary.users)?;
    writeln!(f, "timesteps={}", summary.timesteps)?;
    writeln!(f, "locations={}", summary.locations)?;
    writeln!(f, "risk_days={}", summary.risk_days)?;
    writeln!(f, "risk_levels={}", summary.risk_levels)?;
    writeln!(f, "cache_hit={}", summary.cache_hit)?;
    writeln!(f, "band_fidelity={}", fmt_rate(summary.band_fidelity))?;
    writeln!(f, "exact_overlap={}", fmt_rate(summary.exact_overlap))?;
    writeln!(f)?;
    writeln!(f, "segment,real_ids,fake_ids")?;

    for (seg, (real, fake)) in summary.segment_counts.iter().enumerate() {
        writeln!(f, "{},{},{}", seg, real, fake)?;
    }

    Ok(path)
}
