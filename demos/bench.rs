use std::time::Instant;

use fakeloc::io::synth::{synthetic_risk, synthetic_trajectories};
use fakeloc::model::baseline::{EmpiricalIid, RandomWalk, UniformIid};
use fakeloc::projection::{project, HyperedgeIndexTable};
use fakeloc::{GuidedSampler, RiskDomainTable, TrajectorySampler, TransitionMatrix};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

fn main() -> anyhow::Result<()> {
    // Larger toy: 200 users over two weeks of half-hour slots
    let users = 200;
    let days = 14;
    let steps_per_day = 48;
    let n_loc = 400;
    let timesteps = days * steps_per_day;

    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let real = synthetic_trajectories(users, timesteps, n_loc, 0.2, &mut rng);
    let risk = synthetic_risk(n_loc, days);

    let t = Instant::now();
    let transitions = TransitionMatrix::estimate(&real);
    let estimate_ms = ms(t);

    let t = Instant::now();
    let domains = RiskDomainTable::build(&risk, 5)?;
    let partition_ms = ms(t);

    let guided = GuidedSampler::new(transitions, domains, steps_per_day)?;
    let t = Instant::now();
    let fake = guided.sample(&real, &mut rng)?;
    let guided_ms = ms(t);

    let t = Instant::now();
    let _ = UniformIid.sample(&real, &mut rng)?;
    let uniform_ms = ms(t);

    let t = Instant::now();
    let _ = EmpiricalIid.sample(&real, &mut rng)?;
    let empirical_ms = ms(t);

    let walker = RandomWalk::fit(&real);
    let t = Instant::now();
    let _ = walker.sample(&real, &mut rng)?;
    let walk_ms = ms(t);

    // every (location, block) pair gets an id so real lookups never fail
    let segments = days;
    let block_len = 4;
    let blocks = steps_per_day / block_len;
    let mut table = HyperedgeIndexTable::with_segments(segments);
    let mut next_id = 0;
    for seg in 0..segments {
        for loc in 0..n_loc as i64 {
            for block in 0..blocks {
                table.insert(seg, loc, block, next_id);
                next_id += 1;
            }
        }
    }
    let t = Instant::now();
    let seqs = project(&real, &fake, segments, block_len, &table)?;
    let project_ms = ms(t);
    let _ = seqs.counts();

    println!("estimate_ms,partition_ms,guided_ms,uniform_ms,empirical_ms,walk_ms,project_ms");
    println!(
        "{:.3},{:.3},{:.3},{:.3},{:.3},{:.3},{:.3}",
        estimate_ms, partition_ms, guided_ms, uniform_ms, empirical_ms, walk_ms, project_ms
    );

    Ok(())
}
