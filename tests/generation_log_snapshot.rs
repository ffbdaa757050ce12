use fakeloc::io::cache::CacheKey;
use fakeloc::io::run_log::write_generation_log;
use fakeloc::io::synth::{synthetic_risk, synthetic_trajectories};
use fakeloc::metrics::band_fidelity;
use fakeloc::model::guided::GuidedSampler;
use fakeloc::pipeline::plausible_hyperedges;
use fakeloc::projection::HyperedgeIndexTable;
use fakeloc::{GeneratorConfig, RiskDomainTable, TrajectoryMatrix, TrajectorySampler};
use ndarray::array;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn generation_log_snapshot_toy() {
    // one location per band and no unknown cells: the guided walk is pinned
    let real = TrajectoryMatrix::from_rows(&[vec![0, 1, 0, 1], vec![1, 1, 0, 0]]).unwrap();
    let risk = array![[0.1], [0.9]];
    let mut table = HyperedgeIndexTable::with_segments(2);
    let mut next_id = 0;
    for seg in 0..2 {
        for loc in 0..2 {
            table.insert(seg, loc, 0, next_id);
            next_id += 1;
        }
    }

    let cfg = GeneratorConfig {
        seed: 7,
        risk_levels: 2,
        segments: 2,
        block_len: 2,
        ..Default::default()
    };

    let tmp = tempfile::tempdir().expect("tempdir");
    let key = CacheKey::new(tmp.path().join("fake_traj_7.npy"));
    let out = plausible_hyperedges(&real, Some(&risk), &table, &cfg, &key).expect("generation");
    assert_eq!(out.fake, real);

    let path = write_generation_log(tmp.path().join("logs"), "TOY", &out.summary).expect("write log");
    let s = std::fs::read_to_string(path).expect("read log");
    insta::assert_snapshot!(s, @r###"
run_id=TOY
strategy=guided
seed=7
users=2
timesteps=4
locations=2
risk_days=1
risk_levels=2
cache_hit=false
band_fidelity=1.000000
exact_overlap=1.000000

segment,real_ids,fake_ids
0,3,3
1,3,3
"###);

    let again = plausible_hyperedges(&real, Some(&risk), &table, &cfg, &key).expect("cached generation");
    assert!(again.summary.cache_hit);
    assert_eq!(again.sequences, out.sequences);
}

#[test]
fn max_days_truncates_before_generation() {
    let real = TrajectoryMatrix::from_rows(&[vec![0; 6], vec![1; 6]]).unwrap();
    let risk = array![[0.1, 0.1, 0.1], [0.9, 0.9, 0.9]];
    let mut table = HyperedgeIndexTable::with_segments(1);
    for block in 0..4 {
        table.insert(0, 0, block, block as i64);
        table.insert(0, 1, block, 10 + block as i64);
    }
    let cfg = GeneratorConfig {
        steps_per_day: 2,
        risk_levels: 2,
        max_days: Some(2),
        ..Default::default()
    };

    let tmp = tempfile::tempdir().expect("tempdir");
    let key = CacheKey::new(tmp.path().join("fake.npy"));
    let out = plausible_hyperedges(&real, Some(&risk), &table, &cfg, &key).expect("generation");
    assert_eq!(out.fake.shape(), (2, 4));
    assert_eq!(out.sequences.real[0][&0], vec![0, 1, 2, 3]);
    assert_eq!(out.sequences.real[0][&1], vec![10, 11, 12, 13]);
}

#[test]
fn pipeline_guided_run_matches_a_directly_fitted_sampler() {
    let steps_per_day = 4;
    let mut data_rng = ChaCha8Rng::seed_from_u64(5);
    let real = synthetic_trajectories(3, steps_per_day * 2, 6, 0.2, &mut data_rng);
    let risk = synthetic_risk(6, 2);
    let mut table = HyperedgeIndexTable::with_segments(1);
    for loc in 0..6 {
        for block in 0..(steps_per_day * 2) {
            table.insert(0, loc, block, loc * 100 + block as i64);
        }
    }
    let cfg = GeneratorConfig { steps_per_day, risk_levels: 3, seed: 11, ..Default::default() };

    let tmp = tempfile::tempdir().expect("tempdir");
    let key = CacheKey::new(tmp.path().join("fake.npy"));
    let out = plausible_hyperedges(&real, Some(&risk), &table, &cfg, &key).expect("generation");

    let sampler = GuidedSampler::fit(&real, &risk, 3, steps_per_day).unwrap();
    let direct = sampler.sample(&real, &mut ChaCha8Rng::seed_from_u64(11)).unwrap();
    assert_eq!(out.fake, direct);

    let domains = RiskDomainTable::build(&risk, 3).unwrap();
    assert_eq!(out.summary.risk_days, 2);
    assert_eq!(
        out.summary.band_fidelity,
        band_fidelity(&real, &out.fake, &domains, steps_per_day).unwrap()
    );
}
