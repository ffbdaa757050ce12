use crate::error::{GenError, Result};
use crate::model::risk_domain::RiskDomainTable;
use crate::trajectory::TrajectoryMatrix;

/// Share of known real cells whose fake counterpart sits in the same risk band
/// on that day. Cells whose day or location is outside the table are skipped.
/// `None` when nothing was comparable.
pub fn band_fidelity(
    real: &TrajectoryMatrix,
    fake: &TrajectoryMatrix,
    domains: &RiskDomainTable,
    steps_per_day: usize,
) -> Result<Option<f64>> {
    if steps_per_day == 0 {
        return Err(GenError::ZeroStepsPerDay);
    }
    let mut compared = 0usize;
    let mut agree = 0usize;
    for u in 0..real.users().min(fake.users()) {
        for t in 0..real.timesteps().min(fake.timesteps()) {
            let Some(loc) = real.known(u, t) else { continue };
            let Some(day) = domains.day(t / steps_per_day) else { continue };
            let Some(real_band) = day.band_of(loc as i64) else { continue };
            compared += 1;
            if day.band_of(fake.get(u, t)) == Some(real_band) {
                agree += 1;
            }
        }
    }
    Ok((compared > 0).then(|| agree as f64 / compared as f64))
}

/// Share of known real cells the fake reproduces exactly.
pub fn exact_overlap_rate(real: &TrajectoryMatrix, fake: &TrajectoryMatrix) -> Option<f64> {
    let mut known = 0usize;
    let mut same = 0usize;
    for u in 0..real.users().min(fake.users()) {
        for t in 0..real.timesteps().min(fake.timesteps()) {
            let loc = real.get(u, t);
            if loc < 0 {
                continue;
            }
            known += 1;
            if fake.get(u, t) == loc {
                same += 1;
            }
        }
    }
    (known > 0).then(|| same as f64 / known as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn fidelity_counts_band_agreement() {
        let risk = array![[0.1], [0.2], [0.8], [0.9]];
        let domains = RiskDomainTable::build(&risk, 2).unwrap();
        let real = TrajectoryMatrix::from_rows(&[vec![0, 2, -1, 3]]).unwrap();
        let fake = TrajectoryMatrix::from_rows(&[vec![1, 0, 2, 2]]).unwrap();
        // 0~1 agree, 2 vs 0 disagree, 3~2 agree
        let f = band_fidelity(&real, &fake, &domains, 48).unwrap().unwrap();
        assert!((f - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(exact_overlap_rate(&real, &fake), Some(0.0));
    }

    #[test]
    fn nothing_known_gives_none() {
        let risk = array![[0.1], [0.2]];
        let domains = RiskDomainTable::build(&risk, 2).unwrap();
        let real = TrajectoryMatrix::unknown(1, 3);
        let fake = TrajectoryMatrix::unknown(1, 3);
        assert_eq!(band_fidelity(&real, &fake, &domains, 48).unwrap(), None);
        assert_eq!(exact_overlap_rate(&real, &fake), None);
    }

    #[test]
    fn zero_steps_per_day_is_an_error() {
        let risk = array![[0.1], [0.2]];
        let domains = RiskDomainTable::build(&risk, 2).unwrap();
        let real = TrajectoryMatrix::from_rows(&[vec![0, 1]]).unwrap();
        let err = band_fidelity(&real, &real, &domains, 0).unwrap_err();
        assert!(matches!(err, GenError::ZeroStepsPerDay));
    }
}
