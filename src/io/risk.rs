use anyhow::Context;
use ndarray::Array2;
use ndarray_npy::read_npy;

/// Load a `locations x days` risk matrix from CSV. Non-numeric cells (row
/// labels, a header) are skipped; every data row must carry the same number
/// of numeric cells.
pub fn load_risk_csv(path: &str) -> anyhow::Result<Array2<f64>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to open risk CSV: {}", path))?;

    let mut rows: Vec<Vec<f64>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let row_vals: Vec<f64> = record.iter().filter_map(|f| f.trim().parse::<f64>().ok()).collect();
        if !row_vals.is_empty() {
            rows.push(row_vals);
        }
    }
    let n_loc = rows.len();
    anyhow::ensure!(n_loc > 0, "risk matrix empty or unparsable");
    let n_days = rows[0].len();
    anyhow::ensure!(rows.iter().all(|r| r.len() == n_days), "risk matrix rows must have equal length");

    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((n_loc, n_days), flat).context("risk matrix shape")
}

/// Load a `locations x days` float64 risk matrix from `.npy`.
pub fn load_risk_npy(path: &str) -> anyhow::Result<Array2<f64>> {
    read_npy(path).with_context(|| format!("Failed to read risk NPY: {}", path))
}

/// Dispatch on file extension.
pub fn load_risk(path: &str) -> anyhow::Result<Array2<f64>> {
    if path.ends_with(".npy") { load_risk_npy(path) } else { load_risk_csv(path) }
}
