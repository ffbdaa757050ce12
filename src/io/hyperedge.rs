use anyhow::Context;
use serde::Deserialize;

use crate::projection::HyperedgeIndexTable;

#[derive(Debug, Deserialize)]
struct IndexRow {
    segment: usize,
    location: i64,
    block: usize,
    hyperedge_id: i64,
}

/// Load a hyperedge index table from CSV with columns
/// `segment,location,block,hyperedge_id`. `segments` pre-sizes the table so
/// segments without rows still exist (and simply map nothing).
pub fn load_hyperedge_csv(path: &str, segments: usize) -> anyhow::Result<HyperedgeIndexTable> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open hyperedge CSV: {}", path))?;
    let mut table = HyperedgeIndexTable::with_segments(segments);
    for (line, result) in rdr.deserialize::<IndexRow>().enumerate() {
        let row = result.with_context(|| format!("Bad hyperedge row {} in {}", line + 1, path))?;
        let previous = table.insert(row.segment, row.location, row.block, row.hyperedge_id);
        anyhow::ensure!(
            previous.is_none(),
            "duplicate hyperedge key (segment={}, location={}, block={}) in {}",
            row.segment,
            row.location,
            row.block,
            path
        );
    }
    Ok(table)
}
