use fakeloc::projection::{project, HyperedgeIndexTable};
use fakeloc::{GenError, TrajectoryMatrix};

fn table_without_2_0() -> HyperedgeIndexTable {
    let mut table = HyperedgeIndexTable::with_segments(1);
    table.insert(0, 0, 0, 10);
    table.insert(0, 1, 0, 11);
    table.insert(0, 0, 1, 20);
    table.insert(0, 1, 1, 21);
    table.insert(0, 2, 1, 22);
    table
}

#[test]
fn fake_location_without_hyperedge_is_dropped() {
    let real = TrajectoryMatrix::from_rows(&[vec![0, 1, 1, 0]]).unwrap();
    let fake = TrajectoryMatrix::from_rows(&[vec![2, 1, 2, 2]]).unwrap();
    let seqs = project(&real, &fake, 1, 2, &table_without_2_0()).unwrap();

    // block 0: {1, 2} -> 2 has no id there; block 1: {2}
    assert_eq!(seqs.fake[0][&0], vec![11, 22]);
    // fully covered blocks yield one id per distinct location
    assert_eq!(seqs.real[0][&0], vec![10, 11, 20, 21]);
    assert_eq!(seqs.counts(), vec![(4, 2)]);
}

#[test]
fn real_location_without_hyperedge_is_fatal() {
    let real = TrajectoryMatrix::from_rows(&[vec![2, 1, 0, 0]]).unwrap();
    let fake = TrajectoryMatrix::from_rows(&[vec![0, 1, 0, 0]]).unwrap();
    let err = project(&real, &fake, 1, 2, &table_without_2_0()).unwrap_err();
    match err {
        GenError::MissingRealHyperedge { segment, user, location, block } => {
            assert_eq!((segment, user, location, block), (0, 0, 2, 0));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unknown_cells_contribute_nothing() {
    let real = TrajectoryMatrix::from_rows(&[vec![-1, -1, 0, -1], vec![1, 1, 1, 1]]).unwrap();
    let fake = TrajectoryMatrix::from_rows(&[vec![-1, 0, -1, -1], vec![0, 1, 0, 1]]).unwrap();
    let seqs = project(&real, &fake, 1, 2, &table_without_2_0()).unwrap();
    assert_eq!(seqs.real[0][&0], vec![20]);
    assert_eq!(seqs.fake[0][&0], vec![10]);
    assert_eq!(seqs.real[0][&1], vec![11, 21]);
    assert_eq!(seqs.fake[0][&1], vec![10, 11, 20, 21]);
}

#[test]
fn block_index_restarts_in_every_segment() {
    let mut table = HyperedgeIndexTable::with_segments(2);
    table.insert(0, 5, 0, 100);
    table.insert(1, 5, 0, 200);
    let real = TrajectoryMatrix::from_rows(&[vec![5, 5]]).unwrap();
    let seqs = project(&real, &real, 2, 1, &table).unwrap();
    assert_eq!(seqs.real[0][&0], vec![100]);
    assert_eq!(seqs.real[1][&0], vec![200]);
    assert_eq!(seqs.real, seqs.fake);
}

#[test]
fn missing_segment_and_shape_errors() {
    let real = TrajectoryMatrix::from_rows(&[vec![0, 0]]).unwrap();
    let mut table = HyperedgeIndexTable::with_segments(1);
    table.insert(0, 0, 0, 1);
    assert!(matches!(
        project(&real, &real, 2, 1, &table),
        Err(GenError::MissingSegmentTable { segment: 1 })
    ));

    let other = TrajectoryMatrix::from_rows(&[vec![0, 0, 0]]).unwrap();
    assert!(matches!(project(&real, &other, 1, 1, &table), Err(GenError::ShapeMismatch { .. })));
}
