use winprob_report::ReportError;
use winprob_report::data::{Column, Dataset, Observation, report_optimum};

fn rl(r: f64, l: f64, p: f64) -> Observation {
    Observation {
        r: Some(r),
        l: Some(l),
        n: None,
        win_probability: p,
    }
}

#[test]
fn first_maximum_wins() {
    let ds = Dataset::from_rows(
        "experiment_r_l.csv",
        &[Column::R, Column::L],
        vec![rl(1.0, 1.0, 0.2), rl(2.0, 3.0, 0.9), rl(5.0, 1.0, 0.9)],
    )
    .unwrap();
    let best = report_optimum(&ds, Column::WinProbability).unwrap();
    assert_eq!(best.index, 1);
    assert_eq!(best.row, rl(2.0, 3.0, 0.9));
    assert_eq!(best.params(), vec![(Column::R, 2.0), (Column::L, 3.0)]);
    assert_eq!(
        best.to_string(),
        "  Maximum win probability: 0.900\n  At r=2, l=3"
    );
}

#[test]
fn empty_dataset_has_no_optimum() {
    let ds = Dataset::from_rows("empty.csv", &[Column::R, Column::L], Vec::new()).unwrap();
    match report_optimum(&ds, Column::WinProbability) {
        Err(ReportError::EmptyDataset { dataset }) => assert_eq!(dataset, "empty.csv"),
        other => panic!("expected EmptyDataset, got {other:?}"),
    }
}
