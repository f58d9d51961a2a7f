use winprob_report::data::{Column, Dataset, Observation, group_series};

fn rn(r: f64, n: f64, p: f64) -> Observation {
    Observation {
        r: Some(r),
        l: None,
        n: Some(n),
        win_probability: p,
    }
}

#[test]
fn one_series_per_group_sorted_by_n() {
    let ds = Dataset::from_rows(
        "experiment_r_n.csv",
        &[Column::R, Column::N],
        vec![rn(1.0, 1.0, 0.1), rn(1.0, 2.0, 0.3), rn(2.0, 1.0, 0.5)],
    )
    .unwrap();
    let series = group_series(&ds, Column::R, Column::N, Column::WinProbability).unwrap();
    assert_eq!(series.len(), 2);
    for s in &series {
        assert!(s.points.windows(2).all(|w| w[0].0 <= w[1].0));
    }
    assert_eq!(series[0].label(), "r=1");
    assert_eq!(series[0].points, vec![(1.0, 0.1), (2.0, 0.3)]);
    assert_eq!(series[1].points, vec![(1.0, 0.5)]);
}

#[test]
fn grouping_needs_every_column() {
    let ds = Dataset::from_rows("no_n.csv", &[Column::R], vec![]).unwrap();
    let err = group_series(&ds, Column::R, Column::N, Column::WinProbability).unwrap_err();
    assert_eq!(err.kind(), winprob_report::ErrorKind::Schema);
}
