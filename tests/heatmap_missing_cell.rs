use std::path::Path;

use winprob_report::data::{Column, Dataset, DuplicatePolicy, Observation, pivot};
use winprob_report::render::{
    CellFill, ColorScale, Figure, HeatmapLayout, HeatmapStyle, ImageFormat, render_heatmap,
};

fn grid_without_r3_l2() -> winprob_report::data::PivotGrid {
    let mut rows = Vec::new();
    for r in [1.0, 2.0, 3.0] {
        for l in [1.0, 2.0, 3.0] {
            if r == 3.0 && l == 2.0 {
                continue;
            }
            rows.push(Observation {
                r: Some(r),
                l: Some(l),
                n: None,
                win_probability: (r + l) / 10.0,
            });
        }
    }
    let ds = Dataset::from_rows("experiment_r_l.csv", &[Column::R, Column::L], rows).unwrap();
    pivot(
        &ds,
        Column::R,
        Column::L,
        Column::WinProbability,
        DuplicatePolicy::Reject,
    )
    .unwrap()
}

#[test]
fn missing_cell_is_marked_not_numbered() {
    let grid = grid_without_r3_l2();
    assert_eq!(grid.lookup(3.0, 2.0), None);

    let layout = HeatmapLayout::from_grid(&grid, ColorScale::YlOrRd).unwrap();
    let hole = layout.cell(2, 1).unwrap();
    assert!(hole.is_missing());
    assert_eq!(hole.fill, CellFill::Missing);
    assert!(hole.annotation.parse::<f64>().is_err());

    let present = layout.cell(2, 0).unwrap();
    assert_eq!(present.annotation, "0.40");
    assert!(matches!(present.fill, CellFill::Value { value, .. } if value == 0.4));
    assert_eq!(layout.missing_count(), 1);
}

#[test]
fn render_reports_every_cell_once() {
    let grid = grid_without_r3_l2();
    let style = HeatmapStyle {
        title: "Agent win probability (n fixed)".into(),
        scale: ColorScale::YlOrRd,
        x_label: Column::L.describe().into(),
        y_label: Column::R.describe().into(),
        font: "sans-serif".into(),
    };
    let figure =
        Figure::new(Path::new("unused"), "heatmap_r_l", (800, 600), ImageFormat::Png).skip_drawing();
    let out = render_heatmap(figure, &grid, &style).unwrap();
    assert_eq!(out.elements, 9);
    assert_eq!(out.missing, 1);
    assert!(!out.written);
}
