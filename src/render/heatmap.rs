use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::info;

use super::color::{ColorScale, luminance};
use super::{Figure, FigureKind, Painter, RenderedFigure, draw_colorbar, key_label};
use crate::data::PivotGrid;
use crate::error::ReportError;

const MISSING_FILL: RGBColor = RGBColor(0xd9, 0xd9, 0xd9);
const MISSING_TEXT: &str = "n/a";

#[derive(Debug, Clone)]
pub struct HeatmapStyle {
    pub title: String,
    pub scale: ColorScale,
    pub x_label: String,
    pub y_label: String,
    pub font: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellFill {
    Value { value: f64, color: RGBColor },
    Missing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapCell {
    pub row: usize,
    pub col: usize,
    pub fill: CellFill,
    pub annotation: String,
}

impl HeatmapCell {
    pub fn is_missing(&self) -> bool {
        matches!(self.fill, CellFill::Missing)
    }
}

/// Cell colours and annotations for a grid, one entry per grid position.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapLayout {
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    pub cells: Vec<HeatmapCell>,
    pub range: Option<(f64, f64)>,
    pub scale: ColorScale,
}

impl HeatmapLayout {
    pub fn from_grid(grid: &PivotGrid, scale: ColorScale) -> Result<Self, ReportError> {
        if grid.n_rows() == 0 || grid.n_cols() == 0 {
            return Err(ReportError::render(
                format!("heatmap of {} by {}", grid.row_column(), grid.col_column()),
                "grid has no rows or columns",
            ));
        }
        let range = grid.value_range();
        let (lo, hi) = range.unwrap_or((0.0, 1.0));

        let mut cells = Vec::with_capacity(grid.n_rows() * grid.n_cols());
        for row in 0..grid.n_rows() {
            for col in 0..grid.n_cols() {
                let cell = match grid.get(row, col) {
                    Some(value) if value.is_finite() => HeatmapCell {
                        row,
                        col,
                        fill: CellFill::Value {
                            value,
                            color: scale.map(value, lo, hi),
                        },
                        annotation: format!("{value:.2}"),
                    },
                    _ => HeatmapCell {
                        row,
                        col,
                        fill: CellFill::Missing,
                        annotation: MISSING_TEXT.to_string(),
                    },
                };
                cells.push(cell);
            }
        }

        Ok(Self {
            row_labels: grid.row_keys().iter().map(|&k| key_label(k)).collect(),
            col_labels: grid.col_keys().iter().map(|&k| key_label(k)).collect(),
            cells,
            range,
            scale,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.row_labels.len()
    }

    pub fn n_cols(&self) -> usize {
        self.col_labels.len()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&HeatmapCell> {
        self.cells.iter().find(|c| c.row == row && c.col == col)
    }

    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_missing()).count()
    }

    /// Chart y coordinate of a grid row; the first row is drawn on top.
    fn y_of(&self, row: usize) -> f64 {
        (self.n_rows() - 1 - row) as f64
    }
}

struct HeatmapPainter<'a> {
    layout: &'a HeatmapLayout,
    style: &'a HeatmapStyle,
}

impl Painter for HeatmapPainter<'_> {
    fn paint<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        let layout = self.layout;
        let font = self.style.font.as_str();
        root.fill(&WHITE)?;

        let (width, _) = root.dim_in_pixel();
        let (main, bar) = root.split_horizontally(width.saturating_sub(120));

        let n_rows = layout.n_rows();
        let n_cols = layout.n_cols();
        let mut chart = ChartBuilder::on(&main)
            .caption(&self.style.title, (font, 22))
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(
                -0.5f64..(n_cols as f64 - 0.5),
                -0.5f64..(n_rows as f64 - 0.5),
            )?;

        let rows_bottom_up: Vec<String> = layout.row_labels.iter().rev().cloned().collect();
        let col_label = |v: &f64| axis_tick(&layout.col_labels, *v);
        let row_label = |v: &f64| axis_tick(&rows_bottom_up, *v);
        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(n_cols)
            .y_labels(n_rows)
            .x_label_formatter(&col_label)
            .y_label_formatter(&row_label)
            .x_desc(self.style.x_label.as_str())
            .y_desc(self.style.y_label.as_str())
            .label_style((font, 14))
            .draw()?;

        chart.draw_series(layout.cells.iter().map(|cell| {
            let x = cell.col as f64;
            let y = layout.y_of(cell.row);
            let fill = match cell.fill {
                CellFill::Value { color, .. } => color.filled(),
                CellFill::Missing => MISSING_FILL.filled(),
            };
            Rectangle::new([(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)], fill)
        }))?;

        for cell in layout.cells.iter().filter(|c| c.is_missing()) {
            let x = cell.col as f64;
            let y = layout.y_of(cell.row);
            for (from, to) in [
                ((x - 0.45, y - 0.45), (x + 0.45, y + 0.45)),
                ((x - 0.45, y + 0.45), (x + 0.45, y - 0.45)),
            ] {
                chart.draw_series(std::iter::once(PathElement::new(
                    vec![from, to],
                    BLACK.mix(0.25),
                )))?;
            }
        }

        chart.draw_series(layout.cells.iter().map(|cell| {
            let text_color = match cell.fill {
                CellFill::Value { color, .. } if luminance(&color) < 0.5 => WHITE,
                _ => BLACK,
            };
            let style = (font, 14.0)
                .into_font()
                .color(&text_color)
                .pos(Pos::new(HPos::Center, VPos::Center));
            Text::new(
                cell.annotation.clone(),
                (cell.col as f64, layout.y_of(cell.row)),
                style,
            )
        }))?;

        if let Some(range) = layout.range {
            draw_colorbar(&bar, layout.scale, range, font, "")?;
        }
        Ok(())
    }
}

/// Label for an integer tick of a categorical axis, empty between cells.
fn axis_tick(labels: &[String], v: f64) -> String {
    let pos = v.round();
    if (v - pos).abs() > 1e-6 || pos < 0.0 || pos >= labels.len() as f64 {
        return String::new();
    }
    labels[pos as usize].clone()
}

/// Draws `grid` as an annotated heatmap.
///
/// Every grid position is drawn exactly once. Positions without a value get a
/// grey crossed-out cell labelled `n/a` instead of a number.
pub fn render_heatmap(
    figure: Figure,
    grid: &PivotGrid,
    style: &HeatmapStyle,
) -> Result<RenderedFigure, ReportError> {
    let layout = HeatmapLayout::from_grid(grid, style.scale)?;
    let written = figure.paint(&HeatmapPainter {
        layout: &layout,
        style,
    })?;
    if written {
        info!("heatmap written to {}", figure.path().display());
    }
    Ok(RenderedFigure {
        path: figure.path,
        kind: FigureKind::Heatmap,
        elements: layout.cells.len(),
        missing: layout.missing_count(),
        written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Column, Dataset, DuplicatePolicy, Observation, pivot};

    fn grid_with_hole() -> PivotGrid {
        let mut rows = Vec::new();
        for r in [1.0, 2.0, 3.0] {
            for l in [1.0, 2.0] {
                if (r, l) == (3.0, 2.0) {
                    continue;
                }
                rows.push(Observation {
                    r: Some(r),
                    l: Some(l),
                    n: None,
                    win_probability: r * 0.1 + l * 0.01,
                });
            }
        }
        let ds = Dataset::from_rows("t", &[Column::R, Column::L], rows).unwrap();
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
    fn every_position_has_exactly_one_cell() {
        let layout = HeatmapLayout::from_grid(&grid_with_hole(), ColorScale::YlOrRd).unwrap();
        assert_eq!(layout.cells.len(), 6);
        for row in 0..3 {
            for col in 0..2 {
                let hits = layout
                    .cells
                    .iter()
                    .filter(|c| c.row == row && c.col == col)
                    .count();
                assert_eq!(hits, 1, "cell ({row}, {col})");
            }
        }
    }

    #[test]
    fn annotations_use_two_decimals() {
        let layout = HeatmapLayout::from_grid(&grid_with_hole(), ColorScale::Blues).unwrap();
        let cell = layout.cell(1, 1).unwrap();
        assert_eq!(cell.annotation, "0.22");
        assert_eq!(layout.row_labels, vec!["1", "2", "3"]);
    }

    #[test]
    fn axis_ticks_only_on_cell_centres() {
        let labels = vec!["0.5".to_string(), "1".to_string()];
        assert_eq!(axis_tick(&labels, 1.0), "1");
        assert_eq!(axis_tick(&labels, 0.5), "");
        assert_eq!(axis_tick(&labels, 2.0), "");
        assert_eq!(axis_tick(&labels, -1.0), "");
    }
}
