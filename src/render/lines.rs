use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::{info, warn};

use super::{Figure, FigureKind, Painter, RenderedFigure};
use crate::data::{Column, Dataset, Series, group_series};
use crate::error::ReportError;

#[derive(Debug, Clone)]
pub struct LineStyle {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub font: String,
}

struct LinePainter<'a> {
    series: &'a [Series],
    style: &'a LineStyle,
}

fn padded(lo: f64, hi: f64) -> (f64, f64) {
    if (hi - lo).abs() < 1e-12 {
        (lo - 0.5, hi + 0.5)
    } else {
        let pad = 0.05 * (hi - lo);
        (lo - pad, hi + pad)
    }
}

impl Painter for LinePainter<'_> {
    fn paint<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        let font = self.style.font.as_str();
        root.fill(&WHITE)?;

        let points = self.series.iter().flat_map(|s| s.points.iter());
        let (x_lo, x_hi, y_lo, y_hi) = points.fold(
            (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
            |(a, b, c, d), &(x, y)| (a.min(x), b.max(x), c.min(y), d.max(y)),
        );
        let (x_lo, x_hi) = padded(x_lo, x_hi);
        let (y_lo, y_hi) = padded(y_lo, y_hi);

        let mut chart = ChartBuilder::on(root)
            .caption(&self.style.title, (font, 22))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;

        chart
            .configure_mesh()
            .x_desc(self.style.x_label.as_str())
            .y_desc(self.style.y_label.as_str())
            .label_style((font, 14))
            .light_line_style(BLACK.mix(0.08))
            .draw()?;

        for (i, series) in self.series.iter().enumerate() {
            let color = Palette99::pick(i).mix(0.9);
            chart
                .draw_series(LineSeries::new(
                    series.points.iter().copied(),
                    color.stroke_width(2),
                ))?
                .label(series.label())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
            chart.draw_series(
                series
                    .points
                    .iter()
                    .map(|&p| Circle::new(p, 4, color.filled())),
            )?;
        }

        chart
            .configure_series_labels()
            .label_font((font, 14))
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
        Ok(())
    }
}

/// Keeps only points with finite coordinates; series left empty are dropped.
/// Returns the surviving series and the number of points removed.
fn finite_series(series: Vec<Series>) -> (Vec<Series>, usize) {
    let mut dropped = 0;
    let kept = series
        .into_iter()
        .filter_map(|mut s| {
            let before = s.points.len();
            s.points.retain(|(px, py)| px.is_finite() && py.is_finite());
            dropped += before - s.points.len();
            (!s.points.is_empty()).then_some(s)
        })
        .collect();
    (kept, dropped)
}

/// Draws one line-and-marker series of `y` against `x` per distinct `group`.
pub fn render_series_comparison(
    figure: Figure,
    dataset: &Dataset,
    group: Column,
    x: Column,
    y: Column,
    style: &LineStyle,
) -> Result<RenderedFigure, ReportError> {
    let (series, dropped) = finite_series(group_series(dataset, group, x, y)?);
    if dropped > 0 {
        warn!(
            "{}: {dropped} point(s) with non-finite {x} or {y} left out of the chart",
            dataset.source()
        );
    }
    if series.is_empty() {
        return Err(ReportError::render(
            figure.label(),
            format!("{} has no finite points to draw", dataset.source()),
        ));
    }
    let written = figure.paint(&LinePainter {
        series: &series,
        style,
    })?;
    if written {
        info!(
            "series comparison ({} series) written to {}",
            series.len(),
            figure.path().display()
        );
    }
    Ok(RenderedFigure {
        path: figure.path,
        kind: FigureKind::SeriesComparison,
        elements: series.len(),
        missing: 0,
        written,
    })
}
