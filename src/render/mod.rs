//! Figure output.
//!
//! A [`Figure`] names the file a chart goes to and how large it is. Each
//! `render_*` function takes the figure by value, draws one chart on it and
//! hands back a [`RenderedFigure`] describing what was drawn. Nothing is kept
//! between calls.

pub mod color;
pub mod heatmap;
pub mod lines;
pub mod surface;

use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ReportError;

pub use color::ColorScale;
pub use heatmap::{CellFill, HeatmapCell, HeatmapLayout, HeatmapStyle, render_heatmap};
pub use lines::{LineStyle, render_series_comparison};
pub use surface::{SurfaceMesh, SurfaceStyle, render_surface};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageFormat {
    #[default]
    Png,
    Svg,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FigureKind {
    Heatmap,
    Surface,
    SeriesComparison,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    path: PathBuf,
    size: (u32, u32),
    format: ImageFormat,
    draw: bool,
}

impl Figure {
    /// `<dir>/<stem>.<ext>` for the given format.
    pub fn new(dir: &Path, stem: &str, size: (u32, u32), format: ImageFormat) -> Self {
        Self {
            path: dir.join(format!("{stem}.{}", format.extension())),
            size,
            format,
            draw: true,
        }
    }

    /// Runs layout and validation but leaves the file system untouched.
    pub fn skip_drawing(mut self) -> Self {
        self.draw = false;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    fn label(&self) -> String {
        self.path.display().to_string()
    }

    fn paint<P: Painter>(&self, painter: &P) -> Result<bool, ReportError> {
        if !self.draw {
            return Ok(false);
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let label = self.label();
        match self.format {
            ImageFormat::Png => {
                let root = BitMapBackend::new(&self.path, self.size).into_drawing_area();
                painter
                    .paint(&root)
                    .map_err(|e| ReportError::render(&label, e))?;
                root.present().map_err(|e| ReportError::render(&label, e))?;
            }
            ImageFormat::Svg => {
                let root = SVGBackend::new(&self.path, self.size).into_drawing_area();
                painter
                    .paint(&root)
                    .map_err(|e| ReportError::render(&label, e))?;
                root.present().map_err(|e| ReportError::render(&label, e))?;
            }
        }
        Ok(true)
    }
}

/// Outcome of one render call.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFigure {
    pub path: PathBuf,
    pub kind: FigureKind,
    /// Cells, quads or series drawn, depending on `kind`.
    pub elements: usize,
    /// Cells drawn with the "no data" marker.
    pub missing: usize,
    pub written: bool,
}

/// Backend-independent drawing of one chart.
trait Painter {
    fn paint<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>>;
}

/// Vertical colour bar spanning `[lo, hi]`.
fn draw_colorbar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    scale: ColorScale,
    (lo, hi): (f64, f64),
    font: &str,
    label: &str,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let (lo, hi) = if (hi - lo).abs() < 1e-12 {
        (lo - 0.5, hi + 0.5)
    } else {
        (lo, hi)
    };
    let mut chart = ChartBuilder::on(area)
        .margin_top(50)
        .margin_bottom(70)
        .margin_right(10)
        .y_label_area_size(55)
        .build_cartesian_2d(0.0f64..1.0f64, lo..hi)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_desc(label)
        .y_label_style((font, 14))
        .y_label_formatter(&|v| format!("{v:.2}"))
        .draw()?;

    let steps = 64;
    let step = (hi - lo) / steps as f64;
    chart.draw_series((0..steps).map(|i| {
        let a = lo + step * i as f64;
        let b = a + step;
        Rectangle::new([(0.0, a), (1.0, b)], scale.map(0.5 * (a + b), lo, hi).filled())
    }))?;
    Ok(())
}

/// Formats an axis key the way it appears in the source table.
pub(crate) fn key_label(key: f64) -> String {
    format!("{key}")
}
