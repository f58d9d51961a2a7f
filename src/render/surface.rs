use std::cmp::Reverse;

use plotters::coord::Shift;
use plotters::coord::cartesian::Cartesian3d;
use plotters::coord::ranged3d::{ProjectionMatrix, ProjectionMatrixBuilder};
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use tracing::info;

use super::color::ColorScale;
use super::{Figure, FigureKind, Painter, RenderedFigure, draw_colorbar};
use crate::data::PivotGrid;
use crate::error::ReportError;

#[derive(Debug, Clone)]
pub struct SurfaceStyle {
    pub title: String,
    pub scale: ColorScale,
    pub x_label: String,
    pub y_label: String,
    pub z_label: String,
    pub font: String,
    pub yaw: f64,
    pub pitch: f64,
    pub alpha: f64,
}

/// One patch of the surface, spanning two adjacent keys on each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    /// `(x, height, depth)` corners in drawing order.
    pub corners: [(f64, f64, f64); 4],
    pub mean_height: f64,
}

/// Rectangular mesh over the grid keys: columns along x, rows along depth.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceMesh {
    xs: Vec<f64>,
    zs: Vec<f64>,
    heights: Vec<Option<f64>>,
}

impl SurfaceMesh {
    pub fn from_grid(grid: &PivotGrid) -> Result<Self, ReportError> {
        let figure = format!("surface of {} by {}", grid.row_column(), grid.col_column());
        if let Some(bad) = grid
            .row_keys()
            .iter()
            .chain(grid.col_keys())
            .find(|k| !k.is_finite())
        {
            return Err(ReportError::render(
                figure,
                format!("axis key {bad} is not a finite number"),
            ));
        }
        if grid.n_rows() < 2 || grid.n_cols() < 2 {
            return Err(ReportError::render(
                figure,
                format!(
                    "needs at least two keys per axis, got {}x{}",
                    grid.n_rows(),
                    grid.n_cols()
                ),
            ));
        }
        let mut heights = Vec::with_capacity(grid.n_rows() * grid.n_cols());
        for i in 0..grid.n_rows() {
            for j in 0..grid.n_cols() {
                heights.push(grid.get(i, j).filter(|v| v.is_finite()));
            }
        }
        Ok(Self {
            xs: grid.col_keys().to_vec(),
            zs: grid.row_keys().to_vec(),
            heights,
        })
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn zs(&self) -> &[f64] {
        &self.zs
    }

    pub fn height(&self, i: usize, j: usize) -> Option<f64> {
        self.heights.get(i * self.xs.len() + j).copied().flatten()
    }

    /// Patches whose four corners all have a height.
    pub fn quads(&self) -> Vec<Quad> {
        let mut out = Vec::new();
        for i in 0..self.zs.len().saturating_sub(1) {
            for j in 0..self.xs.len().saturating_sub(1) {
                let (Some(h00), Some(h01), Some(h11), Some(h10)) = (
                    self.height(i, j),
                    self.height(i, j + 1),
                    self.height(i + 1, j + 1),
                    self.height(i + 1, j),
                ) else {
                    continue;
                };
                let (x0, x1, z0, z1) = (self.xs[j], self.xs[j + 1], self.zs[i], self.zs[i + 1]);
                out.push(Quad {
                    corners: [(x0, h00, z0), (x1, h01, z0), (x1, h11, z1), (x0, h10, z1)],
                    mean_height: 0.25 * (h00 + h01 + h11 + h10),
                });
            }
        }
        out
    }

    pub fn height_range(&self) -> Option<(f64, f64)> {
        self.heights.iter().flatten().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
        })
    }
}

type SurfaceCoord = Cartesian3d<RangedCoordf64, RangedCoordf64, RangedCoordf64>;

fn view(yaw: f64, pitch: f64) -> impl FnOnce(ProjectionMatrixBuilder) -> ProjectionMatrix {
    move |mut pb| {
        pb.yaw = yaw;
        pb.pitch = pitch;
        pb.scale = 0.85;
        pb.into_matrix()
    }
}

/// Quads ordered farthest first under the projection of `coord`.
///
/// Larger projected depth is farther from the viewer.
fn back_to_front<'q>(quads: &'q [Quad], coord: &SurfaceCoord) -> Vec<&'q Quad> {
    let mut ordered: Vec<&Quad> = quads.iter().collect();
    ordered.sort_by_cached_key(|quad| {
        let depth: i64 = quad
            .corners
            .iter()
            .map(|(x, y, z)| i64::from(coord.projected_depth(x, y, z)))
            .sum();
        Reverse(depth)
    });
    ordered
}

struct SurfacePainter<'a> {
    mesh: &'a SurfaceMesh,
    quads: &'a [Quad],
    style: &'a SurfaceStyle,
}

impl Painter for SurfacePainter<'_> {
    fn paint<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        let style = self.style;
        let font = style.font.as_str();
        root.fill(&WHITE)?;

        let (width, height) = root.dim_in_pixel();
        let (main, bar) = root.split_horizontally(width.saturating_sub(120));

        let range = self.mesh.height_range().unwrap_or((0.0, 1.0));
        let (lo, hi) = if (range.1 - range.0).abs() < 1e-12 {
            (range.0 - 0.5, range.1 + 0.5)
        } else {
            range
        };
        let xs = self.mesh.xs();
        let zs = self.mesh.zs();
        let x_range = xs[0]..xs[xs.len() - 1];
        let z_range = zs[0]..zs[zs.len() - 1];

        let mut chart = ChartBuilder::on(&main)
            .caption(&style.title, (font, 22))
            .margin(20)
            .build_cartesian_3d(x_range, lo..hi, z_range)?;
        chart.with_projection(view(style.yaw, style.pitch));
        chart
            .configure_axes()
            .light_grid_style(BLACK.mix(0.15))
            .max_light_lines(3)
            .label_style((font, 12))
            .draw()?;

        let alpha = style.alpha.clamp(0.0, 1.0);
        let ordered = back_to_front(self.quads, chart.as_coord_spec());
        chart.draw_series(ordered.into_iter().map(|quad| {
            let color = style.scale.map(quad.mean_height, lo, hi);
            Polygon::new(quad.corners.to_vec(), color.mix(alpha).filled())
        }))?;

        let legend = [
            format!("x: {}", style.x_label),
            format!("depth: {}", style.y_label),
            format!("height: {}", style.z_label),
        ];
        for (k, line) in legend.iter().enumerate() {
            let y = height as i32 - 70 + 20 * k as i32;
            main.draw(&Text::new(
                line.as_str(),
                (20, y),
                (font, 14.0).into_font(),
            ))?;
        }

        draw_colorbar(&bar, style.scale, (lo, hi), font, style.z_label.as_str())
    }
}

/// Draws `grid` as a height-mapped 3D surface with a colour bar.
///
/// Grid keys become the mesh coordinates, so they must be finite numbers and
/// each axis needs at least two of them.
pub fn render_surface(
    figure: Figure,
    grid: &PivotGrid,
    style: &SurfaceStyle,
) -> Result<RenderedFigure, ReportError> {
    let mesh = SurfaceMesh::from_grid(grid)?;
    let quads = mesh.quads();
    let written = figure.paint(&SurfacePainter {
        mesh: &mesh,
        quads: &quads,
        style,
    })?;
    if written {
        info!("surface written to {}", figure.path().display());
    }
    Ok(RenderedFigure {
        path: figure.path,
        kind: FigureKind::Surface,
        elements: quads.len(),
        missing: mesh.heights.iter().filter(|h| h.is_none()).count(),
        written,
    })
}
