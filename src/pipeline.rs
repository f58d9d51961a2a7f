//! The report run: three experiment tables in, figures and an optimum
//! summary out.
//!
//! Stages run strictly in order and the first error aborts the run. Figures
//! written before the failure stay on disk. Optional stages check their
//! inputs up front and are recorded as skipped instead of failing.

use std::io::Write;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::ReportConfig;
use crate::data::{Column, Dataset, PivotGrid, load_dataset, pivot, report_optimum};
use crate::error::ReportError;
use crate::export::write_grid_csv;
use crate::render::{
    ColorScale, Figure, HeatmapStyle, LineStyle, RenderedFigure, SurfaceStyle, render_heatmap,
    render_series_comparison, render_surface,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    HeatmapRL,
    SurfaceRL,
    SeriesRN,
    HeatmapLN,
    Optimum,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Stage::HeatmapRL => "heatmap r/l",
            Stage::SurfaceRL => "surface r/l",
            Stage::SeriesRN => "series r/n",
            Stage::HeatmapLN => "heatmap l/n",
            Stage::Optimum => "optimum",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome {
    Rendered(RenderedFigure),
    Skipped { reason: String },
    Reported,
}

/// Options that do not belong in the config file.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Validate and lay out every figure without drawing image files.
    pub dry_run: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ReportSummary {
    pub stages: Vec<(Stage, StageOutcome)>,
    pub tables: Vec<PathBuf>,
}

impl ReportSummary {
    pub fn outcome(&self, stage: Stage) -> Option<&StageOutcome> {
        self.stages.iter().find(|(s, _)| *s == stage).map(|(_, o)| o)
    }

    pub fn skipped(&self) -> impl Iterator<Item = Stage> + '_ {
        self.stages
            .iter()
            .filter(|(_, o)| matches!(o, StageOutcome::Skipped { .. }))
            .map(|(s, _)| *s)
    }
}

struct Run<'a, W: Write> {
    config: &'a ReportConfig,
    options: RunOptions,
    out_dir: PathBuf,
    stdout: &'a mut W,
    summary: ReportSummary,
}

impl<W: Write> Run<'_, W> {
    fn figure(&self, stem: &str) -> Figure {
        let figure = Figure::new(
            &self.out_dir,
            stem,
            self.config.figure_size(),
            self.config.output.format,
        );
        if self.options.dry_run {
            figure.skip_drawing()
        } else {
            figure
        }
    }

    fn rendered(&mut self, stage: Stage, figure: RenderedFigure) -> Result<(), ReportError> {
        if figure.written {
            writeln!(self.stdout, "Saved {}", figure.path.display())?;
        }
        self.summary
            .stages
            .push((stage, StageOutcome::Rendered(figure)));
        Ok(())
    }

    fn skip(&mut self, stage: Stage, reason: String) {
        warn!("skipping {}: {reason}", stage.label());
        self.summary
            .stages
            .push((stage, StageOutcome::Skipped { reason }));
    }

    fn export(&mut self, grid: &PivotGrid, stem: &str) -> Result<(), ReportError> {
        if !self.config.export.grid_csv {
            return Ok(());
        }
        let path = self.out_dir.join(format!("{stem}.csv"));
        write_grid_csv(grid, &path)?;
        self.summary.tables.push(path);
        Ok(())
    }

    fn heatmap_style(&self, title: &str, grid: &PivotGrid, scale: ColorScale) -> HeatmapStyle {
        HeatmapStyle {
            title: title.to_string(),
            scale,
            x_label: grid.col_column().describe().to_string(),
            y_label: grid.row_column().describe().to_string(),
            font: self.config.style.font_family.clone(),
        }
    }

    fn experiment_r_l(&mut self, data: &Dataset) -> Result<(), ReportError> {
        let grid = pivot(
            data,
            Column::R,
            Column::L,
            Column::WinProbability,
            self.config.pivot.duplicates,
        )?;
        self.export(&grid, "pivot_r_l")?;

        let style = self.heatmap_style(
            "Agent win probability (n fixed)",
            &grid,
            self.config.style.r_l_scale,
        );
        let heatmap = render_heatmap(self.figure("heatmap_r_l"), &grid, &style)?;
        self.rendered(Stage::HeatmapRL, heatmap)?;

        let style = SurfaceStyle {
            title: "Win probability surface".to_string(),
            scale: self.config.style.surface_scale,
            x_label: Column::L.describe().to_string(),
            y_label: Column::R.describe().to_string(),
            z_label: Column::WinProbability.describe().to_string(),
            font: self.config.style.font_family.clone(),
            yaw: self.config.style.surface_yaw,
            pitch: self.config.style.surface_pitch,
            alpha: self.config.style.surface_alpha,
        };
        let surface = render_surface(self.figure("surface_r_l"), &grid, &style)?;
        self.rendered(Stage::SurfaceRL, surface)
    }

    fn experiment_r_n(&mut self, data: &Dataset) -> Result<(), ReportError> {
        if !data.has_column(Column::N) {
            self.skip(
                Stage::SeriesRN,
                format!("{} has no `n` column", data.source()),
            );
            return Ok(());
        }
        let style = LineStyle {
            title: "Win probability vs number of squares".to_string(),
            x_label: Column::N.describe().to_string(),
            y_label: Column::WinProbability.describe().to_string(),
            font: self.config.style.font_family.clone(),
        };
        let figure = render_series_comparison(
            self.figure("series_r_n"),
            data,
            Column::R,
            Column::N,
            Column::WinProbability,
            &style,
        )?;
        self.rendered(Stage::SeriesRN, figure)
    }

    fn experiment_l_n(&mut self, data: &Dataset) -> Result<(), ReportError> {
        if !data.has_column(Column::N) {
            self.skip(
                Stage::HeatmapLN,
                format!("{} has no `n` column", data.source()),
            );
            return Ok(());
        }
        let grid = pivot(
            data,
            Column::L,
            Column::N,
            Column::WinProbability,
            self.config.pivot.duplicates,
        )?;
        self.export(&grid, "pivot_l_n")?;
        let style = self.heatmap_style(
            "Agent win probability (r fixed)",
            &grid,
            self.config.style.l_n_scale,
        );
        let figure = render_heatmap(self.figure("heatmap_l_n"), &grid, &style)?;
        self.rendered(Stage::HeatmapLN, figure)
    }

    fn optimum_section(&mut self, title: &str, data: &Dataset) -> Result<(), ReportError> {
        let best = report_optimum(data, Column::WinProbability)?;
        writeln!(self.stdout, "{title}")?;
        writeln!(self.stdout, "{best}")?;
        Ok(())
    }
}

fn load(config: &ReportConfig, file: &str, required: &[Column]) -> Result<Dataset, ReportError> {
    let path = config.inputs.path_of(file);
    load_dataset(&path, required)
}

/// Runs every stage, writing banners and the optimum report to `stdout`.
pub fn run<W: Write>(
    config: &ReportConfig,
    options: RunOptions,
    stdout: &mut W,
) -> Result<ReportSummary, ReportError> {
    let mut run = Run {
        config,
        options,
        out_dir: config.out_dir(),
        stdout,
        summary: ReportSummary::default(),
    };

    let data_r_l = load(config, &config.inputs.r_l, &[Column::R, Column::L])?;
    run.experiment_r_l(&data_r_l)?;

    writeln!(run.stdout, "Analysis of experiment 2 (r and n):")?;
    let data_r_n = load(config, &config.inputs.r_n, &[Column::R])?;
    run.experiment_r_n(&data_r_n)?;

    writeln!(run.stdout, "Analysis of experiment 3 (l and n):")?;
    let data_l_n = load(config, &config.inputs.l_n, &[Column::L])?;
    run.experiment_l_n(&data_l_n)?;

    writeln!(run.stdout, "\nOptimal parameters per experiment:")?;
    run.optimum_section("Experiment 1 (r and l):", &data_r_l)?;
    for (title, data) in [
        ("Experiment 2 (r and n):", &data_r_n),
        ("Experiment 3 (l and n):", &data_l_n),
    ] {
        if data.has_column(Column::N) && !data.is_empty() {
            run.optimum_section(title, data)?;
        }
    }
    run.summary.stages.push((Stage::Optimum, StageOutcome::Reported));

    info!(
        "report finished: {} stages, {} skipped",
        run.summary.stages.len(),
        run.summary.skipped().count()
    );
    Ok(run.summary)
}
