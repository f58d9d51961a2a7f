use crate::data::DuplicatePolicy;
use crate::render::{ColorScale, ImageFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default = "InputConfig::default_data_dir")]
    pub data_dir: String,
    #[serde(default = "InputConfig::default_r_l")]
    pub r_l: String,
    #[serde(default = "InputConfig::default_r_n")]
    pub r_n: String,
    #[serde(default = "InputConfig::default_l_n")]
    pub l_n: String,
}

impl InputConfig {
    fn default_data_dir() -> String {
        ".".to_string()
    }
    fn default_r_l() -> String {
        "experiment_r_l.csv".to_string()
    }
    fn default_r_n() -> String {
        "experiment_r_n.csv".to_string()
    }
    fn default_l_n() -> String {
        "experiment_l_n.csv".to_string()
    }

    pub fn path_of(&self, file: &str) -> PathBuf {
        Path::new(&self.data_dir).join(file)
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            data_dir: Self::default_data_dir(),
            r_l: Self::default_r_l(),
            r_n: Self::default_r_n(),
            l_n: Self::default_l_n(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "OutputConfig::default_out_dir")]
    pub out_dir: String,
    #[serde(default)]
    pub format: ImageFormat,
    #[serde(default = "OutputConfig::default_width")]
    pub width: u32,
    #[serde(default = "OutputConfig::default_height")]
    pub height: u32,
}

impl OutputConfig {
    fn default_out_dir() -> String {
        "target/plots/report".to_string()
    }
    fn default_width() -> u32 {
        1000
    }
    fn default_height() -> u32 {
        800
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            out_dir: Self::default_out_dir(),
            format: ImageFormat::default(),
            width: Self::default_width(),
            height: Self::default_height(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PivotConfig {
    #[serde(default)]
    pub duplicates: DuplicatePolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    #[serde(default = "StyleConfig::default_font_family")]
    pub font_family: String,
    #[serde(default = "StyleConfig::default_r_l_scale")]
    pub r_l_scale: ColorScale,
    #[serde(default = "StyleConfig::default_l_n_scale")]
    pub l_n_scale: ColorScale,
    #[serde(default = "StyleConfig::default_surface_scale")]
    pub surface_scale: ColorScale,
    #[serde(default = "StyleConfig::default_surface_yaw")]
    pub surface_yaw: f64,
    #[serde(default = "StyleConfig::default_surface_pitch")]
    pub surface_pitch: f64,
    #[serde(default = "StyleConfig::default_surface_alpha")]
    pub surface_alpha: f64,
}

impl StyleConfig {
    fn default_font_family() -> String {
        "sans-serif".to_string()
    }
    fn default_r_l_scale() -> ColorScale {
        ColorScale::YlOrRd
    }
    fn default_l_n_scale() -> ColorScale {
        ColorScale::Blues
    }
    fn default_surface_scale() -> ColorScale {
        ColorScale::Viridis
    }
    fn default_surface_yaw() -> f64 {
        0.6
    }
    fn default_surface_pitch() -> f64 {
        0.35
    }
    fn default_surface_alpha() -> f64 {
        0.8
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font_family: Self::default_font_family(),
            r_l_scale: Self::default_r_l_scale(),
            l_n_scale: Self::default_l_n_scale(),
            surface_scale: Self::default_surface_scale(),
            surface_yaw: Self::default_surface_yaw(),
            surface_pitch: Self::default_surface_pitch(),
            surface_alpha: Self::default_surface_alpha(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "ExportConfig::default_grid_csv")]
    pub grid_csv: bool,
}

impl ExportConfig {
    fn default_grid_csv() -> bool {
        true
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            grid_csv: Self::default_grid_csv(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReportConfig {
    #[serde(default)]
    pub inputs: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub pivot: PivotConfig,
    #[serde(default)]
    pub style: StyleConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

impl ReportConfig {
    fn format_f64_compact(x: f64) -> String {
        let mut s = format!("{:.6}", x);
        while s.contains('.') && s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
        if s.is_empty() { "0".to_string() } else { s }
    }

    /// Defaults rendered as TOML with every value commented out, so a fresh
    /// file documents the knobs without pinning them.
    fn commented_defaults() -> Option<String> {
        let text = toml::to_string_pretty(&Self::default()).ok()?;
        let mut commented = String::new();
        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                commented.push('\n');
            } else if trimmed.starts_with('[') && trimmed.ends_with(']') {
                commented.push_str(line);
                commented.push('\n');
            } else {
                let mut out_line = line.to_string();
                if let Some((lhs, rhs)) = line.split_once('=') {
                    let rhs_trim = rhs.trim();
                    let has_decimal = rhs_trim.contains('.');
                    if has_decimal && !rhs_trim.contains('"') {
                        if let Ok(val) = rhs_trim.parse::<f64>() {
                            let mut formatted = Self::format_f64_compact(val);
                            if !formatted.contains('.') {
                                formatted.push_str(".0");
                            }
                            out_line = format!("{} = {}", lhs.trim(), formatted);
                        }
                    }
                }
                commented.push_str("# ");
                commented.push_str(&out_line);
                commented.push('\n');
            }
        }
        Some(commented)
    }

    pub fn load_or_default(path: &str) -> Self {
        let path_obj = Path::new(path);
        if path_obj.exists() {
            match fs::read_to_string(path_obj) {
                Ok(contents) => match toml::from_str(&contents) {
                    Ok(cfg) => return cfg,
                    Err(err) => {
                        warn!("Failed to parse config {path}: {err}. Using defaults.");
                    }
                },
                Err(err) => {
                    warn!("Failed to read config {path}: {err}. Using defaults.");
                }
            }
            return Self::default();
        }

        // File does not exist: write defaults and return them.
        match Self::commented_defaults() {
            Some(text) => {
                if let Err(err) = fs::write(path_obj, text) {
                    warn!("Failed to write default config to {path}: {err}");
                }
            }
            None => warn!("Failed to serialize default config; continuing with defaults"),
        }
        Self::default()
    }

    pub fn out_dir(&self) -> PathBuf {
        PathBuf::from(&self.output.out_dir)
    }

    pub fn figure_size(&self) -> (u32, u32) {
        (self.output.width.max(200), self.output.height.max(150))
    }
}
