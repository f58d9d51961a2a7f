use clap::Parser;
use winprob_report::render::ImageFormat;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Path to config TOML
    #[arg(long, default_value = "winprob-report.toml")]
    pub config: String,

    /// Directory holding the experiment CSV files (overrides config)
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Directory figures are written to (overrides config)
    #[arg(long)]
    pub out_dir: Option<String>,

    /// Image format for figures (overrides config)
    #[arg(long, value_parser = parse_format)]
    pub format: Option<ImageFormat>,

    /// Load, pivot and lay out every figure without drawing images
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

fn parse_format(s: &str) -> Result<ImageFormat, String> {
    match s.to_ascii_lowercase().as_str() {
        "png" => Ok(ImageFormat::Png),
        "svg" => Ok(ImageFormat::Svg),
        other => Err(format!("unknown image format `{other}` (expected png or svg)")),
    }
}
