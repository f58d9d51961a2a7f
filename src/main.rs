// Entry point: loads config, runs the report pipeline, surfaces errors on stderr.
mod cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use winprob_report::config::ReportConfig;
use winprob_report::pipeline::{self, RunOptions};

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A subscriber may already be installed when embedded; keep going.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let args = cli::Args::parse();
    init_tracing(args.verbose);

    let mut config = ReportConfig::load_or_default(&args.config);
    if let Some(dir) = args.data_dir {
        config.inputs.data_dir = dir;
    }
    if let Some(dir) = args.out_dir {
        config.output.out_dir = dir;
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }

    let options = RunOptions {
        dry_run: args.dry_run,
    };
    let mut stdout = std::io::stdout().lock();
    if let Err(err) = pipeline::run(&config, options, &mut stdout) {
        eprintln!("winprob-report failed: {err}");
        std::process::exit(1);
    }
}
