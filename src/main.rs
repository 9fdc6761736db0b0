/*!
 * Command-line interface for allcode
 */

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use allcode::config::{Args, Config};
use allcode::export::Exporter;
use allcode::report::{ReportFormat, Reporter};

fn main() -> ExitCode {
    let args = Args::parse();
    let config = Config::from_args(args);

    init_logging(config.verbosity);

    let progress = if config.quiet {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos}/{len}")
        {
            bar.set_style(style);
        }
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_prefix("Exporting");
        bar
    };

    let exporter = Exporter::new(config.clone(), Arc::new(progress.clone()));
    let result = exporter.run();
    progress.finish_and_clear();

    match result {
        Ok(outcome) => {
            println!("Export complete.");
            println!("TXT : {}", outcome.text_path.display());
            println!("JSON: {}", outcome.manifest_path.display());

            if !config.quiet {
                Reporter::new(ReportFormat::ConsoleTable).print_report(&outcome);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr, honouring RUST_LOG over the -v count
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("allcode={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
