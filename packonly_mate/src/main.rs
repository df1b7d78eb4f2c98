use std::process::ExitCode;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use packonly::{TracingProgress, pack_directory};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Packs a directory into a PackOnly (.pd) archive.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Sets the directory to pack.
    input: Utf8PathBuf,
    /// Sets the archive to create. Defaults to the input directory's name with a `.pd`
    /// extension.
    output: Option<Utf8PathBuf>,
    /// Logs more detail, pass twice for everything.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Only logs errors.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let output = cli.output.unwrap_or_else(|| default_output(&cli.input));
    info!("packing {:?} into {:?}", cli.input, output);
    match pack_directory(&cli.input, &output, TracingProgress) {
        Ok(summary) => {
            info!("packed {} files into {output}", summary.entry_count);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn default_output(input: &Utf8Path) -> Utf8PathBuf {
    match input.file_name() {
        Some(name) => input.with_file_name(format!("{name}.pd")),
        None => Utf8PathBuf::from("pack.pd"),
    }
}

/// `RUST_LOG` takes precedence over the verbosity flags.
fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).without_time().init();
}
