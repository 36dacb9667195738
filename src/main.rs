use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use omrmei::{BarlineDataConverter, ConvertOptions};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Convert a text file of OMR barline data to MEI.
///
/// Sample usage:
///   omrmei -b page_bar_position.txt -s page_staff_vertices.txt -f page.mei -g '(1)' -v
#[derive(Parser, Debug)]
#[command(name = "omrmei")]
#[command(version, about = "Convert OMR barline and staff data to MEI")]
struct Args {
    /// Barline data input file
    #[arg(short, long = "barfilein")]
    barfilein: PathBuf,

    /// Staff data input file
    #[arg(short, long = "stafffilein")]
    stafffilein: PathBuf,

    /// Staff groups, e.g. '(1) (2 (1 1))x2'
    #[arg(short = 'g', long = "staffgroups")]
    staffgroups: String,

    /// Output file
    #[arg(short, long = "fileout")]
    fileout: PathBuf,

    /// YAML file with conversion options
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Link every staff and system to its zone
    #[arg(short, long)]
    link_staves: bool,

    /// Increase output verbosity. Also applies on top of RUST_LOG, which
    /// otherwise replaces the default `omrmei=warn` filter.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = match log_filter(rust_log.as_deref(), args.verbose) {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// Build the log filter from RUST_LOG (if set and valid) and `-v`.
///
/// `-v` adds an `omrmei=info` directive, replacing whatever level RUST_LOG
/// gave the `omrmei` target.
fn log_filter(rust_log: Option<&str>, verbose: bool) -> Result<EnvFilter> {
    let filter = rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("omrmei=warn"));
    if verbose {
        Ok(filter.add_directive("omrmei=info".parse()?))
    } else {
        Ok(filter)
    }
}

fn run(args: Args) -> Result<()> {
    let mut options = match &args.config {
        Some(path) => ConvertOptions::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ConvertOptions::default(),
    };
    if args.link_staves {
        options.link_staves = true;
    }

    let converter = BarlineDataConverter::new(&args.barfilein, &args.stafffilein, options)?;
    debug!("bar file: {}", converter.bar_input_path().display());
    debug!("options: {:?}", converter.options());

    converter
        .convert_to_file(&args.staffgroups, &args.fileout)
        .with_context(|| format!("Failed to convert to {}", args.fileout.display()))?;

    info!("Wrote MEI to {}", args.fileout.display());
    Ok(())
}
