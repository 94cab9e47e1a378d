//! anypause CLI - split G-code at layers for filament changes
//!
//! Writes one file per part next to the input (or into `--output-dir`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use anypause::{plan, write_parts, GcodeProgram, ScaffoldBlocks, ScaffoldSearch, SplitOptions};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "anypause")]
#[command(
    about = "Process a G-code file and output multiple processed versions",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Path to the input G-code file
    input: PathBuf,

    /// One or more layer numbers to split at (e.g. -l 10 20)
    #[arg(short, long, num_args = 1.., required = true)]
    layers: Vec<u32>,

    /// Prefix for output G-code files [default: AP]
    #[arg(short, long)]
    prefix: Option<String>,

    /// Directory to save output G-code files (default: input file directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Resume at full speed instead of slowing the first layer of later parts
    #[arg(long, visible_alias = "fs")]
    faststart: bool,

    /// Turn the bed off (M140 S0) at each pause and reheat on resume
    #[arg(long)]
    bed_off: bool,

    /// Turn the hotend off (M104 S0) at each pause and reheat on resume
    #[arg(long)]
    extruder_off: bool,

    /// Turn the fan off (M107) at each pause and back on in the next part
    #[arg(long)]
    fan_off: bool,

    /// TOML file with default options
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory searched first for restartcode1/2.gcode and pausecode.gcode
    #[arg(long)]
    codeblocks: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let options = resolve_options(&cli)?;
    debug!(?options, "resolved options");

    let search = scaffold_search(&cli.input, cli.codeblocks.as_deref());
    let scaffold = ScaffoldBlocks::discover(&search);

    let context = || format!("failed to split {}", cli.input.display());
    let program = GcodeProgram::load(&cli.input).with_context(context)?;
    let plan = plan(&program, &cli.layers, &options, &scaffold).with_context(context)?;

    if !plan.missing.is_empty() {
        eprintln!(
            "Warning: layer markers not found for layers: {:?}",
            plan.missing
        );
    }

    let written = write_parts(&plan, &cli.input, &options).with_context(context)?;

    println!("Wrote split files:");
    for path in &written {
        println!(" - {}", path.display());
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let default = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Config file first, then command-line flags on top.
fn resolve_options(cli: &Cli) -> Result<SplitOptions> {
    let mut options = match &cli.config {
        Some(path) => SplitOptions::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SplitOptions::default(),
    };

    if let Some(prefix) = &cli.prefix {
        options.prefix = prefix.clone();
    }
    if let Some(dir) = &cli.output_dir {
        options.output_dir = Some(dir.clone());
    }
    options.faststart |= cli.faststart;
    options.bed_off |= cli.bed_off;
    options.extruder_off |= cli.extruder_off;
    options.fan_off |= cli.fan_off;

    Ok(options)
}

fn scaffold_search(input: &Path, codeblocks: Option<&Path>) -> ScaffoldSearch {
    let search = ScaffoldSearch::for_input(input);
    match codeblocks {
        Some(dir) => search.prefer_dir(dir),
        None => search,
    }
}
