//! Command line front end for the gridtools crates

// gridtools modules
use gridtools::grid::{
    convert, graft_files, zero_file, ConvertConfig, GraftConfig, RunFileNaming,
    DEFAULT_ZERO_FIELDS,
};
use gridtools::store::write_json;
use gridtools::subtract::{subtract_runs, SubtractConfig};

// standard library
use std::error::Error;
use std::path::PathBuf;

// external crates
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{error, info, warn};

/// Conversion and post-processing of parameter sweep grids
#[derive(Debug, Parser)]
#[command(name = "gridtools", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert a run manifest and its outputs into a grid file
    Convert(ConvertArgs),
    /// Join a high grid onto a low grid with one more parameter
    Graft(GraftArgs),
    /// Set fields of a grid file to zero
    Zero(ZeroArgs),
    /// Subtract one sweep from another, from the raw run outputs
    Subtract(SubtractArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Layout {
    /// Heating, cooling and mean molecular weight
    Cooling,
    /// Ion fractions of one species
    Ion,
    /// Emissivity spectra
    Emissivity,
    /// Named lines from the file header
    Lines,
}

#[derive(Debug, Args)]
struct ConvertArgs {
    /// Path to the `.run` manifest
    manifest: PathBuf,

    /// Output grid file
    output: PathBuf,

    /// Column layout of the run outputs
    #[arg(short, long, value_enum, default_value_t = Layout::Cooling)]
    layout: Layout,

    /// Species for the ion layout, also used as the file label
    #[arg(long, required_if_eq("layout", "ion"))]
    species: Option<String>,

    /// Label inserted after the run number in output names
    #[arg(long)]
    label: Option<String>,

    /// Extension of the run outputs
    #[arg(short, long, default_value = ".dat")]
    extension: String,

    /// Name of the inner axis entry
    #[arg(long, default_value = "Temperature")]
    inner: String,

    /// Also dump the grid to JSON for inspection
    #[arg(long)]
    json: Option<PathBuf>,
}

impl ConvertArgs {
    fn config(&self) -> ConvertConfig {
        let mut config = match (self.layout, &self.species) {
            (Layout::Ion, Some(species)) => ConvertConfig::ion_balance(species, &self.extension),
            (Layout::Emissivity, _) => ConvertConfig::emissivity(&self.extension),
            (Layout::Lines, _) => ConvertConfig::lines(&self.extension),
            _ => ConvertConfig {
                naming: RunFileNaming {
                    label: None,
                    extension: self.extension.clone(),
                },
                ..Default::default()
            },
        };
        if self.label.is_some() {
            config.naming.label.clone_from(&self.label);
        }
        config.inner_name.clone_from(&self.inner);
        config
    }
}

#[derive(Debug, Args)]
struct GraftArgs {
    /// Low grid file, with the extra parameter
    low: PathBuf,

    /// High grid file
    high: PathBuf,

    /// Output grid file
    output: PathBuf,

    /// Fields to join
    #[arg(short, long, num_args = 1.., default_values_t = GraftConfig::default().fields)]
    fields: Vec<String>,

    /// Parameter swept only in the low grid
    #[arg(long, default_value_t = GraftConfig::default().extra_parameter)]
    extra_parameter: String,
}

#[derive(Debug, Args)]
struct ZeroArgs {
    /// Grid file to modify
    input: PathBuf,

    /// Write to a new file rather than in place
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Fields to set to zero
    #[arg(short, long, num_args = 1.., default_values = DEFAULT_ZERO_FIELDS)]
    fields: Vec<String>,
}

#[derive(Debug, Args)]
struct SubtractArgs {
    /// Run file of the large grid
    large: PathBuf,

    /// Run file of the grid to subtract
    small: PathBuf,

    /// Run file to write for the difference
    new_run: PathBuf,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    if let Err(e) = run(cli.command) {
        error!("{e}");
        let mut source = e.source();
        while let Some(cause) = source {
            error!("  caused by: {cause}");
            source = cause.source();
        }
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Convert(args) => {
            let grid = convert(&args.manifest, &args.config())?;
            info!("Writing {}", args.output.display());
            grid.save(&args.output)?;
            if let Some(json) = &args.json {
                info!("Writing {}", json.display());
                write_json(&grid.to_store(), json)?;
            }
        }
        Command::Graft(args) => {
            let config = GraftConfig {
                fields: args.fields,
                extra_parameter: args.extra_parameter,
            };
            if graft_files(&args.low, &args.high, &args.output, &config)?.is_none() {
                warn!("Nothing written to {}", args.output.display());
            }
        }
        Command::Zero(args) => {
            zero_file(args.input, args.output, &args.fields)?;
        }
        Command::Subtract(args) => {
            let config = SubtractConfig {
                disable_progress: args.no_progress,
                ..Default::default()
            };
            subtract_runs(&args.large, &args.small, &args.new_run, &config)?;
        }
    }
    Ok(())
}

fn init_logging(cli: &Cli) {
    let result = stderrlog::new()
        .modules([
            "gridtools",
            "gridtools_grid",
            "gridtools_store",
            "gridtools_subtract",
        ])
        .quiet(cli.quiet)
        .verbosity(usize::from(cli.verbose) + 1)
        .init();

    if let Err(e) = result {
        eprintln!("Unable to start logging: {e}");
    }
}
