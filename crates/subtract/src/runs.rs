//! Subtraction of two sweeps straight from their run outputs
//!
//! The large sweep is usually a full metallicity grid and the small sweep
//! the matching primordial grid. For every large run the matching small run
//! is found on the shared parameters, then:
//!
//! - heating and cooling are rebuilt from their components
//! - the mean molecular weight is subtracted directly
//!
//! The results are written as new `<prefix>_run<N>.dat` maps next to a new
//! run file, so the output can be converted like any other sweep.

// crate modules
use crate::align::{align, subtract_values};
use crate::components::{subtract_components, ComponentRules};
use crate::error::{Error, Result};
use crate::matching::{find_match, shared_columns};
use crate::reader::{read_component_file, read_cooling_map, ComponentTable, CoolingMap};
use crate::writer::{rewrite_run_header, write_cooling_map, write_lines};

// gridtools modules
use gridtools_format::{f, OptionFormat};
use gridtools_grid::{parse_manifest, Manifest};

// standard library
use std::path::{Path, PathBuf};

// external crates
use kdam::{Bar, BarBuilder, BarExt};
use log::{debug, info, warn};

/// Options for [subtract_runs()]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubtractConfig {
    /// Component rules for heating and cooling
    pub rules: ComponentRules,
    /// Do not print the progress bar
    pub disable_progress: bool,
}

/// Summary of a run-level subtraction
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunSummary {
    /// Large and small run numbers of every subtracted pair
    pub matched: Vec<(usize, usize)>,
    /// Large run numbers with no matching small run
    pub skipped: Vec<usize>,
    /// Prefix of the written maps
    pub prefix: String,
}

/// Subtract the outputs of `small_run` from those of `large_run`
///
/// The new run file is a copy of the large run file with its header
/// pointing at the new maps. Each subtracted map is written as
/// `<new prefix>_run<N>.dat` where `N` is the large run number.
///
/// Every parameter in the small run table must also be in the large run
/// table. Large runs without a partner are skipped with a warning.
pub fn subtract_runs<P, Q, R>(
    large_run: P,
    small_run: Q,
    new_run: R,
    config: &SubtractConfig,
) -> Result<RunSummary>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    R: AsRef<Path>,
{
    let large_run = large_run.as_ref();
    info!("Loading grid data: {}", large_run.display());
    let large = parse_manifest(large_run)?;
    info!("Loading grid data: {}", small_run.as_ref().display());
    let small = parse_manifest(small_run)?;

    let columns = shared_columns(&large.run_columns, &small.run_columns)?;
    let large_records = large.checked_runs()?;
    let small_records = small.checked_runs()?;
    let output = OutputNames::new(new_run.as_ref())?;
    let timestamp = timestamp();

    // header of the new run file
    info!("Writing run file: {}", output.run_file.display());
    let lines = std::fs::read_to_string(large_run)?
        .lines()
        .map(String::from)
        .collect::<Vec<String>>();
    write_lines(
        &output.run_file,
        &rewrite_run_header(&lines, &timestamp, &output.short_prefix, &output.base_dir),
    )?;

    let mut summary = RunSummary {
        prefix: output.prefix.clone(),
        ..Default::default()
    };

    let mut progress_bar = init_progress_bar(large_records.len(), config.disable_progress)?;
    if !config.disable_progress {
        progress_bar.refresh()?;
    }

    let mut large_runs: Vec<_> = large_records.iter().collect();
    large_runs.sort_by_key(|r| r.number);

    for record in large_runs {
        let candidates = small_records.iter().map(|r| (r.number, r.values.as_slice()));
        match find_match(&record.values, &columns, candidates) {
            Some(partner) => {
                debug!("Subtracting maps: {} - {partner}", record.number);
                let pair = MapPair {
                    large: &large,
                    small: &small,
                    large_number: record.number,
                    small_number: partner,
                };
                pair.subtract(&output.prefix, &timestamp, &config.rules)?;
                summary.matched.push((record.number, partner));
            }
            None => {
                warn!("No match found for large run {}", record.number);
                summary.skipped.push(record.number);
            }
        }
        progress_bar.update(1)?;
    }

    // need an extra line for clean spacing if the progress bar is printed
    if !config.disable_progress {
        eprintln!()
    };

    info!(
        "Subtracted {} maps, skipped {}",
        summary.matched.len(),
        summary.skipped.len()
    );
    Ok(summary)
}

/// Names derived from the path of the new run file
struct OutputNames {
    run_file: PathBuf,
    /// Path prefix of the new maps
    prefix: String,
    /// File name without the extension
    short_prefix: String,
    /// Directory of the new run file, with a trailing slash
    base_dir: String,
}

impl OutputNames {
    fn new(run_file: &Path) -> Result<Self> {
        let short_prefix = run_file
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .ok_or_else(|| Error::InvalidOutputName(f!("{}", run_file.display())))?;

        let parent = run_file.parent().filter(|p| !p.as_os_str().is_empty());
        let base_dir = match parent {
            Some(dir) => {
                if !dir.is_dir() {
                    std::fs::create_dir_all(dir)?;
                }
                f!("{}/", dir.display())
            }
            None => "./".to_string(),
        };

        Ok(Self {
            run_file: run_file.to_path_buf(),
            prefix: f!("{}", run_file.with_extension("").display()),
            short_prefix,
            base_dir,
        })
    }
}

/// One large run and its small partner
struct MapPair<'a> {
    large: &'a Manifest,
    small: &'a Manifest,
    large_number: usize,
    small_number: usize,
}

impl MapPair<'_> {
    /// Read both sets of outputs, subtract, and write the new map
    fn subtract(&self, new_prefix: &str, timestamp: &str, rules: &ComponentRules) -> Result<()> {
        let (large_map, large_heating, large_cooling) =
            read_outputs(&self.large.prefix, self.large_number)?;
        let (small_map, small_heating, small_cooling) =
            read_outputs(&self.small.prefix, self.small_number)?;

        let alignment = align(&large_map.temperature, &small_map.temperature);
        debug!(
            "Offset {} with {} unmatched temperatures",
            alignment.offset(0).display(),
            alignment.unmatched()
        );

        let heating = subtract_components(
            "heating",
            &large_map.heating,
            &large_heating.heating,
            &large_heating.components,
            &small_heating.components,
            &alignment,
            rules,
        );
        let cooling = subtract_components(
            "cooling",
            &large_map.cooling,
            &large_cooling.cooling,
            &large_cooling.components,
            &small_cooling.components,
            &alignment,
            rules,
        );
        let mmw = subtract_values(&large_map.mmw, &small_map.mmw, &alignment);

        write_cooling_map(
            f!("{new_prefix}_run{}.dat", self.large_number),
            timestamp,
            &large_map.header,
            &large_map.temperature,
            &heating.totals,
            &cooling.totals,
            &mmw,
        )
    }
}

/// Map and component files of one run, checked for equal lengths
fn read_outputs(prefix: &str, number: usize) -> Result<(CoolingMap, ComponentTable, ComponentTable)> {
    let map = read_cooling_map(f!("{prefix}_run{number}.dat"))?;

    let mut tables = Vec::with_capacity(2);
    for extension in ["heating", "cooling"] {
        let path = f!("{prefix}_run{number}.{extension}");
        let table = read_component_file(&path)?;
        if table.temperature.len() != map.len() {
            return Err(Error::LengthMismatch {
                path,
                expected: map.len(),
                found: table.temperature.len(),
            });
        }
        tables.push(table);
    }

    let cooling = tables.pop().unwrap_or_default();
    let heating = tables.pop().unwrap_or_default();
    Ok((map, heating, cooling))
}

/// Local time in the same layout as the simulation headers
fn timestamp() -> String {
    chrono::Local::now()
        .format("%a %b %e %H:%M:%S %Y")
        .to_string()
}

/// Initialise the progress bar, if wanted
fn init_progress_bar(total: usize, disable: bool) -> Result<Bar> {
    BarBuilder::default()
        .total(total)
        .desc("Subtracting maps")
        .unit(" maps")
        .disable(disable)
        .build()
        .map_err(Error::ProgressBar)
}
