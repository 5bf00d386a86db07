//! Parsing of run manifests
//!
//! A manifest (`*.run`) is written by the simulation harness and declares the
//! swept parameters followed by a table of every run:
//!
//! ```text
//! # Run started Mon Mar  4 10:12:01 2024
//! # outputFilePrefix = cooling
//! # outputDir = grids/
//! # Loop commands and values:
//! # hden: -6 -5
//! # metals: -1 0 1
//! #
//! #run	hden	metals
//! 1	-6	-1
//! 2	-6	0
//! ...
//! ```
//!
//! The per-run output files are named from the manifest path, so
//! `grids/cooling.run` produces `grids/cooling_run1.dat` and so on.

// crate modules
use crate::error::{Error, Result};
use crate::index::decode;
use crate::parsers;

// gridtools modules
use gridtools_format::f;

// standard library
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

// external crates
use log::{debug, trace, warn};

/// One swept parameter and the values it takes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Parameter {
    /// Parameter name as written in the manifest, e.g. `hden`
    pub name: String,
    /// Every value of the parameter in sweep order
    pub values: Vec<f64>,
}

impl Parameter {
    /// Create a parameter from a name and list of values
    pub fn new<S: Into<String>>(name: S, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Number of values, i.e. the cardinality of this sweep dimension
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the parameter has no values
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Index of an exact value match
    pub fn position(&self, value: f64) -> Option<usize> {
        self.values.iter().position(|v| *v == value)
    }
}

/// One row of the per-run table
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    /// Run number as written, starting from 1
    pub number: usize,
    /// Parameter values in the column order of the table header
    pub values: Vec<f64>,
}

/// Everything extracted from a run manifest
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Manifest {
    /// Path of the manifest without the `.run` extension
    pub prefix: String,
    /// Swept parameters in sweep order, outermost first
    pub parameters: Vec<Parameter>,
    /// Number of runs declared by the run table
    pub total_runs: usize,
    /// Column names of the run table
    pub run_columns: Vec<String>,
    /// Raw lines of the run table, one per run
    pub table: Vec<String>,
    /// Rows of the run table with a run number and numeric values
    pub runs: Vec<RunRecord>,
    /// Every line up to and including the run table header
    pub header: Vec<String>,
    /// Value of `# outputFilePrefix`, if present
    pub output_prefix: Option<String>,
    /// Value of `# outputDir`, if present
    pub output_dir: Option<String>,
}

impl Manifest {
    /// Cardinality of every sweep dimension
    pub fn dimensions(&self) -> Vec<usize> {
        self.parameters.iter().map(Parameter::len).collect()
    }

    /// Names of the swept parameters
    pub fn parameter_names(&self) -> Vec<&str> {
        self.parameters.iter().map(|p| p.name.as_str()).collect()
    }

    /// Grid coordinate of a run index (zero based)
    pub fn coordinate(&self, index: usize) -> Vec<usize> {
        decode(&self.dimensions(), index)
    }

    /// Find a run record by its run number
    pub fn run(&self, number: usize) -> Option<&RunRecord> {
        self.runs.iter().find(|r| r.number == number)
    }

    /// Every run record, failing on the first row that is not numeric
    ///
    /// Conversion only needs the number of runs, but matching runs between
    /// two sweeps needs every row of the table.
    pub fn checked_runs(&self) -> Result<&[RunRecord]> {
        if let Some(n) = self.table.iter().position(|line| run_record(line).is_none()) {
            return Err(Error::ParseError(f!(
                "{}.run: bad run entry \"{}\"",
                self.prefix,
                self.table[n].trim()
            )));
        }
        Ok(&self.runs)
    }

    /// Value of a named column for a run record
    pub fn run_value(&self, record: &RunRecord, column: &str) -> Option<f64> {
        self.run_columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| record.values.get(i).copied())
    }
}

/// Parse a run manifest
///
/// Extracts the swept parameters and the per-run table, then checks that the
/// number of runs is the product of every parameter cardinality.
///
/// ```rust
/// # use gridtools_grid::parse_manifest;
/// let manifest = parse_manifest("./data/cooling/cooling.run").unwrap();
/// assert_eq!(manifest.dimensions(), vec![2, 3]);
/// assert_eq!(manifest.total_runs, 6);
/// ```
pub fn parse_manifest<P: AsRef<Path>>(path: P) -> Result<Manifest> {
    let path = path.as_ref();
    let prefix = manifest_prefix(path)?;
    debug!("Reading manifest {}", path.display());

    let reader = BufReader::new(File::open(path)?);
    let lines = reader.lines().collect::<std::io::Result<Vec<String>>>()?;

    let mut manifest = parse_lines(&lines, &f!("{}", path.display()))?;
    manifest.prefix = prefix;
    Ok(manifest)
}

/// Path of the manifest without the `.run` extension
fn manifest_prefix(path: &Path) -> Result<String> {
    let name = f!("{}", path.display());
    match name.strip_suffix(".run") {
        Some(prefix) => Ok(prefix.to_string()),
        None => Err(Error::InvalidManifestName(name)),
    }
}

/// Parser states for the manifest header
#[derive(Clone, Copy)]
enum State {
    Scanning,
    Parameters,
}

/// Parse the manifest content, `source` only used for error context
pub(crate) fn parse_lines(lines: &[String], source: &str) -> Result<Manifest> {
    let mut manifest = Manifest::default();
    let mut state = State::Scanning;
    let mut table_start = None;

    for (n, raw) in lines.iter().enumerate() {
        let line = raw.trim();
        manifest.header.push(raw.clone());

        match state {
            State::Parameters => {
                if parsers::is_block_end(line) {
                    state = State::Scanning;
                } else {
                    let parameter = parameter(line)
                        .map_err(|e| Error::ParseError(f!("{source}:{} {e}", n + 1)))?;
                    trace!("{} = {:?}", parameter.name, parameter.values);
                    manifest.parameters.push(parameter);
                }
            }
            State::Scanning => {
                if parsers::is_parameter_block(line) {
                    state = State::Parameters;
                } else if parsers::is_run_table(line) {
                    manifest.run_columns = run_columns(raw);
                    table_start = Some(n + 1);
                    break;
                } else if parsers::is_output_prefix(line) {
                    manifest.output_prefix = parsers::header_value(line).map(String::from);
                } else if parsers::is_output_dir(line) {
                    manifest.output_dir = parsers::header_value(line).map(String::from);
                }
            }
        }
    }

    // everything after the marker is one run per line
    let table = match table_start {
        Some(start) => &lines[start..],
        None => &lines[lines.len()..],
    };
    manifest.total_runs = table.len();

    let expected: usize = manifest.parameters.iter().map(Parameter::len).product();
    if manifest.total_runs != expected {
        return Err(Error::RunCountMismatch {
            path: source.to_string(),
            found: manifest.total_runs,
            expected,
        });
    }

    manifest.table = table.to_vec();
    manifest.runs = table.iter().filter_map(|line| run_record(line)).collect();
    if manifest.runs.len() != manifest.total_runs {
        warn!(
            "{source}: {} of {} run entries are not numeric",
            manifest.total_runs - manifest.runs.len(),
            manifest.total_runs
        );
    }

    debug!(
        "Found {} parameters {:?} over {} runs",
        manifest.parameters.len(),
        manifest.parameter_names(),
        manifest.total_runs
    );

    Ok(manifest)
}

/// Parse a `# name: values` parameter line
fn parameter(line: &str) -> std::result::Result<Parameter, String> {
    let (_, (marker_name, values)) =
        parsers::parameter_line(line).map_err(|_| f!("expected \"<name>: <values>\" in \"{line}\""))?;

    // the name follows a fixed 2 character marker
    let name = marker_name.get(2..).unwrap_or_default().trim().to_string();

    let values = if let Ok((_, (start, stop, step))) = parsers::compact_range(values) {
        expand_range(start, stop, step)?
    } else {
        parsers::vector_of_f64(values)
            .map(|(_, v)| v)
            .map_err(|_| f!("invalid values for \"{name}\": \"{values}\""))?
    };

    Ok(Parameter { name, values })
}

/// Expand a `(start;stop;step)` range, including `stop`
///
/// Uses `stop + step/2` as the exclusive bound so that accumulated floating
/// point error in the step does not drop the end point. A negative step
/// walks down from `start`.
///
/// ```rust
/// # use gridtools_grid::expand_range;
/// assert_eq!(expand_range(0.0, 1.0, 0.5).unwrap(), vec![0.0, 0.5, 1.0]);
/// assert_eq!(expand_range(1.0, 0.0, -0.5).unwrap(), vec![1.0, 0.5, 0.0]);
/// ```
pub fn expand_range(start: f64, stop: f64, step: f64) -> std::result::Result<Vec<f64>, String> {
    if step == 0.0 || !step.is_finite() || !start.is_finite() || !stop.is_finite() {
        return Err(f!("invalid range ({start};{stop};{step})"));
    }

    let n = ((stop + step / 2.0 - start) / step).ceil().max(0.0) as usize;
    Ok((0..n).map(|k| start + k as f64 * step).collect())
}

/// Column names from the `#run` table header, which is tab separated
fn run_columns(line: &str) -> Vec<String> {
    line.trim_end()
        .split('\t')
        .skip(1)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// A `number<TAB>value<TAB>value...` row of the run table
fn run_record(line: &str) -> Option<RunRecord> {
    let mut tokens: Vec<&str> = line.trim().split('\t').map(str::trim).collect();
    if tokens.len() < 2 {
        tokens = line.split_whitespace().collect();
    }

    let (number, values) = tokens.split_first()?;
    let number = number.parse::<usize>().ok()?;
    let values = values
        .iter()
        .map(|v| v.parse::<f64>().ok())
        .collect::<Option<Vec<f64>>>()?;

    Some(RunRecord { number, values })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(String::from).collect()
    }

    fn sweep(runs: usize) -> Vec<String> {
        let mut text = lines(
            "# outputFilePrefix = cooling\n\
             # outputDir = grids/\n\
             # Loop commands and values:\n\
             # A: 1 2\n\
             # B: 3 4 5\n\
             #\n\
             #run\tA\tB",
        );
        for n in 0..runs {
            text.push(f!("{}\t{}\t{}", n + 1, 1 + n / 3, 3 + n % 3));
        }
        text
    }

    #[test]
    fn run_count_matches_product() {
        let manifest = parse_lines(&sweep(6), "test").unwrap();
        assert_eq!(manifest.parameter_names(), vec!["A", "B"]);
        assert_eq!(manifest.parameters[1].values, vec![3.0, 4.0, 5.0]);
        assert_eq!(manifest.total_runs, 6);
        assert_eq!(manifest.run_columns, vec!["A", "B"]);
        assert_eq!(manifest.output_prefix.as_deref(), Some("cooling"));
        assert_eq!(manifest.output_dir.as_deref(), Some("grids/"));

        let record = manifest.run(5).unwrap();
        assert_eq!(manifest.run_value(record, "A"), Some(2.0));
        assert_eq!(manifest.run_value(record, "B"), Some(4.0));
    }

    #[test]
    fn run_count_mismatch() {
        for runs in [5, 7] {
            let result = parse_lines(&sweep(runs), "test");
            assert!(matches!(
                result,
                Err(Error::RunCountMismatch {
                    found,
                    expected: 6,
                    ..
                }) if found == runs
            ));
        }
    }

    #[test]
    fn text_run_table_still_counts() {
        let text = lines("# Loop commands and values:\n# A: 1 2\n#\n#run\tA\n1\tlow\n2\thigh");
        let manifest = parse_lines(&text, "test").unwrap();
        assert_eq!(manifest.total_runs, 2);
        assert_eq!(manifest.table, vec!["1\tlow", "2\thigh"]);
        assert!(manifest.runs.is_empty());
        assert!(matches!(manifest.checked_runs(), Err(Error::ParseError(_))));
    }

    #[test]
    fn numeric_run_table_is_checked() {
        let manifest = parse_lines(&sweep(6), "test").unwrap();
        assert_eq!(manifest.checked_runs().unwrap().len(), 6);
    }

    #[test]
    fn missing_run_table() {
        let text = lines("# Loop commands and values:\n# A: 1 2\n#");
        assert!(matches!(
            parse_lines(&text, "test"),
            Err(Error::RunCountMismatch { found: 0, .. })
        ));
    }

    #[test]
    fn compact_range_parameter() {
        let parameter = parameter("# x: (0;1;0.5)").unwrap();
        assert_eq!(parameter.name, "x");
        assert_eq!(parameter.values, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn range_endpoint_survives_rounding() {
        let values = expand_range(0.0, 1.0, 0.1).unwrap();
        assert_eq!(values.len(), 11);
        assert!((values[10] - 1.0).abs() < 1e-12);

        assert_eq!(expand_range(-4.0, 2.0, 2.0).unwrap(), vec![-4.0, -2.0, 0.0, 2.0]);
        assert!(expand_range(0.0, 1.0, 0.0).is_err());
        assert!(expand_range(0.0, 1.0, f64::NAN).is_err());
        assert!(expand_range(0.0, f64::INFINITY, 1.0).is_err());
    }

    #[test]
    fn descending_range() {
        assert_eq!(expand_range(1.0, 0.0, -0.5).unwrap(), vec![1.0, 0.5, 0.0]);
        assert_eq!(expand_range(2.0, -4.0, -2.0).unwrap(), vec![2.0, 0.0, -2.0, -4.0]);

        // a step pointing away from the stop value gives nothing
        assert!(expand_range(0.0, 1.0, -0.5).unwrap().is_empty());

        let parameter = parameter("# x: (1;0;-0.5)").unwrap();
        assert_eq!(parameter.values, vec![1.0, 0.5, 0.0]);
    }

    #[test]
    fn double_marker_names() {
        let parameter = parameter("## metal free electron fraction: 0.1 0.5").unwrap();
        assert_eq!(parameter.name, "metal free electron fraction");
        assert_eq!(parameter.values, vec![0.1, 0.5]);
    }

    #[test]
    fn bad_parameter_line() {
        let text = lines("# Loop commands and values:\n# A 1 2\n#\n#run\tA");
        assert!(matches!(parse_lines(&text, "test"), Err(Error::ParseError(_))));
    }

    #[test]
    fn manifest_suffix() {
        assert_eq!(
            manifest_prefix(Path::new("grids/cooling.run")).unwrap(),
            "grids/cooling"
        );
        assert!(matches!(
            manifest_prefix(Path::new("grids/cooling.txt")),
            Err(Error::InvalidManifestName(_))
        ));
    }
}
