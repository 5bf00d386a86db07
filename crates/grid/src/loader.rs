//! Loading of per-run ASCII maps into grid fields
//!
//! Every run writes one whitespace delimited table. The first column is the
//! inner axis (usually temperature) and the remaining columns are field
//! values. Lines starting with `#` are comments, except that the comment
//! immediately before the first row of data may name the columns.
//!
//! ```text
//! #Te       Heating       Cooling       MMW
//! 1.000e+01 2.105e-25     3.317e-24     1.227
//! 1.259e+01 2.136e-25     3.372e-24     1.227
//! ```
//!
//! The [MapLayout] decides how columns are turned into fields. Fixed layouts
//! know their channel names, while [MapLayout::Lines] discovers them from the
//! file itself.

// crate modules
use crate::error::{Error, Result};

// gridtools modules
use gridtools_format::f;

// standard library
use std::collections::BTreeMap;
use std::path::Path;

// external crates
use log::trace;
use ndarray::{Array1, Array2, ArrayD, ArrayViewMut, Axis, IxDyn};

/// Column layouts of the per-run map files
#[derive(Debug, Clone, PartialEq, Default)]
pub enum MapLayout {
    /// Fixed `Heating`, `Cooling`, `MMW` channels
    #[default]
    Cooling,
    /// One column per ionisation stage of a single species
    IonBalance {
        /// Element symbol, also used as the field name and file label
        species: String,
    },
    /// One column per photon energy, energies from a `#E [keV]` comment
    ///
    /// A map with a single energy column gives a plain `[inner]` field.
    Emissivity,
    /// Any number of named channels taken from the header comment
    Lines,
}

impl MapLayout {
    /// Fixed channel names of the cooling layout
    pub const COOLING_FIELDS: [&'static str; 3] = ["Heating", "Cooling", "MMW"];

    /// Name of the single emissivity field
    pub const EMISSIVITY_FIELD: &'static str = "Emissivity";
}

/// Data extracted from a single run file
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunMap {
    /// Inner axis values from the first column
    pub inner: Vec<f64>,
    /// Field name and values, in file order
    ///
    /// Values have shape `[inner]` for single channels or
    /// `[inner, components]` for multi-component fields.
    pub fields: Vec<(String, ArrayD<f64>)>,
    /// Energy axis of the emissivity layout, if given
    pub energy: Option<Vec<f64>>,
}

/// Read one run file according to the layout
///
/// ```rust
/// # use gridtools_grid::{load_map, MapLayout};
/// let map = load_map("./data/cooling/cooling_run1.dat", &MapLayout::Cooling).unwrap();
/// assert_eq!(map.inner.len(), 4);
/// assert_eq!(map.fields[0].0, "Heating");
/// ```
pub fn load_map<P: AsRef<Path>>(path: P, layout: &MapLayout) -> Result<RunMap> {
    let path = path.as_ref();
    let source = f!("{}", path.display());
    let text = std::fs::read_to_string(path).map_err(|e| Error::MissingRunFile {
        path: source.clone(),
        source: e,
    })?;
    parse_map(&text, layout, &source)
}

/// Parse map file content, `source` only used for error context
pub(crate) fn parse_map(text: &str, layout: &MapLayout, source: &str) -> Result<RunMap> {
    let mut header: Option<&str> = None;
    let mut previous: Option<&str> = None;
    let mut energy = None;
    let mut rows: Vec<Vec<f64>> = Vec::new();

    for (n, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('#') {
            if let Some(values) = line.strip_prefix("#E [keV]") {
                energy = Some(numbers(values, source, n)?);
            }
            previous = Some(line);
            continue;
        }

        // the comment just before the first data row names the columns
        if rows.is_empty() {
            header = previous;
        }

        let row = numbers(line, source, n)?;
        if let Some(first) = rows.first() {
            if first.len() != row.len() {
                return Err(Error::ParseError(f!(
                    "{source}:{} expected {} columns, found {}",
                    n + 1,
                    first.len(),
                    row.len()
                )));
            }
        }
        rows.push(row);
        previous = None;
    }

    let n_columns = rows.first().map(Vec::len).unwrap_or_default();
    if n_columns < 2 {
        return Err(Error::ParseError(f!("{source} contains no data columns")));
    }

    let inner: Vec<f64> = rows.iter().map(|r| r[0]).collect();
    let channel = |c: usize| -> ArrayD<f64> {
        Array1::from_iter(rows.iter().map(|r| r[c])).into_dyn()
    };
    let components = || -> ArrayD<f64> {
        Array2::from_shape_fn((rows.len(), n_columns - 1), |(i, j)| rows[i][j + 1]).into_dyn()
    };

    let fields = match layout {
        MapLayout::Cooling => {
            if n_columns < 4 {
                return Err(Error::ParseError(f!(
                    "{source} has {n_columns} columns, cooling maps need at least 4"
                )));
            }
            MapLayout::COOLING_FIELDS
                .iter()
                .enumerate()
                .map(|(i, name)| (name.to_string(), channel(i + 1)))
                .collect()
        }
        MapLayout::IonBalance { species } => vec![(species.clone(), components())],
        MapLayout::Emissivity => {
            if let Some(e) = &energy {
                if e.len() != n_columns - 1 {
                    return Err(Error::ShapeMismatch {
                        field: MapLayout::EMISSIVITY_FIELD.to_string(),
                        context: source.to_string(),
                        expected: vec![e.len()],
                        found: vec![n_columns - 1],
                    });
                }
            }
            // a single energy bin is stored as a plain channel
            let values = match n_columns {
                2 => channel(1),
                _ => components(),
            };
            vec![(MapLayout::EMISSIVITY_FIELD.to_string(), values)]
        }
        MapLayout::Lines => {
            let names = header
                .map(column_names)
                .ok_or_else(|| Error::ParseError(f!("{source} has no column header")))?;
            if names.len() != n_columns - 1 {
                return Err(Error::ParseError(f!(
                    "{source} names {} columns but has {} data columns",
                    names.len(),
                    n_columns - 1
                )));
            }
            names
                .into_iter()
                .enumerate()
                .map(|(i, name)| (name, channel(i + 1)))
                .collect()
        }
    };

    Ok(RunMap {
        inner,
        fields,
        energy,
    })
}

/// Field names from a header comment, skipping the inner axis column
fn column_names(header: &str) -> Vec<String> {
    let tokens: Vec<&str> = if header.contains('\t') {
        header.split('\t').map(str::trim).collect()
    } else {
        header.split_whitespace().collect()
    };
    tokens
        .into_iter()
        .skip(1)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Whitespace separated numbers on a single line
fn numbers(line: &str, source: &str, n: usize) -> Result<Vec<f64>> {
    line.split_whitespace()
        .map(|v| {
            v.parse::<f64>()
                .map_err(|_| Error::ParseError(f!("{source}:{} invalid number \"{v}\"", n + 1)))
        })
        .collect()
}

/// Collects run maps into dense arrays spanning the whole sweep
///
/// Arrays are allocated from the first run inserted with shape
/// `sweep + field shape`, and zero filled. The inner axis is recorded once
/// from that first run and is assumed identical for every later run.
#[derive(Debug, Clone, Default)]
pub struct FieldAccumulator {
    sweep: Vec<usize>,
    inner: Option<Vec<f64>>,
    energy: Option<Vec<f64>>,
    fields: BTreeMap<String, ArrayD<f64>>,
}

impl FieldAccumulator {
    /// New accumulator for a sweep with the given dimensions
    pub fn new(sweep: Vec<usize>) -> Self {
        Self {
            sweep,
            ..Default::default()
        }
    }

    /// Write a run into the slice of every field at `coordinate`
    ///
    /// The `source` is only used for error context.
    pub fn insert(&mut self, coordinate: &[usize], run: RunMap, source: &str) -> Result<()> {
        assert_eq!(
            coordinate.len(),
            self.sweep.len(),
            "coordinate {coordinate:?} does not match sweep {:?}",
            self.sweep
        );

        if self.inner.is_none() {
            self.allocate(&run);
        }

        for (name, values) in run.fields {
            let array = self
                .fields
                .get_mut(&name)
                .ok_or_else(|| Error::FieldNotFound {
                    field: name.clone(),
                    context: f!("first run, but present in {source}"),
                })?;

            let expected = &array.shape()[self.sweep.len()..];
            if expected != values.shape() {
                return Err(Error::ShapeMismatch {
                    field: name,
                    context: source.to_string(),
                    expected: expected.to_vec(),
                    found: values.shape().to_vec(),
                });
            }

            trace!("{name} -> {coordinate:?}");
            slice_at(array, coordinate).assign(&values);
        }

        Ok(())
    }

    /// Set up zeroed arrays and the inner axis from the first run
    fn allocate(&mut self, run: &RunMap) {
        for (name, values) in &run.fields {
            let mut shape = self.sweep.clone();
            shape.extend_from_slice(values.shape());
            self.fields.insert(name.clone(), ArrayD::zeros(IxDyn(&shape)));
        }
        self.inner = Some(run.inner.clone());
        self.energy = run.energy.clone();
    }

    /// Inner axis recorded from the first run
    pub fn inner(&self) -> Option<&[f64]> {
        self.inner.as_deref()
    }

    /// Energy axis recorded from the first run
    pub fn energy(&self) -> Option<&[f64]> {
        self.energy.as_deref()
    }

    /// Hand over the inner axis and the filled arrays
    pub fn into_fields(self) -> (Vec<f64>, BTreeMap<String, ArrayD<f64>>) {
        (self.inner.unwrap_or_default(), self.fields)
    }
}

/// Mutable view of the trailing axes at a sweep coordinate
pub(crate) fn slice_at<'a>(
    array: &'a mut ArrayD<f64>,
    coordinate: &[usize],
) -> ArrayViewMut<'a, f64, IxDyn> {
    let mut view = array.view_mut();
    for &c in coordinate {
        view = view.index_axis_move(Axis(0), c);
    }
    view
}
