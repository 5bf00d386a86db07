//! Readers for the per-run cooling maps and component files

// crate modules
use crate::components::Components;
use crate::error::{Error, Result};

// gridtools modules
use gridtools_format::f;

// standard library
use std::path::Path;

// external crates
use log::trace;

/// Per-run cooling map
///
/// The comment lines are kept verbatim so they can be carried into the
/// subtracted map.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CoolingMap {
    /// Comment lines, without line endings
    pub header: Vec<String>,
    /// Temperature of every row
    pub temperature: Vec<f64>,
    /// Total heating rate
    pub heating: Vec<f64>,
    /// Total cooling rate
    pub cooling: Vec<f64>,
    /// Mean molecular weight
    pub mmw: Vec<f64>,
}

impl CoolingMap {
    /// Number of temperature rows
    pub fn len(&self) -> usize {
        self.temperature.len()
    }

    /// True when the map has no data rows
    pub fn is_empty(&self) -> bool {
        self.temperature.is_empty()
    }
}

/// Per-run heating or cooling component breakdown
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComponentTable {
    /// Temperature of every kept row
    pub temperature: Vec<f64>,
    /// Unscaled total heating rate
    pub heating: Vec<f64>,
    /// Unscaled total cooling rate
    pub cooling: Vec<f64>,
    /// Named contributions of every kept row
    pub components: Vec<Components>,
}

/// Read a `<prefix>_run<N>.dat` cooling map
///
/// Lines starting with `#` are header lines, everything else is a row of
/// temperature, heating, cooling and mean molecular weight.
pub fn read_cooling_map<P: AsRef<Path>>(path: P) -> Result<CoolingMap> {
    let (text, source) = read_text(path.as_ref())?;
    let mut map = CoolingMap::default();

    for (n, line) in text.lines().enumerate() {
        if line.starts_with('#') {
            map.header.push(line.to_string());
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }

        let values = line
            .split_whitespace()
            .map(|v| number(v, &source, n))
            .collect::<Result<Vec<f64>>>()?;
        if values.len() < 4 {
            return Err(Error::ParseError(f!(
                "{source}:{} expected 4 columns, found {}",
                n + 1,
                values.len()
            )));
        }

        map.temperature.push(values[0]);
        map.heating.push(values[1]);
        map.cooling.push(values[2]);
        map.mmw.push(values[3]);
    }

    trace!("{source}: {} rows", map.len());
    Ok(map)
}

/// Read a `.heating` or `.cooling` component file
///
/// Only lines starting with a digit (after leading whitespace) are data.
/// Columns are tab separated as depth, temperature, heating, cooling and
/// then pairs of component name and value.
///
/// The simulation may iterate several times at a temperature, in which case
/// only the last row for each temperature is kept.
pub fn read_component_file<P: AsRef<Path>>(path: P) -> Result<ComponentTable> {
    let (text, source) = read_text(path.as_ref())?;

    let rows = text
        .lines()
        .enumerate()
        .map(|(n, line)| (n, line.trim_start()))
        .filter(|(_, line)| line.starts_with(|c: char| c.is_ascii_digit()))
        .map(|(n, line)| {
            let columns: Vec<&str> = line.trim_end_matches(['\r', '\n']).split('\t').collect();
            if columns.len() < 4 {
                return Err(Error::ParseError(f!(
                    "{source}:{} expected at least 4 columns",
                    n + 1
                )));
            }
            let temperature = number(columns[1], &source, n)?;
            Ok((n, temperature, columns))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut table = ComponentTable::default();
    for (i, (n, temperature, columns)) in rows.iter().enumerate() {
        // a later iteration at the same temperature replaces this one
        if rows.get(i + 1).is_some_and(|next| next.1 == *temperature) {
            continue;
        }

        table.temperature.push(*temperature);
        table.heating.push(number(columns[2], &source, *n)?);
        table.cooling.push(number(columns[3], &source, *n)?);
        table.components.push(components(&columns[4..], &source, *n)?);
    }

    trace!("{source}: {} of {} rows kept", table.temperature.len(), rows.len());
    Ok(table)
}

/// Name and value pairs, stopping at the first empty name
fn components(columns: &[&str], source: &str, n: usize) -> Result<Components> {
    columns
        .chunks(2)
        .take_while(|pair| !pair[0].is_empty())
        .map(|pair| {
            let value = pair
                .get(1)
                .ok_or_else(|| Error::ParseError(f!("{source}:{} \"{}\" has no value", n + 1, pair[0])))?;
            Ok((pair[0].to_string(), number(value, source, n)?))
        })
        .collect()
}

fn number(value: &str, source: &str, n: usize) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::ParseError(f!("{source}:{} invalid number \"{value}\"", n + 1)))
}

fn read_text(path: &Path) -> Result<(String, String)> {
    let source = f!("{}", path.display());
    let text = std::fs::read_to_string(path).map_err(|e| Error::MissingRunFile {
        path: source.clone(),
        source: e,
    })?;
    Ok((text, source))
}
