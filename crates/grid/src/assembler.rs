//! Assembly of a full grid from a manifest and its run outputs

// crate modules
use crate::error::Result;
use crate::grid::{Grid, InnerAxis};
use crate::loader::{load_map, FieldAccumulator, MapLayout};
use crate::manifest::parse_manifest;

// gridtools modules
use gridtools_format::f;
use gridtools_store::Attribute;

// standard library
use std::path::Path;

// external crates
use log::{debug, info};

/// Naming of the per-run output files
///
/// Files are named `<prefix>_run<N>[_<label>]<extension>` where `N` is the
/// one-based run number and the prefix is the manifest path without `.run`.
#[derive(Debug, Clone, PartialEq)]
pub struct RunFileNaming {
    /// Optional label inserted after the run number, e.g. a species
    pub label: Option<String>,
    /// File extension including the dot
    pub extension: String,
}

impl Default for RunFileNaming {
    fn default() -> Self {
        Self {
            label: None,
            extension: ".dat".to_string(),
        }
    }
}

impl RunFileNaming {
    /// File name for a zero-based run index
    ///
    /// ```rust
    /// # use gridtools_grid::RunFileNaming;
    /// let naming = RunFileNaming::default();
    /// assert_eq!(naming.file_name("grids/cooling", 0), "grids/cooling_run1.dat");
    ///
    /// let naming = RunFileNaming {
    ///     label: Some("C".into()),
    ///     extension: ".ion".into(),
    /// };
    /// assert_eq!(naming.file_name("ions", 9), "ions_run10_C.ion");
    /// ```
    pub fn file_name(&self, prefix: &str, index: usize) -> String {
        match &self.label {
            Some(label) => f!("{prefix}_run{}_{label}{}", index + 1, self.extension),
            None => f!("{prefix}_run{}{}", index + 1, self.extension),
        }
    }
}

/// Options for [convert()]
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertConfig {
    /// Column layout of the run files
    pub layout: MapLayout,
    /// How run file names are derived from the manifest
    pub naming: RunFileNaming,
    /// Name given to the inner axis
    pub inner_name: String,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            layout: MapLayout::Cooling,
            naming: RunFileNaming::default(),
            inner_name: "Temperature".to_string(),
        }
    }
}

impl ConvertConfig {
    /// Ion balance of a single species, files labelled by the species
    pub fn ion_balance(species: &str, extension: &str) -> Self {
        Self {
            layout: MapLayout::IonBalance {
                species: species.to_string(),
            },
            naming: RunFileNaming {
                label: Some(species.to_string()),
                extension: extension.to_string(),
            },
            ..Default::default()
        }
    }

    /// Emissivity spectra with an energy axis
    pub fn emissivity(extension: &str) -> Self {
        Self {
            layout: MapLayout::Emissivity,
            naming: RunFileNaming {
                label: None,
                extension: extension.to_string(),
            },
            ..Default::default()
        }
    }

    /// Named line channels discovered from the file headers
    pub fn lines(extension: &str) -> Self {
        Self {
            layout: MapLayout::Lines,
            naming: RunFileNaming {
                label: None,
                extension: extension.to_string(),
            },
            ..Default::default()
        }
    }
}

/// Convert a manifest and all of its run outputs into a [Grid]
///
/// Every run is loaded in order and written into the slice of each field at
/// the coordinate decoded from its run index. Any failure aborts the whole
/// conversion.
///
/// ```rust
/// # use gridtools_grid::{convert, ConvertConfig};
/// let grid = convert("./data/cooling/cooling.run", &ConvertConfig::default()).unwrap();
/// assert_eq!(grid.fields["Cooling"].shape(), &[2, 3, 4]);
/// ```
pub fn convert<P: AsRef<Path>>(manifest_path: P, config: &ConvertConfig) -> Result<Grid> {
    let manifest = parse_manifest(manifest_path)?;
    let dims = manifest.dimensions();
    info!(
        "Converting {} runs of {} over {:?}",
        manifest.total_runs,
        manifest.prefix,
        manifest.parameter_names()
    );

    let mut accumulator = FieldAccumulator::new(dims);
    for index in 0..manifest.total_runs {
        let path = config.naming.file_name(&manifest.prefix, index);
        let coordinate = manifest.coordinate(index);
        debug!("{path} -> {coordinate:?}");
        let map = load_map(&path, &config.layout)?;
        accumulator.insert(&coordinate, map, &path)?;
    }

    let energy = accumulator.energy().map(<[f64]>::to_vec);
    let (inner, fields) = accumulator.into_fields();
    let mut grid = Grid::new(
        manifest.parameters,
        InnerAxis::new(config.inner_name.as_str(), inner),
        fields,
    );

    if let Some(energy) = energy {
        for name in grid.fields.keys() {
            grid.attributes
                .entry(name.clone())
                .or_default()
                .insert("Energy".into(), Attribute::F64Array(energy.clone()));
        }
    }

    Ok(grid)
}

/// Convert a manifest and persist the grid to `output`
pub fn convert_to_file<P: AsRef<Path>, Q: AsRef<Path>>(
    manifest_path: P,
    output: Q,
    config: &ConvertConfig,
) -> Result<Grid> {
    let grid = convert(manifest_path, config)?;
    info!("Writing {}", output.as_ref().display());
    grid.save(output)?;
    Ok(grid)
}
