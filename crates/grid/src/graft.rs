//! Grafting of two grids with different numbers of swept parameters
//!
//! A low temperature grid is often swept over one more parameter than the
//! matching high temperature grid, typically a fixed electron fraction that
//! is only meaningful at low temperature. Grafting replicates the high grid
//! along that extra axis and joins both along the inner axis.

// crate modules
use crate::error::{Error, Result};
use crate::grid::{Grid, InnerAxis};

// standard library
use std::collections::BTreeMap;
use std::path::Path;

// external crates
use log::{debug, info, warn};
use ndarray::{concatenate, ArrayD, Axis, IxDyn, Slice};

/// Options for [graft()]
#[derive(Debug, Clone, PartialEq)]
pub struct GraftConfig {
    /// Fields to join, every one must exist in both grids
    pub fields: Vec<String>,
    /// Name of the parameter only swept in the low grid
    pub extra_parameter: String,
}

impl Default for GraftConfig {
    fn default() -> Self {
        Self {
            fields: vec!["Heating".into(), "Cooling".into(), "MMW".into()],
            extra_parameter: "metal free electron fraction".into(),
        }
    }
}

/// Join a high grid onto a low grid along the inner axis
///
/// The `high` grid must have every parameter of `low` except the extra
/// parameter. Returns `Ok(None)` if `low` has no parameter with that name.
///
/// When the last inner value of `low` is exactly the first inner value of
/// `high`, the duplicate boundary sample is taken from `low` only. Fields not
/// listed in the config are not carried into the result.
pub fn graft(low: &Grid, high: &Grid, config: &GraftConfig) -> Result<Option<Grid>> {
    let Some(extra_dim) = low.find_parameter(&config.extra_parameter) else {
        warn!(
            "Parameter \"{}\" not found in low grid",
            config.extra_parameter
        );
        return Ok(None);
    };
    debug!("Extra parameter at dimension {extra_dim}");

    let low_dims = low.dimensions();
    let mut expected_dims = low_dims.clone();
    expected_dims.remove(extra_dim);
    if high.dimensions() != expected_dims {
        return Err(Error::ShapeMismatch {
            field: "parameters".into(),
            context: "high grid".into(),
            expected: expected_dims,
            found: high.dimensions(),
        });
    }

    let redundant = matches!(
        (low.inner.values.last(), high.inner.values.first()),
        (Some(l), Some(h)) if l == h
    );
    let skip = usize::from(redundant);
    if redundant {
        debug!("Dropping shared boundary sample {}", high.inner.values[0]);
    }

    let mut values = low.inner.values.clone();
    values.extend_from_slice(&high.inner.values[skip..]);
    let inner = InnerAxis::new(low.inner.name.as_str(), values);

    // the inner axis follows the sweep axes
    let inner_axis = Axis(low_dims.len());
    let mut fields = BTreeMap::new();
    for name in &config.fields {
        low.check_field(name, "low grid")?;
        high.check_field(name, "high grid")?;

        let low_field = low.require_field(name, "low grid")?;
        let high_field = add_grid_dimension(
            high.require_field(name, "high grid")?,
            extra_dim,
            low_dims[extra_dim],
        );
        let high_view = high_field.slice_axis(inner_axis, Slice::from(skip..));

        let found = high_view.shape().to_vec();
        let joined = concatenate(inner_axis, &[low_field.view(), high_view]).map_err(|_| {
            Error::ShapeMismatch {
                field: name.clone(),
                context: "graft".into(),
                expected: low_field.shape().to_vec(),
                found,
            }
        })?;
        fields.insert(name.clone(), joined);
    }

    for name in low.fields.keys().filter(|n| !config.fields.contains(n)) {
        warn!("Field \"{name}\" not grafted, leaving it out");
    }

    let mut attributes = BTreeMap::new();
    for name in fields.keys().chain(std::iter::once(&inner.name)) {
        if let Some(attrs) = low.attributes.get(name) {
            attributes.insert(name.clone(), attrs.clone());
        }
    }

    let mut grid = Grid {
        parameters: low.parameters.clone(),
        inner,
        fields,
        attributes,
    };
    grid.refresh_dimensions();

    info!(
        "Grafted grid {:?} x {}",
        grid.dimensions(),
        grid.inner.len()
    );
    Ok(Some(grid))
}

/// Replicate an array along a new axis inserted at `dimension`
///
/// Every slice along the new axis is identical to the input.
///
/// ```rust
/// # use gridtools_grid::add_grid_dimension;
/// # use ndarray::{ArrayD, IxDyn};
/// let array = ArrayD::from_shape_fn(IxDyn(&[2, 3]), |ix| (ix[0] * 3 + ix[1]) as f64);
/// let grown = add_grid_dimension(&array, 1, 4);
/// assert_eq!(grown.shape(), &[2, 4, 3]);
/// assert_eq!(grown[[1, 3, 2]], array[[1, 2]]);
/// ```
///
/// # Panics
///
/// The `dimension` must be no larger than the rank of `array`.
pub fn add_grid_dimension(array: &ArrayD<f64>, dimension: usize, size: usize) -> ArrayD<f64> {
    let mut shape = array.shape().to_vec();
    shape.insert(dimension, size);

    let expanded = array.view().insert_axis(Axis(dimension));
    let mut grown = ArrayD::zeros(IxDyn(&shape));
    grown.assign(&expanded);
    grown
}

/// Graft two stored grids and write the result to `output`
///
/// Nothing is written when the extra parameter is missing, in which case
/// `Ok(None)` is returned as for [graft()].
pub fn graft_files<P, Q, R>(
    low_path: P,
    high_path: Q,
    output: R,
    config: &GraftConfig,
) -> Result<Option<Grid>>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    R: AsRef<Path>,
{
    info!("Reading {}", low_path.as_ref().display());
    let low = Grid::load(low_path)?;
    info!("Reading {}", high_path.as_ref().display());
    let high = Grid::load(high_path)?;

    let grafted = graft(&low, &high, config)?;
    if let Some(grid) = &grafted {
        info!("Writing {}", output.as_ref().display());
        grid.save(output)?;
    }
    Ok(grafted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::Parameter;
    use ndarray::Dimension;

    fn grid(parameters: Vec<Parameter>, inner: Vec<f64>, offset: f64) -> Grid {
        let mut shape: Vec<usize> = parameters.iter().map(Parameter::len).collect();
        shape.push(inner.len());
        let array = ArrayD::from_shape_fn(IxDyn(&shape), |ix| {
            offset + ix.slice().iter().sum::<usize>() as f64
        });

        let mut fields = BTreeMap::new();
        fields.insert("Cooling".to_string(), array);
        Grid::new(parameters, InnerAxis::new("Temperature", inner), fields)
    }

    fn config() -> GraftConfig {
        GraftConfig {
            fields: vec!["Cooling".into()],
            ..Default::default()
        }
    }

    #[test]
    fn extra_parameter_in_middle() {
        let low = grid(
            vec![
                Parameter::new("hden", vec![1.0, 2.0]),
                Parameter::new("metal free electron fraction", vec![0.1, 0.2, 0.3]),
            ],
            vec![10.0, 20.0],
            0.0,
        );
        let high = grid(
            vec![Parameter::new("hden", vec![1.0, 2.0])],
            vec![20.0, 30.0, 40.0],
            100.0,
        );

        let grafted = graft(&low, &high, &config()).unwrap().unwrap();
        assert_eq!(grafted.inner.values, vec![10.0, 20.0, 30.0, 40.0]);

        let cooling = &grafted.fields["Cooling"];
        assert_eq!(cooling.shape(), &[2, 3, 4]);
        // high values replicated over the extra axis
        for e in 0..3 {
            assert_eq!(cooling[[1, e, 2]], 100.0 + 2.0);
            assert_eq!(cooling[[1, e, 3]], 100.0 + 3.0);
        }
        assert_eq!(cooling[[1, 2, 1]], 1.0 + 2.0 + 1.0);
    }

    #[test]
    fn no_shared_boundary() {
        let low = grid(
            vec![Parameter::new("metal free electron fraction", vec![0.1, 0.2])],
            vec![10.0, 20.0],
            0.0,
        );
        let high = grid(vec![], vec![30.0, 40.0], 100.0);

        let grafted = graft(&low, &high, &config()).unwrap().unwrap();
        assert_eq!(grafted.inner.values, vec![10.0, 20.0, 30.0, 40.0]);
        assert_eq!(grafted.fields["Cooling"].shape(), &[2, 4]);
    }

    #[test]
    fn mismatched_sweep() {
        let low = grid(
            vec![
                Parameter::new("hden", vec![1.0, 2.0]),
                Parameter::new("metal free electron fraction", vec![0.1]),
            ],
            vec![10.0],
            0.0,
        );
        let high = grid(vec![Parameter::new("hden", vec![1.0])], vec![10.0], 0.0);
        assert!(matches!(
            graft(&low, &high, &config()),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn missing_field() {
        let low = grid(
            vec![Parameter::new("metal free electron fraction", vec![0.1])],
            vec![10.0],
            0.0,
        );
        let high = grid(vec![], vec![20.0], 0.0);
        assert!(matches!(
            graft(&low, &high, &GraftConfig::default()),
            Err(Error::FieldNotFound { .. })
        ));
    }
}
