//! Subtraction of whole grids held in memory

// crate modules
use crate::align::{align, Alignment};
use crate::error::{Error, Result};
use crate::matching::{find_match, shared_columns};

// gridtools modules
use gridtools_format::OptionFormat;
use gridtools_grid::{decode, Grid, InnerAxis};

// standard library
use std::collections::BTreeMap;

// external crates
use log::{debug, info, warn};
use ndarray::{ArrayD, ArrayView, ArrayViewMut, Axis, IxDyn};

/// Pairing of a large run with the small run subtracted from it
#[derive(Debug, Clone, PartialEq)]
pub struct RunMatch {
    /// Zero-based run index in the large grid
    pub large: usize,
    /// Zero-based run index in the small grid
    pub small: usize,
    /// Alignment of the inner axes for this pair
    pub alignment: Alignment,
}

/// Result of [subtract_grids()]
#[derive(Debug, Clone, PartialEq)]
pub struct Subtraction {
    /// Difference grid over the large grid parameters
    pub grid: Grid,
    /// Every large run that found a partner
    pub matches: Vec<RunMatch>,
    /// Large runs with no small run on the same shared parameters
    pub skipped: Vec<usize>,
}

/// Subtract the listed fields of `small` from `large`
///
/// Every parameter of the small grid must be swept in the large grid. Each
/// large run is paired with the first small run equal on all shared
/// parameters, then the inner axes are aligned with [align()]. Runs with no
/// partner and unaligned samples are left at zero.
///
/// Multi-component fields are subtracted component by component, so the
/// trailing shapes of both grids must agree.
pub fn subtract_grids<S: AsRef<str>>(large: &Grid, small: &Grid, fields: &[S]) -> Result<Subtraction> {
    let large_names: Vec<&str> = large.parameters.iter().map(|p| p.name.as_str()).collect();
    let small_names: Vec<&str> = small.parameters.iter().map(|p| p.name.as_str()).collect();
    let columns = shared_columns(&large_names, &small_names)?;

    for name in fields {
        let name = name.as_ref();
        large.check_field(name, "large grid")?;
        small.check_field(name, "small grid")?;
        trailing_shapes_agree(large, small, name)?;
    }

    // the inner axis is shared by every run of a grid
    let alignment = align(&large.inner.values, &small.inner.values);
    debug!(
        "Inner offset {} with {} unmatched samples",
        alignment.offset(0).display(),
        alignment.unmatched()
    );

    let small_dims = small.dimensions();
    let small_total: usize = small_dims.iter().product();
    let small_runs: Vec<(usize, Vec<f64>)> = (0..small_total)
        .map(|i| (i, parameter_values(small, &decode(&small_dims, i))))
        .collect();

    let mut differences: BTreeMap<String, ArrayD<f64>> = fields
        .iter()
        .map(|name| {
            let shape = large.fields[name.as_ref()].shape();
            (name.as_ref().to_string(), ArrayD::zeros(IxDyn(shape)))
        })
        .collect();

    let large_dims = large.dimensions();
    let mut matches = Vec::new();
    let mut skipped = Vec::new();

    let large_total: usize = large_dims.iter().product();
    for index in 0..large_total {
        let coordinate = decode(&large_dims, index);
        let values = parameter_values(large, &coordinate);
        let candidates = small_runs.iter().map(|(i, v)| (*i, v.as_slice()));

        let Some(partner) = find_match(&values, &columns, candidates) else {
            warn!("No small run matches large run {} {values:?}", index + 1);
            skipped.push(index);
            continue;
        };

        let small_coordinate = decode(&small_dims, partner);
        for (name, difference) in differences.iter_mut() {
            let l = view_at(&large.fields[name], &coordinate);
            let s = view_at(&small.fields[name], &small_coordinate);
            let mut out = view_at_mut(difference, &coordinate);

            for (q, w) in alignment.matches.iter().enumerate() {
                if let Some(w) = w {
                    let d = &l.index_axis(Axis(0), q) - &s.index_axis(Axis(0), *w);
                    out.index_axis_mut(Axis(0), q).assign(&d);
                }
            }
        }

        matches.push(RunMatch {
            large: index,
            small: partner,
            alignment: alignment.clone(),
        });
    }

    let mut attributes = BTreeMap::new();
    for name in differences.keys().chain(std::iter::once(&large.inner.name)) {
        if let Some(attrs) = large.attributes.get(name) {
            attributes.insert(name.clone(), attrs.clone());
        }
    }

    let mut grid = Grid {
        parameters: large.parameters.clone(),
        inner: InnerAxis::new(large.inner.name.as_str(), large.inner.values.clone()),
        fields: differences,
        attributes,
    };
    grid.refresh_dimensions();

    info!(
        "Subtracted {} runs, {} without a partner",
        matches.len(),
        skipped.len()
    );
    Ok(Subtraction {
        grid,
        matches,
        skipped,
    })
}

/// Parameter values of a run from its grid coordinate
fn parameter_values(grid: &Grid, coordinate: &[usize]) -> Vec<f64> {
    grid.parameters
        .iter()
        .zip(coordinate)
        .map(|(p, &i)| p.values[i])
        .collect()
}

/// Components beyond the inner axis have to line up between grids
fn trailing_shapes_agree(large: &Grid, small: &Grid, name: &str) -> Result<()> {
    let l = &large.fields[name].shape()[large.parameters.len() + 1..];
    let s = &small.fields[name].shape()[small.parameters.len() + 1..];
    if l != s {
        return Err(Error::GridError(gridtools_grid::Error::ShapeMismatch {
            field: name.to_string(),
            context: "small grid".into(),
            expected: l.to_vec(),
            found: s.to_vec(),
        }));
    }
    Ok(())
}

fn view_at<'a>(array: &'a ArrayD<f64>, coordinate: &[usize]) -> ArrayView<'a, f64, IxDyn> {
    let mut view = array.view();
    for &c in coordinate {
        view = view.index_axis_move(Axis(0), c);
    }
    view
}

fn view_at_mut<'a>(array: &'a mut ArrayD<f64>, coordinate: &[usize]) -> ArrayViewMut<'a, f64, IxDyn> {
    let mut view = array.view_mut();
    for &c in coordinate {
        view = view.index_axis_move(Axis(0), c);
    }
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridtools_grid::Parameter;

    fn grid(parameters: Vec<Parameter>, inner: Vec<f64>, scale: f64) -> Grid {
        let mut shape: Vec<usize> = parameters.iter().map(Parameter::len).collect();
        shape.push(inner.len());
        let t = inner.clone();
        let n = parameters.len();
        let array = ArrayD::from_shape_fn(IxDyn(&shape), |ix| scale * t[ix[n]]);

        let mut fields = BTreeMap::new();
        fields.insert("MMW".to_string(), array);
        Grid::new(parameters, InnerAxis::new("Temperature", inner), fields)
    }

    #[test]
    fn self_subtraction_is_zero() {
        let g = grid(vec![Parameter::new("hden", vec![1.0, 2.0])], vec![1.0, 2.0, 3.0], 1.0);
        let result = subtract_grids(&g, &g, &["MMW"]).unwrap();

        assert!(result.grid.fields["MMW"].iter().all(|&v| v == 0.0));
        assert!(result.skipped.is_empty());
        assert_eq!(result.matches.len(), 2);
        assert!(result
            .matches
            .iter()
            .all(|m| m.large == m.small && m.alignment.offsets() == vec![Some(0); 3]));
    }

    #[test]
    fn offset_and_skipped_runs() {
        let large = grid(
            vec![
                Parameter::new("hden", vec![1.0, 2.0]),
                Parameter::new("metals", vec![0.1, 1.0]),
            ],
            vec![2.0, 3.0],
            10.0,
        );
        let small = grid(vec![Parameter::new("hden", vec![2.0])], vec![1.0, 2.0, 3.0], 1.0);

        let result = subtract_grids(&large, &small, &["MMW"]).unwrap();
        assert_eq!(result.skipped, vec![0, 1]);
        assert_eq!(result.matches.len(), 2);
        assert_eq!(result.matches[0].alignment.offset(0), Some(1));

        let mmw = &result.grid.fields["MMW"];
        assert_eq!(mmw.shape(), &[2, 2, 2]);
        assert_eq!(mmw[[1, 1, 0]], 20.0 - 2.0);
        assert_eq!(mmw[[1, 0, 1]], 30.0 - 3.0);
        assert_eq!(mmw[[0, 1, 1]], 0.0);
    }

    #[test]
    fn small_parameter_missing_from_large() {
        let large = grid(vec![Parameter::new("hden", vec![1.0])], vec![1.0], 1.0);
        let small = grid(vec![Parameter::new("redshift", vec![1.0])], vec![1.0], 1.0);
        assert!(matches!(
            subtract_grids(&large, &small, &["MMW"]),
            Err(Error::UnsharedParameter(name)) if name == "redshift"
        ));
    }
}
