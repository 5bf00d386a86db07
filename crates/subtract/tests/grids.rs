//! Integration tests for subtracting grids held in memory

use gridtools_grid::{Grid, InnerAxis, Parameter};
use gridtools_subtract::subtract_grids;
use ndarray::{ArrayD, IxDyn};
use rstest::{fixture, rstest};
use std::collections::BTreeMap;

/// Same sweep as `full.run`
#[fixture]
fn large() -> Grid {
    let parameters = vec![
        Parameter::new("hden", vec![-1.0, 0.0]),
        Parameter::new("metals", vec![0.0, 1.0]),
    ];
    let mut fields = BTreeMap::new();
    fields.insert("MMW".to_string(), ArrayD::from_elem(IxDyn(&[2, 2, 3]), 0.6));
    fields.insert(
        "Cooling".to_string(),
        ArrayD::from_shape_fn(IxDyn(&[2, 2, 3]), |ix| (ix[0] + ix[1] + ix[2]) as f64),
    );
    Grid::new(
        parameters,
        InnerAxis::new("Temperature", vec![100.0, 200.0, 300.0]),
        fields,
    )
}

/// Same sweep as `primordial.run`, starting one temperature lower
#[fixture]
fn small() -> Grid {
    let mut fields = BTreeMap::new();
    fields.insert(
        "MMW".to_string(),
        ArrayD::from_shape_fn(IxDyn(&[2, 4]), |ix| 0.1 * ix[1] as f64),
    );
    Grid::new(
        vec![Parameter::new("hden", vec![0.0, 1.0])],
        InnerAxis::new("Temperature", vec![50.0, 100.0, 200.0, 300.0]),
        fields,
    )
}

#[rstest]
fn subtract_with_offset(large: Grid, small: Grid) {
    let result = subtract_grids(&large, &small, &["MMW"]).unwrap();
    assert_eq!(result.skipped, vec![0, 1]);
    assert_eq!(result.matches.len(), 2);

    for m in &result.matches {
        assert_eq!(m.small, 0);
        assert_eq!(m.alignment.offsets(), vec![Some(1); 3]);
    }

    let mmw = &result.grid.fields["MMW"];
    assert_eq!(mmw.shape(), &[2, 2, 3]);
    for k in 0..3 {
        let expected = 0.6 - 0.1 * (k + 1) as f64;
        assert_eq!(mmw[[1, 0, k]], expected);
        assert_eq!(mmw[[1, 1, k]], expected);
        assert_eq!(mmw[[0, 0, k]], 0.0);
    }

    // only the requested fields are carried
    assert!(!result.grid.fields.contains_key("Cooling"));
}

#[rstest]
fn self_subtraction(large: Grid) {
    let result = subtract_grids(&large, &large, &["MMW", "Cooling"]).unwrap();
    assert!(result.skipped.is_empty());
    assert_eq!(result.matches.len(), 4);
    for array in result.grid.fields.values() {
        assert!(array.iter().all(|&v| v == 0.0));
    }
}

#[rstest]
fn missing_field(large: Grid, small: Grid) {
    assert!(subtract_grids(&large, &small, &["Cooling"]).is_err());
}
