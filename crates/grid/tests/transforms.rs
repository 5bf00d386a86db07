//! Integration tests for grafting, zeroing and persisting grids

use gridtools_grid::{
    convert_to_file, graft, graft_files, zero_file, ConvertConfig, Grid, GraftConfig, InnerAxis,
    Parameter, DEFAULT_ZERO_FIELDS,
};
use ndarray::{ArrayD, IxDyn};
use rstest::{fixture, rstest};
use std::collections::BTreeMap;
use std::path::PathBuf;

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("gridtools-grid-tests");
    std::fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}

fn temperatures(first: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| first + i as f64).collect()
}

/// Low grid over (hden, electron fraction), 10 temperatures
#[fixture]
fn low() -> Grid {
    let parameters = vec![
        Parameter::new("hden", vec![-2.0, -1.0, 0.0]),
        Parameter::new("metal free electron fraction", vec![1e-4, 1e-3, 1e-2, 1e-1]),
    ];
    let mut fields = BTreeMap::new();
    for name in ["Heating", "Cooling", "MMW"] {
        let array = ArrayD::from_shape_fn(IxDyn(&[3, 4, 10]), |ix| (ix[0] * 100 + ix[1]) as f64);
        fields.insert(name.to_string(), array);
    }
    Grid::new(parameters, InnerAxis::new("Temperature", temperatures(0.0, 10)), fields)
}

/// High grid over hden only, starting at the last low temperature
#[fixture]
fn high() -> Grid {
    let parameters = vec![Parameter::new("hden", vec![-2.0, -1.0, 0.0])];
    let mut fields = BTreeMap::new();
    for name in ["Heating", "Cooling", "MMW"] {
        let array = ArrayD::from_shape_fn(IxDyn(&[3, 10]), |ix| 1000.0 + (ix[0] * 10 + ix[1]) as f64);
        fields.insert(name.to_string(), array);
    }
    Grid::new(parameters, InnerAxis::new("Temperature", temperatures(9.0, 10)), fields)
}

#[rstest]
fn graft_shared_boundary(low: Grid, high: Grid) {
    let grid = graft(&low, &high, &GraftConfig::default()).unwrap().unwrap();

    assert_eq!(grid.dimensions(), vec![3, 4]);
    assert_eq!(grid.inner.values, temperatures(0.0, 19));

    let cooling = &grid.fields["Cooling"];
    assert_eq!(cooling.shape(), &[3, 4, 19]);

    // the shared temperature keeps the low grid value
    assert_eq!(cooling[[2, 3, 9]], 203.0);

    // the high grid is identical across the electron fraction axis
    for h in 0..3 {
        for t in 10..19 {
            let expected = 1000.0 + (h * 10 + t - 9) as f64;
            for e in 0..4 {
                assert_eq!(cooling[[h, e, t]], expected);
            }
        }
    }

    let dims = grid
        .attribute("Cooling", "Dimension")
        .and_then(|a| a.as_i64_array());
    assert_eq!(dims, Some(vec![3, 4, 19]));
}

/// Cooling only grids over 4 hden values, the low grid with 3 electron
/// fractions inserted at `extra`
fn cooling_pair(extra: usize) -> (Grid, Grid) {
    let hden = Parameter::new("hden", vec![-2.0, -1.0, 0.0, 1.0]);
    let fraction = Parameter::new("metal free electron fraction", vec![1e-4, 1e-3, 1e-2]);

    let mut parameters = vec![hden.clone()];
    parameters.insert(extra, fraction);
    let shape: Vec<usize> = parameters.iter().map(Parameter::len).chain([10]).collect();
    let low_fields = BTreeMap::from([("Cooling".to_string(), ArrayD::from_elem(IxDyn(&shape), -1.0))]);
    let low = Grid::new(parameters, InnerAxis::new("Temperature", temperatures(0.0, 10)), low_fields);

    let array = ArrayD::from_shape_fn(IxDyn(&[4, 10]), |ix| (100 * ix[0] + ix[1]) as f64);
    let high_fields = BTreeMap::from([("Cooling".to_string(), array)]);
    let high = Grid::new(vec![hden], InnerAxis::new("Temperature", temperatures(9.0, 10)), high_fields);

    (low, high)
}

#[rstest]
#[case(0, vec![3, 4, 19])] // case 1
#[case(1, vec![4, 3, 19])] // case 2
fn graft_extra_parameter_position(#[case] extra: usize, #[case] expected: Vec<usize>) {
    let (low, high) = cooling_pair(extra);
    let config = GraftConfig {
        fields: vec!["Cooling".to_string()],
        ..Default::default()
    };
    let grid = graft(&low, &high, &config).unwrap().unwrap();

    let cooling = &grid.fields["Cooling"];
    assert_eq!(cooling.shape(), expected.as_slice());
    assert_eq!(grid.inner.values, temperatures(0.0, 19));

    // hden is whichever sweep axis is not the electron fraction
    let hden_axis = 1 - extra;
    for (ix, &value) in cooling.indexed_iter() {
        let t = ix[2];
        if t < 10 {
            assert_eq!(value, -1.0);
        } else {
            assert_eq!(value, (100 * ix[hden_axis] + t - 9) as f64);
        }
    }
}

#[rstest]
fn graft_without_extra_parameter(low: Grid, high: Grid) {
    let config = GraftConfig {
        extra_parameter: "redshift".into(),
        ..Default::default()
    };
    assert_eq!(graft(&low, &high, &config).unwrap(), None);
}

#[rstest]
fn graft_stored_grids(low: Grid, high: Grid) {
    let (low_path, high_path) = (scratch("low.grid"), scratch("high.grid"));
    let output = scratch("grafted.grid");
    low.save(&low_path).unwrap();
    high.save(&high_path).unwrap();

    let grafted = graft_files(&low_path, &high_path, &output, &GraftConfig::default())
        .unwrap()
        .unwrap();
    assert_eq!(Grid::load(&output).unwrap(), grafted);
}

#[rstest]
fn converted_grid_round_trip() {
    let path = scratch("cooling.grid");
    let grid = convert_to_file("./data/cooling/cooling.run", &path, &ConvertConfig::default())
        .unwrap();
    let loaded = Grid::load(&path).unwrap();
    assert_eq!(loaded, grid);
    assert_eq!(loaded.parameters[0].name, "hden");
}

#[rstest]
fn zero_in_place(low: Grid) {
    let path = scratch("zero.grid");
    low.save(&path).unwrap();

    zero_file(&path, None, &DEFAULT_ZERO_FIELDS).unwrap();
    let zeroed = Grid::load(&path).unwrap();

    assert!(zeroed.fields["Heating"].iter().all(|&v| v == 0.0));
    assert!(zeroed.fields["MMW"].iter().all(|&v| v == 0.0));
    assert_eq!(zeroed.fields["Cooling"], low.fields["Cooling"]);
}
