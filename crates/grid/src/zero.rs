// crate modules
use crate::error::Result;
use crate::grid::Grid;

// standard library
use std::path::Path;

// external crates
use log::info;

/// Fields cleared by default, leaving only the cooling rate
pub const DEFAULT_ZERO_FIELDS: [&str; 2] = ["Heating", "MMW"];

/// Copy of `grid` with every listed field set to zero
///
/// Shapes and attributes are unchanged. A listed field that is missing from
/// the grid is an error.
pub fn zero_fields<S: AsRef<str>>(grid: &Grid, fields: &[S]) -> Result<Grid> {
    let mut zeroed = grid.clone();
    for name in fields {
        let name = name.as_ref();
        grid.require_field(name, "grid")?;
        if let Some(array) = zeroed.fields.get_mut(name) {
            info!("Setting {name} to zero");
            array.fill(0.0);
        }
    }
    Ok(zeroed)
}

/// Zero fields of a stored grid, overwriting the input when no output is given
pub fn zero_file<P: AsRef<Path>, S: AsRef<str>>(
    input: P,
    output: Option<P>,
    fields: &[S],
) -> Result<Grid> {
    let grid = zero_fields(&Grid::load(&input)?, fields)?;
    let output = output.unwrap_or(input);
    info!("Writing {}", output.as_ref().display());
    grid.save(output)?;
    Ok(grid)
}
