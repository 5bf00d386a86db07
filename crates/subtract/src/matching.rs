// crate modules
use crate::error::{Error, Result};

/// Position in the large columns of every small column
///
/// Every small grid parameter has to be swept in the large grid too,
/// otherwise there is no way to pair up runs.
///
/// ```rust
/// # use gridtools_subtract::shared_columns;
/// let large = ["hden", "metals", "redshift"];
/// assert_eq!(shared_columns(&large, &["redshift", "hden"]).unwrap(), vec![2, 0]);
/// assert!(shared_columns(&large, &["temperature"]).is_err());
/// ```
pub fn shared_columns<L: AsRef<str>, S: AsRef<str>>(large: &[L], small: &[S]) -> Result<Vec<usize>> {
    small
        .iter()
        .map(|name| {
            let name = name.as_ref();
            large
                .iter()
                .position(|l| l.as_ref() == name)
                .ok_or_else(|| Error::UnsharedParameter(name.to_string()))
        })
        .collect()
}

/// First small run equal to the large run on every shared parameter
///
/// `columns` are the positions from [shared_columns()] and each small run is
/// given as an identifier and its parameter values.
pub fn find_match<'a, I>(large_values: &[f64], columns: &[usize], small_runs: I) -> Option<usize>
where
    I: IntoIterator<Item = (usize, &'a [f64])>,
{
    small_runs
        .into_iter()
        .find(|(_, small_values)| {
            columns
                .iter()
                .zip(small_values.iter())
                .all(|(&c, s)| large_values.get(c) == Some(s))
        })
        .map(|(id, _)| id)
}
