//! Conversion between flat run numbers and grid coordinates
//!
//! Runs in a sweep are numbered with the last parameter varying fastest, so
//! the run index is a mixed-radix number whose digits are the per-parameter
//! indices. For dimensions `[2, 3]` the runs are laid out as:
//!
//! ```text
//!     index : 0      1      2      3      4      5
//!     coord : [0,0]  [0,1]  [0,2]  [1,0]  [1,1]  [1,2]
//! ```
//!
//! This is the same row-major ordering used by the dense field arrays, so a
//! coordinate can be used directly to index the leading axes of a field.

/// Find the grid coordinate of a flat run index
///
/// `dims` are the cardinalities of every swept parameter, outermost first.
///
/// ```rust
/// # use gridtools_grid::decode;
/// assert_eq!(decode(&[2, 3], 0), vec![0, 0]);
/// assert_eq!(decode(&[2, 3], 4), vec![1, 1]);
/// assert_eq!(decode(&[3, 4, 10], 59), vec![1, 1, 9]);
/// ```
///
/// # Panics
///
/// An index outside of `0..product(dims)` is a programming error.
pub fn decode(dims: &[usize], index: usize) -> Vec<usize> {
    let total: usize = dims.iter().product();
    assert!(
        index < total,
        "run index {index} outside of grid with dimensions {dims:?}"
    );

    // least significant digit first, i.e. the last dimension
    let mut remainder = index;
    let mut coordinate: Vec<usize> = dims
        .iter()
        .rev()
        .map(|&dim| {
            let digit = remainder % dim;
            remainder /= dim;
            digit
        })
        .collect();

    coordinate.reverse();
    coordinate
}

/// Find the flat run index of a grid coordinate
///
/// The reverse of [decode()].
///
/// ```rust
/// # use gridtools_grid::{decode, encode};
/// assert_eq!(encode(&[2, 3], &[1, 1]), 4);
/// assert_eq!(encode(&[2, 3], &decode(&[2, 3], 5)), 5);
/// ```
///
/// # Panics
///
/// The coordinate must have one index per dimension, each within bounds.
pub fn encode(dims: &[usize], coordinate: &[usize]) -> usize {
    assert_eq!(
        dims.len(),
        coordinate.len(),
        "coordinate {coordinate:?} does not match dimensions {dims:?}"
    );

    dims.iter().zip(coordinate).fold(0, |index, (&dim, &digit)| {
        assert!(
            digit < dim,
            "coordinate {coordinate:?} outside of grid with dimensions {dims:?}"
        );
        index * dim + digit
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_all_indices() {
        let cases: [&[usize]; 5] = [&[1], &[7], &[2, 3], &[3, 4, 10], &[2, 1, 3, 2]];
        for dims in cases {
            let total: usize = dims.iter().product();
            for i in 0..total {
                let coordinate = decode(dims, i);
                assert_eq!(coordinate.len(), dims.len());
                assert!(coordinate.iter().zip(dims).all(|(c, d)| c < d));
                assert_eq!(encode(dims, &coordinate), i);
            }
        }
    }

    #[test]
    fn last_dimension_fastest() {
        let dims = [2, 3];
        let order: Vec<Vec<usize>> = (0..6).map(|i| decode(&dims, i)).collect();
        assert_eq!(
            order,
            vec![
                vec![0, 0],
                vec![0, 1],
                vec![0, 2],
                vec![1, 0],
                vec![1, 1],
                vec![1, 2]
            ]
        );
    }

    #[test]
    fn no_swept_parameters() {
        assert_eq!(decode(&[], 0), Vec::<usize>::new());
        assert_eq!(encode(&[], &[]), 0);
    }

    #[test]
    #[should_panic]
    fn index_out_of_range() {
        decode(&[2, 3], 6);
    }

    #[test]
    #[should_panic]
    fn coordinate_out_of_range() {
        encode(&[2, 3], &[0, 3]);
    }
}
