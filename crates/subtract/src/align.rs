//! Alignment of inner axes sampled on different ranges
//!
//! Two grids are usually sampled on the same temperature step but not always
//! over the same range, so the `small` axis may start earlier or later than
//! the `large` one. The alignment maps every large sample onto the small
//! sample with exactly the same value.

// external crates
use log::trace;

/// Mapping of every large sample onto a small sample
///
/// Samples with no exact match in the small axis are left unset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Alignment {
    /// Small axis index for each large sample, if one matched
    pub matches: Vec<Option<usize>>,
}

impl Alignment {
    /// Number of large samples
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// True when the large axis was empty
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Offset into the small axis applied at large sample `q`
    pub fn offset(&self, q: usize) -> Option<isize> {
        self.matches
            .get(q)
            .copied()
            .flatten()
            .map(|w| w as isize - q as isize)
    }

    /// Offsets for every large sample
    pub fn offsets(&self) -> Vec<Option<isize>> {
        (0..self.len()).map(|q| self.offset(q)).collect()
    }

    /// Number of large samples left unset
    pub fn unmatched(&self) -> usize {
        self.matches.iter().filter(|m| m.is_none()).count()
    }
}

/// Find the small sample matching each large sample
///
/// The offset starts at zero. Whenever `small[q + offset]` is not exactly
/// `large[q]` the whole small axis is searched, and on a match the offset is
/// updated and kept for the following samples. A sample with no match is
/// skipped without changing the offset.
///
/// ```rust
/// # use gridtools_subtract::align;
/// let alignment = align(&[2.0, 3.0, 4.0, 9.0], &[1.0, 2.0, 3.0, 4.0]);
/// assert_eq!(alignment.matches, vec![Some(1), Some(2), Some(3), None]);
/// assert_eq!(alignment.offset(0), Some(1));
/// ```
pub fn align(large: &[f64], small: &[f64]) -> Alignment {
    let mut offset: isize = 0;
    let matches = large
        .iter()
        .enumerate()
        .map(|(q, value)| {
            let guess = q as isize + offset;
            if guess >= 0 && small.get(guess as usize) == Some(value) {
                return Some(guess as usize);
            }

            let w = small.iter().position(|s| s == value)?;
            offset = w as isize - q as isize;
            trace!("Switching offset to {offset} at sample {q}");
            Some(w)
        })
        .collect();

    Alignment { matches }
}

/// Subtract aligned small values from large values
///
/// Each large sample `q` gives `large[q] - small[q + offset]`, or `None`
/// where the alignment left the sample unset.
///
/// ```rust
/// # use gridtools_subtract::{align, subtract_values};
/// let alignment = align(&[1.0, 2.0], &[0.0, 1.0, 2.0]);
/// let result = subtract_values(&[10.0, 20.0], &[5.0, 3.0, 2.0], &alignment);
/// assert_eq!(result, vec![Some(7.0), Some(18.0)]);
/// ```
///
/// # Panics
///
/// The alignment must have been made from axes as long as the values.
pub fn subtract_values(large: &[f64], small: &[f64], alignment: &Alignment) -> Vec<Option<f64>> {
    alignment
        .matches
        .iter()
        .zip(large)
        .map(|(w, l)| w.map(|w| l - small[w]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_axes() {
        let axis = [1.0, 2.0, 3.0];
        let alignment = align(&axis, &axis);
        assert_eq!(alignment.offsets(), vec![Some(0); 3]);
        assert_eq!(alignment.unmatched(), 0);

        let result = subtract_values(&[4.0, 5.0, 6.0], &[4.0, 5.0, 6.0], &alignment);
        assert_eq!(result, vec![Some(0.0); 3]);
    }

    #[test]
    fn extra_leading_small_sample() {
        let alignment = align(&[2.0, 3.0, 4.0], &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(alignment.offsets(), vec![Some(1); 3]);

        let result = subtract_values(&[20.0, 30.0, 40.0], &[1.0, 2.0, 3.0, 4.0], &alignment);
        assert_eq!(result, vec![Some(18.0), Some(27.0), Some(36.0)]);
    }

    #[test]
    fn small_starts_later() {
        let alignment = align(&[1.0, 2.0, 3.0, 4.0], &[3.0, 4.0]);
        assert_eq!(alignment.matches, vec![None, None, Some(0), Some(1)]);
        assert_eq!(alignment.offset(2), Some(-2));
        assert_eq!(alignment.unmatched(), 2);
    }

    #[test]
    fn offset_kept_over_gap() {
        // 3.0 is missing from the small axis, the offset survives it
        let alignment = align(&[1.0, 2.0, 3.0, 4.0], &[0.0, 1.0, 2.0, 4.0]);
        assert_eq!(alignment.matches, vec![Some(1), Some(2), None, Some(3)]);
    }

    #[test]
    fn empty_axes() {
        assert!(align(&[], &[1.0]).is_empty());
        assert_eq!(align(&[1.0], &[]).matches, vec![None]);
    }
}
