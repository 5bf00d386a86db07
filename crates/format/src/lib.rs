//! Common formatting helpers for the gridtools crates
//!
//! These are left public for convenience.
//!
//! Writing ASCII maps and reporting sample alignments both need consistent
//! number formatting, so it lives here rather than in every crate.

// standard library
use std::fmt::{Display, LowerExp};

// Alias for the format! macro out of laziness
pub use std::format as f;

/// Extends primitives with more specific formatting options
pub trait NumFormat {
    /// Better scientific number formatting
    ///
    /// The default `{:e}` output drops the exponent sign and padding, which
    /// does not match the `%.6e` style of the simulation outputs. This gives
    /// the same `1.000000e+04` layout.
    ///
    /// Works for anything that can be represented as scientific using the
    /// `LowerExp` trait, which is pretty much every numerical primitive.
    ///
    /// ```rust
    /// # use gridtools_format::NumFormat;
    /// let number = -1.0;
    /// assert_eq!(number.sci(5, 2), "-1.00000e+00".to_string());
    /// assert_eq!((1.0e4).sci(6, 2), "1.000000e+04".to_string());
    /// assert_eq!((2.5e-23).sci(3, 2), "2.500e-23".to_string());
    /// ```
    fn sci(&self, precision: usize, exp_pad: usize) -> String;
}

impl<T: LowerExp> NumFormat for T {
    fn sci(&self, precision: usize, exp_pad: usize) -> String {
        let mut num = f!("{:.precision$e}", &self, precision = precision);
        // `inf` and `NaN` have no exponent to pad
        let Some(split) = num.find('e') else {
            return num;
        };
        let exp = num.split_off(split);
        let (sign, exp) = match exp.strip_prefix("e-") {
            Some(exp) => ('-', exp),
            None => ('+', &exp[1..]),
        };
        num.push_str(&f!("e{}{:0>pad$}", sign, exp, pad = exp_pad));
        num
    }
}

/// Extends Option for easy display formatting
pub trait OptionFormat {
    /// Either the value contained within `Some()` or "none"
    ///
    /// ```rust
    /// # use gridtools_format::OptionFormat;
    /// let x: Option<isize> = Some(-2);
    /// assert_eq!(x.display(), "-2");
    ///
    /// let x: Option<isize> = None;
    /// assert_eq!(x.display(), "none");
    /// ```
    fn display(&self) -> String;
}

impl<T: Display> OptionFormat for Option<T> {
    fn display(&self) -> String {
        match self {
            Some(value) => f!("{value}"),
            None => "none".to_string(),
        }
    }
}

/// Join a row of values with a separator
///
/// ```rust
/// # use gridtools_format::join_values;
/// assert_eq!(join_values(&[1, 2, 3], "\t"), "1\t2\t3");
/// assert_eq!(join_values::<u8>(&[], " "), "");
/// ```
pub fn join_values<T: Display>(values: &[T], separator: &str) -> String {
    values
        .iter()
        .map(|v| f!("{v}"))
        .collect::<Vec<String>>()
        .join(separator)
}
