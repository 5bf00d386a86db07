//! Library of parser functions for run manifests

// nom parser combinators
use nom::bytes::complete::{tag, take_until1};
use nom::character::complete::{char, space0};
use nom::combinator::{all_consuming, rest};
use nom::multi::many1;
use nom::number::complete::double;
use nom::sequence::{delimited, separated_pair, terminated, tuple};
use nom::IResult;

// ! Boolean checks
/// Check for the line introducing the swept parameters
pub fn is_parameter_block(i: &str) -> bool {
    i.starts_with("# Loop commands and values:")
}

/// Check for the bare `#` that closes the parameter block
pub fn is_block_end(i: &str) -> bool {
    i == "#"
}

/// Check for the header line of the per-run table
pub fn is_run_table(i: &str) -> bool {
    i.starts_with("#run")
}

/// Check for the `# outputFilePrefix = ...` header line
pub fn is_output_prefix(i: &str) -> bool {
    i.starts_with("# outputFilePrefix")
}

/// Check for the `# outputDir = ...` header line
pub fn is_output_dir(i: &str) -> bool {
    i.starts_with("# outputDir")
}

// ! Parsers
/// Split a parameter line into the raw name and value text
///
/// The name keeps its 2-character comment marker, e.g. `"# hden"`.
pub fn parameter_line(i: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(take_until1(": "), tag(": "), rest)(i)
}

/// List of consecutive doubles as a vector of f64 values
pub fn vector_of_f64(i: &str) -> IResult<&str, Vec<f64>> {
    all_consuming(many1(terminated(double, space0)))(i.trim())
}

/// Compact `(start;stop;step)` range syntax
pub fn compact_range(i: &str) -> IResult<&str, (f64, f64, f64)> {
    let (i, (start, _, stop, _, step)) = all_consuming(delimited(
        char('('),
        tuple((
            delimited(space0, double, space0),
            char(';'),
            delimited(space0, double, space0),
            char(';'),
            delimited(space0, double, space0),
        )),
        char(')'),
    ))(i.trim())?;
    Ok((i, (start, stop, step)))
}

/// Value after the ` = ` of a `# key = value` header line
pub fn header_value(i: &str) -> Option<&str> {
    i.split_once(" = ").map(|(_, value)| value.trim())
}
