//! Alignment and subtraction of independently swept grids
//!
//! Two sweeps rarely cover exactly the same inner range, and the smaller
//! sweep usually has fewer parameters. Subtraction therefore happens in three
//! steps:
//!
//! 1. every large run is paired with a small run on the shared parameters
//! 2. the inner axes are aligned by exact value with [align()]
//! 3. values are subtracted directly ([subtract_values()]) or rebuilt from
//!    their named components ([subtract_components()])
//!
//! This works on grids already in memory with [subtract_grids()], or on
//! the raw run outputs with [subtract_runs()].
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod align;
mod components;
mod error;
mod grids;
mod matching;
mod reader;
mod runs;
mod writer;

// Inline anything important for a nice public API
#[doc(inline)]
pub use align::{align, subtract_values, Alignment};

#[doc(inline)]
pub use components::{subtract_components, ComponentRules, ComponentSubtraction, Components};

#[doc(inline)]
pub use matching::{find_match, shared_columns};

#[doc(inline)]
pub use grids::{subtract_grids, RunMatch, Subtraction};

#[doc(inline)]
pub use reader::{read_component_file, read_cooling_map, ComponentTable, CoolingMap};

#[doc(inline)]
pub use writer::{rewrite_run_header, write_cooling_map, write_lines, MAP_TITLE};

#[doc(inline)]
pub use runs::{subtract_runs, RunSummary, SubtractConfig};

#[doc(inline)]
pub use error::{Error, Result};
