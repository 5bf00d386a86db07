//! Conversion of parameter sweep outputs into dense grids
//!
//! A sweep manifest lists every swept parameter and the runs made over their
//! cartesian product. Each run writes an ASCII map sampled over an inner
//! axis, usually temperature. This crate rebuilds the full grid from those
//! pieces and provides transforms on the result.
//!
//! | Stage        | Description                                            |
//! | ------------ | ------------------------------------------------------ |
//! | [index]      | run index to grid coordinate, last parameter fastest   |
//! | [Manifest]   | swept parameters and the run table of a `.run` file    |
//! | [load_map()] | one run map, read according to a [MapLayout]           |
//! | [convert()]  | every run of a manifest collected into a [Grid]        |
//! | [graft()]    | two grids of different rank joined on the inner axis   |
//! | [zero_fields()] | selected fields cleared                             |
//!
//! Grids are persisted through [gridtools_store] with [Grid::save()] and
//! [Grid::load()].
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod assembler;
mod error;
mod graft;
mod grid;
mod loader;
mod manifest;
mod parsers;
mod zero;

pub mod index;

// Inline anything important for a nice public API
#[doc(inline)]
pub use index::{decode, encode};

#[doc(inline)]
pub use manifest::{expand_range, parse_manifest, Manifest, Parameter, RunRecord};

#[doc(inline)]
pub use loader::{load_map, FieldAccumulator, MapLayout, RunMap};

#[doc(inline)]
pub use grid::{Grid, InnerAxis, AXIS, DIMENSION, NAME, PARAMETER_PREFIX, RANK};

#[doc(inline)]
pub use assembler::{convert, convert_to_file, ConvertConfig, RunFileNaming};

#[doc(inline)]
pub use graft::{add_grid_dimension, graft, graft_files, GraftConfig};

#[doc(inline)]
pub use zero::{zero_fields, zero_file, DEFAULT_ZERO_FIELDS};

#[doc(inline)]
pub use error::{Error, Result};
