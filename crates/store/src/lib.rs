//! Binary table store for converted grids
//!
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod attribute;
mod error;
mod reader;
mod store;
mod writer;

// Inline anything important for a nice public API
#[doc(inline)]
pub use attribute::{Attribute, AttributeBag};

#[doc(inline)]
pub use store::{Entry, Store};

#[doc(inline)]
pub use reader::read_store;

#[doc(inline)]
pub use writer::{write_json, write_store};

#[doc(inline)]
pub use error::{Error, Result};

/// Leading bytes of every store file
pub(crate) const SIGNATURE: [u8; 8] = *b"GRIDSTOR";

/// Layout version written after the signature
pub(crate) const VERSION: u32 = 1;
