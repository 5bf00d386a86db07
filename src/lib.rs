//! `gridtools` converts parameter sweep outputs into dense grids and
//! post-processes them
//!
#![doc = include_str!("../readme.md")]
#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Re-exports of toolkit crates.
#[doc(inline)]
pub use gridtools_format as format;

#[cfg(feature = "grid")]
#[cfg_attr(docsrs, doc(cfg(feature = "grid")))]
#[doc(inline)]
pub use gridtools_grid as grid;

#[cfg(feature = "store")]
#[cfg_attr(docsrs, doc(cfg(feature = "store")))]
#[doc(inline)]
pub use gridtools_store as store;

#[cfg(feature = "subtract")]
#[cfg_attr(docsrs, doc(cfg(feature = "subtract")))]
#[doc(inline)]
pub use gridtools_subtract as subtract;
