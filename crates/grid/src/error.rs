//! Result and Error types for gridtools-grid

/// Type alias for Result<T, grid::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `gridtools-grid` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed input/output stream")]
    IOError(#[from] std::io::Error),

    #[error("failed store operation")]
    StoreError(#[from] gridtools_store::Error),

    #[error("run file \"{0}\" needs to end in .run")]
    InvalidManifestName(String),

    #[error("total runs ({found}) in {path} not equal to product of parameters ({expected})")]
    RunCountMismatch {
        path: String,
        found: usize,
        expected: usize,
    },

    #[error("parser failed: {0}")]
    ParseError(String),

    #[error("unable to read run output {path}")]
    MissingRunFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("inconsistent shape for \"{field}\" in {context} (expected {expected:?}, found {found:?})")]
    ShapeMismatch {
        field: String,
        context: String,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    #[error("field \"{field}\" not found in {context}")]
    FieldNotFound { field: String, context: String },

    #[error("no \"{0}\" entry found in store")]
    MissingEntry(String),
}
