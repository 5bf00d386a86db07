//! Result and Error types for gridtools-subtract

/// Type alias for Result<T, subtract::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `gridtools-subtract` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed input/output stream")]
    IOError(#[from] std::io::Error),

    #[error("failed grid operation")]
    GridError(#[from] gridtools_grid::Error),

    #[error("small grid has parameter \"{0}\" that the large grid does not")]
    UnsharedParameter(String),

    #[error("unable to read {path}")]
    MissingRunFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parser failed: {0}")]
    ParseError(String),

    #[error("{path} has {found} temperatures, expected {expected}")]
    LengthMismatch {
        path: String,
        expected: usize,
        found: usize,
    },

    #[error("unable to derive output names from \"{0}\"")]
    InvalidOutputName(String),

    #[error("failed to initialise progress bar: {0}")]
    ProgressBar(String),
}
