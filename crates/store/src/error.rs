//! Result and Error types for the store module

/// Type alias for `Result<T, store::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `gridtools-store`
pub enum Error {
    /// Underlying file I/O error
    #[error("failure in file I/O")]
    IOError(#[from] std::io::Error),

    /// Failure to serialise or deserialise a byte stream
    #[error("failed binary (de)serialisation")]
    FailedBinaryOp(#[from] Box<bincode::ErrorKind>),

    /// Failure to serialise to a JSON string
    #[error("failed serde JSON operation")]
    JSONError(#[from] serde_json::Error),

    /// File does not start with the store signature
    #[error("not a grid store (expected signature {expected:?}, found {found:?})")]
    UnrecognisedSignature { expected: [u8; 8], found: [u8; 8] },

    /// Store written by an incompatible layout version
    #[error("unsupported store version (expected {expected}, found {found})")]
    UnsupportedVersion { expected: u32, found: u32 },
}
