//! Read operations for grid store files
//!
//! The file is an 8 byte signature, a little endian `u32` layout version, and
//! the bincode encoded [Store] body.

// standard library
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

// crate modules
use crate::error::{Error, Result};
use crate::store::Store;
use crate::{SIGNATURE, VERSION};

// external crates
use log::debug;

/// Deserialise a binary store file
///
/// Returns a Result containing the [Store] with every entry and attribute
/// found in the file at `path`.
///
/// ```rust, no_run
/// # use gridtools_store::read_store;
/// let store = read_store("./cooling.bin").unwrap();
///
/// // Print a summary of the entries
/// println!("{store}");
/// ```
pub fn read_store<P: AsRef<Path>>(path: P) -> Result<Store> {
    debug!("Reading store {}", path.as_ref().display());
    let mut reader = init_reader(path)?;
    check_header(&mut reader)?;
    Ok(bincode::deserialize_from(reader)?)
}

/// Initialise a reader from anything that can be turned into a path
fn init_reader(path: impl AsRef<Path>) -> Result<BufReader<File>> {
    let file = File::open(path)?;
    Ok(BufReader::new(file))
}

/// Make sure this is actually a store of a layout we understand
fn check_header(reader: &mut BufReader<File>) -> Result<()> {
    let mut signature = [0u8; 8];
    reader.read_exact(&mut signature)?;
    if signature != SIGNATURE {
        return Err(Error::UnrecognisedSignature {
            expected: SIGNATURE,
            found: signature,
        });
    }

    let mut buffer = [0u8; std::mem::size_of::<u32>()];
    reader.read_exact(&mut buffer)?;
    let version = u32::from_le_bytes(buffer);
    if version != VERSION {
        return Err(Error::UnsupportedVersion {
            expected: VERSION,
            found: version,
        });
    }

    Ok(())
}
