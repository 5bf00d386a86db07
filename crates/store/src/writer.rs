//! Write operations for grid stores

// standard library
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

// crate modules
use crate::error::Result;
use crate::store::Store;
use crate::{SIGNATURE, VERSION};

// external crates
use log::debug;

/// Serialise a [Store] to the binary store format
///
/// Any existing file at `path` is replaced.
///
/// ```rust, no_run
/// # use gridtools_store::{write_store, Store};
/// let store = Store::new();
/// write_store(&store, "./empty.bin").unwrap();
/// ```
pub fn write_store<P: AsRef<Path>>(store: &Store, path: P) -> Result<()> {
    debug!("Writing store {}", path.as_ref().display());
    let mut writer = init_writer(path)?;
    writer.write_all(&SIGNATURE)?;
    writer.write_all(&VERSION.to_le_bytes())?;
    bincode::serialize_into(&mut writer, store)?;
    writer.flush()?;
    Ok(())
}

/// Write [Store] content to a JSON file
///
/// Useful for inspecting a converted grid without any other tooling. Arrays
/// are written with their shape and flattened data.
///
/// ```rust, no_run
/// # use gridtools_store::{read_store, write_json};
/// let store = read_store("./cooling.bin").unwrap();
/// write_json(&store, "./cooling.json").unwrap();
/// ```
pub fn write_json<P: AsRef<Path>>(store: &Store, path: P) -> Result<()> {
    let writer = init_writer(path)?;
    serde_json::to_writer_pretty(writer, store)?;
    Ok(())
}

/// Initialise a writer from anything that can be turned into a path
fn init_writer<P: AsRef<Path>>(path: P) -> Result<BufWriter<File>> {
    let file = File::create(path)?;
    Ok(BufWriter::new(file))
}
