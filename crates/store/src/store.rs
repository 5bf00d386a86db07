// gridtools modules
use gridtools_format::f;

// crate modules
use crate::attribute::{Attribute, AttributeBag};

// standard library
use std::collections::BTreeMap;

// external crates
use ndarray::ArrayD;
use serde::{Deserialize, Serialize};

/// A single named entry in a [Store]
///
/// The array is always `f64`. Any narrower width the data should be
/// interpreted with belongs in the attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Dense n-dimensional data
    pub data: ArrayD<f64>,
    /// Typed metadata for the entry
    pub attrs: AttributeBag,
}

impl Entry {
    /// Shape of the data array
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Look up a single attribute by name
    pub fn attr(&self, name: &str) -> Option<&Attribute> {
        self.attrs.get(name)
    }
}

/// Collection of named arrays with typed attributes
///
/// This is deliberately opaque to the grid logic, which only ever asks for
/// `get(name)` and `set(name, data, attrs)`. Entries are kept sorted by name
/// so that written files are reproducible.
///
/// ```rust
/// # use gridtools_store::{Attribute, AttributeBag, Store};
/// # use ndarray::ArrayD;
/// let mut store = Store::new();
///
/// let mut attrs = AttributeBag::new();
/// attrs.insert("Rank".into(), Attribute::from(1_i64));
/// store.set("Temperature", ArrayD::zeros(vec![5]), attrs);
///
/// let entry = store.get("Temperature").unwrap();
/// assert_eq!(entry.shape(), &[5]);
/// assert_eq!(entry.attr("Rank"), Some(&Attribute::I64(1)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Store {
    entries: BTreeMap<String, Entry>,
}

impl Store {
    /// Create a new empty [Store]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reference to an entry, if it exists
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    /// Mutable reference to an entry, if it exists
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Entry> {
        self.entries.get_mut(name)
    }

    /// Insert or replace an entry
    pub fn set<S: Into<String>>(&mut self, name: S, data: ArrayD<f64>, attrs: AttributeBag) {
        self.entries.insert(name.into(), Entry { data, attrs });
    }

    /// Remove an entry and hand it back to the caller
    pub fn take(&mut self, name: &str) -> Option<Entry> {
        self.entries.remove(name)
    }

    /// Check for an entry by name
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Names of all entries in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate over `(name, entry)` pairs in sorted order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there are no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Display for Store {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = "Store {\n".to_string();
        for (name, entry) in &self.entries {
            s += &f!("    {name}: {:?}\n", entry.shape());
            for (key, attr) in &entry.attrs {
                s += &f!("        {key} ({}) = {attr}\n", attr.type_name());
            }
        }
        s += "}";
        write!(fmt, "{s}")
    }
}
