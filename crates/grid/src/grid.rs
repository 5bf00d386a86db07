// crate modules
use crate::error::{Error, Result};
use crate::manifest::Parameter;

// gridtools modules
use gridtools_format::f;
use gridtools_store::{read_store, write_store, Attribute, AttributeBag, Store};

// standard library
use std::collections::BTreeMap;
use std::path::Path;

// external crates
use log::{debug, trace};
use ndarray::{Array1, ArrayD};

/// Attribute holding the full shape of an entry
pub const DIMENSION: &str = "Dimension";

/// Attribute holding the number of axes of an entry
pub const RANK: &str = "Rank";

/// Attribute holding the name of a swept parameter
pub const NAME: &str = "Name";

/// Attribute marking the entry that holds the inner axis
pub const AXIS: &str = "Axis";

/// Entry name prefix for swept parameters, numbered from 1
pub const PARAMETER_PREFIX: &str = "Parameter";

/// The axis sampled within every run, e.g. temperature
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InnerAxis {
    /// Name used for the store entry
    pub name: String,
    /// Sample values in file order
    pub values: Vec<f64>,
}

impl InnerAxis {
    /// Create an inner axis from a name and the sampled values
    pub fn new<S: Into<String>>(name: S, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Number of samples in every run
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if no samples have been recorded
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Dense grid of every field over the full parameter sweep
///
/// Each field has shape `sweep + [inner]` or `sweep + [inner, components]`
/// where `sweep` is the cardinality of every parameter in order.
///
/// Metadata is kept per entry in `attributes`, keyed by field or inner axis
/// name. The `Dimension` and `Rank` attributes are derived from the arrays,
/// so call [Grid::refresh_dimensions()] after changing shapes directly.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Grid {
    /// Swept parameters, outermost first
    pub parameters: Vec<Parameter>,
    /// Axis sampled within each run
    pub inner: InnerAxis,
    /// Field arrays by name
    pub fields: BTreeMap<String, ArrayD<f64>>,
    /// Per-entry attributes by name
    pub attributes: BTreeMap<String, AttributeBag>,
}

impl Grid {
    /// New grid with derived attributes already filled in
    pub fn new(
        parameters: Vec<Parameter>,
        inner: InnerAxis,
        fields: BTreeMap<String, ArrayD<f64>>,
    ) -> Self {
        let mut grid = Self {
            parameters,
            inner,
            fields,
            attributes: BTreeMap::new(),
        };
        grid.refresh_dimensions();
        grid
    }

    /// Cardinality of every swept parameter
    pub fn dimensions(&self) -> Vec<usize> {
        self.parameters.iter().map(Parameter::len).collect()
    }

    /// Index of the last parameter with a matching name
    pub fn find_parameter(&self, name: &str) -> Option<usize> {
        self.parameters.iter().rposition(|p| p.name == name)
    }

    /// Field array by name, or [Error::FieldNotFound] naming the `context`
    pub fn require_field(&self, name: &str, context: &str) -> Result<&ArrayD<f64>> {
        self.fields.get(name).ok_or_else(|| Error::FieldNotFound {
            field: name.to_string(),
            context: context.to_string(),
        })
    }

    /// Check a field is consistent with the sweep and inner axis
    pub fn check_field(&self, name: &str, context: &str) -> Result<()> {
        let array = self.require_field(name, context)?;
        let mut expected = self.dimensions();
        expected.push(self.inner.len());

        let n = expected.len();
        let found = array.shape();
        if found.len() < n || found[..n] != expected[..] {
            return Err(Error::ShapeMismatch {
                field: name.to_string(),
                context: context.to_string(),
                expected,
                found: found.to_vec(),
            });
        }
        Ok(())
    }

    /// Insert or update the derived `Dimension` and `Rank` attributes
    pub fn refresh_dimensions(&mut self) {
        for (name, array) in &self.fields {
            let attrs = self.attributes.entry(name.clone()).or_default();
            set_dimensions(attrs, array.shape());
        }
        let attrs = self.attributes.entry(self.inner.name.clone()).or_default();
        set_dimensions(attrs, &[self.inner.len()]);
    }

    /// Attribute of an entry, if both exist
    pub fn attribute(&self, entry: &str, name: &str) -> Option<&Attribute> {
        self.attributes.get(entry).and_then(|a| a.get(name))
    }

    /// Lay the grid out as store entries
    ///
    /// Fields are written under their own names, the inner axis under its
    /// name with an `Axis` marker, and parameters as `Parameter1..N` each
    /// carrying its `Name`.
    pub fn to_store(&self) -> Store {
        let mut store = Store::new();

        for (name, array) in &self.fields {
            let mut attrs = self.attributes.get(name).cloned().unwrap_or_default();
            set_dimensions(&mut attrs, array.shape());
            store.set(name.as_str(), array.clone(), attrs);
        }

        let mut attrs = self
            .attributes
            .get(&self.inner.name)
            .cloned()
            .unwrap_or_default();
        set_dimensions(&mut attrs, &[self.inner.len()]);
        attrs.insert(AXIS.into(), Attribute::from("inner"));
        store.set(
            self.inner.name.as_str(),
            Array1::from_vec(self.inner.values.clone()).into_dyn(),
            attrs,
        );

        for (i, parameter) in self.parameters.iter().enumerate() {
            let mut attrs = AttributeBag::new();
            set_dimensions(&mut attrs, &[parameter.len()]);
            attrs.insert(NAME.into(), Attribute::from(parameter.name.as_str()));
            store.set(
                f!("{PARAMETER_PREFIX}{}", i + 1),
                Array1::from_vec(parameter.values.clone()).into_dyn(),
                attrs,
            );
        }

        store
    }

    /// Rebuild a grid from store entries laid out by [Grid::to_store()]
    pub fn from_store(mut store: Store) -> Result<Self> {
        let inner_name = store
            .iter()
            .find(|(_, e)| e.attr(AXIS).and_then(Attribute::as_text) == Some("inner"))
            .map(|(name, _)| name.to_string())
            .ok_or_else(|| Error::MissingEntry("inner axis".to_string()))?;

        // parameters are numbered contiguously from 1
        let mut parameters = Vec::new();
        loop {
            let key = f!("{PARAMETER_PREFIX}{}", parameters.len() + 1);
            let Some(entry) = store.take(&key) else {
                break;
            };
            let name = entry
                .attr(NAME)
                .and_then(Attribute::as_text)
                .ok_or_else(|| Error::MissingEntry(f!("{key} {NAME} attribute")))?
                .to_string();
            trace!("{key} -> {name}");
            parameters.push(Parameter::new(name, entry.data.iter().copied().collect()));
        }

        let mut attributes = BTreeMap::new();
        let inner = match store.take(&inner_name) {
            Some(mut entry) => {
                entry.attrs.remove(AXIS);
                attributes.insert(inner_name.clone(), entry.attrs);
                InnerAxis::new(inner_name, entry.data.iter().copied().collect())
            }
            None => return Err(Error::MissingEntry(inner_name)),
        };

        let names: Vec<String> = store.names().map(String::from).collect();
        let mut fields = BTreeMap::new();
        for name in names {
            if let Some(entry) = store.take(&name) {
                fields.insert(name.clone(), entry.data);
                attributes.insert(name, entry.attrs);
            }
        }

        let mut grid = Self {
            parameters,
            inner,
            fields,
            attributes,
        };

        let names: Vec<String> = grid.fields.keys().cloned().collect();
        for name in names {
            grid.check_field(&name, "store")?;
        }
        grid.refresh_dimensions();

        debug!(
            "Loaded grid {:?} x {} with {} fields",
            grid.dimensions(),
            grid.inner.len(),
            grid.fields.len()
        );
        Ok(grid)
    }

    /// Write the grid to a store file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_store(&self.to_store(), path)?;
        Ok(())
    }

    /// Read a grid from a store file
    ///
    /// ```rust
    /// # use gridtools_grid::Grid;
    /// assert!(Grid::load("./data/does_not_exist.grid").is_err());
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_store(read_store(path)?)
    }
}

fn set_dimensions(attrs: &mut AttributeBag, shape: &[usize]) {
    let shape: Vec<i64> = shape.iter().map(|&s| s as i64).collect();
    attrs.insert(RANK.into(), Attribute::I64(shape.len() as i64));
    attrs.insert(DIMENSION.into(), Attribute::I64Array(shape));
}

impl std::fmt::Display for Grid {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = "Grid {\n".to_string();
        for p in &self.parameters {
            s += &f!("    parameter {:?}: {} values\n", p.name, p.len());
        }
        s += &f!("    inner {:?}: {} values\n", self.inner.name, self.inner.len());
        for (name, array) in &self.fields {
            s += &f!("    field {name:?}: {:?}\n", array.shape());
        }
        s += "}";
        write!(fmt, "{s}")
    }
}
