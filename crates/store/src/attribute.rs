// gridtools modules
use gridtools_format::{f, join_values};

// standard library
use std::collections::BTreeMap;

// external crates
use serde::{Deserialize, Serialize};

/// Collection of named attributes attached to a single store entry
pub type AttributeBag = BTreeMap<String, Attribute>;

/// Typed attribute value
///
/// The variant is chosen when the attribute is written, so whether a value is
/// a scalar or an array, and its numeric width, is preserved exactly.
///
/// ```rust
/// # use gridtools_store::Attribute;
/// let rank = Attribute::from(3_i64);
/// let dims = Attribute::from(vec![3_i64, 4, 10]);
///
/// assert!(!rank.is_array());
/// assert!(dims.is_array());
/// assert_eq!(dims.len(), 3);
/// assert_eq!(dims.as_i64_array(), Some(vec![3, 4, 10]));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Attribute {
    /// Single precision scalar
    F32(f32),
    /// Double precision scalar
    F64(f64),
    /// 32-bit integer scalar
    I32(i32),
    /// 64-bit integer scalar
    I64(i64),
    /// Text value, e.g. a parameter name or units
    Text(String),
    /// Single precision array
    F32Array(Vec<f32>),
    /// Double precision array
    F64Array(Vec<f64>),
    /// 32-bit integer array
    I32Array(Vec<i32>),
    /// 64-bit integer array
    I64Array(Vec<i64>),
}

impl Attribute {
    /// True for any of the array variants
    pub fn is_array(&self) -> bool {
        matches!(
            self,
            Self::F32Array(_) | Self::F64Array(_) | Self::I32Array(_) | Self::I64Array(_)
        )
    }

    /// Number of values held, 1 for scalars and text
    pub fn len(&self) -> usize {
        match self {
            Self::F32Array(v) => v.len(),
            Self::F64Array(v) => v.len(),
            Self::I32Array(v) => v.len(),
            Self::I64Array(v) => v.len(),
            _ => 1,
        }
    }

    /// Only possible for an empty array variant
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short name of the stored type, e.g. `f64` or `i64[]`
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::Text(_) => "text",
            Self::F32Array(_) => "f32[]",
            Self::F64Array(_) => "f64[]",
            Self::I32Array(_) => "i32[]",
            Self::I64Array(_) => "i64[]",
        }
    }

    /// Text content, if this is a text attribute
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Any numeric attribute widened to a list of f64 values
    ///
    /// Scalars become a single element list. Text is `None`.
    pub fn as_f64_array(&self) -> Option<Vec<f64>> {
        match self {
            Self::F32(v) => Some(vec![*v as f64]),
            Self::F64(v) => Some(vec![*v]),
            Self::I32(v) => Some(vec![*v as f64]),
            Self::I64(v) => Some(vec![*v as f64]),
            Self::Text(_) => None,
            Self::F32Array(v) => Some(v.iter().map(|x| *x as f64).collect()),
            Self::F64Array(v) => Some(v.clone()),
            Self::I32Array(v) => Some(v.iter().map(|x| *x as f64).collect()),
            Self::I64Array(v) => Some(v.iter().map(|x| *x as f64).collect()),
        }
    }

    /// Any integer attribute widened to a list of i64 values
    pub fn as_i64_array(&self) -> Option<Vec<i64>> {
        match self {
            Self::I32(v) => Some(vec![*v as i64]),
            Self::I64(v) => Some(vec![*v]),
            Self::I32Array(v) => Some(v.iter().map(|x| *x as i64).collect()),
            Self::I64Array(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Self::F32(v) => f!("{v}"),
            Self::F64(v) => f!("{v}"),
            Self::I32(v) => f!("{v}"),
            Self::I64(v) => f!("{v}"),
            Self::Text(v) => f!("\"{v}\""),
            Self::F32Array(v) => f!("[{}]", join_values(v, ", ")),
            Self::F64Array(v) => f!("[{}]", join_values(v, ", ")),
            Self::I32Array(v) => f!("[{}]", join_values(v, ", ")),
            Self::I64Array(v) => f!("[{}]", join_values(v, ", ")),
        };
        write!(fmt, "{s}")
    }
}

impl From<f32> for Attribute {
    fn from(value: f32) -> Self {
        Self::F32(value)
    }
}

impl From<f64> for Attribute {
    fn from(value: f64) -> Self {
        Self::F64(value)
    }
}

impl From<i32> for Attribute {
    fn from(value: i32) -> Self {
        Self::I32(value)
    }
}

impl From<i64> for Attribute {
    fn from(value: i64) -> Self {
        Self::I64(value)
    }
}

impl From<&str> for Attribute {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Attribute {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<f32>> for Attribute {
    fn from(value: Vec<f32>) -> Self {
        Self::F32Array(value)
    }
}

impl From<Vec<f64>> for Attribute {
    fn from(value: Vec<f64>) -> Self {
        Self::F64Array(value)
    }
}

impl From<Vec<i32>> for Attribute {
    fn from(value: Vec<i32>) -> Self {
        Self::I32Array(value)
    }
}

impl From<Vec<i64>> for Attribute {
    fn from(value: Vec<i64>) -> Self {
        Self::I64Array(value)
    }
}
