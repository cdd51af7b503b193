//! Loosely-typed values exchanged with environments.

use ndarray::ArrayD;
use std::collections::BTreeMap;
use std::fmt;

/// A value crossing the environment boundary.
///
/// Observations, actions, rewards, flags, info mappings and the raw tuples
/// returned by `reset()`/`step()` are all `Value`s, so that an environment can
/// return something of the wrong shape or type and the checker can say so.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Dense floating point array
    Array(ArrayD<f32>),
    /// Dense 8-bit unsigned array (pixels)
    Bytes(ArrayD<u8>),
    Dict(BTreeMap<String, Value>),
    Tuple(Vec<Value>),
}

impl Value {
    /// Short type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Array(_) => "float array",
            Value::Bytes(_) => "uint8 array",
            Value::Dict(_) => "dict",
            Value::Tuple(_) => "tuple",
        }
    }

    /// Numeric scalar (`Int` or `Float`) as f64
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayD<f32>> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }

    /// Whether this is a dense numeric array
    pub fn is_dense(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Bytes(_))
    }

    /// Visit every numeric scalar, recursing into containers.
    ///
    /// Booleans and strings carry no magnitude and are skipped.
    pub fn for_each_scalar(&self, f: &mut impl FnMut(f64)) {
        match self {
            Value::Int(v) => f(*v as f64),
            Value::Float(v) => f(*v),
            Value::Array(a) => a.iter().for_each(|&x| f(x as f64)),
            Value::Bytes(a) => a.iter().for_each(|&x| f(x as f64)),
            Value::Dict(d) => d.values().for_each(|v| v.for_each_scalar(f)),
            Value::Tuple(items) => items.iter().for_each(|v| v.for_each_scalar(f)),
            Value::Bool(_) | Value::Str(_) => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Array(a) => write!(f, "{}", a),
            Value::Bytes(a) => write!(f, "{}", a),
            Value::Dict(d) => {
                write!(f, "{{")?;
                for (i, (k, v)) in d.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}: {}", k, v)?;
                }
                write!(f, "}}")
            }
            Value::Tuple(items) => {
                write!(f, "(")?;
                for (i, v) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v as f64)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<ArrayD<f32>> for Value {
    fn from(v: ArrayD<f32>) -> Self {
        Value::Array(v)
    }
}

impl From<ArrayD<u8>> for Value {
    fn from(v: ArrayD<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(v: BTreeMap<String, Value>) -> Self {
        Value::Dict(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Tuple(v)
    }
}
