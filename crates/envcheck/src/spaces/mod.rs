//! Observation and action space types.
//!
//! Provides Gymnasium-compatible space descriptors. [`DynSpace`] is the closed
//! set of kinds an environment may declare; membership of a runtime [`Value`]
//! is decided per variant by [`DynSpace::contains`].

mod r#box;
mod dict;
mod discrete;
mod tuple;
mod value;

pub use dict::Dict;
pub use discrete::Discrete;
pub use r#box::{Box, DType};
pub use tuple::Tuple;
pub use value::Value;

use rand::Rng;
use std::fmt;

/// Trait for observation and action spaces
pub trait Space: Clone {
    /// The type of samples from this space
    type Sample;

    /// Sample a random element from this space
    fn sample<R: Rng>(&self, rng: &mut R) -> Self::Sample;

    /// Check if a value is contained in this space
    fn contains(&self, value: &Self::Sample) -> bool;

    /// Get the shape of samples from this space
    fn shape(&self) -> &[usize];

    /// Get the total number of elements in a sample
    fn num_elements(&self) -> usize {
        self.shape().iter().product()
    }
}

/// Enum for dynamic space types
#[derive(Clone, Debug, PartialEq)]
pub enum DynSpace {
    Discrete(Discrete),
    Box(Box),
    Dict(Dict),
    Tuple(Tuple),
}

impl DynSpace {
    /// Name of the space kind
    pub fn kind(&self) -> &'static str {
        match self {
            DynSpace::Discrete(_) => "Discrete",
            DynSpace::Box(_) => "Box",
            DynSpace::Dict(_) => "Dict",
            DynSpace::Tuple(_) => "Tuple",
        }
    }

    /// Get the shape of this space
    pub fn shape(&self) -> Vec<usize> {
        match self {
            DynSpace::Discrete(s) => s.shape().to_vec(),
            DynSpace::Box(s) => s.shape().to_vec(),
            DynSpace::Dict(s) => s.shape().to_vec(),
            DynSpace::Tuple(s) => s.shape().to_vec(),
        }
    }

    /// Sample from this space
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Value {
        match self {
            DynSpace::Discrete(s) => Value::Int(s.sample(rng)),
            DynSpace::Box(s) => {
                let sample = s.sample(rng);
                match s.dtype {
                    DType::UInt8 => Value::Bytes(sample.mapv(|x| x as u8)),
                    DType::Float32 | DType::Float64 => Value::Array(sample),
                }
            }
            DynSpace::Dict(s) => Value::Dict(s.sample(rng)),
            DynSpace::Tuple(s) => Value::Tuple(s.sample(rng)),
        }
    }

    /// Check if this space contains the value
    pub fn contains(&self, value: &Value) -> bool {
        match (self, value) {
            (DynSpace::Discrete(s), Value::Int(v)) => s.contains(v),
            (DynSpace::Box(s), Value::Array(a)) => s.dtype.is_float() && s.contains(a),
            (DynSpace::Box(s), Value::Bytes(a)) => {
                s.dtype == DType::UInt8 && s.contains(&a.mapv(|x| x as f32))
            }
            (DynSpace::Dict(s), Value::Dict(d)) => s.contains(d),
            (DynSpace::Tuple(s), Value::Tuple(items)) => s.contains(items),
            _ => false,
        }
    }
}

impl fmt::Display for DynSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DynSpace::Discrete(s) => write!(f, "{}", s),
            DynSpace::Box(s) => write!(f, "Box({:?}, {})", s.shape(), s.dtype),
            DynSpace::Dict(s) => {
                write!(f, "Dict(")?;
                for (i, (k, v)) in s.spaces.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, ")")
            }
            DynSpace::Tuple(s) => {
                write!(f, "Tuple(")?;
                for (i, v) in s.spaces.iter().enumerate() {
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
