//! Discrete action/observation space

use super::Space;
use rand::Rng;
use std::fmt;

/// Space of `n` consecutive integers `{start, ..., start + n - 1}`.
///
/// Elements cross the environment boundary as `Value::Int`, so membership is
/// decided on `i64` and negative integers are simply outside a zero-based space.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Discrete {
    /// Number of possible values
    pub n: usize,
    /// Smallest element
    pub start: i64,
    /// Always scalar
    shape: Vec<usize>,
}

impl Discrete {
    /// Create a zero-based discrete space with n values
    pub fn new(n: usize) -> Self {
        assert!(n > 0, "Discrete space must have at least 1 element");
        Self {
            n,
            start: 0,
            shape: vec![],
        }
    }

    /// Shift the smallest element to `start`
    pub fn with_start(mut self, start: i64) -> Self {
        self.start = start;
        self
    }

    fn end(&self) -> i64 {
        self.start.saturating_add(self.n as i64)
    }
}

impl Space for Discrete {
    type Sample = i64;

    fn sample<R: Rng>(&self, rng: &mut R) -> Self::Sample {
        rng.gen_range(self.start..self.end())
    }

    fn contains(&self, value: &Self::Sample) -> bool {
        (self.start..self.end()).contains(value)
    }

    fn shape(&self) -> &[usize] {
        &self.shape
    }

    fn num_elements(&self) -> usize {
        1
    }
}

impl fmt::Display for Discrete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == 0 {
            write!(f, "Discrete({})", self.n)
        } else {
            write!(f, "Discrete({}, start={})", self.n, self.start)
        }
    }
}
