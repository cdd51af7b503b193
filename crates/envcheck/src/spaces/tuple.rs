//! Tuple observation/action space

use super::{DynSpace, Space, Value};
use rand::Rng;

/// Tuple space containing an ordered list of sub-spaces
#[derive(Clone, Debug, PartialEq)]
pub struct Tuple {
    /// Ordered sub-spaces
    pub spaces: Vec<DynSpace>,
    /// Cached total shape
    shape: Vec<usize>,
}

impl Tuple {
    /// Create a new tuple space
    pub fn new(spaces: Vec<DynSpace>) -> Self {
        let total: usize = spaces
            .iter()
            .map(|s| s.shape().iter().product::<usize>())
            .sum();
        Self {
            spaces,
            shape: vec![total],
        }
    }
}

impl Space for Tuple {
    type Sample = Vec<Value>;

    fn sample<R: Rng>(&self, rng: &mut R) -> Self::Sample {
        self.spaces.iter().map(|s| s.sample(rng)).collect()
    }

    fn contains(&self, value: &Self::Sample) -> bool {
        if value.len() != self.spaces.len() {
            return false;
        }
        value.iter().zip(self.spaces.iter()).all(|(v, s)| s.contains(v))
    }

    fn shape(&self) -> &[usize] {
        &self.shape
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spaces::{Box as BoxSpace, Discrete};

    #[test]
    fn test_tuple_creation() {
        let tuple = Tuple::new(vec![
            DynSpace::Discrete(Discrete::new(2)),
            DynSpace::Box(BoxSpace::uniform(&[2], 0.0, 1.0)),
        ]);
        assert_eq!(tuple.shape(), &[3]); // 1 (discrete) + 2 (box)
    }

    #[test]
    fn test_tuple_contains_checks_length() {
        let tuple = Tuple::new(vec![
            DynSpace::Discrete(Discrete::new(2)),
            DynSpace::Discrete(Discrete::new(3)),
        ]);
        assert!(tuple.contains(&vec![Value::Int(1), Value::Int(2)]));
        assert!(!tuple.contains(&vec![Value::Int(1)]));
        assert!(!tuple.contains(&vec![Value::Int(2), Value::Int(2)]));
    }
}
