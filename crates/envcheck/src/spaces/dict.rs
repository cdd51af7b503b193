//! Dict (dictionary) observation/action space

use super::{DynSpace, Space, Value};
use rand::Rng;
use std::collections::BTreeMap;

/// Dictionary space containing named sub-spaces
#[derive(Clone, Debug, PartialEq)]
pub struct Dict {
    /// Named sub-spaces, ordered by name
    pub spaces: BTreeMap<String, DynSpace>,
    /// Cached total shape (sum of all sub-space sizes)
    shape: Vec<usize>,
}

impl Dict {
    /// Create a new dict space
    pub fn new(spaces: BTreeMap<String, DynSpace>) -> Self {
        let total: usize = spaces
            .values()
            .map(|s| s.shape().iter().product::<usize>())
            .sum();
        Self {
            spaces,
            shape: vec![total],
        }
    }

    /// Create from a list of (name, space) pairs
    pub fn from_pairs(pairs: Vec<(&str, DynSpace)>) -> Self {
        let spaces: BTreeMap<_, _> = pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        Self::new(spaces)
    }

    /// Get a sub-space by name
    pub fn get(&self, name: &str) -> Option<&DynSpace> {
        self.spaces.get(name)
    }
}

impl Space for Dict {
    type Sample = BTreeMap<String, Value>;

    fn sample<R: Rng>(&self, rng: &mut R) -> Self::Sample {
        self.spaces
            .iter()
            .map(|(k, v)| (k.clone(), v.sample(rng)))
            .collect()
    }

    fn contains(&self, value: &Self::Sample) -> bool {
        value.len() == self.spaces.len()
            && self
                .spaces
                .iter()
                .all(|(k, s)| value.get(k).is_some_and(|v| s.contains(v)))
    }

    fn shape(&self) -> &[usize] {
        &self.shape
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spaces::{Box as BoxSpace, Discrete};

    fn goal_space() -> Dict {
        Dict::from_pairs(vec![
            ("position", DynSpace::Box(BoxSpace::uniform(&[3], -1.0, 1.0))),
            ("action", DynSpace::Discrete(Discrete::new(4))),
        ])
    }

    #[test]
    fn test_dict_creation() {
        let dict = goal_space();

        assert!(dict.get("position").is_some());
        assert!(dict.get("action").is_some());
        assert!(dict.get("unknown").is_none());
        assert_eq!(dict.shape(), &[4]);
    }

    #[test]
    fn test_dict_contains_requires_same_keys() {
        let dict = goal_space();
        let mut rng = rand::thread_rng();
        let mut sample = dict.sample(&mut rng);
        assert!(dict.contains(&sample));

        sample.insert("extra".to_string(), Value::Int(0));
        assert!(!dict.contains(&sample));

        sample.remove("extra");
        sample.insert("action".to_string(), Value::Int(9));
        assert!(!dict.contains(&sample));
    }
}
