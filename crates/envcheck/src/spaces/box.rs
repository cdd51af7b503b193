//! Box (continuous) observation/action space

use super::Space;
use ndarray::{ArrayD, IxDyn};
use rand::Rng;
use rand_distr::{Distribution, Exp1, StandardNormal, Uniform};
use std::fmt;

/// Element type of a box space
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DType {
    /// 8-bit unsigned integers, the canonical pixel type
    UInt8,
    Float32,
    Float64,
}

impl DType {
    pub fn is_float(self) -> bool {
        matches!(self, DType::Float32 | DType::Float64)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DType::UInt8 => "uint8",
            DType::Float32 => "float32",
            DType::Float64 => "float64",
        };
        f.write_str(name)
    }
}

/// Box space for continuous values with bounds
#[derive(Clone, Debug, PartialEq)]
pub struct Box {
    /// Lower bound for each element
    pub low: ArrayD<f32>,
    /// Upper bound for each element
    pub high: ArrayD<f32>,
    /// Element type
    pub dtype: DType,
    /// Shape of the space
    shape: Vec<usize>,
}

impl Box {
    /// Create a new float32 box space with given bounds
    pub fn new(low: ArrayD<f32>, high: ArrayD<f32>) -> Self {
        assert_eq!(low.shape(), high.shape(), "Low and high must have same shape");
        let shape = low.shape().to_vec();
        Self {
            low,
            high,
            dtype: DType::Float32,
            shape,
        }
    }

    /// Override the element type
    pub fn with_dtype(mut self, dtype: DType) -> Self {
        self.dtype = dtype;
        self
    }

    /// Create a box space with uniform bounds
    pub fn uniform(shape: &[usize], low: f32, high: f32) -> Self {
        let low_arr = ArrayD::from_elem(IxDyn(shape), low);
        let high_arr = ArrayD::from_elem(IxDyn(shape), high);
        Self::new(low_arr, high_arr)
    }

    /// Create a box space from -inf to +inf (unbounded)
    pub fn unbounded(shape: &[usize]) -> Self {
        Self::uniform(shape, f32::NEG_INFINITY, f32::INFINITY)
    }

    /// Create a unit box [0, 1] for all elements
    pub fn unit(shape: &[usize]) -> Self {
        Self::uniform(shape, 0.0, 1.0)
    }

    /// Create a symmetric box [-1, 1] for all elements
    pub fn symmetric(shape: &[usize]) -> Self {
        Self::uniform(shape, -1.0, 1.0)
    }

    /// Create a uint8 image box [0, 255]
    pub fn image(shape: &[usize]) -> Self {
        Self::uniform(shape, 0.0, 255.0).with_dtype(DType::UInt8)
    }

    fn sample_element<R: Rng>(low: f32, high: f32, rng: &mut R) -> f32 {
        match (low.is_finite(), high.is_finite()) {
            // f64 keeps `high - low` finite for bounds near f32::MAX
            (true, true) => {
                Uniform::new_inclusive(f64::from(low), f64::from(high)).sample(rng) as f32
            }
            (true, false) => {
                let offset: f32 = Exp1.sample(rng);
                low + offset
            }
            (false, true) => {
                let offset: f32 = Exp1.sample(rng);
                high - offset
            }
            (false, false) => StandardNormal.sample(rng),
        }
    }
}

impl Space for Box {
    type Sample = ArrayD<f32>;

    fn sample<R: Rng>(&self, rng: &mut R) -> Self::Sample {
        let mut result = ArrayD::zeros(IxDyn(&self.shape));
        for ((&l, &h), r) in self.low.iter().zip(self.high.iter()).zip(result.iter_mut()) {
            let x = Self::sample_element(l, h, rng);
            *r = match self.dtype {
                DType::UInt8 => x.floor(),
                DType::Float32 | DType::Float64 => x,
            };
        }
        result
    }

    fn contains(&self, value: &Self::Sample) -> bool {
        if value.shape() != self.low.shape() {
            return false;
        }
        value
            .iter()
            .zip(self.low.iter())
            .zip(self.high.iter())
            .all(|((&v, &l), &h)| v >= l && v <= h)
    }

    fn shape(&self) -> &[usize] {
        &self.shape
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_box_sample() {
        let space = Box::uniform(&[3, 4], -1.0, 1.0);
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let sample = space.sample(&mut rng);
            assert!(space.contains(&sample));
            assert_eq!(sample.shape(), &[3, 4]);
        }
    }

    #[test]
    fn test_box_contains() {
        let space = Box::uniform(&[2], 0.0, 1.0);
        let valid = ArrayD::from_shape_vec(IxDyn(&[2]), vec![0.5, 0.5]).unwrap();
        let invalid = ArrayD::from_shape_vec(IxDyn(&[2]), vec![1.5, 0.5]).unwrap();
        let wrong_shape = ArrayD::from_shape_vec(IxDyn(&[3]), vec![0.5, 0.5, 0.5]).unwrap();

        assert!(space.contains(&valid));
        assert!(!space.contains(&invalid));
        assert!(!space.contains(&wrong_shape));
    }

    #[test]
    fn test_half_bounded_sample() {
        let low = ArrayD::from_shape_vec(IxDyn(&[2]), vec![0.0, f32::NEG_INFINITY]).unwrap();
        let high = ArrayD::from_shape_vec(IxDyn(&[2]), vec![f32::INFINITY, 1.0]).unwrap();
        let space = Box::new(low, high);
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);

        for _ in 0..100 {
            let sample = space.sample(&mut rng);
            assert!(sample[0] >= 0.0);
            assert!(sample[1] <= 1.0);
        }
    }

    #[test]
    fn test_float_max_bounds_sample() {
        let space = Box::uniform(&[2], -f32::MAX, f32::MAX);
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);

        for _ in 0..100 {
            let sample = space.sample(&mut rng);
            assert!(sample.iter().all(|x| x.is_finite()));
            assert!(space.contains(&sample));
        }
    }

    #[test]
    fn test_image_sample_is_integral() {
        let space = Box::image(&[2, 2, 1]);
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let sample = space.sample(&mut rng);
        assert!(sample.iter().all(|x| x.fract() == 0.0));
        assert_eq!(space.dtype, DType::UInt8);
    }
}
