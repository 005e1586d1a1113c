use crate::design::PolynomialBasis;
use crate::error::{RegressionError, Result};
use crate::franke::franke_array;
use crate::{Matrix, Vector};
use ndarray::Axis;
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::{Normal, Uniform};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// How to draw a [`SampleSet`] from Franke's function.
#[derive(Clone, Debug, PartialEq)]
pub struct SamplingConfig {
    n_samples: usize,
    seed: u64,
    noise_scale: f64,
}

impl SamplingConfig {
    pub fn new() -> Self {
        Self {
            n_samples: 500,
            seed: 8172,
            noise_scale: 0.0,
        }
    }

    pub fn n_samples(mut self, n_samples: usize) -> Self {
        self.n_samples = n_samples;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Standard deviation of the Gaussian noise added to each target.
    pub fn noise_scale(mut self, noise_scale: f64) -> Self {
        self.noise_scale = noise_scale;
        self
    }

    pub fn get_n_samples(&self) -> usize {
        self.n_samples
    }

    pub fn get_seed(&self) -> u64 {
        self.seed
    }

    pub fn get_noise_scale(&self) -> f64 {
        self.noise_scale
    }

    fn validate(&self) -> Result<()> {
        if self.n_samples == 0 {
            return Err(RegressionError::invalid("n_samples must be at least 1"));
        }
        if !self.noise_scale.is_finite() || self.noise_scale < 0.0 {
            return Err(RegressionError::invalid(format!(
                "noise_scale must be finite and non-negative, got {}",
                self.noise_scale
            )));
        }
        Ok(())
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Scattered points `(x, y)` in the unit square with surface values `z`.
#[derive(Clone, Debug)]
pub struct SampleSet {
    pub x: Vector,
    pub y: Vector,
    pub z: Vector,
}

impl SampleSet {
    pub fn new(x: Vector, y: Vector, z: Vector) -> Result<Self> {
        if x.len() != y.len() || x.len() != z.len() {
            return Err(RegressionError::invalid(format!(
                "x, y and z must have the same length, got {}, {} and {}",
                x.len(),
                y.len(),
                z.len()
            )));
        }

        Ok(Self { x, y, z })
    }

    /// Draws uniform points and evaluates Franke's function on them.
    pub fn generate(config: &SamplingConfig) -> Result<Self> {
        config.validate()?;

        let mut rng = StdRng::seed_from_u64(config.seed);
        let unit = Uniform::new(0.0, 1.0);
        let x = Vector::random_using(config.n_samples, unit, &mut rng);
        let y = Vector::random_using(config.n_samples, unit, &mut rng);
        let mut z = franke_array(&x, &y)?;

        if config.noise_scale > 0.0 {
            let normal = Normal::new(0.0, config.noise_scale)
                .map_err(|e| RegressionError::invalid(e.to_string()))?;
            z += &Vector::random_using(config.n_samples, normal, &mut rng);
        }

        Self::new(x, y, z)
    }

    pub fn n_samples(&self) -> usize {
        self.x.len()
    }

    pub fn design_matrix(&self, basis: &PolynomialBasis) -> Result<Matrix> {
        basis.design_matrix(&self.x, &self.y)
    }

    /// Shuffles with `seed` and splits off `test_size` of the samples.
    pub fn train_test_split(&self, test_size: f64, seed: u64) -> Result<(Self, Self)> {
        if !(test_size > 0.0 && test_size < 1.0) {
            return Err(RegressionError::invalid(format!(
                "test_size must be between 0 and 1, got {}",
                test_size
            )));
        }

        let n_samples = self.n_samples();
        let n_test = (n_samples as f64 * test_size).round() as usize;
        if n_test == 0 || n_test == n_samples {
            return Err(RegressionError::invalid(format!(
                "test_size {} leaves an empty split of {} samples",
                test_size, n_samples
            )));
        }

        let mut indices: Vec<usize> = (0..n_samples).collect();
        indices.shuffle(&mut StdRng::seed_from_u64(seed));
        let (test_idx, train_idx) = indices.split_at(n_test);

        Ok((self.select(train_idx), self.select(test_idx)))
    }

    fn select(&self, indices: &[usize]) -> Self {
        Self {
            x: self.x.select(Axis(0), indices),
            y: self.y.select(Axis(0), indices),
            z: self.z.select(Axis(0), indices),
        }
    }
}
