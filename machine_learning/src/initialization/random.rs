use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Normal, Uniform};

use super::{ParamGen, RandErr, Result, param_gen::take_budget};

/// Builds the random number generator used for initializing parameters.
///
/// # Arguments
/// * `seed` - An optional seed, the generator is seeded from the os otherwise.
pub fn generate_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// The distributions random weights are drawn from.
#[derive(Debug, Clone)]
pub enum WeightDist {
    Uniform(Uniform<f32>),
    Normal(Normal<f32>),
}

impl WeightDist {
    /// Uniform over `[low, high)`.
    ///
    /// # Returns
    /// An error if the range is empty or not finite.
    pub fn uniform(low: f32, high: f32) -> Result<Self> {
        Ok(Self::Uniform(Uniform::new(low, high)?))
    }

    /// Glorot uniform: `±sqrt(6 / (fan_in + fan_out))`.
    pub fn xavier_uniform(fan_in: usize, fan_out: usize) -> Result<Self> {
        let bound = (6. / (fan_in + fan_out) as f32).sqrt();
        Self::uniform(-bound, bound)
    }

    /// # Returns
    /// An error if `mean` isn't finite or `std_dev` is negative or NaN.
    pub fn normal(mean: f32, std_dev: f32) -> Result<Self> {
        if !mean.is_finite() {
            return Err(RandErr::new(format!("mean must be finite, got {mean}")));
        }

        Ok(Self::Normal(Normal::new(mean, std_dev)?))
    }
}

impl Distribution<f32> for WeightDist {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        match self {
            Self::Uniform(dist) => dist.sample(rng),
            Self::Normal(dist) => dist.sample(rng),
        }
    }
}

/// Draws up to `budget` weights from a `WeightDist`.
pub struct RandParamGen {
    rng: StdRng,
    dist: WeightDist,
    budget: usize,
}

impl RandParamGen {
    pub fn new(rng: StdRng, dist: WeightDist, budget: usize) -> Self {
        Self { rng, dist, budget }
    }
}

impl ParamGen for RandParamGen {
    fn sample(&mut self, n: usize) -> Option<Vec<f32>> {
        let n = take_budget(&mut self.budget, n)?;
        Some((&mut self.rng).sample_iter(&self.dist).take(n).collect())
    }
}
