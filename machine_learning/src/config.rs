use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{MlErr, Result, arch::layers::Layer};

/// Knows how to build a `Layer` out of a `LayerConfiguration` and how many parameters
/// such a layer holds.
///
/// Factories travel inside the serialized configuration that every worker receives, so
/// they must be serializable and free of shared mutable state.
pub trait LayerFactory: Clone + Send + Sync + Serialize + DeserializeOwned {
    /// The kind of layer this factory builds.
    type Layer: Layer;

    /// Builds a new layer with freshly initialized parameters.
    ///
    /// # Arguments
    /// * `conf` - The configuration this factory belongs to.
    fn create(&self, conf: &LayerConfiguration<Self>) -> Result<Self::Layer>;

    /// Returns the amount of parameters a layer built from `conf` holds.
    fn num_params(&self, conf: &LayerConfiguration<Self>) -> usize;

    /// Checks the factory specific hyperparameters.
    fn validate(&self, _conf: &LayerConfiguration<Self>) -> Result<()> {
        Ok(())
    }
}

/// The immutable description of a layer and of how it's trained on each mini-batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerConfiguration<F> {
    /// The width of the input vectors.
    pub n_in: usize,
    /// The width of the output vectors.
    pub n_out: usize,
    /// The maximum amount of examples per mini-batch.
    pub batch_size: usize,
    /// The amount of optimization steps run over each mini-batch.
    pub iterations: NonZeroUsize,
    /// The seed used for initializing parameters.
    #[serde(default)]
    pub seed: Option<u64>,
    pub factory: F,
}

impl<F: LayerFactory> LayerConfiguration<F> {
    /// Creates a new `LayerConfiguration`.
    ///
    /// # Arguments
    /// * `n_in` - The width of the input vectors.
    /// * `n_out` - The width of the output vectors.
    /// * `batch_size` - The maximum amount of examples per mini-batch.
    /// * `iterations` - The amount of optimization steps run over each mini-batch.
    /// * `factory` - The factory of layers.
    pub fn new(
        n_in: usize,
        n_out: usize,
        batch_size: usize,
        iterations: NonZeroUsize,
        factory: F,
    ) -> Self {
        Self {
            n_in,
            n_out,
            batch_size,
            iterations,
            seed: None,
            factory,
        }
    }

    /// Sets the seed used for initializing the parameters of the layers.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks that the configuration describes a buildable layer.
    ///
    /// # Returns
    /// `MlErr::InvalidConfiguration` if any dimension or the batch size is zero, or the
    /// factory rejects its own hyperparameters.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(MlErr::InvalidConfiguration(
                "batch_size must be greater than 0".into(),
            ));
        }

        if self.n_in == 0 || self.n_out == 0 {
            return Err(MlErr::InvalidConfiguration(format!(
                "layer dimensions must be greater than 0, got ({}, {})",
                self.n_in, self.n_out
            )));
        }

        self.factory.validate(self)
    }

    /// Builds a new layer through the configured factory.
    pub fn create_layer(&self) -> Result<F::Layer> {
        self.factory.create(self)
    }

    /// Returns the amount of parameters declared by the factory.
    pub fn num_params(&self) -> usize {
        self.factory.num_params(self)
    }

    /// Serializes this configuration so it can be shipped to the workers.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserializes and validates a configuration.
    ///
    /// # Arguments
    /// * `json` - A configuration serialized with `to_json`.
    pub fn from_json(json: &str) -> Result<Self> {
        let conf: Self = serde_json::from_str(json)?;
        conf.validate()?;
        Ok(conf)
    }
}
