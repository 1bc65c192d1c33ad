use std::{marker::PhantomData, sync::Arc, time::Instant};

use log::debug;
use machine_learning::{Layer, LayerConfiguration, LayerFactory, MiniBatch, MlErr, Result};

/// The task every worker runs over one mini-batch.
///
/// It captures the serialized configuration and the initial parameters broadcast by the
/// orchestrator. Both are immutable and shared between every clone of the trainer, each
/// call to `train` builds its own layer out of them.
pub struct LocalTrainer<F> {
    conf: Arc<str>,
    params: Arc<[f32]>,
    _factory: PhantomData<fn() -> F>,
}

impl<F> Clone for LocalTrainer<F> {
    fn clone(&self) -> Self {
        Self {
            conf: Arc::clone(&self.conf),
            params: Arc::clone(&self.params),
            _factory: PhantomData,
        }
    }
}

impl<F: LayerFactory> LocalTrainer<F> {
    /// Creates a new `LocalTrainer`.
    ///
    /// # Args
    /// * `conf` - The layer configuration serialized as json.
    /// * `params` - The initial parameters of the round.
    ///
    /// # Returns
    /// A new trainer instance.
    pub fn new(conf: impl Into<Arc<str>>, params: impl Into<Arc<[f32]>>) -> Self {
        Self {
            conf: conf.into(),
            params: params.into(),
            _factory: PhantomData,
        }
    }

    /// Trains a private copy of the layer on `batch`.
    ///
    /// # Args
    /// * `batch` - The mini-batch to fit.
    ///
    /// # Returns
    /// The parameters of the layer after fitting.
    ///
    /// # Errors
    /// `MlErr::InvalidConfiguration` if the configuration can't be decoded and
    /// `MlErr::ParameterSizeMismatch` if the broadcast parameters don't match it.
    pub fn train(&self, batch: &MiniBatch) -> Result<Vec<f32>> {
        let start = Instant::now();

        let conf = LayerConfiguration::<F>::from_json(&self.conf)?;
        let expected = conf.num_params();

        if self.params.len() != expected {
            return Err(MlErr::ParameterSizeMismatch {
                got: self.params.len(),
                expected,
            });
        }

        let mut layer = conf.create_layer()?;
        layer.set_params(self.params.to_vec())?;
        layer.fit(batch)?;

        let elapsed_us = start.elapsed().as_micros() as u64;
        debug!(rows = batch.len(), elapsed_us = elapsed_us; "trained mini-batch");

        Ok(layer.params().to_vec())
    }
}
