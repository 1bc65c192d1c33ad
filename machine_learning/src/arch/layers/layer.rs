use ndarray::{Array2, ArrayView2};

use crate::{Result, dataset::MiniBatch};

/// A trainable layer backed by a single flat parameter vector.
pub trait Layer {
    /// Returns the amount of parameters this layer holds.
    fn num_params(&self) -> usize;

    /// Returns the current parameters of this layer.
    fn params(&self) -> &[f32];

    /// Replaces the parameters of this layer.
    ///
    /// # Arguments
    /// * `params` - The new parameters, must be exactly `num_params` long.
    ///
    /// # Returns
    /// `MlErr::ParameterSizeMismatch` if the length is wrong, the layer is left untouched.
    fn set_params(&mut self, params: Vec<f32>) -> Result<()>;

    /// Computes the output of the layer for every row of `x`.
    fn activate(&self, x: ArrayView2<f32>) -> Result<Array2<f32>>;

    /// Runs the local training procedure over one mini-batch, updating the parameters.
    fn fit(&mut self, batch: &MiniBatch) -> Result<()>;
}
