use log::trace;
use ndarray::{linalg, prelude::*};

use super::Layer;
use crate::{
    MlErr, Result,
    arch::{activations::ActFn, loss::LossFn},
    dataset::MiniBatch,
    optimization::Optimizer,
};

/// A fully connected layer, `a = act_fn(x · w + b)`.
///
/// The parameters are laid out as the `(n_in, n_out)` weights in row-major order followed by
/// the `n_out` biases.
pub struct Dense {
    dim: (usize, usize),
    size: usize,
    params: Vec<f32>,
    grad: Vec<f32>,
    act_fn: Option<ActFn>,
    loss_fn: Box<dyn LossFn>,
    optimizer: Box<dyn Optimizer>,
    iterations: usize,
}

impl Dense {
    /// Creates a new `Dense` layer.
    ///
    /// # Arguments
    /// * `dim` - The input and output widths of the layer.
    /// * `params` - The initial parameters, `(dim.0 + 1) * dim.1` of them.
    /// * `act_fn` - The activation function, none means identity.
    /// * `loss_fn` - The loss minimized by `fit`.
    /// * `optimizer` - The optimizer used for updating the parameters on `fit`.
    /// * `iterations` - The amount of optimization steps taken per mini-batch.
    ///
    /// # Returns
    /// A new `Dense` instance or an error if `params` has the wrong length.
    pub fn new(
        dim: (usize, usize),
        params: Vec<f32>,
        act_fn: Option<ActFn>,
        loss_fn: Box<dyn LossFn>,
        optimizer: Box<dyn Optimizer>,
        iterations: usize,
    ) -> Result<Self> {
        let size = (dim.0 + 1) * dim.1;

        if params.len() != size {
            return Err(MlErr::ParameterSizeMismatch {
                got: params.len(),
                expected: size,
            });
        }

        Ok(Self {
            dim,
            size,
            params,
            grad: vec![0.; size],
            act_fn,
            loss_fn,
            optimizer,
            iterations,
        })
    }

    pub fn dim(&self) -> (usize, usize) {
        self.dim
    }

    /// Returns the weighted sums and the activations for every row of `x`.
    fn forward(&self, x: ArrayView2<f32>) -> Result<(Array2<f32>, Array2<f32>)> {
        if x.ncols() != self.dim.0 {
            return Err(MlErr::ShapeMismatch {
                what: "features",
                got: x.ncols(),
                expected: self.dim.0,
            });
        }

        let (w, b) = self.view_params()?;
        let mut z = Array2::<f32>::zeros((x.nrows(), self.dim.1));
        linalg::general_mat_mul(1.0, &x, &w, 0.0, &mut z);
        z += &b;

        let a = match &self.act_fn {
            Some(act_fn) => z.mapv(|z| act_fn.f(z)),
            None => z.clone(),
        };

        Ok((z, a))
    }

    /// Writes the gradient of the loss with respect to the parameters into `self.grad`.
    ///
    /// # Arguments
    /// * `x` - The input of the last forward pass.
    /// * `z` - The weighted sums of the last forward pass.
    /// * `d` - The derivative of the loss with respect to the activations.
    fn backward(
        &mut self,
        x: ArrayView2<f32>,
        z: ArrayView2<f32>,
        mut d: Array2<f32>,
    ) -> Result<()> {
        if let Some(act_fn) = &self.act_fn {
            d.zip_mut_with(&z, |d, &z| *d *= act_fn.df(z));
        }

        let (mut dw, mut db) = view_grad(self.dim, &mut self.grad)?;
        linalg::general_mat_mul(1.0, &x.t(), &d, 0.0, &mut dw);
        db.assign(&d.sum_axis(Axis(0)));
        Ok(())
    }

    /// Gives a view of the raw parameters as the weights and biases of this layer.
    fn view_params(&self) -> Result<(ArrayView2<'_, f32>, ArrayView1<'_, f32>)> {
        let w_size = self.size - self.dim.1;
        let (w_raw, b_raw) = self.params.split_at(w_size);
        let weights = ArrayView2::from_shape(self.dim, w_raw)?;
        let biases = ArrayView1::from_shape(self.dim.1, b_raw)?;
        Ok((weights, biases))
    }
}

/// Gives a view of the raw gradient as the delta weights and delta biases of a layer.
fn view_grad(
    dim: (usize, usize),
    grad: &mut [f32],
) -> Result<(ArrayViewMut2<'_, f32>, ArrayViewMut1<'_, f32>)> {
    let (dw_raw, db_raw) = grad.split_at_mut(dim.0 * dim.1);
    let dw = ArrayViewMut2::from_shape(dim, dw_raw)?;
    let db = ArrayViewMut1::from_shape(dim.1, db_raw)?;
    Ok((dw, db))
}

impl Layer for Dense {
    fn num_params(&self) -> usize {
        self.size
    }

    fn params(&self) -> &[f32] {
        &self.params
    }

    fn set_params(&mut self, params: Vec<f32>) -> Result<()> {
        if params.len() != self.size {
            return Err(MlErr::ParameterSizeMismatch {
                got: params.len(),
                expected: self.size,
            });
        }

        self.params = params;
        Ok(())
    }

    fn activate(&self, x: ArrayView2<f32>) -> Result<Array2<f32>> {
        let (_, a) = self.forward(x)?;
        Ok(a)
    }

    fn fit(&mut self, batch: &MiniBatch) -> Result<()> {
        let (x, y) = (batch.x(), batch.y());

        if y.ncols() != self.dim.1 {
            return Err(MlErr::ShapeMismatch {
                what: "label",
                got: y.ncols(),
                expected: self.dim.1,
            });
        }

        for _ in 0..self.iterations {
            let (z, a) = self.forward(x)?;
            let d = self.loss_fn.loss_prime(a.view(), y);
            self.backward(x, z.view(), d)?;
            self.optimizer.update_params(&self.grad, &mut self.params)?;
        }

        if log::log_enabled!(log::Level::Trace) {
            let (_, a) = self.forward(x)?;
            let loss = self.loss_fn.loss(a.view(), y);
            trace!(rows = batch.len(), loss = loss; "fitted mini-batch");
        }

        Ok(())
    }
}
