use cluster::Partitioned;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{OrchestratorError, Result};

/// How the trained parameter vectors are summed up.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reduction {
    /// Parallel pairwise reduction on the cluster, in no particular order.
    #[default]
    Tree,
    /// Sequential left fold on the calling thread.
    Linear,
}

/// Adds `b` into `a` element-wise.
///
/// # Returns
/// `OrchestratorError::ParameterSizeMismatch` if the lengths differ.
pub fn add_params(mut a: Vec<f32>, b: Vec<f32>) -> Result<Vec<f32>> {
    if a.len() != b.len() {
        return Err(OrchestratorError::ParameterSizeMismatch {
            got: b.len(),
            expected: a.len(),
        });
    }

    a.iter_mut().zip(&b).for_each(|(a, b)| *a += b);
    Ok(a)
}

/// Averages the parameter vectors trained on every mini-batch of a round.
#[derive(Debug, Default, Clone, Copy)]
pub struct ParameterAverager {
    reduction: Reduction,
}

impl ParameterAverager {
    pub fn new(reduction: Reduction) -> Self {
        Self { reduction }
    }

    pub fn reduction(&self) -> Reduction {
        self.reduction
    }

    /// Sums `vectors` and divides the result by `count`.
    ///
    /// # Arguments
    /// * `vectors` - One trained parameter vector per mini-batch.
    /// * `count` - The amount of mini-batches of the round.
    ///
    /// # Returns
    /// The averaged parameters, `OrchestratorError::EmptyDataset` if there's nothing to
    /// average, `OrchestratorError::ParameterSizeMismatch` if the vectors differ in length or
    /// `OrchestratorError::NonFiniteParameters` if any averaged value is NaN or infinite.
    pub fn average(&self, vectors: Partitioned<Vec<f32>>, count: usize) -> Result<Vec<f32>> {
        if count == 0 || vectors.is_empty() {
            return Err(OrchestratorError::EmptyDataset);
        }

        let sum = match self.reduction {
            Reduction::Tree => vectors.try_reduce(add_params)?,
            Reduction::Linear => {
                let mut vectors = vectors.collect().into_iter();
                match vectors.next() {
                    Some(first) => Some(vectors.try_fold(first, add_params)?),
                    None => None,
                }
            }
        };

        let mut params = sum.ok_or(OrchestratorError::EmptyDataset)?;
        let n = count as f32;
        params.iter_mut().for_each(|p| *p /= n);

        if let Some((index, &value)) = params.iter().enumerate().find(|(_, p)| !p.is_finite()) {
            return Err(OrchestratorError::NonFiniteParameters { index, value });
        }

        debug!(count = count, len = params.len(); "averaged parameters");
        Ok(params)
    }
}
