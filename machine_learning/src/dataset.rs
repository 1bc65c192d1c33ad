use ndarray::{Array2, ArrayView2};

use crate::{MlErr, Result};

/// A single supervised sample, already vectorized.
#[derive(Debug, Clone, PartialEq)]
pub struct Example {
    features: Vec<f32>,
    label: Vec<f32>,
}

impl Example {
    /// Creates a new `Example`.
    ///
    /// # Arguments
    /// * `features` - The input vector.
    /// * `label` - The expected output vector.
    pub fn new(features: Vec<f32>, label: Vec<f32>) -> Self {
        Self { features, label }
    }

    pub fn features(&self) -> &[f32] {
        &self.features
    }

    pub fn label(&self) -> &[f32] {
        &self.label
    }
}

/// A bounded, ordered group of examples merged into a feature matrix and a label matrix,
/// one row per example.
#[derive(Debug, Clone, PartialEq)]
pub struct MiniBatch {
    x: Array2<f32>,
    y: Array2<f32>,
}

impl MiniBatch {
    /// Merges the given examples into a single `MiniBatch`, preserving their order.
    ///
    /// # Arguments
    /// * `examples` - The examples of the batch, all of them with the same widths.
    ///
    /// # Returns
    /// The merged batch, or an error if the slice is empty or the widths differ.
    pub fn merge(examples: &[Example]) -> Result<Self> {
        let Some(first) = examples.first() else {
            return Err(MlErr::ShapeMismatch {
                what: "mini-batch rows",
                got: 0,
                expected: 1,
            });
        };

        let x_size = first.features.len();
        let y_size = first.label.len();
        let mut xs = Vec::with_capacity(examples.len() * x_size);
        let mut ys = Vec::with_capacity(examples.len() * y_size);

        for example in examples {
            if example.features.len() != x_size {
                return Err(MlErr::ShapeMismatch {
                    what: "features",
                    got: example.features.len(),
                    expected: x_size,
                });
            }

            if example.label.len() != y_size {
                return Err(MlErr::ShapeMismatch {
                    what: "label",
                    got: example.label.len(),
                    expected: y_size,
                });
            }

            xs.extend_from_slice(&example.features);
            ys.extend_from_slice(&example.label);
        }

        let rows = examples.len();
        let x = Array2::from_shape_vec((rows, x_size), xs)?;
        let y = Array2::from_shape_vec((rows, y_size), ys)?;
        Ok(Self { x, y })
    }

    /// Returns the amount of examples in this batch.
    pub fn len(&self) -> usize {
        self.x.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn x(&self) -> ArrayView2<'_, f32> {
        self.x.view()
    }

    pub fn y(&self) -> ArrayView2<'_, f32> {
        self.y.view()
    }

    /// Splits the batch back into its examples, in order.
    pub fn examples(&self) -> Vec<Example> {
        self.x
            .rows()
            .into_iter()
            .zip(self.y.rows())
            .map(|(x, y)| Example::new(x.to_vec(), y.to_vec()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_stacks_examples_in_order() {
        let examples = [
            Example::new(vec![1., 2.], vec![0.]),
            Example::new(vec![3., 4.], vec![1.]),
            Example::new(vec![5., 6.], vec![0.]),
        ];

        let batch = MiniBatch::merge(&examples).unwrap();

        assert_eq!(batch.len(), 3);
        assert_eq!(batch.x().shape(), [3, 2]);
        assert_eq!(batch.x().row(1).to_vec(), [3., 4.]);
        assert_eq!(batch.y().column(0).to_vec(), [0., 1., 0.]);
        assert_eq!(batch.examples(), examples);
    }

    #[test]
    fn merge_rejects_ragged_features() {
        let examples = [
            Example::new(vec![1., 2.], vec![0.]),
            Example::new(vec![3.], vec![1.]),
        ];

        let err = MiniBatch::merge(&examples).unwrap_err();
        assert!(matches!(
            err,
            MlErr::ShapeMismatch {
                what: "features",
                got: 1,
                expected: 2
            }
        ));
    }

    #[test]
    fn merge_rejects_empty_slice() {
        assert!(MiniBatch::merge(&[]).is_err());
    }
}
