use machine_learning::Example;

use super::one_hot;
use crate::{OrchestratorError, Result};

/// A class label together with its feature vector.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledPoint {
    pub label: f64,
    pub features: Vec<f64>,
}

impl LabeledPoint {
    pub fn new(label: f64, features: Vec<f64>) -> Self {
        Self { label, features }
    }

    /// Converts this point into an `Example` with a one-hot label of width `num_labels`.
    pub fn into_example(self, num_labels: usize) -> Result<Example> {
        let label = one_hot(self.label, num_labels).map_err(|reason| {
            OrchestratorError::InvalidRecord {
                record: format!("{self:?}"),
                reason,
            }
        })?;

        let features = self.features.into_iter().map(|x| x as f32).collect();
        Ok(Example::new(features, label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn into_example() {
        let example = LabeledPoint::new(1., vec![0.5, -2.]).into_example(3).unwrap();

        assert_eq!(example.features(), [0.5, -2.]);
        assert_eq!(example.label(), [0., 1., 0.]);
    }

    #[test]
    fn out_of_range_label() {
        let err = LabeledPoint::new(3., vec![0.]).into_example(3).unwrap_err();
        assert!(matches!(err, OrchestratorError::InvalidRecord { .. }));
    }
}
