//! Adapters turning the different kinds of input into `Example`s.

mod labeled_point;
mod record;

pub use labeled_point::LabeledPoint;
pub use record::{CsvRecordReader, RecordConverter, RecordReader};

/// Encodes a class label as a one-hot vector of width `num_labels`.
///
/// # Returns
/// The reason of the failure if `label` isn't an integral value in `[0, num_labels)`.
pub(crate) fn one_hot(label: f64, num_labels: usize) -> Result<Vec<f32>, String> {
    if !label.is_finite() || label.fract() != 0. || label < 0. {
        return Err(format!("label {label} is not a class index"));
    }

    if label >= num_labels as f64 {
        return Err(format!(
            "label {label} is out of range for {num_labels} classes"
        ));
    }

    let mut encoded = vec![0.; num_labels];
    encoded[label as usize] = 1.;
    Ok(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_hot_sets_a_single_value() {
        assert_eq!(one_hot(2., 4).unwrap(), [0., 0., 1., 0.]);
        assert_eq!(one_hot(0., 1).unwrap(), [1.]);
    }

    #[test]
    fn one_hot_rejects_non_class_labels() {
        assert!(one_hot(4., 4).is_err());
        assert!(one_hot(1.5, 4).is_err());
        assert!(one_hot(-1., 4).is_err());
        assert!(one_hot(f64::NAN, 4).is_err());
    }
}
