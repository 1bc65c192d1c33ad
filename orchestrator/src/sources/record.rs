use machine_learning::Example;

use super::one_hot;
use crate::{OrchestratorError, Result};

/// Parses one line of text input into its numeric fields.
pub trait RecordReader: Sync {
    /// # Arguments
    /// * `record` - A single non blank line of the input.
    ///
    /// # Returns
    /// Every field of the record, in order.
    fn read(&self, record: &str) -> Result<Vec<f64>>;
}

/// Reads delimiter separated numeric values.
#[derive(Debug, Clone, Copy)]
pub struct CsvRecordReader {
    delimiter: char,
}

impl CsvRecordReader {
    pub fn new(delimiter: char) -> Self {
        Self { delimiter }
    }
}

impl Default for CsvRecordReader {
    fn default() -> Self {
        Self::new(',')
    }
}

impl RecordReader for CsvRecordReader {
    fn read(&self, record: &str) -> Result<Vec<f64>> {
        record
            .split(self.delimiter)
            .map(str::trim)
            .map(|field| {
                field
                    .parse()
                    .map_err(|e| OrchestratorError::InvalidRecord {
                        record: record.to_owned(),
                        reason: format!("field {field:?}: {e}"),
                    })
            })
            .collect()
    }
}

/// Splits the fields of a record into the features and the one-hot encoded label of an
/// `Example`.
#[derive(Debug, Clone, Copy)]
pub struct RecordConverter {
    label_index: usize,
    num_labels: usize,
}

impl RecordConverter {
    /// Creates a new `RecordConverter`.
    ///
    /// # Arguments
    /// * `label_index` - The position of the label among the fields of a record.
    /// * `num_labels` - The amount of classes, the width of the encoded label.
    pub fn new(label_index: usize, num_labels: usize) -> Self {
        Self {
            label_index,
            num_labels,
        }
    }

    /// Builds an `Example` out of the parsed fields of `record`.
    pub fn convert(&self, record: &str, mut fields: Vec<f64>) -> Result<Example> {
        let invalid = |reason| OrchestratorError::InvalidRecord {
            record: record.to_owned(),
            reason,
        };

        if self.label_index >= fields.len() {
            return Err(invalid(format!(
                "label index {} is out of range for {} fields",
                self.label_index,
                fields.len()
            )));
        }

        let label = fields.remove(self.label_index);
        let label = one_hot(label, self.num_labels).map_err(invalid)?;
        let features = fields.into_iter().map(|x| x as f32).collect();

        Ok(Example::new(features, label))
    }
}
