use std::{
    error::Error,
    fmt::{self, Display},
};

use ndarray::ShapeError;

use crate::initialization::RandErr;

/// The result type used in the entire machine learning module.
pub type Result<T> = std::result::Result<T, MlErr>;

/// The machine learning module's error type.
#[derive(Debug)]
pub enum MlErr {
    /// The layer configuration is malformed or can't be deserialized.
    InvalidConfiguration(String),
    /// A parameter vector doesn't have the length the layer declares.
    ParameterSizeMismatch { got: usize, expected: usize },
    /// The data doesn't fit the dimensions of the layer or of the rest of the batch.
    ShapeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
}

impl Display for MlErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlErr::InvalidConfiguration(msg) => write!(f, "invalid layer configuration: {msg}"),
            MlErr::ParameterSizeMismatch { got, expected } => write!(
                f,
                "parameter vector has {got} values but the layer declares {expected}"
            ),
            MlErr::ShapeMismatch {
                what,
                got,
                expected,
            } => write!(f, "shape mismatch for {what}: got {got}, expected {expected}"),
        }
    }
}

impl Error for MlErr {}

impl From<serde_json::Error> for MlErr {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidConfiguration(value.to_string())
    }
}

impl From<RandErr> for MlErr {
    fn from(value: RandErr) -> Self {
        Self::InvalidConfiguration(value.to_string())
    }
}

impl From<ShapeError> for MlErr {
    fn from(value: ShapeError) -> Self {
        Self::InvalidConfiguration(value.to_string())
    }
}
