use std::{error::Error, fmt, io};

use machine_learning::MlErr;

/// The orchestrator module's result type.
pub type Result<T> = std::result::Result<T, OrchestratorError>;

/// All errors that can occur while fitting a layer.
#[derive(Debug)]
pub enum OrchestratorError {
    /// The layer or run configuration is malformed, caught before dispatching.
    InvalidConfiguration(String),
    /// A parameter vector doesn't have the length the configuration declares.
    ParameterSizeMismatch { got: usize, expected: usize },
    /// There are no mini-batches to train on.
    EmptyDataset,
    /// Averaging produced a NaN or infinite parameter.
    NonFiniteParameters { index: usize, value: f32 },
    /// Predictions were requested before a successful fit.
    NotFitted,
    /// The data doesn't fit the dimensions of the layer.
    ShapeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    /// A record of the input can't be turned into an example.
    InvalidRecord { record: String, reason: String },
    /// An underlying I/O error.
    Io(io::Error),
}

impl fmt::Display for OrchestratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration(msg) => write!(f, "invalid configuration: {msg}"),
            Self::ParameterSizeMismatch { got, expected } => write!(
                f,
                "parameter vector has {got} values but the configuration declares {expected}"
            ),
            Self::EmptyDataset => f.write_str("the dataset yields no mini-batches"),
            Self::NonFiniteParameters { index, value } => {
                write!(f, "averaged parameter {index} is {value}")
            }
            Self::NotFitted => f.write_str("the layer hasn't been fitted yet"),
            Self::ShapeMismatch {
                what,
                got,
                expected,
            } => write!(f, "shape mismatch for {what}: got {got}, expected {expected}"),
            Self::InvalidRecord { record, reason } => {
                write!(f, "invalid record {record:?}: {reason}")
            }
            Self::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl Error for OrchestratorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MlErr> for OrchestratorError {
    fn from(value: MlErr) -> Self {
        match value {
            MlErr::InvalidConfiguration(msg) => Self::InvalidConfiguration(msg),
            MlErr::ParameterSizeMismatch { got, expected } => {
                Self::ParameterSizeMismatch { got, expected }
            }
            MlErr::ShapeMismatch {
                what,
                got,
                expected,
            } => Self::ShapeMismatch {
                what,
                got,
                expected,
            },
        }
    }
}

impl From<io::Error> for OrchestratorError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for OrchestratorError {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidConfiguration(value.to_string())
    }
}

/// Boundary conversion for binaries.
impl From<OrchestratorError> for io::Error {
    fn from(value: OrchestratorError) -> Self {
        match value {
            OrchestratorError::Io(e) => e,
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}
