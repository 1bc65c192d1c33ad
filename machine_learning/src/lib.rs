pub mod arch;
pub mod config;
pub mod dataset;
pub mod error;
pub mod initialization;
pub mod optimization;

pub use arch::{
    DenseSpec,
    layers::{Dense, Layer},
};
pub use config::{LayerConfiguration, LayerFactory};
pub use dataset::{Example, MiniBatch};
pub use error::{MlErr, Result};
