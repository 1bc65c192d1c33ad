use std::{fs, path::Path};

use machine_learning::{DenseSpec, LayerConfiguration};
use serde::{Deserialize, Serialize};

use crate::{Reduction, Result};

fn default_delimiter() -> char {
    ','
}

/// The configuration of a command line training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub layer: LayerConfiguration<DenseSpec>,
    #[serde(default)]
    pub reduction: Reduction,
    /// The field delimiter of the records file.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

impl RunConfig {
    /// Parses and validates a json run configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let conf: Self = serde_json::from_str(json)?;
        conf.layer.validate()?;
        Ok(conf)
    }

    /// Reads a json run configuration from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use machine_learning::arch::{ActFnSpec, OptimizerSpec, ParamGenSpec};

    use super::*;
    use crate::OrchestratorError;

    #[test]
    fn defaults() {
        let json = r#"{
            "layer": {
                "n_in": 4,
                "n_out": 3,
                "batch_size": 16,
                "iterations": 5,
                "factory": {
                    "act_fn": { "sigmoid": { "amp": 1.0 } },
                    "init": "xavier_uniform",
                    "optimizer": { "gradient_descent": { "learning_rate": 0.05 } }
                }
            }
        }"#;

        let conf = RunConfig::from_json(json).unwrap();

        assert_eq!(conf.reduction, Reduction::Tree);
        assert_eq!(conf.delimiter, ',');
        assert_eq!(conf.layer.iterations.get(), 5);
        assert_eq!(conf.layer.seed, None);
        assert_eq!(conf.layer.factory.act_fn, Some(ActFnSpec::Sigmoid { amp: 1. }));
        assert_eq!(conf.layer.factory.init, ParamGenSpec::XavierUniform);
        assert_eq!(
            conf.layer.factory.optimizer,
            OptimizerSpec::GradientDescent {
                learning_rate: 0.05
            }
        );
    }

    #[test]
    fn explicit_fields() {
        let json = r#"{
            "layer": {
                "n_in": 1, "n_out": 1, "batch_size": 1, "iterations": 1, "seed": 9,
                "factory": {
                    "init": { "const": { "value": 0.0 } },
                    "optimizer": { "gradient_descent": { "learning_rate": 0.1 } }
                }
            },
            "reduction": "linear",
            "delimiter": ";"
        }"#;

        let conf = RunConfig::from_json(json).unwrap();

        assert_eq!(conf.reduction, Reduction::Linear);
        assert_eq!(conf.delimiter, ';');
        assert_eq!(conf.layer.seed, Some(9));
    }

    #[test]
    fn zero_iterations_are_rejected() {
        let json = r#"{
            "layer": {
                "n_in": 1, "n_out": 1, "batch_size": 1, "iterations": 0,
                "factory": {
                    "init": { "normal": { "mean": 0.0, "std_dev": 0.1 } },
                    "optimizer": { "gradient_descent": { "learning_rate": 0.1 } }
                }
            }
        }"#;

        assert!(matches!(
            RunConfig::from_json(json),
            Err(OrchestratorError::InvalidConfiguration(_))
        ));
    }
}
