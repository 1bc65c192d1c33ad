use serde::{Deserialize, Serialize};

/// Serializable form of `ActFn`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActFnSpec {
    Sigmoid { amp: f32 },
    Relu,
}

/// Serializable form of the weight generator, biases always start at zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamGenSpec {
    Const { value: f32 },
    Uniform { low: f32, high: f32 },
    XavierUniform,
    Normal { mean: f32, std_dev: f32 },
}

/// Serializable form of the `Optimizer` implementations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerSpec {
    GradientDescent { learning_rate: f32 },
}

impl OptimizerSpec {
    pub fn learning_rate(&self) -> f32 {
        match *self {
            OptimizerSpec::GradientDescent { learning_rate } => learning_rate,
        }
    }
}

/// Serializable form of the `LossFn` implementations.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossFnSpec {
    #[default]
    Mse,
}

/// Describes a `Dense` layer, the stock `LayerFactory`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseSpec {
    #[serde(default)]
    pub act_fn: Option<ActFnSpec>,
    pub init: ParamGenSpec,
    pub optimizer: OptimizerSpec,
    #[serde(default)]
    pub loss: LossFnSpec,
}

impl DenseSpec {
    /// Creates a new `DenseSpec` with no activation and a mean squared error loss.
    pub fn new(init: ParamGenSpec, optimizer: OptimizerSpec) -> Self {
        Self {
            act_fn: None,
            init,
            optimizer,
            loss: LossFnSpec::Mse,
        }
    }

    pub fn with_act_fn(mut self, act_fn: ActFnSpec) -> Self {
        self.act_fn = Some(act_fn);
        self
    }
}
