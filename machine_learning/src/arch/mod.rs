pub mod activations;
mod builder;
pub mod layers;
pub mod loss;
mod specs;

pub use builder::LayerBuilder;
pub use specs::{ActFnSpec, DenseSpec, LossFnSpec, OptimizerSpec, ParamGenSpec};
