mod averager;
pub mod configs;
mod error;
mod orchestrator;
mod partitioner;
pub mod sources;

pub use averager::{ParameterAverager, Reduction, add_params};
pub use cluster::{ClusterContext, Partitioned};
pub use error::{OrchestratorError, Result};
pub use orchestrator::{LayerOrchestrator, State};
pub use partitioner::MiniBatchPartitioner;
