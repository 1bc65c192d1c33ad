mod context;
mod partitioned;
mod shard;

pub use context::ClusterContext;
pub use partitioned::Partitioned;
pub use shard::shard_range;
