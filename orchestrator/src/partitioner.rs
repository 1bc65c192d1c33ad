use std::num::NonZeroUsize;

use cluster::Partitioned;
use log::debug;
use machine_learning::{Example, MiniBatch};

use crate::{OrchestratorError, Result};

/// Groups the examples of every partition into mini-batches of at most `batch_size` rows.
#[derive(Debug, Clone, Copy)]
pub struct MiniBatchPartitioner {
    batch_size: NonZeroUsize,
}

impl MiniBatchPartitioner {
    /// Creates a new `MiniBatchPartitioner`.
    ///
    /// # Arguments
    /// * `batch_size` - The maximum amount of examples per mini-batch.
    ///
    /// # Returns
    /// `OrchestratorError::InvalidConfiguration` if `batch_size` is zero.
    pub fn new(batch_size: usize) -> Result<Self> {
        let batch_size = NonZeroUsize::new(batch_size).ok_or_else(|| {
            OrchestratorError::InvalidConfiguration("batch_size must be greater than 0".into())
        })?;

        Ok(Self { batch_size })
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size.get()
    }

    /// Chunks every partition independently and in order, the last mini-batch of a partition
    /// may be smaller than the rest.
    ///
    /// # Arguments
    /// * `examples` - The examples to group.
    ///
    /// # Returns
    /// The mini-batches, or a shape error if the examples of a chunk have different widths.
    pub fn partition(&self, examples: Partitioned<Example>) -> Result<Partitioned<MiniBatch>> {
        let batch_size = self.batch_size.get();

        let batches = examples.try_map_partitions(|partition| {
            partition
                .chunks(batch_size)
                .map(MiniBatch::merge)
                .collect::<machine_learning::Result<Vec<_>>>()
        })?;

        debug!(
            batch_size = batch_size,
            mini_batches = batches.count(),
            partitions = batches.num_partitions();
            "partitioned examples"
        );

        Ok(batches)
    }
}
