use std::{fs, io, num::NonZeroUsize, path::Path, sync::Arc};

use log::{debug, info};
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

use crate::{Partitioned, shard_range};

/// The handle to the pool of workers every `Partitioned` collection runs on.
///
/// Cloning it is cheap, all the clones share the same pool.
#[derive(Debug, Clone)]
pub struct ClusterContext {
    pool: Arc<ThreadPool>,
    workers: NonZeroUsize,
}

impl ClusterContext {
    /// Creates a new `ClusterContext` with a fixed amount of workers.
    ///
    /// # Arguments
    /// * `workers` - The amount of threads in the pool.
    ///
    /// # Returns
    /// An error if the thread pool can't be spawned.
    pub fn new(workers: NonZeroUsize) -> Result<Self, ThreadPoolBuildError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers.get())
            .thread_name(|i| format!("cluster-worker-{i}"))
            .build()?;

        info!(workers = workers.get(); "cluster context started");

        Ok(Self {
            pool: Arc::new(pool),
            workers,
        })
    }

    pub fn workers(&self) -> NonZeroUsize {
        self.workers
    }

    /// Distributes `items` into one partition per worker.
    pub fn parallelize<T: Send>(&self, items: Vec<T>) -> Partitioned<T> {
        self.parallelize_with(items, self.workers)
    }

    /// Distributes `items` into `num_partitions` contiguous and balanced partitions, keeping
    /// their order.
    pub fn parallelize_with<T: Send>(
        &self,
        items: Vec<T>,
        num_partitions: NonZeroUsize,
    ) -> Partitioned<T> {
        let total = items.len();
        let n = num_partitions.get();
        let mut items = items.into_iter();

        let partitions = (0..n)
            .map(|p| items.by_ref().take(shard_range(total, p, n).len()).collect())
            .collect();

        self.from_partitions(partitions)
    }

    /// Wraps an explicit partition layout.
    pub fn from_partitions<T: Send>(&self, partitions: Vec<Vec<T>>) -> Partitioned<T> {
        Partitioned::new(self.pool.clone(), partitions)
    }

    /// Reads a text file into a collection of its lines, one element per line.
    ///
    /// # Arguments
    /// * `path` - The path of the file.
    pub fn text_file(&self, path: impl AsRef<Path>) -> io::Result<Partitioned<String>> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let lines: Vec<_> = contents.lines().map(str::to_owned).collect();

        debug!("read {} lines from {}", lines.len(), path.display());
        Ok(self.parallelize(lines))
    }
}
