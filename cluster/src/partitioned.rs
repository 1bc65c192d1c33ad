use std::sync::Arc;

use rayon::{ThreadPool, prelude::*};

/// An in-memory collection split into partitions. Every operation runs on the pool of the
/// `ClusterContext` that created it, in parallel across partitions and across the elements of
/// each partition.
///
/// Element-wise operations keep the order of the elements and the partition layout.
#[derive(Debug)]
pub struct Partitioned<T> {
    pool: Arc<ThreadPool>,
    partitions: Vec<Vec<T>>,
}

impl<T: Send> Partitioned<T> {
    pub(crate) fn new(pool: Arc<ThreadPool>, partitions: Vec<Vec<T>>) -> Self {
        Self { pool, partitions }
    }

    pub fn num_partitions(&self) -> usize {
        self.partitions.len()
    }

    /// Returns the total amount of elements.
    pub fn count(&self) -> usize {
        self.partitions.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.iter().all(Vec::is_empty)
    }

    pub fn partitions(&self) -> &[Vec<T>] {
        &self.partitions
    }

    /// Gathers every element in partition order.
    pub fn collect(self) -> Vec<T> {
        self.partitions.into_iter().flatten().collect()
    }

    /// Applies the fallible `f` to every element, the first error found aborts the whole pass.
    pub fn try_map<U, E, F>(self, f: F) -> Result<Partitioned<U>, E>
    where
        U: Send,
        E: Send,
        F: Fn(T) -> Result<U, E> + Sync + Send,
    {
        let Self { pool, partitions } = self;

        let partitions = pool.install(|| {
            partitions
                .into_par_iter()
                .map(|partition| partition.into_par_iter().map(&f).collect())
                .collect::<Result<Vec<Vec<U>>, E>>()
        })?;

        Ok(Partitioned { pool, partitions })
    }

    /// Replaces every partition by the result of `f` over it.
    pub fn map_partitions<U, F>(self, f: F) -> Partitioned<U>
    where
        U: Send,
        F: Fn(Vec<T>) -> Vec<U> + Sync + Send,
    {
        let Self { pool, partitions } = self;
        let partitions = pool.install(|| partitions.into_par_iter().map(f).collect());

        Partitioned { pool, partitions }
    }

    /// Same as `map_partitions` with a fallible `f`.
    pub fn try_map_partitions<U, E, F>(self, f: F) -> Result<Partitioned<U>, E>
    where
        U: Send,
        E: Send,
        F: Fn(Vec<T>) -> Result<Vec<U>, E> + Sync + Send,
    {
        let Self { pool, partitions } = self;
        let partitions = pool.install(|| {
            partitions
                .into_par_iter()
                .map(f)
                .collect::<Result<Vec<Vec<U>>, E>>()
        })?;

        Ok(Partitioned { pool, partitions })
    }

    /// Combines every element with the fallible `f`, pairing them in an unspecified order. The
    /// first error found aborts the reduction.
    ///
    /// # Returns
    /// `Ok(None)` if the collection is empty.
    pub fn try_reduce<E, F>(self, f: F) -> Result<Option<T>, E>
    where
        E: Send,
        F: Fn(T, T) -> Result<T, E> + Sync + Send,
    {
        let Self { pool, partitions } = self;

        pool.install(|| {
            partitions
                .into_par_iter()
                .flatten()
                .map(Ok::<T, E>)
                .try_reduce_with(f)
                .transpose()
        })
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use crate::ClusterContext;

    fn ctx() -> ClusterContext {
        ClusterContext::new(NonZeroUsize::new(4).unwrap()).unwrap()
    }

    #[test]
    fn try_map_keeps_layout_and_order() {
        let data = ctx().from_partitions(vec![vec![1, 2, 3], vec![], vec![4]]);
        let data = data.try_map(|x| Ok::<_, ()>(x * 10)).unwrap();

        assert_eq!(data.partitions(), [vec![10, 20, 30], vec![], vec![40]]);
    }

    #[test]
    fn try_map_fails_on_any_error() {
        let data = ctx().parallelize((0..100).collect::<Vec<i32>>());
        let result = data.try_map(|x| if x == 57 { Err(x) } else { Ok(x) });

        assert_eq!(result.err(), Some(57));
    }

    #[test]
    fn map_partitions_sees_whole_partitions() {
        let data = ctx().from_partitions(vec![vec![1, 2, 3], vec![4, 5]]);
        let sums = data.map_partitions(|p| vec![p.iter().sum::<i32>()]);

        assert_eq!(sums.collect(), [6, 9]);
    }

    #[test]
    fn try_reduce_sums_every_element() {
        let data = ctx().parallelize((1..=100).collect());
        assert_eq!(data.try_reduce(|a, b| Ok::<_, ()>(a + b)), Ok(Some(5050)));
    }

    #[test]
    fn try_reduce_empty_is_none() {
        let data = ctx().parallelize(Vec::<i32>::new());
        assert_eq!(data.try_reduce(|a, b| Ok::<_, ()>(a + b)), Ok(None));
    }

    #[test]
    fn try_reduce_propagates_errors() {
        let data = ctx().parallelize(vec![1, 2, 3, 4]);
        let result = data.try_reduce(|a, b| match a + b {
            sum if sum > 5 => Err("overflow"),
            sum => Ok(sum),
        });

        assert_eq!(result, Err("overflow"));
    }
}
