use std::ops::Range;

/// Splits `total` items among `num_partitions` and returns the range of `partition`.
///
/// Ranges are contiguous, disjoint and cover `[0..total)`, their sizes differ by at most 1.
///
/// # Panics
/// If `partition >= num_partitions`.
pub fn shard_range(total: usize, partition: usize, num_partitions: usize) -> Range<usize> {
    assert!(partition < num_partitions);

    let base = total / num_partitions;
    let rem = total % num_partitions;

    let start = partition * base + partition.min(rem);
    let extra = usize::from(partition < rem);

    start..start + base + extra
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balanced() {
        // 10 items, 3 partitions => 4, 3, 3
        assert_eq!(shard_range(10, 0, 3), 0..4);
        assert_eq!(shard_range(10, 1, 3), 4..7);
        assert_eq!(shard_range(10, 2, 3), 7..10);
    }

    #[test]
    fn fewer_items_than_partitions() {
        assert_eq!(shard_range(2, 0, 4), 0..1);
        assert_eq!(shard_range(2, 1, 4), 1..2);
        assert!(shard_range(2, 3, 4).is_empty());
    }
}
