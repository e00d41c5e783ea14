//! Work partitioning: which contiguous run of output bins each worker owns.
//!
//! The split is closed-form. The first `N mod P` ranks own `N / P + 1` bins,
//! the rest own `N / P`, and ranges follow rank order. Any worker can compute
//! any other worker's range without talking to it.

use core::ops::Range;

use crate::error::DftError;

/// Half-open range `[start, end)` of output bins owned by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Partition {
    pub start: usize,
    pub end: usize,
}

impl Partition {
    /// Build a partition of a `len`-bin output, rejecting reversed ranges and
    /// ranges that run past the end.
    pub fn new(start: usize, end: usize, len: usize) -> Result<Self, DftError> {
        if start > end || end > len {
            return Err(DftError::InvalidRange { start, end, len });
        }
        Ok(Self { start, end })
    }

    /// The whole range `[0, len)`.
    pub fn full(len: usize) -> Self {
        Self { start: 0, end: len }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<Partition> for Range<usize> {
    fn from(p: Partition) -> Self {
        p.range()
    }
}

/// Range of bins owned by `rank` when `len` bins are split over `workers`.
///
/// Ranks at or beyond `len` receive an empty range when `len < workers`.
///
/// # Examples
/// ```
/// use partdft::partition::partition;
/// let p = partition(10, 4, 2).unwrap();
/// assert_eq!((p.start, p.end), (6, 8));
/// ```
pub fn partition(len: usize, workers: usize, rank: usize) -> Result<Partition, DftError> {
    if workers == 0 {
        return Err(DftError::InvalidWorkerCount { workers });
    }
    if rank >= workers {
        return Err(DftError::RankOutOfRange { rank, workers });
    }
    Ok(split(len, workers, rank))
}

/// Iterate every rank's partition in rank order.
pub fn partitions(
    len: usize,
    workers: usize,
) -> Result<impl Iterator<Item = Partition> + Clone, DftError> {
    if workers == 0 {
        return Err(DftError::InvalidWorkerCount { workers });
    }
    Ok((0..workers).map(move |rank| split(len, workers, rank)))
}

// Caller guarantees `workers >= 1` and `rank < workers`.
#[inline]
fn split(len: usize, workers: usize, rank: usize) -> Partition {
    let base = len / workers;
    let remainder = len % workers;
    let start = rank * base + core::cmp::min(rank, remainder);
    let end = start + base + usize::from(rank < remainder);
    Partition { start, end }
}

#[cfg(all(feature = "internal-tests", test))]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    #[test]
    fn test_uneven_split() {
        let got: Vec<(usize, usize)> = partitions(10, 4)
            .unwrap()
            .map(|p| (p.start, p.end))
            .collect();
        assert_eq!(got, [(0, 3), (3, 6), (6, 8), (8, 10)]);
    }

    #[test]
    fn test_reversed_range_rejected() {
        assert!(matches!(
            Partition::new(4, 2, 8),
            Err(DftError::InvalidRange { start: 4, end: 2, len: 8 })
        ));
        assert!(Partition::new(2, 9, 8).is_err());
        assert!(Partition::new(8, 8, 8).unwrap().is_empty());
    }

    proptest! {
        #[test]
        fn prop_partitions_tile_output(len in 0usize..500, workers in 1usize..40) {
            let mut cursor = 0;
            for (rank, p) in partitions(len, workers).unwrap().enumerate() {
                prop_assert_eq!(p, partition(len, workers, rank).unwrap());
                prop_assert_eq!(p.start, cursor);
                prop_assert!(p.len() == len / workers || p.len() == len / workers + 1);
                cursor = p.end;
            }
            prop_assert_eq!(cursor, len);
        }

        #[test]
        fn prop_larger_shares_come_first(len in 0usize..500, workers in 1usize..40) {
            let sizes: Vec<usize> = partitions(len, workers).unwrap().map(|p| p.len()).collect();
            prop_assert!(sizes.windows(2).all(|w| w[0] >= w[1]));
        }
    }
}
