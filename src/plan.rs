//! Gather bookkeeping: per-rank counts and their offsets in the combined buffer.

use alloc::vec::Vec;
use core::ops::Range;

use crate::error::DftError;
use crate::partition::partitions;

/// Per-rank element counts and displacements for a variable-size gather.
///
/// `counts[r]` is the size of rank `r`'s partition and `displacements` is the
/// exclusive prefix sum of `counts`, so rank `r` lands at
/// `displacements[r]..displacements[r] + counts[r]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatherPlan {
    counts: Vec<usize>,
    displacements: Vec<usize>,
}

impl GatherPlan {
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn displacements(&self) -> &[usize] {
        &self.displacements
    }

    /// Number of participating ranks.
    pub fn workers(&self) -> usize {
        self.counts.len()
    }

    /// Length of the combined buffer.
    pub fn total(&self) -> usize {
        match (self.displacements.last(), self.counts.last()) {
            (Some(d), Some(c)) => d + c,
            _ => 0,
        }
    }

    /// Slot of `rank` in the combined buffer.
    pub fn slot(&self, rank: usize) -> Result<Range<usize>, DftError> {
        let workers = self.workers();
        match (self.displacements.get(rank), self.counts.get(rank)) {
            (Some(&d), Some(&c)) => Ok(d..d + c),
            _ => Err(DftError::RankOutOfRange { rank, workers }),
        }
    }

    /// Split into `(counts, displacements)`.
    pub fn into_parts(self) -> (Vec<usize>, Vec<usize>) {
        (self.counts, self.displacements)
    }
}

/// Plan a gather of `len` bins from `workers` ranks.
///
/// Counts come from the partitioner itself, so the plan and each worker's
/// own range cannot disagree.
///
/// # Examples
/// ```
/// use partdft::plan::plan_gather;
/// let plan = plan_gather(10, 4).unwrap();
/// assert_eq!(plan.counts(), &[3, 3, 2, 2]);
/// assert_eq!(plan.displacements(), &[0, 3, 6, 8]);
/// ```
pub fn plan_gather(len: usize, workers: usize) -> Result<GatherPlan, DftError> {
    let mut counts = Vec::with_capacity(workers);
    let mut displacements = Vec::with_capacity(workers);
    let mut offset = 0;
    for p in partitions(len, workers)? {
        debug_assert_eq!(p.start, offset);
        counts.push(p.len());
        displacements.push(offset);
        offset += p.len();
    }
    Ok(GatherPlan {
        counts,
        displacements,
    })
}

#[cfg(all(feature = "internal-tests", test))]
mod tests {
    use super::*;
    use crate::partition::partition;
    use proptest::prelude::*;

    #[test]
    fn test_empty_problem() {
        let plan = plan_gather(0, 4).unwrap();
        assert_eq!(plan.counts(), &[0, 0, 0, 0]);
        assert_eq!(plan.displacements(), &[0, 0, 0, 0]);
        assert_eq!(plan.total(), 0);
    }

    #[test]
    fn test_slot_out_of_range() {
        let plan = plan_gather(5, 2).unwrap();
        assert_eq!(plan.slot(1).unwrap(), 3..5);
        assert_eq!(
            plan.slot(2).unwrap_err(),
            DftError::RankOutOfRange { rank: 2, workers: 2 }
        );
    }

    proptest! {
        #[test]
        fn prop_plan_mirrors_partitions(len in 0usize..1000, workers in 1usize..64) {
            let plan = plan_gather(len, workers).unwrap();
            prop_assert_eq!(plan.counts().iter().sum::<usize>(), len);
            prop_assert_eq!(plan.total(), len);
            let mut prefix = 0;
            for rank in 0..workers {
                let p = partition(len, workers, rank).unwrap();
                prop_assert_eq!(plan.displacements()[rank], prefix);
                prop_assert_eq!(plan.slot(rank).unwrap(), p.range());
                prefix += plan.counts()[rank];
            }
        }
    }
}
