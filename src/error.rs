//! Error type shared by every stage of the distributed transform.

use alloc::string::String;

/// Errors raised while partitioning, computing or gathering a transform.
///
/// Variants fall into two families. Invalid input is detected before any
/// computation starts. Collective failures abort the whole transform, since a
/// spectrum is only meaningful when every bin is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DftError {
    /// Fewer than one worker was requested.
    InvalidWorkerCount { workers: usize },
    /// A worker or coordinator rank lies outside `0..workers`.
    RankOutOfRange { rank: usize, workers: usize },
    /// An index range is reversed or extends past the signal.
    InvalidRange { start: usize, end: usize, len: usize },
    /// The signal length cannot be represented exactly in the sample type.
    LengthNotRepresentable { len: usize },
    /// A gather plan was built for a different problem size or worker count.
    PlanMismatch {
        plan_len: usize,
        plan_workers: usize,
        len: usize,
        workers: usize,
    },
    /// A configuration value could not be used.
    InvalidConfig { key: &'static str, value: String },
    /// A worker delivered a segment whose length disagrees with the plan.
    SegmentSizeMismatch {
        rank: usize,
        expected: usize,
        actual: usize,
    },
    /// The coordinator never heard from a worker.
    MissingContribution { rank: usize },
    /// The coordinator heard from the same worker twice.
    DuplicateContribution { rank: usize },
    /// A worker transformed a different signal than the coordinator.
    InconsistentSignal { rank: usize },
    /// The gather was addressed to a coordinator the collective does not route to.
    CoordinatorMismatch { expected: usize, requested: usize },
    /// The coordinator went away before the collective completed.
    CoordinatorUnavailable,
    /// A worker thread panicked.
    WorkerPanicked { rank: usize },
}

impl DftError {
    /// True for errors caused by the caller's arguments or configuration.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            DftError::InvalidWorkerCount { .. }
                | DftError::RankOutOfRange { .. }
                | DftError::InvalidRange { .. }
                | DftError::LengthNotRepresentable { .. }
                | DftError::PlanMismatch { .. }
                | DftError::InvalidConfig { .. }
        )
    }

    /// True for failures of the gather exchange itself.
    pub fn is_collective_failure(&self) -> bool {
        !self.is_invalid_input()
    }
}

impl core::fmt::Display for DftError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DftError::InvalidWorkerCount { workers } => {
                write!(f, "worker count must be at least 1, got {}", workers)
            }
            DftError::RankOutOfRange { rank, workers } => {
                write!(f, "rank {} out of range for {} workers", rank, workers)
            }
            DftError::InvalidRange { start, end, len } => write!(
                f,
                "index range [{}, {}) is invalid for a signal of length {}",
                start, end, len
            ),
            DftError::LengthNotRepresentable { len } => write!(
                f,
                "signal length {} is not exactly representable in the sample type",
                len
            ),
            DftError::PlanMismatch {
                plan_len,
                plan_workers,
                len,
                workers,
            } => write!(
                f,
                "gather plan covers {} bins over {} workers, transform has {} bins over {} workers",
                plan_len, plan_workers, len, workers
            ),
            DftError::InvalidConfig { key, value } => {
                write!(f, "invalid value {:?} for {}", value, key)
            }
            DftError::SegmentSizeMismatch {
                rank,
                expected,
                actual,
            } => write!(
                f,
                "rank {} contributed {} bins, plan expects {}",
                rank, actual, expected
            ),
            DftError::MissingContribution { rank } => {
                write!(f, "no contribution received from rank {}", rank)
            }
            DftError::DuplicateContribution { rank } => {
                write!(f, "rank {} contributed more than once", rank)
            }
            DftError::InconsistentSignal { rank } => write!(
                f,
                "rank {} transformed a different signal than the coordinator",
                rank
            ),
            DftError::CoordinatorMismatch {
                expected,
                requested,
            } => write!(
                f,
                "gather addressed to rank {} but the collective routes to rank {}",
                requested, expected
            ),
            DftError::CoordinatorUnavailable => {
                write!(f, "coordinator left before the gather completed")
            }
            DftError::WorkerPanicked { rank } => write!(f, "worker {} panicked", rank),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DftError {}

#[cfg(all(feature = "internal-tests", test))]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_taxonomy() {
        assert!(DftError::InvalidWorkerCount { workers: 0 }.is_invalid_input());
        assert!(DftError::RankOutOfRange { rank: 4, workers: 4 }.is_invalid_input());
        assert!(DftError::MissingContribution { rank: 2 }.is_collective_failure());
        assert!(DftError::WorkerPanicked { rank: 1 }.is_collective_failure());
        assert!(!DftError::CoordinatorUnavailable.is_invalid_input());
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            DftError::RankOutOfRange { rank: 5, workers: 4 }.to_string(),
            "rank 5 out of range for 4 workers"
        );
        assert_eq!(
            DftError::SegmentSizeMismatch {
                rank: 1,
                expected: 3,
                actual: 2
            }
            .to_string(),
            "rank 1 contributed 2 bins, plan expects 3"
        );
    }
}
