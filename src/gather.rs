//! Variable-size gather of per-worker segments into one spectrum.
//!
//! The transport only has to move [`Contribution`]s to the coordinator and
//! block every participant until the coordinator has assembled them. Placement
//! is decided here from the [`GatherPlan`], never from arrival order.

use alloc::vec;
use alloc::vec::Vec;

use crate::error::DftError;
use crate::num::{Complex, Float};
use crate::plan::GatherPlan;
use crate::spectrum::{SignalFingerprint, Spectrum};

/// One worker's share of the gather.
#[derive(Debug, Clone, PartialEq)]
pub struct Contribution<T: Float> {
    pub rank: usize,
    pub fingerprint: SignalFingerprint,
    pub segment: Vec<Complex<T>>,
}

/// Gather-to-one collective over a fixed group of ranks.
///
/// Implementations must be reliable and blocking. The coordinator collects
/// every contribution, in any order, and hands them to `finish`. Only then are
/// the other ranks released, each with the outcome of `finish`: the
/// coordinator gets the spectrum, members get `None`, and an error reaches
/// every rank unchanged.
pub trait Collective<T: Float> {
    /// Rank of the calling worker.
    fn rank(&self) -> usize;
    /// Number of workers in the group.
    fn size(&self) -> usize;
    fn gatherv<F>(
        self,
        contribution: Contribution<T>,
        root: usize,
        finish: F,
    ) -> Result<Option<Spectrum<T>>, DftError>
    where
        Self: Sized,
        F: FnOnce(Vec<Contribution<T>>) -> Result<Spectrum<T>, DftError>;
}

/// Collective for a group of one. The caller is its own coordinator.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoloCollective;

impl<T: Float> Collective<T> for SoloCollective {
    fn rank(&self) -> usize {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn gatherv<F>(
        self,
        contribution: Contribution<T>,
        root: usize,
        finish: F,
    ) -> Result<Option<Spectrum<T>>, DftError>
    where
        F: FnOnce(Vec<Contribution<T>>) -> Result<Spectrum<T>, DftError>,
    {
        if root != 0 {
            return Err(DftError::RankOutOfRange {
                rank: root,
                workers: 1,
            });
        }
        finish(vec![contribution]).map(Some)
    }
}

/// Contribute `segment` and, on the coordinator, assemble the spectrum.
///
/// `fingerprint` identifies the signal this worker transformed. The segment
/// length must equal the plan's count for the caller's rank; an empty segment
/// is a valid contribution.
pub fn gather<T: Float, C: Collective<T>>(
    segment: Vec<Complex<T>>,
    fingerprint: SignalFingerprint,
    len: usize,
    root: usize,
    plan: &GatherPlan,
    comm: C,
) -> Result<Option<Spectrum<T>>, DftError> {
    let rank = comm.rank();
    let workers = comm.size();
    if root >= workers {
        return Err(DftError::RankOutOfRange {
            rank: root,
            workers,
        });
    }
    if plan.workers() != workers || plan.total() != len {
        return Err(DftError::PlanMismatch {
            plan_len: plan.total(),
            plan_workers: plan.workers(),
            len,
            workers,
        });
    }
    let expected = plan.slot(rank)?.len();
    if segment.len() != expected {
        return Err(DftError::SegmentSizeMismatch {
            rank,
            expected,
            actual: segment.len(),
        });
    }

    let contribution = Contribution {
        rank,
        fingerprint,
        segment,
    };
    comm.gatherv(contribution, root, |all| assemble(all, plan, &fingerprint))
}

/// Place every contribution at its planned displacement.
///
/// Fails if any rank is missing, repeated, mis-sized or transformed a signal
/// other than `expected`.
pub fn assemble<T: Float>(
    contributions: Vec<Contribution<T>>,
    plan: &GatherPlan,
    expected: &SignalFingerprint,
) -> Result<Spectrum<T>, DftError> {
    let workers = plan.workers();
    let mut bins = vec![Complex::zero(); plan.total()];
    let mut seen = vec![false; workers];
    for c in contributions {
        let slot = plan.slot(c.rank)?;
        if seen[c.rank] {
            return Err(DftError::DuplicateContribution { rank: c.rank });
        }
        if c.fingerprint != *expected {
            return Err(DftError::InconsistentSignal { rank: c.rank });
        }
        if c.segment.len() != slot.len() {
            return Err(DftError::SegmentSizeMismatch {
                rank: c.rank,
                expected: slot.len(),
                actual: c.segment.len(),
            });
        }
        bins[slot].copy_from_slice(&c.segment);
        seen[c.rank] = true;
    }
    if let Some(rank) = seen.iter().position(|&s| !s) {
        return Err(DftError::MissingContribution { rank });
    }
    Ok(Spectrum::new(bins))
}

#[cfg(all(feature = "internal-tests", test))]
mod tests {
    use super::*;
    use crate::num::Complex64;
    use crate::plan::plan_gather;

    fn contribution(rank: usize, values: &[f64], fp: SignalFingerprint) -> Contribution<f64> {
        Contribution {
            rank,
            fingerprint: fp,
            segment: values.iter().map(|&v| Complex64::new(v, -v)).collect(),
        }
    }

    #[test]
    fn test_assemble_ignores_arrival_order() {
        let fp = SignalFingerprint::of(&[0.0f64; 5]);
        let plan = plan_gather(5, 3).unwrap();
        let out = assemble(
            vec![
                contribution(2, &[4.0], fp),
                contribution(0, &[0.0, 1.0], fp),
                contribution(1, &[2.0, 3.0], fp),
            ],
            &plan,
            &fp,
        )
        .unwrap();
        let re: Vec<f64> = out.iter().map(|c| c.re).collect();
        assert_eq!(re, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_assemble_rejects_duplicate_rank() {
        let fp = SignalFingerprint::of(&[0.0f64; 2]);
        let plan = plan_gather(2, 2).unwrap();
        let err = assemble(
            vec![contribution(0, &[1.0], fp), contribution(0, &[1.0], fp)],
            &plan,
            &fp,
        )
        .unwrap_err();
        assert_eq!(err, DftError::DuplicateContribution { rank: 0 });
    }

    #[test]
    fn test_solo_rejects_foreign_root() {
        let fp = SignalFingerprint::of::<f64>(&[]);
        let plan = plan_gather(0, 1).unwrap();
        let err = SoloCollective
            .gatherv(contribution(0, &[], fp), 1, |cs| assemble(cs, &plan, &fp))
            .unwrap_err();
        assert_eq!(err, DftError::RankOutOfRange { rank: 1, workers: 1 });
    }

    #[test]
    fn test_solo_reports_assembly_error() {
        let fp = SignalFingerprint::of(&[1.0f64]);
        let other = SignalFingerprint::of(&[2.0f64]);
        let plan = plan_gather(1, 1).unwrap();
        let err = SoloCollective
            .gatherv(contribution(0, &[1.0], other), 0, |cs| assemble(cs, &plan, &fp))
            .unwrap_err();
        assert_eq!(err, DftError::InconsistentSignal { rank: 0 });
    }
}
