// Test intent: verifies that gather failures abort the transform on every
// rank instead of hanging it or yielding a partial spectrum.

use std::sync::atomic::{AtomicBool, Ordering};

use partdft::cluster::{ChannelCollective, LocalCluster};
use partdft::gather::{gather, Contribution};
use partdft::plan::plan_gather;
use partdft::segment::compute_segment;
use partdft::spectrum::{SignalFingerprint, Spectrum};
use partdft::{transform, Collective, Complex64, DftError, SoloCollective};

type Outcome = Result<Option<Spectrum<f64>>, DftError>;

const SIGNAL: [f64; 6] = [0.5, -1.0, 2.0, 0.0, 3.5, -0.25];

#[test]
fn silent_member_fails_the_gather_everywhere() {
    let outcomes = LocalCluster::new(3)
        .unwrap()
        .run(|comm: ChannelCollective<f64>| -> Outcome {
            if comm.rank() == 2 {
                drop(comm);
                return Ok(None);
            }
            transform(&SIGNAL, comm)
        })
        .unwrap();
    assert_eq!(outcomes[0], Err(DftError::MissingContribution { rank: 2 }));
    assert_eq!(outcomes[1], Err(DftError::MissingContribution { rank: 2 }));
    assert!(outcomes[0].as_ref().unwrap_err().is_collective_failure());
}

#[test]
fn vanished_coordinator_releases_members_with_error() {
    let outcomes = LocalCluster::new(3)
        .unwrap()
        .run(|comm: ChannelCollective<f64>| -> Outcome {
            if comm.rank() == 0 {
                drop(comm);
                return Ok(None);
            }
            transform(&SIGNAL, comm)
        })
        .unwrap();
    assert_eq!(outcomes[1], Err(DftError::CoordinatorUnavailable));
    assert_eq!(outcomes[2], Err(DftError::CoordinatorUnavailable));
}

#[test]
fn panicking_worker_is_reported() {
    let err = LocalCluster::new(3)
        .unwrap()
        .run(|comm: ChannelCollective<f64>| -> Outcome {
            if comm.rank() == 1 {
                panic!("worker 1 crashed");
            }
            transform(&SIGNAL, comm)
        })
        .unwrap_err();
    assert_eq!(err, DftError::WorkerPanicked { rank: 1 });
}

#[test]
fn diverging_input_is_detected() {
    let mut other = SIGNAL;
    other[4] = 3.25;
    let outcomes = LocalCluster::new(3)
        .unwrap()
        .run(|comm: ChannelCollective<f64>| -> Outcome {
            if comm.rank() == 1 {
                transform(&other, comm)
            } else {
                transform(&SIGNAL, comm)
            }
        })
        .unwrap();
    for outcome in outcomes {
        assert_eq!(outcome, Err(DftError::InconsistentSignal { rank: 1 }));
    }
}

// The member's segment is well formed; only the coordinator's assembly can
// tell that it belongs to another signal, and every rank must hear about it.
#[test]
fn assembly_failure_reaches_every_member() {
    let len = SIGNAL.len();
    let plan = plan_gather(len, 4).unwrap();
    let fingerprint = SignalFingerprint::of(&SIGNAL);
    let stale = SignalFingerprint::of(&SIGNAL[..5]);
    let outcomes = LocalCluster::new(4)
        .unwrap()
        .run(|comm: ChannelCollective<f64>| -> Outcome {
            let slot = plan.slot(comm.rank())?;
            let segment = compute_segment(&SIGNAL, slot.start, slot.end)?;
            let fp = if comm.rank() == 3 { stale } else { fingerprint };
            gather(segment, fp, len, 0, &plan, comm)
        })
        .unwrap();
    assert_eq!(outcomes.len(), 4);
    for outcome in &outcomes {
        assert_eq!(*outcome, Err(DftError::InconsistentSignal { rank: 3 }));
    }
    assert!(outcomes[2].as_ref().unwrap_err().is_collective_failure());
}

#[test]
fn wrong_sized_segment_fails_before_contributing() {
    let len = SIGNAL.len();
    let plan = plan_gather(len, 2).unwrap();
    let fingerprint = SignalFingerprint::of(&SIGNAL);
    let outcomes = LocalCluster::new(2)
        .unwrap()
        .run(|comm: ChannelCollective<f64>| -> Outcome {
            // rank 1 owns three bins but only offers two
            let (start, end) = if comm.rank() == 0 { (0, 3) } else { (3, 5) };
            let segment = compute_segment(&SIGNAL, start, end)?;
            gather(segment, fingerprint, len, 0, &plan, comm)
        })
        .unwrap();
    assert_eq!(
        outcomes[1],
        Err(DftError::SegmentSizeMismatch {
            rank: 1,
            expected: 3,
            actual: 2
        })
    );
    assert_eq!(outcomes[0], Err(DftError::MissingContribution { rank: 1 }));
}

#[test]
fn gather_to_a_non_default_coordinator() {
    let len = SIGNAL.len();
    let plan = plan_gather(len, 3).unwrap();
    let fingerprint = SignalFingerprint::of(&SIGNAL);
    let outcomes = LocalCluster::with_coordinator(3, 2)
        .unwrap()
        .run(|comm: ChannelCollective<f64>| -> Outcome {
            let slot = plan.slot(comm.rank())?;
            let segment = compute_segment(&SIGNAL, slot.start, slot.end)?;
            gather(segment, fingerprint, len, 2, &plan, comm)
        })
        .unwrap();
    assert_eq!(outcomes[0], Ok(None));
    assert_eq!(outcomes[1], Ok(None));
    let spectrum = outcomes[2].clone().unwrap().unwrap();
    assert_eq!(spectrum, transform(&SIGNAL, SoloCollective).unwrap().unwrap());
}

#[test]
fn misaddressed_gather_is_rejected() {
    let err = LocalCluster::with_coordinator(3, 1)
        .unwrap()
        .transform(&SIGNAL)
        .unwrap_err();
    assert_eq!(
        err,
        DftError::CoordinatorMismatch {
            expected: 1,
            requested: 0
        }
    );
}

#[test]
fn plan_for_another_problem_is_rejected() {
    let plan = plan_gather(SIGNAL.len() + 1, 1).unwrap();
    let err = gather(
        Vec::<Complex64>::new(),
        SignalFingerprint::of(&SIGNAL),
        SIGNAL.len(),
        0,
        &plan,
        SoloCollective,
    )
    .unwrap_err();
    assert!(matches!(err, DftError::PlanMismatch { .. }));
    assert!(err.is_invalid_input());
}

#[test]
fn out_of_range_coordinator_is_rejected() {
    let plan = plan_gather(0, 1).unwrap();
    let err = gather(
        Vec::<Complex64>::new(),
        SignalFingerprint::of::<f64>(&[]),
        0,
        1,
        &plan,
        SoloCollective,
    )
    .unwrap_err();
    assert_eq!(err, DftError::RankOutOfRange { rank: 1, workers: 1 });
}

// No member leaves the gather before the coordinator has joined it.
#[test]
fn gather_acts_as_a_barrier() {
    let coordinator_joined = AtomicBool::new(false);
    let outcomes = LocalCluster::new(4)
        .unwrap()
        .run(|comm: ChannelCollective<f64>| -> Result<bool, DftError> {
            let rank = comm.rank();
            if rank == 0 {
                std::thread::sleep(std::time::Duration::from_millis(50));
                coordinator_joined.store(true, Ordering::SeqCst);
            }
            transform(&SIGNAL, comm)?;
            Ok(coordinator_joined.load(Ordering::SeqCst))
        })
        .unwrap();
    for outcome in outcomes {
        assert_eq!(outcome, Ok(true));
    }
}

// A transport that hands back contributions in reverse rank order still
// yields bins in index order.
#[test]
fn assembly_uses_displacements_not_arrival_order() {
    struct Reversed(Vec<Contribution<f64>>);

    impl Collective<f64> for Reversed {
        fn rank(&self) -> usize {
            0
        }
        fn size(&self) -> usize {
            self.0.len() + 1
        }
        fn gatherv<F>(
            mut self,
            contribution: Contribution<f64>,
            _root: usize,
            finish: F,
        ) -> Result<Option<Spectrum<f64>>, DftError>
        where
            F: FnOnce(Vec<Contribution<f64>>) -> Result<Spectrum<f64>, DftError>,
        {
            self.0.insert(0, contribution);
            self.0.reverse();
            finish(self.0).map(Some)
        }
    }

    let len = SIGNAL.len();
    let plan = plan_gather(len, 4).unwrap();
    let fingerprint = SignalFingerprint::of(&SIGNAL);
    let others = (1..4)
        .map(|rank| {
            let slot = plan.slot(rank).unwrap();
            Contribution {
                rank,
                fingerprint,
                segment: compute_segment(&SIGNAL, slot.start, slot.end).unwrap(),
            }
        })
        .collect();
    let own = compute_segment(&SIGNAL, 0, plan.counts()[0]).unwrap();
    let spectrum = gather(own, fingerprint, len, 0, &plan, Reversed(others))
        .unwrap()
        .unwrap();
    assert_eq!(spectrum, transform(&SIGNAL, SoloCollective).unwrap().unwrap());
}
