//! In-process worker group: one thread per rank, channels for the gather.
//!
//! Members send their contribution to the coordinator and then wait for a
//! release carrying the collective's outcome. The coordinator buffers
//! contributions by rank until every rank has been heard from, assembles them,
//! and only then releases the members with the assembly's result. A rank that
//! drops its end of the channel before contributing (error or panic) fails
//! the gather for everybody instead of hanging it.

use alloc::vec::Vec;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

use hashbrown::HashMap;

use crate::error::DftError;
use crate::gather::{Collective, Contribution};
use crate::num::Float;
use crate::spectrum::Spectrum;
use crate::transform::{transform, COORDINATOR_RANK};

type Release = Result<(), DftError>;

enum Role<T: Float> {
    Coordinator {
        inbox: Receiver<Contribution<T>>,
        releases: Vec<Sender<Release>>,
    },
    Member {
        outbox: Sender<Contribution<T>>,
        release: Receiver<Release>,
    },
}

/// One rank's endpoint of a [`LocalCluster`] gather. Good for a single gather.
pub struct ChannelCollective<T: Float> {
    rank: usize,
    size: usize,
    coordinator: usize,
    role: Role<T>,
}

impl<T: Float> ChannelCollective<T> {
    pub fn coordinator(&self) -> usize {
        self.coordinator
    }
}

impl<T: Float> core::fmt::Debug for ChannelCollective<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ChannelCollective")
            .field("rank", &self.rank)
            .field("size", &self.size)
            .field("coordinator", &self.coordinator)
            .finish()
    }
}

impl<T: Float> Collective<T> for ChannelCollective<T> {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
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
        if root != self.coordinator {
            return Err(DftError::CoordinatorMismatch {
                expected: self.coordinator,
                requested: root,
            });
        }
        match self.role {
            Role::Coordinator { inbox, releases } => {
                let mut pending: HashMap<usize, Contribution<T>> =
                    HashMap::with_capacity(self.size);
                pending.insert(contribution.rank, contribution);
                let mut outcome = Ok(());
                while pending.len() < self.size {
                    match inbox.recv() {
                        Ok(c) => {
                            let rank = c.rank;
                            if pending.insert(rank, c).is_some() {
                                outcome = Err(DftError::DuplicateContribution { rank });
                                break;
                            }
                        }
                        // every member sender is gone but someone never sent
                        Err(_) => {
                            let rank = (0..self.size)
                                .find(|r| !pending.contains_key(r))
                                .unwrap_or_default();
                            outcome = Err(DftError::MissingContribution { rank });
                            break;
                        }
                    }
                }
                let result = outcome.and_then(|()| finish(pending.into_values().collect()));
                for tx in &releases {
                    // a member that already failed has dropped its receiver
                    let _ = tx.send(result.as_ref().map(|_| ()).map_err(Clone::clone));
                }
                result.map(Some)
            }
            Role::Member { outbox, release } => {
                outbox
                    .send(contribution)
                    .map_err(|_| DftError::CoordinatorUnavailable)?;
                drop(outbox);
                match release.recv() {
                    Ok(Ok(())) => {
                        dft_debug!("rank {}: released from gather", self.rank);
                        Ok(None)
                    }
                    Ok(Err(e)) => Err(e),
                    Err(_) => Err(DftError::CoordinatorUnavailable),
                }
            }
        }
    }
}

/// Fixed-size group of worker threads sharing one gather.
///
/// # Examples
/// ```
/// use partdft::cluster::LocalCluster;
/// let spectrum = LocalCluster::new(3).unwrap().transform(&[1.0f64, 1.0, 1.0, 1.0]).unwrap();
/// assert!((spectrum[0].re - 4.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalCluster {
    workers: usize,
    coordinator: usize,
}

impl LocalCluster {
    /// Group of `workers` ranks gathering at [`COORDINATOR_RANK`].
    pub fn new(workers: usize) -> Result<Self, DftError> {
        Self::with_coordinator(workers, COORDINATOR_RANK)
    }

    pub fn with_coordinator(workers: usize, coordinator: usize) -> Result<Self, DftError> {
        if workers == 0 {
            return Err(DftError::InvalidWorkerCount { workers });
        }
        if coordinator >= workers {
            return Err(DftError::RankOutOfRange {
                rank: coordinator,
                workers,
            });
        }
        Ok(Self {
            workers,
            coordinator,
        })
    }

    /// Group sized by `PARTDFT_WORKERS` or the logical CPU count.
    pub fn from_env() -> Result<Self, DftError> {
        Self::new(crate::config::workers_from_env()?)
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn coordinator(&self) -> usize {
        self.coordinator
    }

    /// Fresh endpoints for one gather, in rank order.
    pub fn collectives<T: Float>(&self) -> Vec<ChannelCollective<T>> {
        let (outbox, inbox) = channel();
        let mut releases = Vec::with_capacity(self.workers - 1);
        let mut group = Vec::with_capacity(self.workers);
        for rank in (0..self.workers).filter(|&r| r != self.coordinator) {
            let (tx, rx) = channel();
            releases.push(tx);
            group.push(ChannelCollective {
                rank,
                size: self.workers,
                coordinator: self.coordinator,
                role: Role::Member {
                    outbox: outbox.clone(),
                    release: rx,
                },
            });
        }
        group.insert(
            self.coordinator,
            ChannelCollective {
                rank: self.coordinator,
                size: self.workers,
                coordinator: self.coordinator,
                role: Role::Coordinator { inbox, releases },
            },
        );
        group
    }

    /// Run `job` once per rank on its own thread and wait for all of them.
    ///
    /// Results come back in rank order. A panicking rank is reported as
    /// [`DftError::WorkerPanicked`].
    pub fn run<T, R, F>(&self, job: F) -> Result<Vec<R>, DftError>
    where
        T: Float,
        R: Send,
        F: Fn(ChannelCollective<T>) -> R + Sync,
    {
        let group = self.collectives::<T>();
        dft_debug!(
            "starting {} workers, coordinator rank {}",
            self.workers,
            self.coordinator
        );
        let job = &job;
        let joined: Vec<Result<R, DftError>> = thread::scope(|scope| {
            let handles: Vec<_> = group
                .into_iter()
                .map(|comm| {
                    let rank = comm.rank;
                    (rank, scope.spawn(move || job(comm)))
                })
                .collect();
            handles
                .into_iter()
                .map(|(rank, handle)| {
                    handle
                        .join()
                        .map_err(|_| DftError::WorkerPanicked { rank })
                })
                .collect()
        });
        joined.into_iter().collect()
    }

    /// Transform `signal` on every rank and return the coordinator's spectrum.
    pub fn transform<T: Float>(&self, signal: &[T]) -> Result<Spectrum<T>, DftError> {
        let outcomes = self.run(|comm: ChannelCollective<T>| transform(signal, comm))?;
        let mut spectrum = None;
        for outcome in outcomes {
            if let Some(s) = outcome? {
                spectrum = Some(s);
            }
        }
        spectrum.ok_or(DftError::CoordinatorUnavailable)
    }
}
