//! Per-worker driver: partition, compute, plan, gather.

use crate::error::DftError;
use crate::gather::{gather, Collective};
use crate::num::Float;
use crate::partition::partition;
use crate::plan::plan_gather;
use crate::segment::compute_segment;
use crate::spectrum::{SignalFingerprint, Spectrum};

/// Rank that receives the assembled spectrum.
pub const COORDINATOR_RANK: usize = 0;

/// Run one transform on the calling worker.
///
/// Every rank in `comm`'s group must call this with the same signal. The
/// coordinator gets `Some(spectrum)`, every other rank gets `None` once the
/// gather has completed everywhere.
///
/// # Examples
/// ```
/// use partdft::gather::SoloCollective;
/// use partdft::transform::transform;
/// let spectrum = transform(&[1.0f64, 0.0, 0.0, 0.0], SoloCollective).unwrap().unwrap();
/// assert!(spectrum.iter().all(|c| (c.re - 1.0).abs() < 1e-12 && c.im.abs() < 1e-12));
/// ```
pub fn transform<T: Float, C: Collective<T>>(
    signal: &[T],
    comm: C,
) -> Result<Option<Spectrum<T>>, DftError> {
    let rank = comm.rank();
    let workers = comm.size();
    let len = signal.len();

    let own = partition(len, workers, rank)?;
    dft_debug!(
        "rank {}/{}: bins {}..{} of {}",
        rank,
        workers,
        own.start,
        own.end,
        len
    );
    let segment = compute_segment(signal, own.start, own.end)?;
    let plan = plan_gather(len, workers)?;
    let fingerprint = SignalFingerprint::of(signal);

    let spectrum = gather(segment, fingerprint, len, COORDINATOR_RANK, &plan, comm)?;
    if spectrum.is_some() {
        dft_debug!("rank {}: assembled {} bins from {} workers", rank, len, workers);
    }
    Ok(spectrum)
}
