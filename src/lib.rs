//! # partdft - Partitioned direct DFT
//!
//! Computes the Discrete Fourier Transform of a real signal by splitting the
//! output bins across a fixed group of workers. Each worker evaluates its own
//! contiguous run of bins with the direct `O(N²)` formula, then a single
//! variable-size gather reassembles the runs, in bin order, on a coordinator.
//!
//! ## Pipeline
//!
//! Every worker runs the same steps:
//!
//! 1. [`partition`](partition::partition) - closed-form split of `[0, N)` by rank
//! 2. [`compute_segment`](segment::compute_segment) - direct DFT of those bins
//! 3. [`plan_gather`](plan::plan_gather) - counts and displacements for every rank
//! 4. [`gather`](gather::gather) - the only synchronization point
//!
//! [`transform`](transform::transform) drives the steps over any
//! [`Collective`](gather::Collective). [`LocalCluster`](cluster::LocalCluster)
//! provides one backed by threads and channels.
//!
//! ## Cargo Features
//!
//! - `std` (default): thread-backed cluster and environment configuration
//! - `parallel`: compute large segments on the Rayon pool
//! - `verbose-logging`: emit `log` records for each pipeline stage
//! - `internal-tests`: property tests with `proptest` and `rand`
//!
//! ## Example
//!
//! ```
//! use partdft::cluster::LocalCluster;
//!
//! let signal = [1.0f64, 2.0, 3.0, 4.0];
//! let spectrum = LocalCluster::new(3).unwrap().transform(&signal).unwrap();
//! assert!((spectrum[0].re - 10.0).abs() < 1e-10);
//! assert!((spectrum[1].im - 2.0).abs() < 1e-10);
//! ```
//!
//! ## License
//!
//! Licensed under either of
//! - Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or https://www.apache.org/licenses/LICENSE-2.0)
//! - MIT license ([LICENSE-MIT](LICENSE-MIT) or https://opensource.org/licenses/MIT)
//!
//! at your option.

#![no_std]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

macro_rules! dft_debug {
    ($($arg:tt)*) => {
        #[cfg(feature = "verbose-logging")]
        {
            log::debug!($($arg)*);
        }
    };
}

/// Float trait and complex value type
pub mod num;

/// Error type for every stage
pub mod error;

/// Work partitioning
///
/// Maps a rank to the contiguous run of output bins it owns.
pub mod partition;

/// Direct DFT kernel over a bin range
pub mod segment;

/// Gather bookkeeping
///
/// Per-rank counts and displacements derived from the partitioner.
pub mod plan;

/// Spectrum output and signal fingerprints
pub mod spectrum;

/// Variable-size gather
///
/// The transport seam ([`gather::Collective`]) and assembly of contributions
/// into a spectrum.
pub mod gather;

/// Per-worker orchestration
pub mod transform;

/// Environment configuration
#[cfg(feature = "std")]
pub mod config;

/// Thread-backed worker group
#[cfg(feature = "std")]
pub mod cluster;

#[cfg(feature = "std")]
pub use cluster::LocalCluster;
pub use error::DftError;
pub use gather::{Collective, SoloCollective};
pub use num::{Complex, Complex32, Complex64, Float};
pub use partition::Partition;
pub use plan::GatherPlan;
pub use spectrum::Spectrum;
pub use transform::{transform, COORDINATOR_RANK};

#[cfg(all(feature = "internal-tests", feature = "std", test))]
mod tests {
    use super::*;
    use crate::segment::dft;
    use alloc::vec::Vec;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_cluster_matches_single_worker_bit_for_bit() {
        let mut rng = StdRng::seed_from_u64(42);
        for len in [0usize, 1, 2, 7, 16, 31] {
            let signal: Vec<f64> = (0..len).map(|_| rng.gen_range(-10.0..10.0)).collect();
            let reference = dft(&signal).unwrap();
            for workers in 1..=6 {
                let spectrum = LocalCluster::new(workers).unwrap().transform(&signal).unwrap();
                assert_eq!(spectrum.bins(), &reference[..], "len={} workers={}", len, workers);
            }
        }
    }

    #[test]
    fn test_cluster_f32_signal() {
        let signal = [1.0f32, 0.0, 0.0, 0.0, 0.0];
        let spectrum = LocalCluster::new(2).unwrap().transform(&signal).unwrap();
        for c in spectrum.iter() {
            assert!((c.re - 1.0).abs() < 1e-6, "re = {}", c.re);
            assert!(c.im.abs() < 1e-6, "im = {}", c.im);
        }
    }

    #[test]
    fn test_solo_transform_matches_cluster() {
        let mut rng = StdRng::seed_from_u64(3);
        let signal: Vec<f64> = (0..12).map(|_| rng.gen_range(-1.0..1.0)).collect();
        let solo = transform(&signal, SoloCollective).unwrap().unwrap();
        let cluster = LocalCluster::new(5).unwrap().transform(&signal).unwrap();
        assert_eq!(solo, cluster);
    }
}
