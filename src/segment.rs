//! Direct DFT over a run of output bins.
//!
//! Each bin is the textbook sum `X[k] = Σ x[n]·e^{-2πi·k·n/N}` accumulated in
//! the sample type. The exponent is negative (forward convention). No
//! communication happens here, so a worker can compute its bins while others
//! compute theirs.

use alloc::vec::Vec;

use crate::error::DftError;
use crate::num::{Complex, Float};

#[cfg(feature = "parallel")]
use core::sync::atomic::{AtomicUsize, Ordering};

/// Override for the parallel segment threshold.
///
/// `0` means no override and the environment or built-in default is used.
#[cfg(feature = "parallel")]
static PARALLEL_SEGMENT_THRESHOLD_OVERRIDE: AtomicUsize = AtomicUsize::new(0);

#[cfg(feature = "parallel")]
/// Set the minimum amount of work, `(end - start) * N` multiply-adds, above
/// which a segment is computed on the Rayon pool.
///
/// Passing `0` reverts to `PARTDFT_PAR_SEGMENT_THRESHOLD` or the built-in default.
pub fn set_parallel_segment_threshold(threshold: usize) {
    PARALLEL_SEGMENT_THRESHOLD_OVERRIDE.store(threshold, Ordering::Relaxed);
}

#[cfg(feature = "parallel")]
fn parallel_segment_threshold() -> Result<usize, DftError> {
    let override_thr = PARALLEL_SEGMENT_THRESHOLD_OVERRIDE.load(Ordering::Relaxed);
    if override_thr != 0 {
        return Ok(override_thr);
    }
    crate::config::segment_threshold_from_env()
}

/// Compute DFT bins `start..end` of `signal`.
///
/// `N` is the signal length. Returns an empty segment when `start == end`,
/// and [`DftError::InvalidRange`] when `start > end` or `end > N`.
///
/// # Examples
/// ```
/// use partdft::segment::compute_segment;
/// let bins = compute_segment(&[1.0f64, 1.0, 1.0, 1.0], 0, 2).unwrap();
/// assert!((bins[0].re - 4.0).abs() < 1e-12);
/// assert!(bins[1].re.abs() < 1e-12 && bins[1].im.abs() < 1e-12);
/// ```
pub fn compute_segment<T: Float>(
    signal: &[T],
    start: usize,
    end: usize,
) -> Result<Vec<Complex<T>>, DftError> {
    let len = signal.len();
    if start > end || end > len {
        return Err(DftError::InvalidRange { start, end, len });
    }
    if start == end {
        return Ok(Vec::new());
    }
    let len_f = T::from_usize(len).ok_or(DftError::LengthNotRepresentable { len })?;

    #[cfg(feature = "parallel")]
    {
        if (end - start).saturating_mul(len) >= parallel_segment_threshold()? {
            use rayon::prelude::*;
            return (start..end)
                .into_par_iter()
                .map(|k| bin(signal, k, len_f))
                .collect();
        }
    }

    (start..end).map(|k| bin(signal, k, len_f)).collect()
}

/// Full DFT of `signal`, the single-worker reference.
pub fn dft<T: Float>(signal: &[T]) -> Result<Vec<Complex<T>>, DftError> {
    compute_segment(signal, 0, signal.len())
}

#[inline]
fn bin<T: Float>(signal: &[T], k: usize, len: T) -> Result<Complex<T>, DftError> {
    let k = T::from_usize(k).ok_or(DftError::LengthNotRepresentable { len: k })?;
    let step = -(T::from_f32(2.0) * T::pi()) * k;
    let mut acc = Complex::zero();
    // n < N and N is exact in T, so counting in T stays exact.
    let mut n = T::zero();
    for &x in signal {
        acc += Complex::expi(step * n / len).scale(x);
        n = n + T::one();
    }
    Ok(acc)
}

#[cfg(all(feature = "internal-tests", test))]
mod tests {
    use super::*;
    use crate::num::Complex64;
    use crate::partition::partitions;
    use alloc::vec;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn naive(signal: &[f64]) -> Vec<Complex64> {
        let n = signal.len();
        (0..n)
            .map(|k| {
                let mut re = 0.0;
                let mut im = 0.0;
                for (i, &x) in signal.iter().enumerate() {
                    // reduce k·n mod N first so the reference is independently rounded
                    let angle = -2.0 * core::f64::consts::PI * ((k * i) % n) as f64 / n as f64;
                    re += x * libm::cos(angle);
                    im += x * libm::sin(angle);
                }
                Complex64::new(re, im)
            })
            .collect()
    }

    #[test]
    fn test_ramp_against_closed_form() {
        let out = dft(&[1.0f64, 2.0, 3.0, 4.0]).unwrap();
        let expected = [
            Complex64::new(10.0, 0.0),
            Complex64::new(-2.0, 2.0),
            Complex64::new(-2.0, 0.0),
            Complex64::new(-2.0, -2.0),
        ];
        for (a, b) in out.iter().zip(expected.iter()) {
            assert!((a.re - b.re).abs() < 1e-10, "re: {} vs {}", a.re, b.re);
            assert!((a.im - b.im).abs() < 1e-10, "im: {} vs {}", a.im, b.im);
        }
    }

    #[test]
    fn test_random_signal_matches_naive() {
        let mut rng = StdRng::seed_from_u64(7);
        let signal: Vec<f64> = (0..37).map(|_| rng.gen_range(-10.0..10.0)).collect();
        let out = dft(&signal).unwrap();
        for (a, b) in out.iter().zip(naive(&signal).iter()) {
            assert!((a.re - b.re).abs() < 1e-9, "re: {} vs {}", a.re, b.re);
            assert!((a.im - b.im).abs() < 1e-9, "im: {} vs {}", a.im, b.im);
        }
    }

    #[test]
    fn test_single_sample() {
        let out = dft(&[-3.5f64]).unwrap();
        assert_eq!(out, vec![Complex64::new(-3.5, 0.0)]);
    }

    proptest! {
        #[test]
        fn prop_stitched_segments_equal_full(signal in proptest::collection::vec(-100.0f64..100.0, 0..48), workers in 1usize..9) {
            let full = dft(&signal).unwrap();
            let mut stitched = Vec::with_capacity(signal.len());
            for p in partitions(signal.len(), workers).unwrap() {
                stitched.extend(compute_segment(&signal, p.start, p.end).unwrap());
            }
            prop_assert_eq!(stitched, full);
        }
    }
}
