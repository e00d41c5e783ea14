//! Transform output and the signal fingerprint workers exchange with it.

use alloc::vec::Vec;

use crate::num::{Complex, Float};

/// Ordered DFT bins assembled at the coordinator. Bin `k` sits at index `k`.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum<T: Float> {
    bins: Vec<Complex<T>>,
}

impl<T: Float> Spectrum<T> {
    pub fn new(bins: Vec<Complex<T>>) -> Self {
        Self { bins }
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn bins(&self) -> &[Complex<T>] {
        &self.bins
    }

    pub fn into_vec(self) -> Vec<Complex<T>> {
        self.bins
    }

    /// `|X[k]|` for every bin.
    pub fn magnitudes(&self) -> Vec<T> {
        self.bins.iter().map(|c| c.norm()).collect()
    }
}

impl<T: Float> core::ops::Deref for Spectrum<T> {
    type Target = [Complex<T>];
    fn deref(&self) -> &Self::Target {
        &self.bins
    }
}

impl<T: Float> From<Spectrum<T>> for Vec<Complex<T>> {
    fn from(s: Spectrum<T>) -> Self {
        s.bins
    }
}

impl<T: Float> IntoIterator for Spectrum<T> {
    type Item = Complex<T>;
    type IntoIter = alloc::vec::IntoIter<Complex<T>>;
    fn into_iter(self) -> Self::IntoIter {
        self.bins.into_iter()
    }
}

impl<'a, T: Float> IntoIterator for &'a Spectrum<T> {
    type Item = &'a Complex<T>;
    type IntoIter = core::slice::Iter<'a, Complex<T>>;
    fn into_iter(self) -> Self::IntoIter {
        self.bins.iter()
    }
}

/// BLAKE3 digest of a signal, widened to `f64` little-endian bytes.
///
/// Two workers agree on their input exactly when their fingerprints match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignalFingerprint([u8; 32]);

impl SignalFingerprint {
    pub fn of<T: Float>(signal: &[T]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(signal.len() as u64).to_le_bytes());
        for &x in signal {
            hasher.update(&x.to_f64().to_le_bytes());
        }
        Self(*hasher.finalize().as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

#[cfg(all(feature = "internal-tests", test))]
mod tests {
    use super::*;
    use crate::num::Complex64;
    use alloc::vec;

    #[test]
    fn test_fingerprint_tracks_content() {
        let a = SignalFingerprint::of(&[1.0f64, 2.0, 3.0]);
        assert_eq!(a, SignalFingerprint::of(&[1.0f64, 2.0, 3.0]));
        assert_ne!(a, SignalFingerprint::of(&[1.0f64, 2.0, 3.5]));
        assert_ne!(a, SignalFingerprint::of(&[1.0f64, 2.0]));
        // f32 samples hash through their exact f64 widening
        assert_eq!(a, SignalFingerprint::of(&[1.0f32, 2.0, 3.0]));
    }

    #[test]
    fn test_spectrum_views() {
        let s = Spectrum::new(vec![Complex64::new(3.0, 4.0), Complex64::zero()]);
        assert_eq!(s.len(), 2);
        assert_eq!(s[0].re, 3.0);
        assert_eq!(s.magnitudes(), vec![5.0, 0.0]);
        let v: Vec<Complex64> = s.into();
        assert_eq!(v.len(), 2);
    }
}
