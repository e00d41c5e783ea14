use core::f32::consts::PI as PI32;

// Minimal float trait for the generic kernels (no_std, trig through libm)
pub trait Float:
    Copy
    + Clone
    + PartialEq
    + PartialOrd
    + core::fmt::Debug
    + core::ops::Add<Output = Self>
    + core::ops::Sub<Output = Self>
    + core::ops::Mul<Output = Self>
    + core::ops::Div<Output = Self>
    + core::ops::Neg<Output = Self>
    + Send
    + Sync
    + 'static
{
    fn zero() -> Self;
    fn one() -> Self;
    fn from_f32(x: f32) -> Self;
    /// Attempt to convert a `usize` into the floating-point type.
    /// Returns `None` if the value cannot be represented exactly.
    fn from_usize(x: usize) -> Option<Self>;
    /// Widen to `f64`. Exact for both supported types.
    fn to_f64(self) -> f64;
    fn sqrt(self) -> Self;
    fn sin_cos(self) -> (Self, Self);
    fn pi() -> Self;
}

impl Float for f32 {
    fn zero() -> Self {
        0.0
    }
    fn one() -> Self {
        1.0
    }
    fn from_f32(x: f32) -> Self {
        x
    }
    fn from_usize(x: usize) -> Option<Self> {
        const MAX_EXACT: usize = 1usize << 24;
        if x < MAX_EXACT {
            Some(x as f32)
        } else {
            None
        }
    }
    fn to_f64(self) -> f64 {
        self as f64
    }
    fn sqrt(self) -> Self {
        libm::sqrtf(self)
    }
    fn sin_cos(self) -> (Self, Self) {
        libm::sincosf(self)
    }
    fn pi() -> Self {
        PI32
    }
}

impl Float for f64 {
    fn zero() -> Self {
        0.0
    }
    fn one() -> Self {
        1.0
    }
    fn from_f32(x: f32) -> Self {
        x as f64
    }
    fn from_usize(x: usize) -> Option<Self> {
        const MAX_EXACT: usize = 1usize << 53;
        if x < MAX_EXACT {
            Some(x as f64)
        } else {
            None
        }
    }
    fn to_f64(self) -> f64 {
        self
    }
    fn sqrt(self) -> Self {
        libm::sqrt(self)
    }
    fn sin_cos(self) -> (Self, Self) {
        libm::sincos(self)
    }
    fn pi() -> Self {
        core::f64::consts::PI
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Complex<T: Float> {
    pub re: T,
    pub im: T,
}

impl<T: Float> Complex<T> {
    pub fn new(re: T, im: T) -> Self {
        Self { re, im }
    }
    pub fn zero() -> Self {
        Self {
            re: T::zero(),
            im: T::zero(),
        }
    }
    /// `e^{i·theta}`
    #[inline(always)]
    pub fn expi(theta: T) -> Self {
        let (sin, cos) = theta.sin_cos();
        Self { re: cos, im: sin }
    }
    /// Multiply both parts by a real factor.
    #[inline(always)]
    pub fn scale(self, factor: T) -> Self {
        Self {
            re: self.re * factor,
            im: self.im * factor,
        }
    }
    pub fn norm(self) -> T {
        (self.re * self.re + self.im * self.im).sqrt()
    }
}

impl<T: Float> core::ops::Add for Complex<T> {
    type Output = Self;
    #[inline(always)]
    fn add(self, other: Self) -> Self {
        Self {
            re: self.re + other.re,
            im: self.im + other.im,
        }
    }
}

impl<T: Float> core::ops::AddAssign for Complex<T> {
    #[inline(always)]
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

pub type Complex32 = Complex<f32>;
pub type Complex64 = Complex<f64>;

#[cfg(all(feature = "internal-tests", test))]
mod tests {
    use super::*;

    #[test]
    fn test_accumulate() {
        let mut acc = Complex64::zero();
        acc += Complex64::new(1.0, -2.0);
        acc += Complex64::new(3.0, 4.0);
        assert_eq!(acc, Complex64::new(4.0, 2.0));
    }

    #[test]
    fn test_expi_matches_unit_circle() {
        let e = Complex64::expi(<f64 as Float>::pi());
        assert!((e.re + 1.0).abs() < 1e-12);
        assert!(e.im.abs() < 1e-12);
        let q = Complex64::expi(-<f64 as Float>::pi() / 2.0);
        assert!(q.re.abs() < 1e-12);
        assert!((q.im + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_scale_and_norm() {
        let z = Complex64::new(3.0, -4.0);
        assert_eq!(z.norm(), 5.0);
        assert_eq!(z.scale(2.0), Complex64::new(6.0, -8.0));
    }

    #[test]
    fn test_from_usize_exactness_limits() {
        assert_eq!(<f32 as Float>::from_usize(1 << 24), None);
        assert_eq!(<f32 as Float>::from_usize((1 << 24) - 1), Some(16_777_215.0));
        assert_eq!(<f64 as Float>::from_usize(1 << 20), Some(1_048_576.0));
    }
}
