//! SIMD-accelerated f32 vector operations
//!
//! Element-wise add (SSE, 4 lanes), element-wise multiply (AVX, 8 lanes) and
//! dot product (AVX, 8 lanes with a horizontal reduction). Each public entry
//! point picks a kernel path from compile-time target features first, then
//! runtime detection, and falls back to the scalar kernel when neither applies.
//!
//! The SIMD kernels walk full register-width blocks and finish the remaining
//! `len % lanes` elements with scalar code, so any length is accepted.

use std::fmt;

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
use super::compile_time::BuildFeatures;

/// Implementation chosen by a dispatching call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KernelPath {
    /// 128-bit SSE registers (4 x f32)
    Sse,
    /// 256-bit AVX registers (8 x f32)
    Avx,
    /// One element at a time
    Scalar,
}

impl KernelPath {
    /// Number of f32 lanes processed per block.
    pub fn lanes(&self) -> usize {
        match self {
            KernelPath::Sse => 4,
            KernelPath::Avx => 8,
            KernelPath::Scalar => 1,
        }
    }
}

impl fmt::Display for KernelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelPath::Sse => write!(f, "SSE"),
            KernelPath::Avx => write!(f, "AVX"),
            KernelPath::Scalar => write!(f, "Scalar"),
        }
    }
}

fn sse_enabled() -> bool {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        BuildFeatures::CURRENT.sse || is_x86_feature_detected!("sse")
    }

    #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
    {
        false
    }
}

fn avx_enabled() -> bool {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        BuildFeatures::CURRENT.avx || is_x86_feature_detected!("avx")
    }

    #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
    {
        false
    }
}

/// Path used by [`vector_add_f32`] on this host.
pub fn select_add_path() -> KernelPath {
    if sse_enabled() {
        KernelPath::Sse
    } else {
        KernelPath::Scalar
    }
}

/// Path used by [`vector_mul_f32`] on this host.
pub fn select_mul_path() -> KernelPath {
    if avx_enabled() {
        KernelPath::Avx
    } else {
        KernelPath::Scalar
    }
}

/// Path used by [`vector_dot_f32`] on this host.
pub fn select_dot_path() -> KernelPath {
    select_mul_path()
}

/// Element-wise addition: `c[i] = a[i] + b[i]`
///
/// # Panics
/// Panics if `a`, `b`, and `c` do not all have the same length.
pub fn vector_add_f32(a: &[f32], b: &[f32], c: &mut [f32]) {
    assert_eq!(a.len(), b.len(), "vector_add_f32: a.len() != b.len()");
    assert_eq!(a.len(), c.len(), "vector_add_f32: a.len() != c.len()");

    if a.is_empty() {
        return;
    }

    let path = select_add_path();
    log::trace!("vector_add_f32: {} elements via {}", a.len(), path);

    match path {
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        // Safety: lengths checked above; SSE enabled at build time or detected.
        KernelPath::Sse => unsafe { sse::vector_add_f32_sse(a, b, c) },
        _ => scalar::vector_add_f32_scalar(a, b, c),
    }
}

/// Element-wise multiplication: `c[i] = a[i] * b[i]`
///
/// # Panics
/// Panics if `a`, `b`, and `c` do not all have the same length.
pub fn vector_mul_f32(a: &[f32], b: &[f32], c: &mut [f32]) {
    assert_eq!(a.len(), b.len(), "vector_mul_f32: a.len() != b.len()");
    assert_eq!(a.len(), c.len(), "vector_mul_f32: a.len() != c.len()");

    if a.is_empty() {
        return;
    }

    let path = select_mul_path();
    log::trace!("vector_mul_f32: {} elements via {}", a.len(), path);

    match path {
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        KernelPath::Avx => unsafe { avx::vector_mul_f32_avx(a, b, c) },
        _ => scalar::vector_mul_f32_scalar(a, b, c),
    }
}

/// Dot product: `sum(a[i] * b[i])`
///
/// # Panics
/// Panics if `a` and `b` do not have the same length.
pub fn vector_dot_f32(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "vector_dot_f32: a.len() != b.len()");

    if a.is_empty() {
        return 0.0;
    }

    let path = select_dot_path();
    log::trace!("vector_dot_f32: {} elements via {}", a.len(), path);

    match path {
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        KernelPath::Avx => unsafe { avx::vector_dot_f32_avx(a, b) },
        _ => scalar::vector_dot_f32_scalar(a, b),
    }
}

// ---------------------------------------------------------------------------
// Scalar fallback implementation
// ---------------------------------------------------------------------------
pub mod scalar {
    pub fn vector_add_f32_scalar(a: &[f32], b: &[f32], c: &mut [f32]) {
        for ((dst, x), y) in c.iter_mut().zip(a).zip(b) {
            *dst = x + y;
        }
    }

    pub fn vector_mul_f32_scalar(a: &[f32], b: &[f32], c: &mut [f32]) {
        for ((dst, x), y) in c.iter_mut().zip(a).zip(b) {
            *dst = x * y;
        }
    }

    pub fn vector_dot_f32_scalar(a: &[f32], b: &[f32]) -> f32 {
        let mut sum = 0.0f32;
        for (x, y) in a.iter().zip(b) {
            sum += x * y;
        }
        sum
    }
}

// ---------------------------------------------------------------------------
// SSE implementation (x86 / x86_64)
// ---------------------------------------------------------------------------
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub mod sse {
    #[cfg(target_arch = "x86")]
    use std::arch::x86::*;
    #[cfg(target_arch = "x86_64")]
    use std::arch::x86_64::*;

    pub const SSE_F32_LANES: usize = 4;

    /// SSE vector addition: processes 4 f32s per iteration.
    ///
    /// Loads and stores are unaligned.
    ///
    /// # Safety
    /// Caller must ensure SSE is available and `b` and `c` are at least as
    /// long as `a`.
    #[target_feature(enable = "sse")]
    pub unsafe fn vector_add_f32_sse(a: &[f32], b: &[f32], c: &mut [f32]) {
        let n = a.len();
        debug_assert!(b.len() >= n && c.len() >= n);
        let chunks = n / SSE_F32_LANES;

        for i in 0..chunks {
            let offset = i * SSE_F32_LANES;
            let va = _mm_loadu_ps(a.as_ptr().add(offset));
            let vb = _mm_loadu_ps(b.as_ptr().add(offset));
            let vc = _mm_add_ps(va, vb);
            _mm_storeu_ps(c.as_mut_ptr().add(offset), vc);
        }

        let tail_start = chunks * SSE_F32_LANES;
        for i in tail_start..n {
            c[i] = a[i] + b[i];
        }
    }
}

// ---------------------------------------------------------------------------
// AVX implementation (x86 / x86_64)
// ---------------------------------------------------------------------------
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub mod avx {
    #[cfg(target_arch = "x86")]
    use std::arch::x86::*;
    #[cfg(target_arch = "x86_64")]
    use std::arch::x86_64::*;

    pub const AVX_F32_LANES: usize = 8;

    /// AVX vector multiplication: processes 8 f32s per iteration.
    ///
    /// The output buffer carries no alignment requirement; stores are unaligned.
    ///
    /// # Safety
    /// Caller must ensure AVX is available and `b` and `c` are at least as
    /// long as `a`.
    #[target_feature(enable = "avx")]
    pub unsafe fn vector_mul_f32_avx(a: &[f32], b: &[f32], c: &mut [f32]) {
        let n = a.len();
        debug_assert!(b.len() >= n && c.len() >= n);
        let chunks = n / AVX_F32_LANES;

        for i in 0..chunks {
            let offset = i * AVX_F32_LANES;
            let va = _mm256_loadu_ps(a.as_ptr().add(offset));
            let vb = _mm256_loadu_ps(b.as_ptr().add(offset));
            let vc = _mm256_mul_ps(va, vb);
            _mm256_storeu_ps(c.as_mut_ptr().add(offset), vc);
        }

        let tail_start = chunks * AVX_F32_LANES;
        for i in tail_start..n {
            c[i] = a[i] * b[i];
        }
    }

    /// AVX dot product.
    ///
    /// # Safety
    /// Caller must ensure AVX is available and `b` is at least as long as `a`.
    #[target_feature(enable = "avx")]
    pub unsafe fn vector_dot_f32_avx(a: &[f32], b: &[f32]) -> f32 {
        let n = a.len();
        debug_assert!(b.len() >= n);
        let chunks = n / AVX_F32_LANES;

        let mut acc = _mm256_setzero_ps();

        for i in 0..chunks {
            let offset = i * AVX_F32_LANES;
            let va = _mm256_loadu_ps(a.as_ptr().add(offset));
            let vb = _mm256_loadu_ps(b.as_ptr().add(offset));
            acc = _mm256_add_ps(acc, _mm256_mul_ps(va, vb));
        }

        let sum = hsum_avx(acc);

        let tail_start = chunks * AVX_F32_LANES;
        let mut tail_sum = 0.0f32;
        for i in tail_start..n {
            tail_sum += a[i] * b[i];
        }

        sum + tail_sum
    }

    /// Horizontal sum of an __m256 register (8 x f32 -> single f32).
    #[target_feature(enable = "avx")]
    unsafe fn hsum_avx(v: __m256) -> f32 {
        let lo128 = _mm256_extractf128_ps(v, 0);
        let hi128 = _mm256_extractf128_ps(v, 1);
        let sum128 = _mm_add_ps(lo128, hi128); // [0+4, 1+5, 2+6, 3+7]
        let pairs = _mm_hadd_ps(sum128, sum128); // [01, 23, 01, 23]
        let total = _mm_hadd_ps(pairs, pairs); // [0123, ...]
        _mm_cvtss_f32(total)
    }
}
