//! # simd-kernels
//!
//! CPU feature detection and SIMD-accelerated `f32` vector arithmetic.
//!
//! Capabilities are read from CPUID (leaf 1) at runtime and from
//! `target_feature` at compile time. The kernels cover lanewise addition on
//! 128-bit SSE registers, lanewise multiplication on 256-bit AVX registers,
//! and an AVX dot product with a horizontal reduction. Each kernel has a
//! scalar fallback selected when the instruction set is unavailable.
//!
//! ```
//! use simd_kernels::simd::{vector_add_f32, vector_dot_f32};
//!
//! let a = [1.0f32, 2.0, 3.0, 4.0];
//! let b = [4.0f32, 3.0, 2.0, 1.0];
//! let mut c = [0.0f32; 4];
//! vector_add_f32(&a, &b, &mut c);
//! assert_eq!(c, [5.0; 4]);
//! assert_eq!(vector_dot_f32(&a, &b), 20.0);
//! ```

pub mod demo;
pub mod error;
pub mod simd;

pub use error::{Result, SimdError};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::demo::{run_demo, DemoConfig, DemoReport};
    pub use crate::error::{Result, SimdError};
    pub use crate::simd::{
        vector_add_f32, vector_dot_f32, vector_mul_f32, BuildFeatures, CpuFeature, CpuFeatures,
        CpuidProbe, FeatureProbe, KernelPath,
    };
}
