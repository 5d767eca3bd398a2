//! SIMD acceleration layer with CPU capability checks
//!
//! Provides CPUID-based feature detection, compile-time target-feature flags,
//! and f32 vector kernels (SSE add, AVX multiply, AVX dot product) with a
//! scalar fallback when the required instruction set is unavailable.

pub mod compile_time;
pub mod detection;
pub mod vector_ops;

pub use compile_time::BuildFeatures;
pub use detection::{CpuFeature, CpuFeatures, CpuidLeaf1, CpuidProbe, FeatureProbe};
pub use vector_ops::{vector_add_f32, vector_dot_f32, vector_mul_f32, KernelPath};
