//! Target features enabled at compile time
//!
//! Build with `RUSTFLAGS="-C target-cpu=native"` (or `-C target-feature=+avx2,+sse4.1`)
//! to turn these on. When a feature is enabled here the dispatcher selects the
//! SIMD kernel without asking the CPU.

/// Compile-time SIMD availability for the current build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildFeatures {
    pub sse: bool,
    pub sse41: bool,
    pub avx: bool,
    pub avx2: bool,
}

impl BuildFeatures {
    /// Flags of the build this code was compiled in.
    pub const CURRENT: BuildFeatures = BuildFeatures {
        sse: cfg!(target_feature = "sse"),
        sse41: cfg!(target_feature = "sse4.1"),
        avx: cfg!(target_feature = "avx"),
        avx2: cfg!(target_feature = "avx2"),
    };

    pub const fn current() -> Self {
        Self::CURRENT
    }
}
