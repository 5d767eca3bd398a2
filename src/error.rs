//! Error types for capability gating and demo output

use thiserror::Error;

use crate::simd::CpuFeature;

/// Errors surfaced by the demo driver.
#[derive(Debug, Error)]
pub enum SimdError {
    /// A CPU feature required by the demo is absent on this host
    #[error("{}", .0.unsupported_message())]
    MissingFeature(CpuFeature),

    /// Writing demo output failed
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl SimdError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            SimdError::MissingFeature(_) => 1,
            SimdError::Io(_) => 1,
        }
    }
}

/// Result type for simd-kernels operations
pub type Result<T> = std::result::Result<T, SimdError>;
