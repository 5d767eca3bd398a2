//! Runtime CPU feature detection
//!
//! Issues the CPUID instruction (leaf 1) and inspects individual feature bits.
//! Every check queries the hardware again; nothing is cached.

use std::fmt;

#[cfg(target_arch = "x86")]
use std::arch::x86::{__cpuid, __cpuid_count};
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::{__cpuid, __cpuid_count};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// EDX bit reporting SSE support (CPUID leaf 1)
pub const CPUID_EDX_SSE: u32 = 1 << 25;
/// ECX bit reporting SSE4.1 support (CPUID leaf 1)
pub const CPUID_ECX_SSE41: u32 = 1 << 19;
/// ECX bit reporting OS-managed XSAVE state (CPUID leaf 1)
pub const CPUID_ECX_OSXSAVE: u32 = 1 << 27;
/// ECX bit reporting AVX support (CPUID leaf 1)
pub const CPUID_ECX_AVX: u32 = 1 << 28;
/// EBX bit reporting AVX2 support (CPUID leaf 7, subleaf 0)
pub const CPUID_EBX_AVX2: u32 = 1 << 5;

/// CPU features the demo gates on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CpuFeature {
    /// SSE (128-bit float registers)
    Sse,
    /// SSE4.1
    Sse41,
    /// AVX (256-bit float registers)
    Avx,
}

impl CpuFeature {
    /// Gating order used by the demo driver.
    pub const ALL: [CpuFeature; 3] = [CpuFeature::Sse, CpuFeature::Sse41, CpuFeature::Avx];

    /// Human-readable feature name.
    pub fn name(&self) -> &'static str {
        match self {
            CpuFeature::Sse => "SSE",
            CpuFeature::Sse41 => "SSE4.1",
            CpuFeature::Avx => "AVX",
        }
    }

    /// Message printed when the feature is absent.
    pub fn unsupported_message(&self) -> String {
        format!("{} is not supported", self.name())
    }
}

impl fmt::Display for CpuFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw ECX/EDX registers returned by CPUID leaf 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CpuidLeaf1 {
    pub ecx: u32,
    pub edx: u32,
}

impl CpuidLeaf1 {
    /// Issue CPUID with leaf 1.
    ///
    /// On architectures without CPUID both registers read as zero, so every
    /// feature reports absent.
    pub fn query() -> Self {
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        {
            #[allow(unused_unsafe)]
            let regs = unsafe { __cpuid(1) };
            CpuidLeaf1 {
                ecx: regs.ecx,
                edx: regs.edx,
            }
        }

        #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
        {
            CpuidLeaf1::default()
        }
    }

    /// Test the bit for `feature`.
    pub fn has(&self, feature: CpuFeature) -> bool {
        match feature {
            CpuFeature::Sse => self.edx & CPUID_EDX_SSE != 0,
            CpuFeature::Sse41 => self.ecx & CPUID_ECX_SSE41 != 0,
            CpuFeature::Avx => self.ecx & CPUID_ECX_AVX != 0,
        }
    }

    /// Whether the OS has enabled XSAVE (needed before AVX state is usable).
    pub fn osxsave(&self) -> bool {
        self.ecx & CPUID_ECX_OSXSAVE != 0
    }
}

/// Check if the CPU supports SSE.
pub fn has_sse() -> bool {
    CpuidLeaf1::query().has(CpuFeature::Sse)
}

/// Check if the CPU supports SSE4.1.
pub fn has_sse41() -> bool {
    CpuidLeaf1::query().has(CpuFeature::Sse41)
}

/// Check if the CPU supports AVX.
pub fn has_avx() -> bool {
    CpuidLeaf1::query().has(CpuFeature::Avx)
}

fn has_avx2() -> bool {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        #[allow(unused_unsafe)]
        let max_leaf = unsafe { __cpuid(0) }.eax;
        if max_leaf < 7 {
            return false;
        }
        #[allow(unused_unsafe)]
        let regs = unsafe { __cpuid_count(7, 0) };
        regs.ebx & CPUID_EBX_AVX2 != 0
    }

    #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
    {
        false
    }
}

/// Something that can answer "is this CPU feature present?"
pub trait FeatureProbe {
    fn supports(&self, feature: CpuFeature) -> bool;
}

/// Probe that issues CPUID for every question it is asked.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuidProbe;

impl FeatureProbe for CpuidProbe {
    fn supports(&self, feature: CpuFeature) -> bool {
        match feature {
            CpuFeature::Sse => has_sse(),
            CpuFeature::Sse41 => has_sse41(),
            CpuFeature::Avx => has_avx(),
        }
    }
}

/// Snapshot of the CPU features of the current host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CpuFeatures {
    /// SSE (CPUID.1:EDX bit 25)
    pub has_sse: bool,
    /// SSE4.1 (CPUID.1:ECX bit 19)
    pub has_sse41: bool,
    /// AVX (CPUID.1:ECX bit 28)
    pub has_avx: bool,
    /// AVX2 (CPUID.7.0:EBX bit 5)
    pub has_avx2: bool,
    /// OS-enabled XSAVE (CPUID.1:ECX bit 27)
    pub has_osxsave: bool,
}

impl CpuFeatures {
    /// Detect features on the current host.
    pub fn detect() -> Self {
        let mut features = Self::from_leaf1(CpuidLeaf1::query());
        features.has_avx2 = has_avx2();
        log::debug!("detected CPU features: {}", features.summary());
        features
    }

    /// Decode the leaf-1 feature bits. AVX2 lives in leaf 7 and stays unset.
    pub fn from_leaf1(leaf: CpuidLeaf1) -> Self {
        CpuFeatures {
            has_sse: leaf.has(CpuFeature::Sse),
            has_sse41: leaf.has(CpuFeature::Sse41),
            has_avx: leaf.has(CpuFeature::Avx),
            has_avx2: false,
            has_osxsave: leaf.osxsave(),
        }
    }

    /// Names of the detected features, in ascending ISA order.
    pub fn feature_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.has_sse {
            names.push("SSE");
        }
        if self.has_sse41 {
            names.push("SSE4.1");
        }
        if self.has_avx {
            names.push("AVX");
        }
        if self.has_avx2 {
            names.push("AVX2");
        }
        if self.has_osxsave {
            names.push("OSXSAVE");
        }
        names
    }

    /// Human-readable summary of detected features.
    pub fn summary(&self) -> String {
        let names = self.feature_names();
        if names.is_empty() {
            "no SIMD features detected".to_string()
        } else {
            names.join(", ")
        }
    }
}

impl FeatureProbe for CpuFeatures {
    fn supports(&self, feature: CpuFeature) -> bool {
        match feature {
            CpuFeature::Sse => self.has_sse,
            CpuFeature::Sse41 => self.has_sse41,
            CpuFeature::Avx => self.has_avx,
        }
    }
}

impl fmt::Display for CpuFeatures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf1_bit_positions() {
        let leaf = CpuidLeaf1 {
            ecx: 0,
            edx: 1 << 25,
        };
        assert!(leaf.has(CpuFeature::Sse));
        assert!(!leaf.has(CpuFeature::Sse41));
        assert!(!leaf.has(CpuFeature::Avx));

        let leaf = CpuidLeaf1 {
            ecx: 1 << 19,
            edx: 0,
        };
        assert!(leaf.has(CpuFeature::Sse41));
        assert!(!leaf.has(CpuFeature::Sse));

        let leaf = CpuidLeaf1 {
            ecx: 1 << 28,
            edx: 0,
        };
        assert!(leaf.has(CpuFeature::Avx));
        assert!(!leaf.osxsave());
    }

    #[test]
    fn test_edx_bits_do_not_leak_into_ecx_features() {
        // SSE4.1 and AVX live in ECX; the same bit positions in EDX mean other things.
        let leaf = CpuidLeaf1 {
            ecx: 0,
            edx: CPUID_ECX_SSE41 | CPUID_ECX_AVX,
        };
        assert!(!leaf.has(CpuFeature::Sse41));
        assert!(!leaf.has(CpuFeature::Avx));
    }

    #[test]
    fn test_from_leaf1() {
        let leaf = CpuidLeaf1 {
            ecx: CPUID_ECX_SSE41 | CPUID_ECX_AVX | CPUID_ECX_OSXSAVE,
            edx: CPUID_EDX_SSE,
        };
        let features = CpuFeatures::from_leaf1(leaf);
        assert!(features.has_sse);
        assert!(features.has_sse41);
        assert!(features.has_avx);
        assert!(features.has_osxsave);
        assert!(!features.has_avx2);
        assert_eq!(features.summary(), "SSE, SSE4.1, AVX, OSXSAVE");
    }

    #[test]
    fn test_empty_summary() {
        let features = CpuFeatures::from_leaf1(CpuidLeaf1::default());
        assert_eq!(features.summary(), "no SIMD features detected");
        assert_eq!(format!("{features}"), "no SIMD features detected");
        for feature in CpuFeature::ALL {
            assert!(!features.supports(feature));
        }
    }

    #[test]
    fn test_feature_names_and_messages() {
        assert_eq!(CpuFeature::Sse.to_string(), "SSE");
        assert_eq!(CpuFeature::Sse41.unsupported_message(), "SSE4.1 is not supported");
        assert_eq!(CpuFeature::Avx.unsupported_message(), "AVX is not supported");
    }

    #[test]
    fn test_probe_agrees_with_snapshot() {
        let snapshot = CpuFeatures::detect();
        for feature in CpuFeature::ALL {
            assert_eq!(CpuidProbe.supports(feature), snapshot.supports(feature));
        }
    }

    #[cfg(target_arch = "x86_64")]
    #[test]
    fn test_x86_64_has_sse() {
        // SSE and SSE2 are part of the x86_64 baseline
        assert!(has_sse());
        assert!(CpuFeatures::detect().has_sse);
    }

    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    #[test]
    fn test_cpuid_matches_std_detection() {
        // Both 32- and 64-bit x86 issue the real instruction
        assert_ne!(CpuidLeaf1::query(), CpuidLeaf1::default());
        assert_eq!(has_sse(), is_x86_feature_detected!("sse"));
        assert_eq!(has_sse41(), is_x86_feature_detected!("sse4.1"));
        // std additionally requires OS support for AVX state
        if is_x86_feature_detected!("avx") {
            assert!(has_avx());
        }
    }

    #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
    #[test]
    fn test_non_x86_reports_nothing() {
        for feature in CpuFeature::ALL {
            assert!(!CpuidProbe.supports(feature));
        }
    }
}
