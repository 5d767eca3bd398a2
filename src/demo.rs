//! Canned demo: gate on required CPU features, then run the three kernels
//!
//! Output matches the layout of the `simd-demo` binary:
//!
//! ```text
//! SSE Vector Addition
//! 2.000000 4.000000 ... 16.000000
//! AVX Vector Multiplication
//! 1.000000 4.000000 ... 64.000000
//! AVX Dot Product: 816.000000
//! ```

use std::io::Write;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimdError};
use crate::simd::{vector_add_f32, vector_dot_f32, vector_mul_f32, CpuFeature, FeatureProbe};

/// Demo run settings
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DemoConfig {
    /// Features checked before any kernel runs, in order
    pub required_features: Vec<CpuFeature>,
    /// Block of values repeated to build both input vectors
    pub pattern: Vec<f32>,
    /// Number of times `pattern` is repeated
    pub repeats: usize,
}

impl Default for DemoConfig {
    fn default() -> Self {
        DemoConfig {
            required_features: CpuFeature::ALL.to_vec(),
            pattern: vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0],
            repeats: 4,
        }
    }
}

impl DemoConfig {
    /// Number of elements in each input vector.
    pub fn len(&self) -> usize {
        self.pattern.len() * self.repeats
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build the two input vectors. Both operands are identical.
    pub fn inputs(&self) -> (Vec<f32>, Vec<f32>) {
        let a: Vec<f32> = self
            .pattern
            .iter()
            .copied()
            .cycle()
            .take(self.len())
            .collect();
        let b = a.clone();
        (a, b)
    }
}

/// Results of a completed demo run
#[derive(Debug, Clone, PartialEq)]
pub struct DemoReport {
    pub sum: Vec<f32>,
    pub product: Vec<f32>,
    pub dot: f32,
}

/// Check `required` in order and fail on the first feature `probe` lacks.
pub fn check_required<P: FeatureProbe + ?Sized>(probe: &P, required: &[CpuFeature]) -> Result<()> {
    for &feature in required {
        if !probe.supports(feature) {
            log::warn!("required CPU feature {} is missing", feature);
            return Err(SimdError::MissingFeature(feature));
        }
        log::debug!("required CPU feature {} present", feature);
    }
    Ok(())
}

/// Render values as `%f`-style fields, each followed by a space.
pub fn format_vector(values: &[f32]) -> String {
    let mut line = String::with_capacity(values.len() * 10);
    for value in values {
        line.push_str(&format!("{value:.6} "));
    }
    line
}

/// Run the demo against `probe`, writing the report to `out`.
///
/// Nothing is written and no kernel runs when a required feature is absent.
pub fn run_demo<P, W>(probe: &P, config: &DemoConfig, out: &mut W) -> Result<DemoReport>
where
    P: FeatureProbe + ?Sized,
    W: Write + ?Sized,
{
    check_required(probe, &config.required_features)?;

    let (a, b) = config.inputs();
    let mut sum = vec![0.0f32; a.len()];
    let mut product = vec![0.0f32; a.len()];

    vector_add_f32(&a, &b, &mut sum);
    writeln!(out, "SSE Vector Addition")?;
    writeln!(out, "{}", format_vector(&sum))?;

    vector_mul_f32(&a, &b, &mut product);
    writeln!(out, "AVX Vector Multiplication")?;
    writeln!(out, "{}", format_vector(&product))?;

    let dot = vector_dot_f32(&a, &b);
    writeln!(out, "AVX Dot Product: {dot:.6}")?;

    Ok(DemoReport { sum, product, dot })
}

/// Run the demo and turn the outcome into a process exit status.
///
/// A missing feature is reported on `out` as a single line and yields its
/// exit code. Write failures are logged, since `out` can no longer be trusted.
pub fn run<P, W>(probe: &P, config: &DemoConfig, out: &mut W) -> i32
where
    P: FeatureProbe + ?Sized,
    W: Write + ?Sized,
{
    let outcome = run_demo(probe, config, out).and_then(|report| {
        log::debug!("demo finished, dot product {}", report.dot);
        out.flush()?;
        Ok(())
    });

    match outcome {
        Ok(()) => 0,
        Err(err @ SimdError::MissingFeature(_)) => {
            if let Err(write_err) = writeln!(out, "{err}").and_then(|_| out.flush()) {
                log::error!("failed to report \"{}\": {}", err, write_err);
            }
            err.exit_code()
        }
        Err(err) => {
            log::error!("{}", err);
            err.exit_code()
        }
    }
}
