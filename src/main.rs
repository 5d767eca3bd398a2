//! Checks SSE, SSE4.1 and AVX, then runs the vector kernels on a fixed
//! 32-element input and prints the results.
//!
//! Exits with status 1 on the first missing feature.
//!
//! ```bash
//! cargo run --release --bin simd-demo
//! RUST_LOG=debug cargo run --bin simd-demo
//! ```

use std::io;
use std::process;

use simd_kernels::demo::{run, DemoConfig};
use simd_kernels::simd::{BuildFeatures, CpuidProbe};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    log::debug!("compile-time features: {:?}", BuildFeatures::current());

    let status = run(&CpuidProbe, &DemoConfig::default(), &mut io::stdout().lock());
    process::exit(status);
}
