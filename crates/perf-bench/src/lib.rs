use std::hint::black_box;
use std::time::{Duration, Instant};

use exsum_core::Accumulator;

pub const NUM_VALUES: usize = 10_000_000;

/// Large enough to dwarf the stream, so every naive step rounds.
pub const ANCHOR: f64 = 17.0;
pub const STEP: f64 = -1e-10;

/// Generates the benchmark stream: `ANCHOR`, `NUM_VALUES` copies of a small value, `-ANCHOR`.
///
/// The step is varied slightly by index so the compiler cannot fold the loop into a multiply.
pub fn generate_benchmark_values() -> Vec<f64> {
    let mut values = Vec::with_capacity(NUM_VALUES + 2);
    values.push(ANCHOR);
    values.extend((0..NUM_VALUES).map(|i| STEP * (1.0 + (i % 7) as f64 * 1e-12)));
    values.push(-ANCHOR);
    values
}

pub struct BenchResult {
    pub value: f64,
    pub elapsed: Duration,
}

/// Feeds every value into `acc` and times the adds plus the final read.
pub fn time_accumulator<A: Accumulator>(mut acc: A, values: &[f64]) -> BenchResult {
    let start_time = Instant::now();
    for &v in values {
        acc.add(black_box(v));
    }
    let value = black_box(acc.value());
    BenchResult {
        value,
        elapsed: start_time.elapsed(),
    }
}

pub fn print_result(name: &str, result: &BenchResult) {
    let per_value = result.elapsed.as_nanos() as f64 / (NUM_VALUES + 2) as f64;
    println!("--- {} Benchmark Results ({} Values) ---", name, NUM_VALUES);
    println!("Sum: {:e}", result.value);
    println!("Elapsed Time: {:?}", result.elapsed);
    println!("Per Value: {:.3} ns", per_value);
}
