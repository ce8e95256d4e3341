use exsum_core::Kahan;

use perf_bench::*;

fn main() {
    let values = generate_benchmark_values();
    let result = time_accumulator(Kahan::default(), &values);
    print_result("Kahan", &result);
}
