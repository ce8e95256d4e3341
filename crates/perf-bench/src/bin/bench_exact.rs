use exsum_core::ExactSum;

use perf_bench::*;

fn main() {
    let values = generate_benchmark_values();
    let result = time_accumulator(ExactSum::new(), &values);
    print_result("ExactSum", &result);
}
