use exsum_core::BigSum;

use perf_bench::*;

fn main() {
    let values = generate_benchmark_values();
    let result = time_accumulator(BigSum::default(), &values);
    print_result("BigSum", &result);
}
