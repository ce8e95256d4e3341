use exsum_core::Naive;

use perf_bench::*;

fn main() {
    let values = generate_benchmark_values();
    let result = time_accumulator(Naive::default(), &values);
    print_result("Naive", &result);
}
