/// Trait for anything that consumes a stream of doubles and reports their sum.
pub trait Accumulator {
    /// Adds one value to the running sum.
    fn add(&mut self, value: f64);

    /// Returns the sum of everything added so far, rounded to a double.
    fn value(&self) -> f64;

    /// Adds every value of `values`, in order.
    fn add_all(&mut self, values: &[f64]) {
        for &v in values {
            self.add(v);
        }
    }
}
