//! Exact, order-independent summation of IEEE-754 doubles.
//!
//! [`ExactSum`] bins every input by its biased exponent and defers all rounding to the moment a
//! result is read, so the answer is the exact sum rounded once.

pub mod baselines;
pub mod big_float;
pub mod big_kahan;
pub mod bin;
pub mod bin_adder;
pub mod sum;
pub mod traits;

pub use baselines::{BigSum, Kahan, Naive};
pub use big_float::BigFloat;
pub use sum::{ExactSum, ExactValue, Tallies};
pub use traits::Accumulator;

pub use common::types::Precision;
