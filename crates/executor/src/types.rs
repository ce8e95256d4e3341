use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::sync::mpsc::Sender;

use super::error::Error;
use exsum_core::{Accumulator, ExactSum, Kahan, Naive};

/// A trait defining the contract for any source that streams batches of values
/// into the summation pipeline.
///
/// The trait bounds (`Send`, `Sync`, `'static`) are required so the implementation
/// can run on the multi-threaded Tokio runtime.
#[async_trait::async_trait]
pub trait ValueStreamer: Send + Sync + 'static {
    async fn run_stream(self, sender: Sender<Vec<f64>>) -> Result<(), Error>;
}

/// Running sums over everything the writer has consumed.
///
/// The naive and Kahan accumulators are carried alongside the exact one so the final report can
/// show how far they drift on the same stream.
#[derive(Debug, Clone, Default)]
pub struct Totals {
    pub exact: ExactSum,
    pub naive: Naive,
    pub kahan: Kahan,
    pub count: u64,
}

impl Totals {
    pub fn add_batch(&mut self, values: &[f64]) {
        self.exact.add_all(values);
        self.naive.add_all(values);
        self.kahan.add_all(values);
        self.count += values.len() as u64;
    }
}

pub type SharedTotals = Arc<RwLock<Totals>>;

pub type JoinHandleResult = tokio::task::JoinHandle<Result<(), Error>>;
