use tokio::select;
use tokio::sync::mpsc::Receiver;
use tokio::sync::watch;

use super::error::Error;
use super::types::{JoinHandleResult, SharedTotals};

/// Async consumer that feeds batches of values into the shared totals.
pub struct Writer {
    totals: SharedTotals,
    receiver: Receiver<Vec<f64>>,
    shutdown: watch::Receiver<()>, // signal for graceful shutdown
}

impl Writer {
    pub fn new(
        totals: SharedTotals,
        receiver: Receiver<Vec<f64>>,
        shutdown: watch::Receiver<()>,
    ) -> Self {
        Self {
            totals,
            receiver,
            shutdown,
        }
    }

    /// Run the writer asynchronously.
    ///
    /// Consumes batches from the receiver and adds them to the totals, releasing the write lock
    /// after each batch. Exits when the receiver is closed or the shutdown signal is received.
    pub async fn process_updates(mut self) -> Result<(), Error> {
        tracing::info!("Writer ready.");

        loop {
            select! {
                batch = self.receiver.recv() => {
                    match batch {
                        Some(batch) => {
                            let mut totals_guard = self.totals.write().await;
                            totals_guard.add_batch(&batch);
                            tracing::debug!(len = batch.len(), count = totals_guard.count, "Batch added");
                        }
                        None => {
                            tracing::info!("Receiver closed, shutting down writer.");
                            break;
                        }
                    }
                }

                _ = self.shutdown.changed() => {
                    tracing::info!("Shutdown signal received, stopping writer.");
                    break;
                }
            }
        }

        Ok(())
    }

    /// Spawns the Writer task onto the Tokio runtime.
    pub fn spawn_task(self) -> JoinHandleResult {
        tokio::spawn(self.process_updates())
    }
}
