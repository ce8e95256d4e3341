use tokio::select;
use tokio::sync::watch;
use tokio::time::{self, Duration};

use super::error::Error;
use super::types::SharedTotals;

/// Periodically logs the running exact sum while the writer keeps adding.
pub struct Reporter {
    totals: SharedTotals,
    interval: Duration,
    shutdown: watch::Receiver<()>,
}

impl Reporter {
    pub fn new(totals: SharedTotals, interval_ms: u64, shutdown: watch::Receiver<()>) -> Self {
        Reporter {
            totals,
            interval: Duration::from_millis(interval_ms.max(1)),
            shutdown,
        }
    }

    pub async fn report_progress(mut self) -> Result<(), Error> {
        tracing::info!("Reporter ready.");

        let mut interval = time::interval(self.interval);

        // The first tick occurs immediately, but we skip it to wait the full duration
        interval.tick().await;

        loop {
            select! {
                _ = interval.tick() => {
                    // Reading does not disturb the accumulator; hold the lock only for the copy-out.
                    let (count, value) = {
                        let totals_guard = self.totals.read().await;
                        (totals_guard.count, totals_guard.exact.value())
                    };

                    if count > 0 {
                        tracing::info!(count, value, "Running sum");
                    } else {
                        tracing::debug!("No values yet. Skipping.");
                    }
                }

                _ = self.shutdown.changed() => {
                    tracing::debug!("Shutdown signal received, stopping reporter.");
                    break;
                }
            }
        }

        Ok(())
    }

    pub fn spawn_task(self) -> tokio::task::JoinHandle<Result<(), Error>> {
        tokio::spawn(self.report_progress())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Totals;
    use std::sync::Arc;
    use tokio::sync::RwLock;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_reporter_reads_and_stops() {
        let totals: SharedTotals = Arc::new(RwLock::new(Totals::default()));
        totals.write().await.add_batch(&[1.0, 2.0]);
        let (shutdown_tx, shutdown_rx) = watch::channel(());

        let handle = Reporter::new(totals.clone(), 1, shutdown_rx).spawn_task();
        time::sleep(Duration::from_millis(10)).await;
        shutdown_tx.send(()).unwrap();

        timeout(Duration::from_millis(500), handle)
            .await
            .expect("Reporter did not stop")
            .unwrap()
            .unwrap();

        // Reads left the totals untouched.
        assert_eq!(totals.read().await.count, 2);
        assert_eq!(totals.read().await.exact.value(), 3.0);
    }
}
