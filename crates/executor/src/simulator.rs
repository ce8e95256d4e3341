use async_trait::async_trait;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc::Sender;
use tokio::time::{self, Duration};

use super::config::{MAX_DECIMAL_EXPONENT, SimulatorConfig};
use super::error::Error;
use super::types::ValueStreamer;

/// Produces synthetic values for simulation purposes.
///
/// Generates `batches` batches of random-sign values whose magnitudes span
/// `10^-max_decimal_exponent ..= 10^max_decimal_exponent`, the kind of stream where
/// naive summation loses the small terms. Every batch is followed by the negation of its
/// largest value, so large magnitudes cancel and the small terms decide the result.
pub struct SimulatorStreamer {
    config: SimulatorConfig,
}

impl SimulatorStreamer {
    pub fn new(config: SimulatorConfig) -> Self {
        SimulatorStreamer { config }
    }

    fn rng(&self) -> SmallRng {
        match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        }
    }

    fn generate_batch(&self, rng: &mut SmallRng) -> Vec<f64> {
        let max_exp = self.config.max_decimal_exponent.clamp(0, MAX_DECIMAL_EXPONENT);
        let mut batch: Vec<f64> = (0..self.config.batch_size)
            .map(|_| {
                let mantissa: f64 = rng.random_range(1.0..10.0);
                let exponent = rng.random_range(-max_exp..=max_exp);
                let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
                sign * mantissa * 10f64.powi(exponent)
            })
            .collect();

        if let Some(&largest) = batch
            .iter()
            .max_by(|a, b| a.abs().total_cmp(&b.abs()))
        {
            batch.push(-largest);
        }
        batch
    }
}

#[async_trait]
impl ValueStreamer for SimulatorStreamer {
    /// Runs the simulation asynchronously.
    ///
    /// Sends one batch per tick. Backpressure is handled naturally via awaiting on
    /// `sender.send()`. Exits once all batches are sent, or early if the receiver is dropped.
    async fn run_stream(self, sender: Sender<Vec<f64>>) -> Result<(), Error> {
        let mut interval = time::interval(Duration::from_millis(self.config.interval_ms.max(1)));
        let mut rng = self.rng();

        for batch_index in 0..self.config.batches {
            interval.tick().await;

            let batch = self.generate_batch(&mut rng);

            tracing::debug!(batch_index, len = batch.len(), "Simulator sent batch");
            if sender.send(batch).await.is_err() {
                tracing::warn!("Simulator shutting down: Writer receiver dropped.");
                return Err(Error::ChannelSendFailed);
            }
        }

        tracing::info!(batches = self.config.batches, "Simulator finished.");
        Ok(())
    }
}
