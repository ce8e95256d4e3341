use csv::ReaderBuilder;
use serde::Deserialize;
use std::fs::File;
use std::path::PathBuf;
use tokio::sync::mpsc::Sender;

use super::error::Error;
use super::types::ValueStreamer;

// Helper struct for CSV parsing
#[derive(Debug, Deserialize, Default)]
pub struct CsvRecord {
    #[serde(rename = "value")]
    pub value: f64,
}

/// Streams the `value` column of a CSV file in fixed-size batches.
pub struct CsvStreamer {
    path: PathBuf,
    batch_size: usize,
}

impl CsvStreamer {
    pub fn new(path: PathBuf, batch_size: usize) -> Self {
        CsvStreamer { path, batch_size }
    }

    fn parse_csv_to_values(&self) -> Result<Vec<f64>, Error> {
        let file = File::open(&self.path).map_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "Failed to read file");
            Error::IoError(e)
        })?;

        let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(file);

        let mut values = Vec::new();

        for result in rdr.deserialize() {
            let record: CsvRecord = result?;
            values.push(record.value);
        }
        Ok(values)
    }
}

#[async_trait::async_trait]
impl ValueStreamer for CsvStreamer {
    async fn run_stream(self, sender: Sender<Vec<f64>>) -> Result<(), Error> {
        let all_values = self.parse_csv_to_values()?;
        let mut values_sent = 0;

        tracing::info!(total = all_values.len(), "CsvStreamer: Starting transfer");

        for chunk in all_values.chunks(self.batch_size) {
            if let Err(e) = sender.send(chunk.to_vec()).await {
                tracing::warn!(
                    error = %e,
                    "CsvStreamer shutting down: Writer receiver dropped during send"
                );
                return Err(Error::ChannelSendFailed);
            }

            values_sent += chunk.len();
        }

        tracing::info!(values_sent, "CsvStreamer: Transfer complete");
        Ok(())
    }
}
