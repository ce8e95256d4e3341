use tokio::sync::mpsc::Sender;

use super::types::{JoinHandleResult, ValueStreamer};

pub struct Producer<S: ValueStreamer> {
    streamer: S,
}

impl<S> Producer<S>
where
    S: ValueStreamer,
{
    pub fn new(streamer: S) -> Self {
        Producer { streamer }
    }

    pub fn spawn(self, sender: Sender<Vec<f64>>) -> JoinHandleResult {
        tracing::info!("Producer ready.");
        tokio::spawn(async move { self.streamer.run_stream(sender).await })
    }
}
