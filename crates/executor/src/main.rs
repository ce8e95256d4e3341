pub mod config;
pub mod csv_streamer;
pub mod error;
pub mod producer;
pub mod reporter;
pub mod simulator;
pub mod types;
pub mod writer;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{RwLock, mpsc, mpsc::Sender, watch};
use tracing_subscriber::filter::LevelFilter;

use common::types::Precision;
use csv_streamer::CsvStreamer;
use error::Error;
use exsum_core::Accumulator;
use producer::Producer;
use reporter::Reporter;
use simulator::SimulatorStreamer;
use types::{JoinHandleResult, SharedTotals, Totals};
use writer::Writer;

/// Streams doubles into an exact summation engine and reports the correctly rounded sum.
#[derive(Debug, Parser)]
#[command(name = "exsum-executor", version, about, long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "crates/executor/Config.toml")]
    config: PathBuf,

    /// Log level: trace, debug, info, warn, error.
    #[arg(long, default_value = "info", value_parser = clap::value_parser!(LevelFilter))]
    log_level: LevelFilter,

    #[command(subcommand)]
    source: DataSource,
}

#[derive(Debug, Subcommand)]
enum DataSource {
    /// Run a simulated stream of values.
    Sim,
    /// Read values from the `value` column of a CSV file.
    Csv { path: PathBuf },
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_target(false)
        .init();

    let config = config::load_config(&args.config)?;
    let precision = config.executor.precision()?;

    let totals: SharedTotals = Arc::new(RwLock::new(Totals::default()));
    let (sender, receiver) = mpsc::channel::<Vec<f64>>(config.executor.buffer_size);
    let (shutdown_tx, shutdown_rx) = watch::channel(());

    // Spawn tasks
    let producer_handle = spawn_producer(&args.source, sender, &config);
    let writer_handle = Writer::new(totals.clone(), receiver, shutdown_rx.clone()).spawn_task();
    let reporter_handle =
        Reporter::new(totals.clone(), config.reporter.interval_ms, shutdown_rx).spawn_task();

    let writer_result = tokio::select! {
        result = writer_handle => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted, shutting down.");
            let _ = shutdown_tx.send(());
            print!("{}", render_report(&*totals.read().await, precision));
            return Ok(());
        }
    };
    // The writer only stops once the channel is drained (or on interrupt, handled above).
    let _ = shutdown_tx.send(());

    let (producer_result, reporter_result) = tokio::join!(producer_handle, reporter_handle);
    writer_result??;
    producer_result??;
    reporter_result??;

    print!("{}", render_report(&*totals.read().await, precision));

    tracing::info!("Pipeline shut down.");
    Ok(())
}

fn spawn_producer(
    source: &DataSource,
    sender: Sender<Vec<f64>>,
    config: &config::Config,
) -> JoinHandleResult {
    match source {
        DataSource::Sim => {
            tracing::info!("Starting SimulatorStreamer producer task...");
            let streamer = SimulatorStreamer::new(config.simulator.clone());
            Producer::new(streamer).spawn(sender)
        }
        DataSource::Csv { path } => {
            tracing::info!(path = %path.display(), "Starting CsvStreamer producer task...");
            let streamer = CsvStreamer::new(path.clone(), config.producer.batch_size);
            Producer::new(streamer).spawn(sender)
        }
    }
}

/// Formats the sums over everything consumed so far.
fn render_report(totals: &Totals, precision: Precision) -> String {
    let exact = totals.exact.exact_value_with(precision);

    format!(
        "--- Summation Results ({} Values) ---\n\
         Sum:       {:e}\n\
         Exact:     {}\n\
         Naive:     {:e}\n\
         Kahan:     {:e}\n\
         Tallies:   {:?}\n",
        totals.count,
        exact.to_f64(),
        exact,
        totals.naive.value(),
        totals.kahan.value(),
        totals.exact.tallies(),
    )
}
