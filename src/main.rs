mod cancellation;
mod capture;
mod cli;
mod cmd;
mod config;
mod dispatch;
mod domain;
mod engine;
mod error;
mod logger;
mod monitor;
mod multiplexer;

use anyhow::Result;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    logger::init()?;
    info!(args = ?std::env::args().collect::<Vec<_>>(), "paneherder start");

    match cli::run().await {
        Ok(()) => {
            info!("paneherder finished successfully");
            Ok(())
        }
        Err(err) => {
            error!(error = ?err, "paneherder failed");
            Err(err)
        }
    }
}
