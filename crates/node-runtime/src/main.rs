//! # MimbleWimble Node
//!
//! Starts the block pipeline against an in-memory chain and reports
//! status until Ctrl+C.

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use node_runtime::container::Args;
use node_runtime::logging::init_logging;
use node_runtime::NodeRuntime;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let runtime = NodeRuntime::new(args.to_config())?;
    let headless = runtime.config().headless;
    let mut ticker = runtime.status_ticker();
    info!("Node is running. Press Ctrl+C to stop.");

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            result = &mut ctrl_c => {
                if let Err(e) = result {
                    error!("Failed to listen for Ctrl+C: {}", e);
                }
                break;
            }
            _ = ticker.tick() => {
                if !headless {
                    info!("{}", runtime.status_line());
                }
            }
        }
    }

    // Joining the workers blocks, keep it off the async executor.
    tokio::task::spawn_blocking(move || runtime.shutdown()).await?;

    Ok(())
}
