//! ClipLy batch video processor
//!
//! Re-encodes video files to H.264 MP4 next to the originals, trying NVENC first
//! and falling back to x264 for any file the GPU path cannot handle.
//!
//! # Usage
//!
//! ```bash
//! cliply process talk.mov lecture.mp4 --compress
//! cliply process videos/ --recursive --trim videos/intro.mp4=0:05..1:30
//! cliply probe talk.mov
//! cliply locate
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

use cliply::app::DefaultAppContainer;
use cliply::cli::{commands, Cli, Commands};
use cliply::config_initialization::{initialize_configuration_hierarchy, log_configuration};
use cliply::utils::logging::init_logging;

/// Main entry point for the ClipLy CLI application
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, source) = initialize_configuration_hierarchy(cli.config.as_deref(), &cli.overrides())?;
    init_logging(config.log_level, config.log_format)?;
    log_configuration(&config, source.as_deref());

    let container = DefaultAppContainer::new(&config);

    match cli.command {
        Commands::Process(args) => {
            info!("Executing process command");
            commands::process(&container, args).await?;
        }
        Commands::Probe(args) => {
            info!("Executing probe command");
            commands::probe(&container, args).await?;
        }
        Commands::Locate(args) => {
            info!("Executing locate command");
            commands::locate(&container, args)?;
        }
    }

    Ok(())
}
