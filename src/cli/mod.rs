//! CLI module for ClipLy
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config_initialization::ConfigOverrides;
use crate::utils::logging::{LogFormat, LogLevel};

pub mod args;
pub mod commands;

pub use args::{LocateArgs, ProbeArgs, ProcessArgs};

/// ClipLy batch video processor
///
/// Re-encodes videos to H.264 MP4 next to the originals, on the GPU when one is
/// available and on the CPU otherwise, with optional per-file trimming.
#[derive(Parser, Debug)]
#[command(name = "cliply")]
#[command(about = "ClipLy - Batch video compression and trimming")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<LogLevel>,

    /// Log output format (pretty, compact, json)
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,

    /// Configuration file (TOML or YAML)
    #[arg(long, global = true, env = "CLIPLY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Encoding tool name or file name
    #[arg(long, global = true)]
    pub ffmpeg: Option<String>,

    /// Probing tool name or file name
    #[arg(long, global = true)]
    pub ffprobe: Option<String>,

    /// Directory searched for bundled tools before the system path
    #[arg(long, global = true)]
    pub bundled_dir: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Settings given on the command line, for the configuration hierarchy
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            log_level: self.log_level,
            log_format: self.log_format,
            ffmpeg: self.ffmpeg.clone(),
            ffprobe: self.ffprobe.clone(),
            bundled_dir: self.bundled_dir.clone(),
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compress or re-encode a batch of video files
    Process(args::ProcessArgs),
    /// Print the duration of a video file
    Probe(args::ProbeArgs),
    /// Show where the external tools resolve to
    Locate(args::LocateArgs),
}
