//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

use crate::domain::model::TrimRange;

/// Arguments for the process command
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Video files or directories, processed in the order given
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Use the smaller-output presets instead of the quality presets
    #[arg(short, long)]
    pub compress: bool,

    /// Keep only part of a file: FILE=START..END (seconds, MM:SS or HH:MM:SS)
    #[arg(long, value_name = "FILE=START..END", value_parser = parse_trim)]
    pub trim: Vec<(PathBuf, TrimRange)>,

    /// Walk directories recursively
    #[arg(short, long)]
    pub recursive: bool,

    /// Print events as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Leave progress events out of the JSON lines
    #[arg(long, requires = "json")]
    pub no_progress: bool,
}

/// Arguments for the probe command
#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Input video file path
    pub input: PathBuf,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the locate command
#[derive(Args, Debug)]
pub struct LocateArgs {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Parse `FILE=START..END`; the last `=` separates file from range
pub fn parse_trim(value: &str) -> Result<(PathBuf, TrimRange), String> {
    let (file, range) = value
        .rsplit_once('=')
        .ok_or_else(|| format!("expected FILE=START..END, got '{}'", value))?;
    if file.is_empty() {
        return Err("trim is missing the file name".to_string());
    }
    let range = TrimRange::parse(range).map_err(|e| e.to_string())?;
    Ok((PathBuf::from(file), range))
}
