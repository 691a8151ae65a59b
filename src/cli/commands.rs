//! Command implementations

use anyhow::{Context, Result};
use tracing::{error, info};

use crate::app::{AppContainer, ProbeReport, ProcessRequest, ToolLocation};
use crate::cli::args::{LocateArgs, ProbeArgs, ProcessArgs};
use crate::domain::model::BatchState;
use crate::output::{BatchObserver, ConsoleObserver, JsonObserver};
use crate::utils::Utils;

/// Execute the process command
pub async fn process(container: &dyn AppContainer, args: ProcessArgs) -> Result<()> {
    let request = ProcessRequest {
        paths: args.paths,
        compress: args.compress,
        trims: args.trim,
        recursive: args.recursive,
    };

    let mut observer: Box<dyn BatchObserver> = if args.json {
        Box::new(JsonObserver::new(!args.no_progress))
    } else {
        Box::new(ConsoleObserver::new())
    };

    let response = container
        .process_interactor()
        .execute(&request, observer.as_mut())
        .await
        .context("Failed to start batch")?;

    match response.state {
        BatchState::Completed => {
            info!(
                "Processed {} file(s) in {}",
                response.total,
                Utils::format_duration(response.elapsed)
            );
            Ok(())
        }
        BatchState::Failed(message) => {
            error!("Batch stopped: {}", message);
            Err(anyhow::anyhow!(message))
        }
        BatchState::Cancelled => Err(anyhow::anyhow!("Batch cancelled")),
        state => Err(anyhow::anyhow!("Batch ended in unexpected state {:?}", state)),
    }
}

/// Execute the probe command
pub async fn probe(container: &dyn AppContainer, args: ProbeArgs) -> Result<()> {
    let report = container
        .inspect_interactor()
        .probe(&args.input)
        .await
        .with_context(|| format!("Failed to probe {}", args.input.display()))?;

    if args.json {
        let json = serde_json::to_string_pretty(&report)
            .context("Failed to serialize probe report to JSON")?;
        println!("{}", json);
    } else {
        display_probe_report(&report);
    }
    Ok(())
}

/// Execute the locate command; fails if any tool is missing
pub fn locate(container: &dyn AppContainer, args: LocateArgs) -> Result<()> {
    let tools = container.inspect_interactor().locate_tools();

    if args.json {
        let json = serde_json::to_string_pretty(&tools)
            .context("Failed to serialize tool locations to JSON")?;
        println!("{}", json);
    } else {
        display_tool_locations(&tools);
    }

    let missing: Vec<&str> = tools
        .iter()
        .filter(|tool| tool.path.is_none())
        .map(|tool| tool.name.as_str())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(anyhow::anyhow!("Not found: {}", missing.join(", ")))
    }
}

fn display_probe_report(report: &ProbeReport) {
    println!("File:     {}", report.input.display());
    println!("Duration: {} ({:.3}s)", report.duration, report.duration_seconds);
    println!("Output:   {}", report.output.display());
}

fn display_tool_locations(tools: &[ToolLocation]) {
    for tool in tools {
        match &tool.path {
            Some(path) => println!("{}: {}", tool.name, path.display()),
            None => println!("{}: not found", tool.name),
        }
    }
}
