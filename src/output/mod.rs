//! Rendering of batch events for the terminal

use std::io::Write;

use crate::domain::model::BatchEvent;

/// Observer of a running batch
pub trait BatchObserver: Send {
    /// Text for one event, or `None` if the event is not shown
    fn render(&self, event: &BatchEvent) -> Option<String>;

    /// Called for every event in order
    fn on_event(&mut self, event: &BatchEvent) {
        if let Some(line) = self.render(event) {
            let mut stdout = std::io::stdout().lock();
            // A closed stdout must not stop the batch
            let _ = writeln!(stdout, "{}", line);
            let _ = stdout.flush();
        }
    }
}

/// Human-readable progress for interactive use
pub struct ConsoleObserver {
    bar_length: usize,
}

impl ConsoleObserver {
    pub fn new() -> Self {
        Self { bar_length: 20 }
    }

    fn bar(&self, percent: f64) -> String {
        let filled = ((percent / 100.0) * self.bar_length as f64) as usize;
        let filled = filled.min(self.bar_length);
        "#".repeat(filled) + &"-".repeat(self.bar_length - filled)
    }
}

impl Default for ConsoleObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchObserver for ConsoleObserver {
    fn render(&self, event: &BatchEvent) -> Option<String> {
        match event {
            BatchEvent::FileStarted { index, total, input } => Some(format!(
                "[{}/{}] {}",
                index + 1,
                total,
                input.display()
            )),
            BatchEvent::Progress(progress) => Some(format!(
                "  [{}] {:>5.1}%",
                self.bar(progress.fraction),
                progress.fraction
            )),
            BatchEvent::FallingBack { input, reason } => Some(format!(
                "  GPU encoding failed for {} ({}); retrying on CPU",
                input.display(),
                reason
            )),
            BatchEvent::Completed => Some("All files processed".to_string()),
            BatchEvent::Failed { message } => Some(format!("Error: {}", message)),
            BatchEvent::Cancelled => Some("Batch cancelled".to_string()),
        }
    }
}

/// One JSON object per event, for scripting
pub struct JsonObserver {
    include_progress: bool,
}

impl JsonObserver {
    pub fn new(include_progress: bool) -> Self {
        Self { include_progress }
    }
}

impl BatchObserver for JsonObserver {
    fn render(&self, event: &BatchEvent) -> Option<String> {
        if !self.include_progress && matches!(event, BatchEvent::Progress(_)) {
            return None;
        }

        let mut value = serde_json::to_value(event).ok()?;
        if let Some(object) = value.as_object_mut() {
            object.insert(
                "timestamp".to_string(),
                serde_json::Value::String(chrono::Utc::now().to_rfc3339()),
            );
        }
        Some(value.to_string())
    }
}
