//! Common utilities and helpers

use std::time::Duration;

pub mod discovery;
pub mod logging;

/// Utility functions for ClipLy
pub struct Utils;

impl Utils {
    /// Format duration for display
    pub fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h{:02}m{:02}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m{:02}s", minutes, seconds)
        } else {
            format!("{:.1}s", duration.as_secs_f64())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(Utils::format_duration(Duration::from_millis(4_300)), "4.3s");
        assert_eq!(Utils::format_duration(Duration::from_secs(125)), "2m05s");
        assert_eq!(Utils::format_duration(Duration::from_secs(3_725)), "1h02m05s");
    }
}
