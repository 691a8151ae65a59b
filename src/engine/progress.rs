//! Progress extraction from ffmpeg's `-progress` stream

use crate::domain::model::ProgressEvent;

/// Key ffmpeg uses for the elapsed output time, in microseconds despite its name
const OUT_TIME_KEY: &str = "out_time_ms=";

/// Highest value reported while the encoder is still running
pub const STREAMING_CEILING: f64 = 99.0;

/// Stateless parser for ffmpeg status lines
pub struct ProgressParser;

impl ProgressParser {
    /// Percentage of `duration_seconds` covered by the line's `out_time_ms`, capped at 100
    ///
    /// Lines without the key, or with a non-numeric value, yield `None`.
    pub fn parse(line: &str, duration_seconds: f64) -> Option<f64> {
        if duration_seconds <= 0.0 {
            return None;
        }

        let start = line.find(OUT_TIME_KEY)? + OUT_TIME_KEY.len();
        let digits: &str = {
            let rest = &line[start..];
            let end = rest
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len());
            &rest[..end]
        };
        let micros: u64 = digits.parse().ok()?;

        let percent = (micros as f64 / 1_000_000.0) / duration_seconds * 100.0;
        Some(percent.min(100.0))
    }
}

/// Forward-only progress for one file
///
/// Shared by every encode attempt of the file, so a fallback never rewinds what
/// the observer has already seen.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    duration_seconds: f64,
    last_reported: f64,
}

impl ProgressTracker {
    pub fn new(duration_seconds: f64) -> Self {
        Self {
            duration_seconds,
            last_reported: 0.0,
        }
    }

    /// Feed one status line; returns an event only when progress moved forward
    pub fn observe(&mut self, line: &str) -> Option<ProgressEvent> {
        let percent = ProgressParser::parse(line, self.duration_seconds)?.min(STREAMING_CEILING);
        if percent > self.last_reported {
            self.last_reported = percent;
            Some(ProgressEvent::new(percent))
        } else {
            None
        }
    }

    /// Last value handed out
    pub fn last_reported(&self) -> f64 {
        self.last_reported
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected(micros: u64, duration: f64) -> f64 {
        ((micros as f64 / 1e6) / duration * 100.0).min(100.0)
    }

    #[test]
    fn test_parse_out_time_line() {
        assert_eq!(ProgressParser::parse("out_time_ms=5000000", 10.0), Some(50.0));
        assert_eq!(ProgressParser::parse("out_time_ms=0", 10.0), Some(0.0));
    }

    #[test]
    fn test_parse_clamps_to_hundred() {
        assert_eq!(ProgressParser::parse("out_time_ms=90000000", 10.0), Some(100.0));
    }

    #[test]
    fn test_lines_without_time_yield_nothing() {
        for line in [
            "frame=120",
            "fps=29.97",
            "out_time=00:00:05.000000",
            "out_time_us=5000000",
            "progress=continue",
            "",
            "out_time_ms=N/A",
        ] {
            assert_eq!(ProgressParser::parse(line, 10.0), None, "line: {line}");
        }
    }

    #[test]
    fn test_parse_finds_token_inside_line() {
        assert_eq!(
            ProgressParser::parse("bitrate=1.0kbits/s out_time_ms=2500000 speed=1x", 10.0),
            Some(25.0)
        );
    }

    #[test]
    fn test_increasing_stream_yields_non_decreasing_fractions() {
        for duration in [0.5, 7.3, 60.0, 3600.0] {
            let mut previous = 0.0;
            let mut micros = 0u64;
            while micros < (duration * 1.5e6) as u64 {
                micros += 123_457;
                let line = format!("out_time_ms={}", micros);
                let value = ProgressParser::parse(&line, duration).unwrap();
                assert!((0.0..=100.0).contains(&value));
                assert!(value >= previous);
                assert_eq!(value, expected(micros, duration));
                previous = value;
            }
        }
    }

    #[test]
    fn test_tracker_caps_at_ceiling_and_only_moves_forward() {
        let mut tracker = ProgressTracker::new(10.0);

        assert_eq!(tracker.observe("frame=1"), None);
        assert_eq!(tracker.observe("out_time_ms=0"), None);
        assert_eq!(tracker.observe("out_time_ms=2000000"), Some(ProgressEvent::new(20.0)));
        assert_eq!(tracker.observe("out_time_ms=1000000"), None);
        assert_eq!(tracker.observe("out_time_ms=2000000"), None);
        assert_eq!(tracker.observe("out_time_ms=12000000"), Some(ProgressEvent::new(99.0)));
        assert_eq!(tracker.observe("out_time_ms=15000000"), None);
        assert_eq!(tracker.last_reported(), 99.0);
    }

    #[test]
    fn test_zero_duration_never_reports() {
        let mut tracker = ProgressTracker::new(0.0);
        assert_eq!(tracker.observe("out_time_ms=1000"), None);
    }
}
