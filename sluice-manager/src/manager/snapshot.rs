//! Point-in-time views of registered streams.

use chrono::{DateTime, Utc};
use sluice_core::StreamConfig;
use std::fmt::Write;
use std::time::Duration;

/// Status of one stream as reported by a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamSummary {
    /// Whether the runtime reports the stream as running.
    pub active: bool,
    /// Time since the current generation was started.
    pub uptime: Duration,
}

impl StreamSummary {
    /// Uptime in fractional seconds.
    pub fn uptime_secs(&self) -> f64 {
        self.uptime.as_secs_f64()
    }

    /// Uptime rendered like `1h2m3.5s`.
    pub fn uptime_str(&self) -> String {
        format_uptime(self.uptime)
    }
}

/// Full status of one stream.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamStatus {
    /// Whether the runtime reports the stream as running.
    pub active: bool,
    /// Time since the current generation was started.
    pub uptime: Duration,
    /// When the current generation was registered.
    pub created_at: DateTime<Utc>,
    /// When the runtime reports the stream as started, if it has.
    pub started_at: Option<DateTime<Utc>>,
    /// The resolved configuration the stream runs.
    pub config: StreamConfig,
}

impl StreamStatus {
    /// Reduce to the listing view.
    pub fn summary(&self) -> StreamSummary {
        StreamSummary {
            active: self.active,
            uptime: self.uptime,
        }
    }
}

/// Render a duration the way Go's `time.Duration` prints.
///
/// Sub-second values use the largest unit below a second (`350ms`,
/// `1.5µs`); longer values are `h`, `m` and fractional `s` with trailing
/// zeros dropped (`1h2m3.5s`, `2m0s`). Zero is `0s`.
pub fn format_uptime(d: Duration) -> String {
    let nanos = d.as_nanos();

    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < 1_000 {
        return format!("{}ns", nanos);
    }
    if nanos < 1_000_000 {
        return format!("{}µs", decimal(nanos, 1_000));
    }
    if nanos < 1_000_000_000 {
        return format!("{}ms", decimal(nanos, 1_000_000));
    }

    let total_secs = d.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = decimal(nanos % 60_000_000_000, 1_000_000_000);

    let mut out = String::new();
    if hours > 0 {
        let _ = write!(out, "{}h", hours);
    }
    if hours > 0 || minutes > 0 {
        let _ = write!(out, "{}m", minutes);
    }
    let _ = write!(out, "{}s", seconds);
    out
}

/// `value / unit` as a decimal string without trailing zeros.
fn decimal(value: u128, unit: u128) -> String {
    let whole = value / unit;
    let frac = value % unit;
    if frac == 0 {
        return whole.to_string();
    }

    let width = unit.ilog10() as usize;
    let digits = format!("{:0width$}", frac, width = width);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_zero_seconds() {
        assert_eq!(format_uptime(Duration::ZERO), "0s");
    }

    #[test]
    fn sub_second_units() {
        assert_eq!(format_uptime(Duration::from_nanos(42)), "42ns");
        assert_eq!(format_uptime(Duration::from_nanos(1_500)), "1.5µs");
        assert_eq!(format_uptime(Duration::from_millis(350)), "350ms");
        assert_eq!(format_uptime(Duration::from_micros(2_250)), "2.25ms");
    }

    #[test]
    fn seconds_minutes_hours() {
        assert_eq!(format_uptime(Duration::from_secs(1)), "1s");
        assert_eq!(format_uptime(Duration::from_millis(3_500)), "3.5s");
        assert_eq!(format_uptime(Duration::from_secs(120)), "2m0s");
        assert_eq!(format_uptime(Duration::from_millis(3_723_500)), "1h2m3.5s");
        assert_eq!(format_uptime(Duration::from_secs(3600)), "1h0m0s");
    }

    #[test]
    fn summary_accessors() {
        let summary = StreamSummary {
            active: true,
            uptime: Duration::from_millis(1_250),
        };
        assert!((summary.uptime_secs() - 1.25).abs() < f64::EPSILON);
        assert_eq!(summary.uptime_str(), "1.25s");
    }
}
