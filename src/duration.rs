//! Days/hours/minutes/seconds breakdown of a duration in seconds.

use serde::Serialize;
use std::fmt;

const SECONDS_PER_DAY: f64 = 86_400.0;
const SECONDS_PER_HOUR: f64 = 3_600.0;
const SECONDS_PER_MINUTE: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DurationBreakdown {
    pub total_seconds: f64,
    pub days: u64,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: f64,
}

impl DurationBreakdown {
    /// Splits `total_seconds` using floor division with carrying.
    ///
    /// Negative or NaN input is treated as zero.
    pub fn from_seconds(total_seconds: f64) -> Self {
        let total_seconds = total_seconds.max(0.0);

        let days = (total_seconds / SECONDS_PER_DAY).floor();
        let rem = total_seconds % SECONDS_PER_DAY;
        let hours = (rem / SECONDS_PER_HOUR).floor();
        let rem = rem % SECONDS_PER_HOUR;
        let minutes = (rem / SECONDS_PER_MINUTE).floor();
        let seconds = rem % SECONDS_PER_MINUTE;

        Self {
            total_seconds,
            days: days as u64,
            hours: hours as u32,
            minutes: minutes as u32,
            seconds,
        }
    }
}

impl fmt::Display for DurationBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} days, {} hours, {} minutes, and {:.2} seconds",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_of_each_unit() {
        let d = DurationBreakdown::from_seconds(90061.5);

        assert_eq!(d.days, 1);
        assert_eq!(d.hours, 1);
        assert_eq!(d.minutes, 1);
        assert!((d.seconds - 1.5).abs() < 1e-9);
        assert_eq!(
            d.to_string(),
            "1 days, 1 hours, 1 minutes, and 1.50 seconds"
        );
    }

    #[test]
    fn test_zero() {
        let d = DurationBreakdown::from_seconds(0.0);
        assert_eq!((d.days, d.hours, d.minutes), (0, 0, 0));
        assert_eq!(d.seconds, 0.0);
    }

    #[test]
    fn test_negative_clamped() {
        let d = DurationBreakdown::from_seconds(-10.0);
        assert_eq!(d.total_seconds, 0.0);
        assert_eq!(d.seconds, 0.0);
    }

    #[test]
    fn test_recomposes_within_bounds() {
        for &s in &[0.25, 59.99, 60.0, 3599.5, 3600.0, 86399.99, 86400.0, 1_234_567.891, 9_876_543.0] {
            let d = DurationBreakdown::from_seconds(s);
            let recomposed = d.days as f64 * 86_400.0
                + d.hours as f64 * 3_600.0
                + d.minutes as f64 * 60.0
                + d.seconds;

            assert!((recomposed - s).abs() < 1e-6, "{s} recomposed as {recomposed}");
            assert!(d.hours < 24);
            assert!(d.minutes < 60);
            assert!(d.seconds >= 0.0 && d.seconds < 60.0);
        }
    }
}
