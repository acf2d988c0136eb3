//! Time windows and completion ratios.

use serde::{Deserialize, Serialize};

use crate::LocalTime;

/// A calendar period a bar is drawn for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    /// Current calendar year
    Year,
    /// Current calendar month
    Month,
    /// Current Monday-start week
    Week,
}

impl Period {
    /// All periods, in report order.
    pub const ALL: [Period; 3] = [Period::Year, Period::Month, Period::Week];

    /// Human label used in the report.
    pub fn label(self) -> &'static str {
        match self {
            Period::Year => "Year",
            Period::Month => "Month",
            Period::Week => "Week",
        }
    }
}

/// Boundaries of a period, both in the configured offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    start: LocalTime,
    end: LocalTime,
}

impl TimeWindow {
    /// Create a window; `None` unless `start < end`.
    pub fn new(start: LocalTime, end: LocalTime) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    /// First instant of the window.
    pub fn start(&self) -> LocalTime {
        self.start
    }

    /// Last instant of the window.
    pub fn end(&self) -> LocalTime {
        self.end
    }
}

/// Elapsed share of a window, clamped to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct ProgressRatio(f64);

impl ProgressRatio {
    /// Nothing elapsed.
    pub const ZERO: Self = Self(0.0);

    /// Window complete.
    pub const ONE: Self = Self(1.0);

    /// Create a ratio, clamping into `[0, 1]`. NaN becomes zero.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Ratio in `[0, 1]`.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Ratio as a percentage in `[0, 100]`.
    pub fn percent(self) -> f64 {
        self.0 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    #[test]
    fn test_ratio_clamps() {
        assert_eq!(ProgressRatio::new(-0.2).value(), 0.0);
        assert_eq!(ProgressRatio::new(1.0001).value(), 1.0);
        assert_eq!(ProgressRatio::new(f64::NAN).value(), 0.0);
        assert_eq!(ProgressRatio::new(0.25).percent(), 25.0);
    }

    #[test]
    fn test_window_requires_order() {
        let tz = FixedOffset::east_opt(0).unwrap();
        let a = tz.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let b = tz.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();

        let window = TimeWindow::new(a, b).unwrap();
        assert_eq!(window.start(), a);
        assert_eq!(window.end(), b);
        assert!(TimeWindow::new(b, a).is_none());
        assert!(TimeWindow::new(a, a).is_none());
    }

    #[test]
    fn test_period_labels() {
        let labels: Vec<_> = Period::ALL.iter().map(|p| p.label()).collect();
        assert_eq!(labels, vec!["Year", "Month", "Week"]);
    }
}
