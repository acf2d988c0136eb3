//! Period boundaries and completion ratios.

use chrono::{Datelike, Days, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;
use timebar_core::{LocalTime, Period, ProgressRatio, TimeWindow, UtcOffset};

use crate::{ProgressError, Result};

/// Current instant resolved in `offset`.
pub fn now_in(offset: UtcOffset) -> LocalTime {
    Utc::now().with_timezone(&offset.fixed_offset())
}

/// Boundaries of the `period` containing `now`, in `now`'s offset.
///
/// Windows run from 00:00:00 on the first day to 23:59:59 on the last;
/// weeks start on Monday.
pub fn window_for(period: Period, now: LocalTime) -> Result<TimeWindow> {
    let tz = *now.offset();
    let today = now.date_naive();

    let (first, last) = match period {
        Period::Year => (
            date(today.year(), 1, 1)?,
            date(today.year(), 12, 31)?,
        ),
        Period::Month => (
            date(today.year(), today.month(), 1)?,
            date(today.year(), today.month(), days_in_month(today.year(), today.month())?)?,
        ),
        Period::Week => {
            let index = u64::from(today.weekday().num_days_from_monday());
            let first = today
                .checked_sub_days(Days::new(index))
                .ok_or_else(|| calendar(format!("week start before {}", today)))?;
            let last = today
                .checked_add_days(Days::new(6 - index))
                .ok_or_else(|| calendar(format!("week end after {}", today)))?;
            (first, last)
        }
    };

    let start = local(&tz, first, NaiveTime::MIN)?;
    let end = local(&tz, last, end_of_day()?)?;

    TimeWindow::new(start, end)
        .ok_or_else(|| calendar(format!("empty {} window at {}", period.label(), now)))
}

/// Elapsed share of `window` at `now`, clamped to `[0, 1]`.
pub fn compute_ratio(window: &TimeWindow, now: LocalTime) -> ProgressRatio {
    let total = (window.end() - window.start()).num_milliseconds() as f64;
    let elapsed = (now - window.start()).num_milliseconds() as f64;
    ProgressRatio::new(elapsed / total)
}

/// Number of days in `month` of `year`.
pub fn days_in_month(year: i32, month: u32) -> Result<u32> {
    let first = date(year, month, 1)?;
    let next = if month == 12 {
        date(year + 1, 1, 1)?
    } else {
        date(year, month + 1, 1)?
    };
    Ok((next - first).num_days() as u32)
}

/// Year, month and week progress taken from one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressSnapshot {
    /// Instant the ratios were computed at
    pub now: LocalTime,

    /// Share of the year elapsed
    pub year: ProgressRatio,

    /// Share of the month elapsed
    pub month: ProgressRatio,

    /// Share of the week elapsed
    pub week: ProgressRatio,
}

impl ProgressSnapshot {
    /// Compute all three ratios for `now`.
    pub fn take(now: LocalTime) -> Result<Self> {
        Ok(Self {
            now,
            year: compute_ratio(&window_for(Period::Year, now)?, now),
            month: compute_ratio(&window_for(Period::Month, now)?, now),
            week: compute_ratio(&window_for(Period::Week, now)?, now),
        })
    }

    /// Snapshot of the current instant in `offset`.
    pub fn current(offset: UtcOffset) -> Result<Self> {
        Self::take(now_in(offset))
    }

    /// Ratio for `period`.
    pub fn ratio(&self, period: Period) -> ProgressRatio {
        match period {
            Period::Year => self.year,
            Period::Month => self.month,
            Period::Week => self.week,
        }
    }
}

fn date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| calendar(format!("invalid date {}-{:02}-{:02}", year, month, day)))
}

fn end_of_day() -> Result<NaiveTime> {
    NaiveTime::from_hms_opt(23, 59, 59).ok_or_else(|| calendar("invalid time 23:59:59".to_string()))
}

fn local(tz: &FixedOffset, date: NaiveDate, time: NaiveTime) -> Result<LocalTime> {
    tz.from_local_datetime(&date.and_time(time))
        .single()
        .ok_or_else(|| calendar(format!("{} {} does not exist in {}", date, time, tz)))
}

fn calendar(message: String) -> ProgressError {
    ProgressError::Calendar(message)
}
