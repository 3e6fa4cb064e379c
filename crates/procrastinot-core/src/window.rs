//! Shared time-window membership utilities.
//!
//! Every windowed aggregate in this crate ("today", "this week", the feed's
//! 24-hour recency filter) is a membership test against a half-open interval
//! `[start, end)` in the user's local timezone. Record timestamps are stored
//! as UTC and converted at comparison time.
//!
//! `now` is always passed in by the caller; nothing in this module reads the
//! system clock.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Today,
    Week,
    Month,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Today => "today",
            Timeframe::Week => "week",
            Timeframe::Month => "month",
        }
    }
}

/// Half-open local-time interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Local>,
    end: DateTime<Local>,
}

impl TimeWindow {
    /// `[local midnight of now's day, now)`.
    pub fn today(now: DateTime<Local>) -> Self {
        Self {
            start: local_midnight(now.date_naive(), now),
            end: now,
        }
    }

    /// `[now - days, now)`.
    pub fn last_days(now: DateTime<Local>, days: i64) -> Self {
        Self {
            start: now - Duration::days(days),
            end: now,
        }
    }

    /// `[now - hours, now)`.
    pub fn last_hours(now: DateTime<Local>, hours: i64) -> Self {
        Self {
            start: now - Duration::hours(hours),
            end: now,
        }
    }

    /// Window for a named timeframe: today, the trailing 7 days, or the
    /// current calendar month.
    pub fn timeframe(now: DateTime<Local>, timeframe: Timeframe) -> Self {
        match timeframe {
            Timeframe::Today => Self::today(now),
            Timeframe::Week => Self::last_days(now, 7),
            Timeframe::Month => {
                let first = now
                    .date_naive()
                    .with_day(1)
                    .unwrap_or_else(|| now.date_naive());
                Self {
                    start: local_midnight(first, now),
                    end: now,
                }
            }
        }
    }

    /// Membership test for a UTC record timestamp.
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        let local = ts.with_timezone(&Local);
        (self.start..self.end).contains(&local)
    }

    /// Membership test that treats an absent timestamp as out-of-window.
    pub fn contains_opt(&self, ts: Option<DateTime<Utc>>) -> bool {
        ts.is_some_and(|ts| self.contains(ts))
    }
}

/// Local calendar day a UTC timestamp falls on. Day-key granularity for the
/// streak walk and the daily rollup.
pub fn local_day(ts: DateTime<Utc>) -> NaiveDate {
    ts.with_timezone(&Local).date_naive()
}

/// Start-of-day instant for a local calendar day. A DST transition can make
/// local midnight ambiguous or nonexistent; the earliest valid instant of
/// the day is used in that case.
fn local_midnight(date: NaiveDate, fallback: DateTime<Local>) -> DateTime<Local> {
    Local
        .from_local_datetime(&date.and_time(NaiveTime::MIN))
        .earliest()
        .unwrap_or(fallback)
}
