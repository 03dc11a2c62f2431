//! Message-activity histograms.
//!
//! Every timestamp is bucketed in UTC. Strings with an explicit offset are
//! converted to UTC first; strings without one (the export's default
//! `2023-01-15T14:30:00` form) are read as UTC wall-clock time. Weeks start on
//! Sunday and are keyed by that Sunday's date.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, Utc};
use std::collections::BTreeMap;
use tracing::trace;

use crate::models::{ActivityBucket, MessageActivity};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Parse a message timestamp into a UTC instant.
///
/// Returns `None` for anything unparseable; callers drop such messages.
#[must_use]
pub fn parse_message_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    DateTime::parse_from_rfc2822(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// The Sunday on or before `date`
#[must_use]
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_sunday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// First day of the month containing `date`
#[must_use]
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// `YYYY-MM-DD`
#[must_use]
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Zero-padded `YYYY-MM`
#[must_use]
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Accumulates daily, weekly and monthly message counters
#[derive(Debug, Default)]
pub struct ActivityAggregator {
    daily: BTreeMap<NaiveDate, usize>,
    weekly: BTreeMap<NaiveDate, usize>,
    monthly: BTreeMap<NaiveDate, usize>,
    counted: usize,
    skipped: usize,
}

impl ActivityAggregator {
    /// Create an empty aggregator
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one message by its raw `date` field.
    ///
    /// Missing, empty or unparseable dates are skipped; returns whether the message was counted.
    pub fn record(&mut self, raw_date: Option<&str>) -> bool {
        match raw_date.and_then(parse_message_date) {
            Some(at) => {
                self.record_instant(at);
                true
            }
            None => {
                trace!(date = ?raw_date, "Skipping message without a usable date");
                self.skipped += 1;
                false
            }
        }
    }

    /// Count one message at a known instant
    pub fn record_instant(&mut self, at: DateTime<Utc>) {
        let date = at.date_naive();
        *self.daily.entry(date).or_insert(0) += 1;
        *self.weekly.entry(week_start(date)).or_insert(0) += 1;
        *self.monthly.entry(month_start(date)).or_insert(0) += 1;
        self.counted += 1;
    }

    /// Messages that landed in the buckets so far
    #[must_use]
    pub const fn counted(&self) -> usize {
        self.counted
    }

    /// Messages dropped for lack of a usable date
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.skipped
    }

    /// Convert the counters into ascending bucket lists
    #[must_use]
    pub fn finish(self) -> MessageActivity {
        MessageActivity {
            daily: to_buckets(self.daily, day_key),
            weekly: to_buckets(self.weekly, day_key),
            monthly: to_buckets(self.monthly, month_key),
        }
    }
}

fn to_buckets(counts: BTreeMap<NaiveDate, usize>, key: fn(NaiveDate) -> String) -> Vec<ActivityBucket> {
    counts
        .into_iter()
        .map(|(date, message_count)| ActivityBucket {
            date: key(date),
            message_count,
        })
        .collect()
}
