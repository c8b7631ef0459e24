//! Period filtering.
//!
//! A [`Period`] turns a reference date into an inclusive [`DateRange`]. Weeks
//! start on Sunday and end on Saturday, following the Japanese calendar
//! convention used by both trackers. All membership tests compare calendar
//! dates only.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Serialize;
use std::{fmt, str::FromStr};

use crate::{
    core::record::{FinanceRecord, StudyRecord},
    errors::{Error, Result},
};

/// Report granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// The reference day only
    Day,
    /// Sunday through Saturday around the reference day
    Week,
    /// First through last day of the reference month
    Month,
}

impl Period {
    /// Inclusive date range this period covers around `reference`.
    #[must_use]
    pub fn range(self, reference: NaiveDate) -> DateRange {
        match self {
            Self::Day => DateRange {
                start: reference,
                end: reference,
            },
            Self::Week => week_range(reference),
            Self::Month => month_range(reference),
        }
    }

    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            _ => Err(Error::UnsupportedPeriod {
                value: s.to_string(),
            }),
        }
    }
}

/// Inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    /// First day, inclusive
    pub start: NaiveDate,
    /// Last day, inclusive
    pub end: NaiveDate,
}

impl DateRange {
    /// True when `date` lies within `start..=end`.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Every date of the range in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |d| *d <= self.end)
    }
}

/// Sunday on or before `reference` through the following Saturday.
#[must_use]
pub fn week_range(reference: NaiveDate) -> DateRange {
    let back = u64::from(reference.weekday().num_days_from_sunday());
    let start = reference
        .checked_sub_days(Days::new(back))
        .unwrap_or(NaiveDate::MIN);
    let end = start.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX);
    DateRange { start, end }
}

/// First through last day of the month containing `reference`.
#[must_use]
pub fn month_range(reference: NaiveDate) -> DateRange {
    let start = reference.with_day(1).unwrap_or(reference);
    let end = start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX);
    DateRange { start, end }
}

/// Finance records whose date falls within `period` around `reference`.
#[must_use]
pub fn filter_finance(
    records: &[FinanceRecord],
    period: Period,
    reference: NaiveDate,
) -> Vec<&FinanceRecord> {
    let range = period.range(reference);
    records.iter().filter(|r| range.contains(r.date)).collect()
}

/// Study records whose date falls within `period` around `reference`.
#[must_use]
pub fn filter_study(
    records: &[StudyRecord],
    period: Period,
    reference: NaiveDate,
) -> Vec<&StudyRecord> {
    let range = period.range(reference);
    records.iter().filter(|r| range.contains(r.date)).collect()
}
