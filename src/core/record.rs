//! Typed record model shared by the finance and study trackers.
//!
//! Records reach the aggregation engine already decoded: dates are calendar
//! dates, kinds are enums, and labels are non-empty strings. Drafts carry the
//! user-entered fields of a record that does not have an id yet.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::errors::{Error, Result};

/// Format used for day keys and for dates written to the store.
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Whether a finance record adds or removes money.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Money received
    Income,
    /// Money spent
    Expense,
    /// Time spent studying
    Study,
}

impl RecordKind {
    /// Stable lowercase name, also used as the stored value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Study => "study",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            "study" => Ok(Self::Study),
            other => Err(Error::InvalidRecord {
                message: format!("unknown record kind '{other}'"),
            }),
        }
    }
}

/// A household finance entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinanceRecord {
    /// Opaque unique id assigned by the store
    pub id: String,
    /// Calendar day of the entry
    pub date: NaiveDate,
    /// Income or expense
    pub kind: RecordKind,
    /// Free-form category label
    pub category: String,
    /// Whole yen
    pub amount: i64,
    /// Optional note
    pub memo: Option<String>,
}

impl FinanceRecord {
    /// Amount as it counts towards totals. Non-positive amounts contribute nothing.
    #[must_use]
    pub fn contribution(&self) -> i64 {
        self.amount.max(0)
    }

    /// True for income entries.
    #[must_use]
    pub fn is_income(&self) -> bool {
        self.kind == RecordKind::Income
    }

    /// True for expense entries.
    #[must_use]
    pub fn is_expense(&self) -> bool {
        self.kind == RecordKind::Expense
    }
}

/// A study session entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyRecord {
    /// Opaque unique id assigned by the store
    pub id: String,
    /// Calendar day of the session
    pub date: NaiveDate,
    /// Subject label from the configured vocabulary
    pub subject: String,
    /// Who studied
    pub nickname: String,
    /// Session length in minutes
    pub duration_minutes: i64,
    /// Optional note
    pub memo: Option<String>,
}

impl StudyRecord {
    /// Study records always have the `study` kind.
    #[must_use]
    pub const fn kind(&self) -> RecordKind {
        RecordKind::Study
    }

    /// Minutes as they count towards totals. Non-positive durations contribute nothing.
    #[must_use]
    pub fn contribution(&self) -> i64 {
        self.duration_minutes.max(0)
    }
}

/// Either kind of record, as decoded at the store boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "lowercase")]
pub enum Record {
    /// A finance entry
    Finance(FinanceRecord),
    /// A study session
    Study(StudyRecord),
}

impl Record {
    /// Id of the underlying record.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Finance(r) => &r.id,
            Self::Study(r) => &r.id,
        }
    }

    /// Calendar day of the underlying record.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        match self {
            Self::Finance(r) => r.date,
            Self::Study(r) => r.date,
        }
    }

    /// Kind of the underlying record.
    #[must_use]
    pub const fn kind(&self) -> RecordKind {
        match self {
            Self::Finance(r) => r.kind,
            Self::Study(r) => r.kind(),
        }
    }
}

/// Grouping key for one calendar day, rendered as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(NaiveDate);

impl DayKey {
    /// The calendar day behind this key.
    #[must_use]
    pub const fn date(self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DAY_KEY_FORMAT))
    }
}

impl FromStr for DayKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        NaiveDate::parse_from_str(s, DAY_KEY_FORMAT)
            .map(Self)
            .map_err(|e| Error::InvalidRecord {
                message: format!("invalid day key '{s}': {e}"),
            })
    }
}

impl Serialize for DayKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Reads a stored date as a local calendar date.
///
/// Accepts `YYYY-MM-DD`, a naive date-time (the time is dropped), or an
/// RFC 3339 instant, which is shifted to `offset` before taking its date.
#[must_use]
pub fn parse_record_date(raw: &str, offset: FixedOffset) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, DAY_KEY_FORMAT) {
        return Some(date);
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&offset).date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|dt| dt.date())
}

/// User-entered fields of a finance record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinanceDraft {
    /// Calendar day
    pub date: NaiveDate,
    /// Must be income or expense
    pub kind: RecordKind,
    /// Non-empty category
    pub category: String,
    /// Positive whole yen
    pub amount: i64,
    /// Optional note
    pub memo: Option<String>,
}

impl FinanceDraft {
    /// Checks the entry rules: finance kind, non-empty category, positive amount.
    pub fn validate(&self) -> Result<()> {
        if self.kind == RecordKind::Study {
            return Err(Error::InvalidRecord {
                message: "finance records must be income or expense".to_string(),
            });
        }
        if self.category.trim().is_empty() {
            return Err(Error::InvalidRecord {
                message: "category must not be empty".to_string(),
            });
        }
        if self.amount <= 0 {
            return Err(Error::InvalidRecord {
                message: format!("amount must be positive, got {}", self.amount),
            });
        }
        Ok(())
    }
}

/// User-entered fields of a study session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyDraft {
    /// Calendar day
    pub date: NaiveDate,
    /// Subject label
    pub subject: String,
    /// Non-empty author label
    pub nickname: String,
    /// Positive minutes
    pub duration_minutes: i64,
    /// Optional note
    pub memo: Option<String>,
}

impl StudyDraft {
    /// Checks the entry rules: non-empty subject and nickname, positive duration.
    pub fn validate(&self) -> Result<()> {
        if self.subject.trim().is_empty() {
            return Err(Error::InvalidRecord {
                message: "subject must not be empty".to_string(),
            });
        }
        if self.nickname.trim().is_empty() {
            return Err(Error::InvalidRecord {
                message: "nickname must not be empty".to_string(),
            });
        }
        if self.duration_minutes <= 0 {
            return Err(Error::InvalidRecord {
                message: format!(
                    "study duration must be positive, got {}",
                    self.duration_minutes
                ),
            });
        }
        Ok(())
    }
}
