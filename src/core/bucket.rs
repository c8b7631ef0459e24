//! Day-bucketing.
//!
//! Groups records by calendar day for the calendar view. Each finance day
//! keeps income and expense totals; each study day keeps the total minutes
//! and every session in insertion order so the display layer can choose how
//! many to preview.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::core::record::{DayKey, FinanceRecord, RecordKind, StudyRecord};

/// Finance totals for one calendar day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FinanceDaySummary {
    /// Sum of income amounts
    pub income_total: i64,
    /// Sum of expense amounts
    pub expense_total: i64,
}

impl FinanceDaySummary {
    /// Income minus expense.
    #[must_use]
    pub const fn balance(&self) -> i64 {
        self.income_total.saturating_sub(self.expense_total)
    }

    /// Adds one record's contribution to the matching total.
    pub fn add(&mut self, record: &FinanceRecord) {
        match record.kind {
            RecordKind::Income => {
                self.income_total = self.income_total.saturating_add(record.contribution());
            }
            RecordKind::Expense => {
                self.expense_total = self.expense_total.saturating_add(record.contribution());
            }
            RecordKind::Study => {}
        }
    }
}

/// Study totals and sessions for one calendar day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StudyDaySummary {
    /// Sum of session minutes
    pub total_minutes: i64,
    /// Every session of the day in insertion order
    pub sessions: Vec<StudyRecord>,
}

impl StudyDaySummary {
    /// Adds one session to the day.
    pub fn add(&mut self, record: &StudyRecord) {
        self.total_minutes = self.total_minutes.saturating_add(record.contribution());
        self.sessions.push(record.clone());
    }

    /// Number of sessions recorded on this day.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// The first `limit` sessions and how many more were left out.
    #[must_use]
    pub fn preview(&self, limit: usize) -> (&[StudyRecord], usize) {
        let shown = limit.min(self.sessions.len());
        (&self.sessions[..shown], self.sessions.len() - shown)
    }
}

/// Groups finance records by day. Study-kind entries are skipped.
#[must_use]
pub fn bucket_finance_by_day<'a, I>(records: I) -> BTreeMap<DayKey, FinanceDaySummary>
where
    I: IntoIterator<Item = &'a FinanceRecord>,
{
    let mut days: BTreeMap<DayKey, FinanceDaySummary> = BTreeMap::new();
    let mut skipped = 0usize;
    for record in records {
        if record.kind == RecordKind::Study {
            skipped += 1;
            continue;
        }
        days.entry(DayKey::from(record.date))
            .or_default()
            .add(record);
    }
    if skipped > 0 {
        debug!(skipped, "ignored finance records with a non-finance kind");
    }
    days
}

/// Groups study sessions by day, keeping insertion order within each day.
#[must_use]
pub fn bucket_study_by_day<'a, I>(records: I) -> BTreeMap<DayKey, StudyDaySummary>
where
    I: IntoIterator<Item = &'a StudyRecord>,
{
    let mut days: BTreeMap<DayKey, StudyDaySummary> = BTreeMap::new();
    for record in records {
        days.entry(DayKey::from(record.date))
            .or_default()
            .add(record);
    }
    days
}

/// Finance records dated `date`, in input order.
#[must_use]
pub fn finance_on_day(records: &[FinanceRecord], date: NaiveDate) -> Vec<&FinanceRecord> {
    records.iter().filter(|r| r.date == date).collect()
}

/// Study sessions dated `date`, in input order.
#[must_use]
pub fn study_on_day(records: &[StudyRecord], date: NaiveDate) -> Vec<&StudyRecord> {
    records.iter().filter(|r| r.date == date).collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_bucket_finance_scenario() {
        let records = vec![
            expense(day(2024, 6, 1), "食費", 1000),
            income(day(2024, 6, 1), "給与", 5000),
        ];
        let days = bucket_finance_by_day(&records);

        assert_eq!(days.len(), 1);
        let key: DayKey = "2024-06-01".parse().expect("valid day key");
        let summary = days[&key];
        assert_eq!(summary.income_total, 5000);
        assert_eq!(summary.expense_total, 1000);
        assert_eq!(summary.balance(), 4000);
    }

    #[test]
    fn test_bucket_finance_order_irrelevant() {
        let mut records = vec![
            income(day(2024, 6, 3), "給与", 300),
            expense(day(2024, 6, 1), "食費", 100),
            expense(day(2024, 6, 3), "交通費", 50),
        ];
        let forward = bucket_finance_by_day(&records);
        records.reverse();
        let backward = bucket_finance_by_day(&records);
        assert_eq!(forward, backward);

        let keys: Vec<String> = forward.keys().map(ToString::to_string).collect();
        assert_eq!(keys, ["2024-06-01", "2024-06-03"]);
    }

    #[test]
    fn test_bucket_finance_tolerates_bad_values() {
        let mut negative = expense(day(2024, 6, 1), "食費", 1000);
        negative.amount = -300;
        let mut wrong_kind = income(day(2024, 6, 1), "給与", 100);
        wrong_kind.kind = RecordKind::Study;
        let records = vec![negative, wrong_kind, income(day(2024, 6, 1), "給与", 200)];

        let days = bucket_finance_by_day(&records);
        let summary = days[&DayKey::from(day(2024, 6, 1))];
        assert_eq!(summary.income_total, 200);
        assert_eq!(summary.expense_total, 0);
    }

    #[test]
    fn test_bucket_totals_saturate_on_huge_values() {
        let records = vec![
            income(day(2024, 6, 1), "給与", i64::MAX),
            income(day(2024, 6, 1), "副業", 1),
            expense(day(2024, 6, 1), "食費", i64::MAX),
            expense(day(2024, 6, 1), "娯楽", 1),
        ];
        let summary = bucket_finance_by_day(&records)[&DayKey::from(day(2024, 6, 1))];
        assert_eq!(summary.income_total, i64::MAX);
        assert_eq!(summary.expense_total, i64::MAX);
        assert_eq!(summary.balance(), 0);

        let sessions = vec![
            session(day(2024, 6, 1), "数学", "taro", i64::MAX),
            session(day(2024, 6, 1), "英語", "taro", 30),
        ];
        let study = bucket_study_by_day(&sessions);
        assert_eq!(study[&DayKey::from(day(2024, 6, 1))].total_minutes, i64::MAX);
    }

    #[test]
    fn test_bucket_study_keeps_sessions_in_order() {
        let records = vec![
            session(day(2024, 6, 1), "数学", "taro", 30),
            session(day(2024, 6, 1), "英語", "hanako", 45),
            session(day(2024, 6, 2), "国語", "taro", 20),
            session(day(2024, 6, 1), "理科", "jiro", 15),
        ];
        let days = bucket_study_by_day(&records);

        let first = &days[&DayKey::from(day(2024, 6, 1))];
        assert_eq!(first.total_minutes, 90);
        assert_eq!(first.session_count(), 3);
        let nicknames: Vec<&str> = first.sessions.iter().map(|s| s.nickname.as_str()).collect();
        assert_eq!(nicknames, ["taro", "hanako", "jiro"]);

        let (shown, rest) = first.preview(2);
        assert_eq!(shown.len(), 2);
        assert_eq!(rest, 1);

        let (all, none) = first.preview(10);
        assert_eq!(all.len(), 3);
        assert_eq!(none, 0);
    }

    #[test]
    fn test_bucket_empty_input() {
        assert!(bucket_finance_by_day(&Vec::<FinanceRecord>::new()).is_empty());
        assert!(bucket_study_by_day(&Vec::<StudyRecord>::new()).is_empty());
    }

    #[test]
    fn test_bucketing_is_idempotent() {
        let records = vec![
            session(day(2024, 6, 1), "数学", "taro", 30),
            session(day(2024, 6, 4), "英語", "hanako", 45),
        ];
        assert_eq!(bucket_study_by_day(&records), bucket_study_by_day(&records));
    }

    #[test]
    fn test_records_on_day() {
        let records = vec![
            expense(day(2024, 6, 1), "食費", 1000),
            expense(day(2024, 6, 2), "食費", 700),
        ];
        assert_eq!(finance_on_day(&records, day(2024, 6, 2)).len(), 1);
        assert!(study_on_day(&[], day(2024, 6, 2)).is_empty());
    }
}
