//! Report generation business logic.
//!
//! This module assembles the report view: it filters a snapshot to the chosen
//! period and rolls the matching records up into chart series. It also holds
//! the display formatting used for yen amounts and study durations. Reports
//! are recomputed from the full snapshot whenever the reference date or the
//! period changes.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::core::{
    period::{DateRange, Period, filter_finance, filter_study},
    record::{FinanceRecord, StudyRecord},
    rollup::{
        BarDatum, PieSlice, bar_series, expense_pie, finance_totals_bar, income_pie,
        minutes_by_nickname, minutes_by_subject, pie_series,
    },
};

/// Finance report for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinanceReport {
    /// Granularity the report was built for
    pub period: Period,
    /// Inclusive dates covered
    pub range: DateRange,
    /// Income and expense bars, always both present
    pub totals_bar: Vec<BarDatum>,
    /// Expense breakdown by category
    pub expense_pie: Vec<PieSlice>,
    /// Income breakdown by category
    pub income_pie: Vec<PieSlice>,
}

impl FinanceReport {
    /// Income minus expense over the period.
    #[must_use]
    pub fn balance(&self) -> i64 {
        let value = |label: &str| {
            self.totals_bar
                .iter()
                .find(|d| d.label == label)
                .map_or(0, |d| d.value)
        };
        value(crate::core::rollup::INCOME_LABEL)
            .saturating_sub(value(crate::core::rollup::EXPENSE_LABEL))
    }
}

/// Study report for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudyReport {
    /// Granularity the report was built for
    pub period: Period,
    /// Inclusive dates covered
    pub range: DateRange,
    /// Sum of all minutes in the period
    pub total_minutes: i64,
    /// Minutes per nickname as bars
    pub nickname_bar: Vec<BarDatum>,
    /// Minutes per nickname as pie slices
    pub nickname_pie: Vec<PieSlice>,
    /// Minutes per subject as pie slices
    pub subject_pie: Vec<PieSlice>,
}

impl StudyReport {
    /// True when every bar is zero, which the chart shows as "no data".
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nickname_bar.iter().all(|d| d.value == 0)
    }
}

/// Builds the finance report for `period` around `reference`.
#[must_use]
pub fn finance_report(
    records: &[FinanceRecord],
    period: Period,
    reference: NaiveDate,
) -> FinanceReport {
    let selected = filter_finance(records, period, reference);
    debug!(
        %period,
        %reference,
        matched = selected.len(),
        total = records.len(),
        "building finance report"
    );

    FinanceReport {
        period,
        range: period.range(reference),
        totals_bar: finance_totals_bar(selected.iter().copied()),
        expense_pie: expense_pie(selected.iter().copied()),
        income_pie: income_pie(selected.iter().copied()),
    }
}

/// Builds the study report for `period` around `reference`.
#[must_use]
pub fn study_report(records: &[StudyRecord], period: Period, reference: NaiveDate) -> StudyReport {
    let selected = filter_study(records, period, reference);
    debug!(
        %period,
        %reference,
        matched = selected.len(),
        total = records.len(),
        "building study report"
    );

    let by_nickname = minutes_by_nickname(selected.iter().copied());
    StudyReport {
        period,
        range: period.range(reference),
        total_minutes: selected
            .iter()
            .map(|r| r.contribution())
            .fold(0, i64::saturating_add),
        nickname_bar: bar_series(by_nickname.clone()),
        nickname_pie: pie_series(by_nickname),
        subject_pie: pie_series(minutes_by_subject(selected.iter().copied())),
    }
}

/// Formats whole yen with thousands separators, e.g. `¥1,234` or `-¥500`.
#[must_use]
pub fn format_yen(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        format!("-¥{grouped}")
    } else {
        format!("¥{grouped}")
    }
}

/// Formats minutes for detail panels and reports, e.g. `1時間30分` or `45分`.
#[must_use]
pub fn format_minutes(minutes: i64) -> String {
    let minutes = minutes.max(0);
    let (hours, mins) = (minutes / 60, minutes % 60);
    if hours > 0 {
        format!("{hours}時間{mins}分")
    } else {
        format!("{mins}分")
    }
}

/// Short form for calendar cells, e.g. `1h30m` or `45m`.
#[must_use]
pub fn format_minutes_compact(minutes: i64) -> String {
    if minutes <= 0 {
        return "0分".to_string();
    }
    let (hours, mins) = (minutes / 60, minutes % 60);
    if hours > 0 {
        format!("{hours}h{mins}m")
    } else {
        format!("{mins}m")
    }
}
