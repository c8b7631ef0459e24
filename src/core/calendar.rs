//! Calendar and daily detail views.
//!
//! The calendar shows whole weeks: from the Sunday on or before the first of
//! the month to the Saturday on or after its last day. "Today" and the
//! selected date are passed in by the caller.

use chrono::NaiveDate;
use serde::Serialize;

use crate::core::{
    bucket::{
        FinanceDaySummary, StudyDaySummary, bucket_finance_by_day, bucket_study_by_day,
        finance_on_day, study_on_day,
    },
    period::{Period, week_range},
    record::{DayKey, FinanceRecord, StudyRecord},
};

/// One cell of the month grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarCell<S> {
    /// Day shown in this cell
    pub date: NaiveDate,
    /// Day key of `date`
    pub key: DayKey,
    /// False for leading and trailing days from neighbouring months
    pub in_month: bool,
    /// Cell is the caller's current date
    pub is_today: bool,
    /// Cell is the caller's selected date
    pub is_selected: bool,
    /// Aggregate for this day, if any records exist
    pub summary: Option<S>,
}

/// Month totals shown on the summary cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MonthSummary {
    /// Income in the month
    pub income: i64,
    /// Expense in the month
    pub expense: i64,
    /// Income minus expense
    pub balance: i64,
}

/// Dates of the grid for the month containing `month`, in display order.
#[must_use]
pub fn grid_dates(month: NaiveDate) -> Vec<NaiveDate> {
    let month_range = Period::Month.range(month);
    let start = week_range(month_range.start).start;
    let end = week_range(month_range.end).end;
    start.iter_days().take_while(|d| *d <= end).collect()
}

/// Empty grid cells for the month containing `month`.
#[must_use]
pub fn calendar_grid<S>(
    month: NaiveDate,
    today: NaiveDate,
    selected: Option<NaiveDate>,
) -> Vec<CalendarCell<S>> {
    let range = Period::Month.range(month);
    grid_dates(month)
        .into_iter()
        .map(|date| CalendarCell {
            date,
            key: DayKey::from(date),
            in_month: range.contains(date),
            is_today: date == today,
            is_selected: selected == Some(date),
            summary: None,
        })
        .collect()
}

/// Month grid with a finance summary on every day that has records.
#[must_use]
pub fn finance_calendar(
    records: &[FinanceRecord],
    month: NaiveDate,
    today: NaiveDate,
    selected: Option<NaiveDate>,
) -> Vec<CalendarCell<FinanceDaySummary>> {
    let mut days = bucket_finance_by_day(records);
    let mut cells = calendar_grid(month, today, selected);
    for cell in &mut cells {
        cell.summary = days.remove(&cell.key);
    }
    cells
}

/// Month grid with a study summary on every day that has sessions.
#[must_use]
pub fn study_calendar(
    records: &[StudyRecord],
    month: NaiveDate,
    today: NaiveDate,
    selected: Option<NaiveDate>,
) -> Vec<CalendarCell<StudyDaySummary>> {
    let mut days = bucket_study_by_day(records);
    let mut cells = calendar_grid(month, today, selected);
    for cell in &mut cells {
        cell.summary = days.remove(&cell.key);
    }
    cells
}

/// Income, expense and balance for the month containing `month`.
#[must_use]
pub fn month_summary(records: &[FinanceRecord], month: NaiveDate) -> MonthSummary {
    let range = Period::Month.range(month);
    let mut total = FinanceDaySummary::default();
    for record in records.iter().filter(|r| range.contains(r.date)) {
        total.add(record);
    }
    MonthSummary {
        income: total.income_total,
        expense: total.expense_total,
        balance: total.balance(),
    }
}

/// Total study minutes in the month containing `month`.
#[must_use]
pub fn study_month_total(records: &[StudyRecord], month: NaiveDate) -> i64 {
    let range = Period::Month.range(month);
    records
        .iter()
        .filter(|r| range.contains(r.date))
        .map(StudyRecord::contribution)
        .fold(0, i64::saturating_add)
}

/// Records and totals of one finance day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinanceDailyDetail<'a> {
    /// The day shown
    pub date: NaiveDate,
    /// Records of the day in snapshot order
    pub records: Vec<&'a FinanceRecord>,
    /// Day totals
    pub summary: FinanceDaySummary,
}

/// Records and totals of one study day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudyDailyDetail<'a> {
    /// The day shown
    pub date: NaiveDate,
    /// Sessions of the day in snapshot order
    pub sessions: Vec<&'a StudyRecord>,
    /// Sum of the day's minutes
    pub total_minutes: i64,
}

/// Detail panel contents for a finance day.
#[must_use]
pub fn finance_daily_detail(records: &[FinanceRecord], date: NaiveDate) -> FinanceDailyDetail<'_> {
    let day_records = finance_on_day(records, date);
    let mut summary = FinanceDaySummary::default();
    for record in &day_records {
        summary.add(record);
    }
    FinanceDailyDetail {
        date,
        records: day_records,
        summary,
    }
}

/// Detail panel contents for a study day.
#[must_use]
pub fn study_daily_detail(records: &[StudyRecord], date: NaiveDate) -> StudyDailyDetail<'_> {
    let sessions = study_on_day(records, date);
    let total_minutes = sessions
        .iter()
        .map(|s| s.contribution())
        .fold(0, i64::saturating_add);
    StudyDailyDetail {
        date,
        sessions,
        total_minutes,
    }
}
