//! Rollup by label.
//!
//! Sums a numeric field grouped by a string label. Labels keep the order in
//! which they were first seen; the result is never sorted. The same totals
//! are exposed in two shapes: bar data (`label`/`value`) and pie slices
//! (`name`/`value`).

use serde::Serialize;
use std::collections::HashMap;

use crate::core::record::{FinanceRecord, RecordKind, StudyRecord};

/// Label used for the income bucket of the finance totals bar.
pub const INCOME_LABEL: &str = "income";
/// Label used for the expense bucket of the finance totals bar.
pub const EXPENSE_LABEL: &str = "expense";

/// Summed value for one label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelTotal {
    /// Grouping label
    pub label: String,
    /// Sum of the values carrying this label
    pub value: i64,
}

/// One bar of a bar chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarDatum {
    /// Axis label
    pub label: String,
    /// Bar height
    pub value: i64,
}

/// One slice of a pie chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieSlice {
    /// Slice name
    pub name: String,
    /// Slice size
    pub value: i64,
}

impl From<LabelTotal> for BarDatum {
    fn from(total: LabelTotal) -> Self {
        Self {
            label: total.label,
            value: total.value,
        }
    }
}

impl From<LabelTotal> for PieSlice {
    fn from(total: LabelTotal) -> Self {
        Self {
            name: total.label,
            value: total.value,
        }
    }
}

/// Groups `records` by `label` and sums `value`, in first-seen label order.
///
/// Non-positive values count as zero so a single bad entry cannot make a
/// total shrink. Sums saturate at `i64::MAX`.
#[must_use]
pub fn rollup_by_label<'a, T, I, L, V>(records: I, label: L, value: V) -> Vec<LabelTotal>
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
    L: Fn(&T) -> &str,
    V: Fn(&T) -> i64,
{
    let mut totals: Vec<LabelTotal> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let key = label(record);
        let amount = value(record).max(0);
        if let Some(&i) = index.get(key) {
            totals[i].value = totals[i].value.saturating_add(amount);
        } else {
            index.insert(key.to_string(), totals.len());
            totals.push(LabelTotal {
                label: key.to_string(),
                value: amount,
            });
        }
    }

    totals
}

/// Bar-chart shape of a rollup.
#[must_use]
pub fn bar_series(totals: Vec<LabelTotal>) -> Vec<BarDatum> {
    totals.into_iter().map(BarDatum::from).collect()
}

/// Pie-chart shape of a rollup.
#[must_use]
pub fn pie_series(totals: Vec<LabelTotal>) -> Vec<PieSlice> {
    totals.into_iter().map(PieSlice::from).collect()
}

/// Income and expense totals as two bars, always both present.
#[must_use]
pub fn finance_totals_bar<'a, I>(records: I) -> Vec<BarDatum>
where
    I: IntoIterator<Item = &'a FinanceRecord>,
{
    let (mut income, mut expense) = (0i64, 0i64);
    for record in records {
        match record.kind {
            RecordKind::Income => income = income.saturating_add(record.contribution()),
            RecordKind::Expense => expense = expense.saturating_add(record.contribution()),
            RecordKind::Study => {}
        }
    }
    vec![
        BarDatum {
            label: INCOME_LABEL.to_string(),
            value: income,
        },
        BarDatum {
            label: EXPENSE_LABEL.to_string(),
            value: expense,
        },
    ]
}

fn category_pie<'a, I>(records: I, kind: RecordKind) -> Vec<PieSlice>
where
    I: IntoIterator<Item = &'a FinanceRecord>,
{
    pie_series(rollup_by_label(
        records.into_iter().filter(|r| r.kind == kind),
        |r: &FinanceRecord| r.category.as_str(),
        |r: &FinanceRecord| r.amount,
    ))
}

/// Expense amounts per category.
#[must_use]
pub fn expense_pie<'a, I>(records: I) -> Vec<PieSlice>
where
    I: IntoIterator<Item = &'a FinanceRecord>,
{
    category_pie(records, RecordKind::Expense)
}

/// Income amounts per category.
#[must_use]
pub fn income_pie<'a, I>(records: I) -> Vec<PieSlice>
where
    I: IntoIterator<Item = &'a FinanceRecord>,
{
    category_pie(records, RecordKind::Income)
}

/// Study minutes per nickname.
#[must_use]
pub fn minutes_by_nickname<'a, I>(records: I) -> Vec<LabelTotal>
where
    I: IntoIterator<Item = &'a StudyRecord>,
{
    rollup_by_label(
        records,
        |r: &StudyRecord| r.nickname.as_str(),
        |r: &StudyRecord| r.duration_minutes,
    )
}

/// Study minutes per subject.
#[must_use]
pub fn minutes_by_subject<'a, I>(records: I) -> Vec<LabelTotal>
where
    I: IntoIterator<Item = &'a StudyRecord>,
{
    rollup_by_label(
        records,
        |r: &StudyRecord| r.subject.as_str(),
        |r: &StudyRecord| r.duration_minutes,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_rollup_keeps_first_seen_order() {
        let records = vec![
            session(day(2024, 6, 1), "数学", "A", 10),
            session(day(2024, 6, 1), "数学", "B", 20),
            session(day(2024, 6, 2), "数学", "A", 5),
            session(day(2024, 6, 3), "数学", "C", 1),
        ];
        let totals = minutes_by_nickname(&records);
        let labels: Vec<&str> = totals.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, ["A", "B", "C"]);
        assert_eq!(totals[0].value, 15);
    }

    #[test]
    fn test_bar_and_pie_share_values() {
        let records = vec![
            session(day(2024, 6, 1), "数学", "taro", 30),
            session(day(2024, 6, 1), "英語", "hanako", 40),
        ];
        let bar = bar_series(minutes_by_nickname(&records));
        let pie = pie_series(minutes_by_nickname(&records));
        assert_eq!(bar.len(), pie.len());
        for (b, p) in bar.iter().zip(&pie) {
            assert_eq!(b.label, p.name);
            assert_eq!(b.value, p.value);
        }
    }

    #[test]
    fn test_finance_totals_bar_always_has_two_buckets() {
        let bar = finance_totals_bar(&Vec::<FinanceRecord>::new());
        assert_eq!(
            bar,
            vec![
                BarDatum {
                    label: "income".to_string(),
                    value: 0
                },
                BarDatum {
                    label: "expense".to_string(),
                    value: 0
                },
            ]
        );
        assert!(expense_pie(&Vec::<FinanceRecord>::new()).is_empty());
    }

    #[test]
    fn test_finance_scenario_rollups() {
        let records = vec![
            expense(day(2024, 6, 1), "食費", 1000),
            income(day(2024, 6, 1), "給与", 5000),
        ];
        let bar = finance_totals_bar(&records);
        assert_eq!(bar[0].value, 5000);
        assert_eq!(bar[1].value, 1000);

        let pie = expense_pie(&records);
        assert_eq!(
            pie,
            vec![PieSlice {
                name: "食費".to_string(),
                value: 1000
            }]
        );

        let income_slices = income_pie(&records);
        assert_eq!(income_slices.len(), 1);
        assert_eq!(income_slices[0].name, "給与");
    }

    #[test]
    fn test_rollup_ignores_negative_values() {
        let mut refund = expense(day(2024, 6, 1), "食費", 300);
        refund.amount = -300;
        let records = vec![expense(day(2024, 6, 1), "食費", 500), refund];
        let pie = expense_pie(&records);
        assert_eq!(pie[0].value, 500);
    }

    #[test]
    fn test_rollups_saturate_on_huge_values() {
        let records = vec![
            expense(day(2024, 6, 1), "食費", i64::MAX),
            expense(day(2024, 6, 2), "食費", 1),
            income(day(2024, 6, 1), "給与", i64::MAX),
            income(day(2024, 6, 3), "給与", 1),
        ];
        assert_eq!(expense_pie(&records)[0].value, i64::MAX);
        assert_eq!(income_pie(&records)[0].value, i64::MAX);
        let bar = finance_totals_bar(&records);
        assert_eq!(bar[0].value, i64::MAX);
        assert_eq!(bar[1].value, i64::MAX);

        let sessions = vec![
            session(day(2024, 6, 1), "数学", "taro", i64::MAX),
            session(day(2024, 6, 2), "数学", "taro", 45),
        ];
        assert_eq!(minutes_by_nickname(&sessions)[0].value, i64::MAX);
    }

    #[test]
    fn test_minutes_by_subject() {
        let records = vec![
            session(day(2024, 6, 1), "英語", "taro", 30),
            session(day(2024, 6, 1), "数学", "taro", 20),
            session(day(2024, 6, 1), "英語", "hanako", 15),
        ];
        let totals = minutes_by_subject(&records);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].label, "英語");
        assert_eq!(totals[0].value, 45);
    }
}
