//! Shared test utilities for daybook.
//!
//! This module provides common helpers for setting up test databases and
//! building records with sensible defaults.

use crate::{
    config::settings::Settings,
    core::{
        ledger::Ledger,
        record::{FinanceRecord, RecordKind, StudyRecord},
    },
    entities::{finance_record, study_session},
    errors::Result,
};
use chrono::{FixedOffset, NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_ID: AtomicUsize = AtomicUsize::new(1);

fn next_id(prefix: &str) -> String {
    format!("{prefix}-{}", NEXT_ID.fetch_add(1, Ordering::Relaxed))
}

/// Builds a calendar date, panicking on invalid input.
pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_else(|| panic!("invalid test date {year}-{month}-{day}"))
}

/// Japan Standard Time.
pub fn jst() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).unwrap_or_else(|| panic!("valid offset"))
}

fn finance(date: NaiveDate, kind: RecordKind, category: &str, amount: i64) -> FinanceRecord {
    FinanceRecord {
        id: next_id("fin"),
        date,
        kind,
        category: category.to_string(),
        amount,
        memo: None,
    }
}

/// An income record with a unique id.
pub fn income(date: NaiveDate, category: &str, amount: i64) -> FinanceRecord {
    finance(date, RecordKind::Income, category, amount)
}

/// An expense record with a unique id.
pub fn expense(date: NaiveDate, category: &str, amount: i64) -> FinanceRecord {
    finance(date, RecordKind::Expense, category, amount)
}

/// A study session with a unique id.
pub fn session(date: NaiveDate, subject: &str, nickname: &str, minutes: i64) -> StudyRecord {
    StudyRecord {
        id: next_id("study"),
        date,
        subject: subject.to_string(),
        nickname: nickname.to_string(),
        duration_minutes: minutes,
        memo: None,
    }
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Opens a ledger over a fresh in-memory database with default settings.
pub async fn setup_ledger() -> Result<Ledger> {
    let db = setup_test_db().await?;
    Ledger::open(db, Settings::default()).await
}

/// Writes a finance document as-is, bypassing entry validation.
pub async fn insert_raw_finance(
    db: &DatabaseConnection,
    id: &str,
    date: &str,
    kind: &str,
    category: &str,
    amount: i64,
) -> Result<()> {
    finance_record::ActiveModel {
        id: Set(id.to_string()),
        date: Set(date.to_string()),
        kind: Set(kind.to_string()),
        category: Set(category.to_string()),
        amount: Set(amount),
        memo: Set(None),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await?;
    Ok(())
}

/// Writes a study document as-is, bypassing entry validation.
pub async fn insert_raw_study(
    db: &DatabaseConnection,
    id: &str,
    date: &str,
    subject: &str,
    nickname: &str,
    minutes: i64,
) -> Result<()> {
    study_session::ActiveModel {
        id: Set(id.to_string()),
        date: Set(date.to_string()),
        subject: Set(subject.to_string()),
        nickname: Set(nickname.to_string()),
        study_minutes: Set(minutes),
        memo: Set(None),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await?;
    Ok(())
}
