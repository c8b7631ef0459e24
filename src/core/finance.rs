//! Finance record store access.
//!
//! This module provides functions for creating, updating, deleting and loading
//! finance records. Writes go through entry validation; reads decode stored
//! documents into typed [`FinanceRecord`]s. A document that cannot be decoded
//! is left out of the snapshot and counted, so one corrupt entry never blanks
//! the whole calendar.

use chrono::{FixedOffset, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    core::{
        feed::Snapshot,
        record::{DAY_KEY_FORMAT, FinanceDraft, FinanceRecord, RecordKind, parse_record_date},
    },
    entities::{FinanceRecordColumn, FinanceRecordEntity, finance_record},
    errors::{Error, Result},
};

/// Decodes a stored document into a typed record.
///
/// # Errors
/// Returns [`Error::MalformedRecord`] for an unparseable date, a kind other
/// than income or expense, or an empty category.
pub fn decode_finance_record(
    model: finance_record::Model,
    offset: FixedOffset,
) -> Result<FinanceRecord> {
    let malformed = |reason: String| Error::MalformedRecord {
        id: model.id.clone(),
        reason,
    };

    let date = parse_record_date(&model.date, offset)
        .ok_or_else(|| malformed(format!("unparseable date '{}'", model.date)))?;
    let kind = match model.kind.as_str() {
        "income" => RecordKind::Income,
        "expense" => RecordKind::Expense,
        other => return Err(malformed(format!("unknown kind '{other}'"))),
    };
    if model.category.trim().is_empty() {
        return Err(malformed("empty category".to_string()));
    }

    Ok(FinanceRecord {
        id: model.id,
        date,
        kind,
        category: model.category,
        amount: model.amount,
        memo: model.memo,
    })
}

/// Stores a new finance record under a fresh id.
///
/// # Arguments
/// * `db` - Database connection
/// * `draft` - The user-entered fields; validated before anything is written
pub async fn create_finance_record(
    db: &DatabaseConnection,
    draft: FinanceDraft,
) -> Result<FinanceRecord> {
    draft.validate()?;

    let id = Uuid::new_v4().to_string();
    let model = finance_record::ActiveModel {
        id: Set(id.clone()),
        date: Set(draft.date.format(DAY_KEY_FORMAT).to_string()),
        kind: Set(draft.kind.as_str().to_string()),
        category: Set(draft.category.clone()),
        amount: Set(draft.amount),
        memo: Set(draft.memo.clone()),
        created_at: Set(Utc::now()),
    };
    model.insert(db).await?;
    info!(%id, kind = %draft.kind, amount = draft.amount, "finance record added");

    Ok(FinanceRecord {
        id,
        date: draft.date,
        kind: draft.kind,
        category: draft.category,
        amount: draft.amount,
        memo: draft.memo,
    })
}

/// Replaces every user-entered field of an existing record.
pub async fn update_finance_record(
    db: &DatabaseConnection,
    id: &str,
    draft: FinanceDraft,
) -> Result<FinanceRecord> {
    draft.validate()?;

    let existing = FinanceRecordEntity::find_by_id(id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| Error::RecordNotFound { id: id.to_string() })?;

    let mut active: finance_record::ActiveModel = existing.into();
    active.date = Set(draft.date.format(DAY_KEY_FORMAT).to_string());
    active.kind = Set(draft.kind.as_str().to_string());
    active.category = Set(draft.category.clone());
    active.amount = Set(draft.amount);
    active.memo = Set(draft.memo.clone());
    active.update(db).await?;
    info!(%id, "finance record updated");

    Ok(FinanceRecord {
        id: id.to_string(),
        date: draft.date,
        kind: draft.kind,
        category: draft.category,
        amount: draft.amount,
        memo: draft.memo,
    })
}

/// Deletes a record immediately.
pub async fn delete_finance_record(db: &DatabaseConnection, id: &str) -> Result<()> {
    let result = FinanceRecordEntity::delete_by_id(id.to_string())
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(Error::RecordNotFound { id: id.to_string() });
    }
    info!(%id, "finance record deleted");
    Ok(())
}

/// Looks up one record by id. Returns `None` if it does not exist.
pub async fn get_finance_record(
    db: &DatabaseConnection,
    id: &str,
    offset: FixedOffset,
) -> Result<Option<FinanceRecord>> {
    FinanceRecordEntity::find_by_id(id.to_string())
        .one(db)
        .await?
        .map(|model| decode_finance_record(model, offset))
        .transpose()
}

/// Loads every finance record in insertion order, skipping documents that
/// cannot be decoded.
pub async fn load_finance_snapshot(
    db: &DatabaseConnection,
    offset: FixedOffset,
) -> Result<Snapshot<FinanceRecord>> {
    let models = FinanceRecordEntity::find()
        .order_by_asc(FinanceRecordColumn::CreatedAt)
        .order_by_asc(FinanceRecordColumn::Id)
        .all(db)
        .await?;

    let mut snapshot = Snapshot::empty();
    for model in models {
        match decode_finance_record(model, offset) {
            Ok(record) => snapshot.records.push(record),
            Err(e) => {
                warn!(error = %e, "skipping malformed finance record");
                snapshot.skipped += 1;
            }
        }
    }
    Ok(snapshot)
}
