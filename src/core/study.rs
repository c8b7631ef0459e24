//! Study session store access.
//!
//! Mirrors [`crate::core::finance`] for the study tracker. The subject
//! vocabulary check lives in [`crate::core::ledger`], which owns the settings.

use chrono::{FixedOffset, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    core::{
        feed::Snapshot,
        record::{DAY_KEY_FORMAT, StudyDraft, StudyRecord, parse_record_date},
    },
    entities::{StudySessionColumn, StudySessionEntity, study_session},
    errors::{Error, Result},
};

/// Decodes a stored document into a typed study record.
///
/// # Errors
/// Returns [`Error::MalformedRecord`] for an unparseable date or an empty
/// subject or nickname.
pub fn decode_study_record(
    model: study_session::Model,
    offset: FixedOffset,
) -> Result<StudyRecord> {
    let Some(date) = parse_record_date(&model.date, offset) else {
        let reason = format!("unparseable date '{}'", model.date);
        return Err(Error::MalformedRecord {
            id: model.id,
            reason,
        });
    };
    if model.subject.trim().is_empty() || model.nickname.trim().is_empty() {
        return Err(Error::MalformedRecord {
            id: model.id,
            reason: "empty subject or nickname".to_string(),
        });
    }

    Ok(StudyRecord {
        id: model.id,
        date,
        subject: model.subject,
        nickname: model.nickname,
        duration_minutes: model.study_minutes,
        memo: model.memo,
    })
}

/// Stores a new study session under a fresh id.
pub async fn create_study_record(db: &DatabaseConnection, draft: StudyDraft) -> Result<StudyRecord> {
    draft.validate()?;

    let id = Uuid::new_v4().to_string();
    study_session::ActiveModel {
        id: Set(id.clone()),
        date: Set(draft.date.format(DAY_KEY_FORMAT).to_string()),
        subject: Set(draft.subject.clone()),
        nickname: Set(draft.nickname.clone()),
        study_minutes: Set(draft.duration_minutes),
        memo: Set(draft.memo.clone()),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await?;
    info!(%id, nickname = %draft.nickname, minutes = draft.duration_minutes, "study session added");

    Ok(StudyRecord {
        id,
        date: draft.date,
        subject: draft.subject,
        nickname: draft.nickname,
        duration_minutes: draft.duration_minutes,
        memo: draft.memo,
    })
}

/// Replaces every user-entered field of an existing session.
pub async fn update_study_record(
    db: &DatabaseConnection,
    id: &str,
    draft: StudyDraft,
) -> Result<StudyRecord> {
    draft.validate()?;

    let existing = StudySessionEntity::find_by_id(id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| Error::RecordNotFound { id: id.to_string() })?;

    let mut active: study_session::ActiveModel = existing.into();
    active.date = Set(draft.date.format(DAY_KEY_FORMAT).to_string());
    active.subject = Set(draft.subject.clone());
    active.nickname = Set(draft.nickname.clone());
    active.study_minutes = Set(draft.duration_minutes);
    active.memo = Set(draft.memo.clone());
    active.update(db).await?;
    info!(%id, "study session updated");

    Ok(StudyRecord {
        id: id.to_string(),
        date: draft.date,
        subject: draft.subject,
        nickname: draft.nickname,
        duration_minutes: draft.duration_minutes,
        memo: draft.memo,
    })
}

/// Deletes a session immediately.
pub async fn delete_study_record(db: &DatabaseConnection, id: &str) -> Result<()> {
    let result = StudySessionEntity::delete_by_id(id.to_string())
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(Error::RecordNotFound { id: id.to_string() });
    }
    info!(%id, "study session deleted");
    Ok(())
}

/// Looks up one session by id.
pub async fn get_study_record(
    db: &DatabaseConnection,
    id: &str,
    offset: FixedOffset,
) -> Result<Option<StudyRecord>> {
    StudySessionEntity::find_by_id(id.to_string())
        .one(db)
        .await?
        .map(|model| decode_study_record(model, offset))
        .transpose()
}

/// Loads every session in insertion order, skipping undecodable documents.
pub async fn load_study_snapshot(
    db: &DatabaseConnection,
    offset: FixedOffset,
) -> Result<Snapshot<StudyRecord>> {
    let models = StudySessionEntity::find()
        .order_by_asc(StudySessionColumn::CreatedAt)
        .order_by_asc(StudySessionColumn::Id)
        .all(db)
        .await?;

    let mut snapshot = Snapshot::empty();
    for model in models {
        match decode_study_record(model, offset) {
            Ok(record) => snapshot.records.push(record),
            Err(e) => {
                warn!(error = %e, "skipping malformed study session");
                snapshot.skipped += 1;
            }
        }
    }
    Ok(snapshot)
}
