//! Ledger service - the store-facing side of both trackers.
//!
//! The ledger owns the connection, the settings and one [`SnapshotFeed`] per
//! collection. Every successful write reloads the affected collection and
//! publishes the new snapshot, which is how views learn that they need to
//! re-aggregate. A failed reload after a persisted write is logged and the
//! write still succeeds; the next [`Ledger::refresh`] catches the feeds up.

use chrono::{FixedOffset, NaiveDate};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::warn;

use crate::{
    config::settings::Settings,
    core::{
        feed::{Snapshot, SnapshotFeed, SnapshotReceiver},
        finance, study,
        record::{FinanceDraft, FinanceRecord, Record, RecordKind, StudyDraft, StudyRecord},
    },
    errors::{Error, Result},
};

/// Store access plus snapshot feeds for both record collections.
#[derive(Debug)]
pub struct Ledger {
    db: DatabaseConnection,
    settings: Settings,
    offset: FixedOffset,
    finance_feed: SnapshotFeed<FinanceRecord>,
    study_feed: SnapshotFeed<StudyRecord>,
}

impl Ledger {
    /// Opens the ledger and publishes the initial snapshots.
    pub async fn open(db: DatabaseConnection, settings: Settings) -> Result<Self> {
        let offset = settings.utc_offset()?;
        let finance_snapshot = finance::load_finance_snapshot(&db, offset).await?;
        let study_snapshot = study::load_study_snapshot(&db, offset).await?;
        tracing::info!(
            finance = finance_snapshot.len(),
            study = study_snapshot.len(),
            skipped = finance_snapshot.skipped + study_snapshot.skipped,
            "ledger opened"
        );

        Ok(Self {
            db,
            settings,
            offset,
            finance_feed: SnapshotFeed::new(finance_snapshot),
            study_feed: SnapshotFeed::new(study_snapshot),
        })
    }

    /// Settings the ledger was opened with.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Suggested categories for a finance entry of `kind`.
    #[must_use]
    pub fn finance_categories(&self, kind: RecordKind) -> &[String] {
        self.settings.finance_categories(kind)
    }

    /// Subscribes to finance snapshots.
    #[must_use]
    pub fn subscribe_finance(&self) -> SnapshotReceiver<FinanceRecord> {
        self.finance_feed.subscribe()
    }

    /// Subscribes to study snapshots.
    #[must_use]
    pub fn subscribe_study(&self) -> SnapshotReceiver<StudyRecord> {
        self.study_feed.subscribe()
    }

    /// Latest finance snapshot.
    #[must_use]
    pub fn finance_snapshot(&self) -> Arc<Snapshot<FinanceRecord>> {
        self.finance_feed.current()
    }

    /// Latest study snapshot.
    #[must_use]
    pub fn study_snapshot(&self) -> Arc<Snapshot<StudyRecord>> {
        self.study_feed.current()
    }

    /// Adds a finance record and republishes the finance snapshot.
    pub async fn add_finance(&self, draft: FinanceDraft) -> Result<FinanceRecord> {
        let record = finance::create_finance_record(&self.db, draft).await?;
        self.republish_finance().await;
        Ok(record)
    }

    /// Replaces a finance record and republishes the finance snapshot.
    pub async fn update_finance(&self, id: &str, draft: FinanceDraft) -> Result<FinanceRecord> {
        let record = finance::update_finance_record(&self.db, id, draft).await?;
        self.republish_finance().await;
        Ok(record)
    }

    /// Deletes a finance record and republishes the finance snapshot.
    pub async fn delete_finance(&self, id: &str) -> Result<()> {
        finance::delete_finance_record(&self.db, id).await?;
        self.republish_finance().await;
        Ok(())
    }

    /// Adds a study session and republishes the study snapshot.
    ///
    /// # Errors
    /// Returns [`Error::InvalidRecord`] when the subject is not one of the
    /// configured subjects.
    pub async fn add_study(&self, draft: StudyDraft) -> Result<StudyRecord> {
        self.check_subject(&draft.subject)?;
        let record = study::create_study_record(&self.db, draft).await?;
        self.republish_study().await;
        Ok(record)
    }

    /// Replaces a study session and republishes the study snapshot.
    pub async fn update_study(&self, id: &str, draft: StudyDraft) -> Result<StudyRecord> {
        self.check_subject(&draft.subject)?;
        let record = study::update_study_record(&self.db, id, draft).await?;
        self.republish_study().await;
        Ok(record)
    }

    /// Deletes a study session and republishes the study snapshot.
    pub async fn delete_study(&self, id: &str) -> Result<()> {
        study::delete_study_record(&self.db, id).await?;
        self.republish_study().await;
        Ok(())
    }

    /// Looks a record up by id in either collection.
    pub async fn find_record(&self, id: &str) -> Result<Option<Record>> {
        if let Some(record) = finance::get_finance_record(&self.db, id, self.offset).await? {
            return Ok(Some(Record::Finance(record)));
        }
        Ok(study::get_study_record(&self.db, id, self.offset)
            .await?
            .map(Record::Study))
    }

    /// Every record dated `date` in the current snapshots, finance first.
    #[must_use]
    pub fn records_on_day(&self, date: NaiveDate) -> Vec<Record> {
        let finance = self.finance_snapshot();
        let study = self.study_snapshot();
        finance
            .records
            .iter()
            .filter(|r| r.date == date)
            .cloned()
            .map(Record::Finance)
            .chain(
                study
                    .records
                    .iter()
                    .filter(|r| r.date == date)
                    .cloned()
                    .map(Record::Study),
            )
            .collect()
    }

    /// Reloads both collections, e.g. after another process wrote to the store.
    pub async fn refresh(&self) -> Result<()> {
        self.refresh_finance().await?;
        self.refresh_study().await
    }

    async fn republish_finance(&self) {
        if let Err(e) = self.refresh_finance().await {
            warn!(error = %e, "finance write stored but snapshot reload failed");
        }
    }

    async fn republish_study(&self) {
        if let Err(e) = self.refresh_study().await {
            warn!(error = %e, "study write stored but snapshot reload failed");
        }
    }

    async fn refresh_finance(&self) -> Result<()> {
        let snapshot = finance::load_finance_snapshot(&self.db, self.offset).await?;
        self.finance_feed.publish(snapshot);
        Ok(())
    }

    async fn refresh_study(&self) -> Result<()> {
        let snapshot = study::load_study_snapshot(&self.db, self.offset).await?;
        self.study_feed.publish(snapshot);
        Ok(())
    }

    fn check_subject(&self, subject: &str) -> Result<()> {
        if self.settings.is_known_subject(subject) {
            Ok(())
        } else {
            Err(Error::InvalidRecord {
                message: format!("unknown subject '{subject}'"),
            })
        }
    }
}
