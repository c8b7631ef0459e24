//! Study session entity - one study-time document.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Study session database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "study_sessions")]
pub struct Model {
    /// Opaque unique identifier
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// `YYYY-MM-DD`, a naive datetime, or an RFC 3339 instant
    pub date: String,
    /// Subject label
    pub subject: String,
    /// Who studied
    pub nickname: String,
    /// Session length in minutes
    pub study_minutes: i64,
    /// Optional note
    pub memo: Option<String>,
    /// Insertion time, used to keep snapshots in entry order
    pub created_at: DateTimeUtc,
}

/// Study sessions have no relationships
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
