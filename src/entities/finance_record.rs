//! Finance record entity - one income or expense document.
//!
//! Fields are stored loosely (`date` and `kind` as text) the way documents
//! arrive from the store; decoding into [`crate::core::record::FinanceRecord`]
//! happens in [`crate::core::finance`].
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Finance record database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "finance_records")]
pub struct Model {
    /// Opaque unique identifier (UUID v4 for records written by daybook)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// `YYYY-MM-DD`, a naive datetime, or an RFC 3339 instant
    pub date: String,
    /// `"income"` or `"expense"`
    pub kind: String,
    /// Category label
    pub category: String,
    /// Whole yen
    pub amount: i64,
    /// Optional note
    pub memo: Option<String>,
    /// Insertion time, used to keep snapshots in entry order
    pub created_at: DateTimeUtc,
}

/// Finance records have no relationships
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
