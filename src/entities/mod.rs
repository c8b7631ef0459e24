//! Entity module - SeaORM entity definitions for the two record collections.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod finance_record;
pub mod study_session;

// Re-export specific types to avoid conflicts
pub use finance_record::{
    Column as FinanceRecordColumn, Entity as FinanceRecordEntity, Model as FinanceRecordModel,
};
pub use study_session::{
    Column as StudySessionColumn, Entity as StudySessionEntity, Model as StudySessionModel,
};
