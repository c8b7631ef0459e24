//! Unified error types for the daybook crate.
//!
//! Data-quality problems found in stored documents are reported as
//! [`Error::MalformedRecord`] at the store boundary and absorbed by snapshot
//! loading. Caller contract violations such as [`Error::UnsupportedPeriod`]
//! are returned to the caller.

use thiserror::Error;

/// All errors produced by daybook.
#[derive(Debug, Error)]
pub enum Error {
    /// Settings file could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Error from the record store
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// No record with this id exists in the collection
    #[error("Record not found: {id}")]
    RecordNotFound {
        /// Id that was looked up
        id: String,
    },

    /// A new or updated record failed entry validation
    #[error("Invalid record: {message}")]
    InvalidRecord {
        /// Which rule was broken
        message: String,
    },

    /// A stored document could not be decoded into a typed record
    #[error("Malformed record {id}: {reason}")]
    MalformedRecord {
        /// Document id
        id: String,
        /// Why decoding failed
        reason: String,
    },

    /// A period granularity other than day, week or month was requested
    #[error("Unsupported period: {value}")]
    UnsupportedPeriod {
        /// The rejected input
        value: String,
    },
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
