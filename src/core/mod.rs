//! Core logic, independent of any view layer.
//!
//! The aggregation engine is [`bucket`], [`period`] and [`rollup`]: pure,
//! synchronous functions over a snapshot of typed records. [`calendar`] and
//! [`report`] shape their output for the calendar and report views. The
//! remaining modules are the store boundary and snapshot delivery.

pub mod bucket;
pub mod calendar;
pub mod feed;
pub mod finance;
pub mod ledger;
pub mod period;
pub mod record;
pub mod report;
pub mod rollup;
pub mod study;
