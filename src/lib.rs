//! Personal news-consumption analytics: an append-only event log with
//! diversity/bias scoring, trend and blind-spot analysis, a consumption
//! health score, and recommendations derived from them.
//!
//! The [`db::SqliteStore`] owns all persisted state; every other component
//! takes a store reference and routes reads/writes through it.

pub mod analyzers;
pub mod db;
pub mod error;
pub mod insights;
pub mod recommender;
pub mod tracker;
pub mod types;

pub use error::{Error, Result};
