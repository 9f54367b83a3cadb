//! rerate library interface
//!
//! Migrates movie ratings exported from IMDb and Kinopoisk to a ratings site:
//! - [`ratings`]: CSV ingestion, validation, and merging
//! - [`matching`]: search candidate classification and manual disambiguation
//! - [`site`]: ratings site clients
//! - [`sync`]: per-record search / match / submit driver

pub mod matching;
pub mod ratings;
pub mod site;
pub mod sync;

pub use crate::ratings::{IngestReport, MovieRating};
pub use crate::sync::{SyncDriver, SyncReport};
