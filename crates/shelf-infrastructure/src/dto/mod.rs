//! Boundary DTOs for the record store.
//!
//! The record store returns loosely shaped JSON (spreadsheet rows, with
//! column names that changed over time). Everything that crosses into the
//! domain goes through these types first.

mod book;
mod envelope;

pub use book::{BookPatchDto, BookRecordDto};
pub use envelope::ApiEnvelope;
