//! Session record domain module.
//!
//! A session record is the persisted bundle of transcript and concept graph
//! for one (user, book) pair. It is stored as two text fields of the book's
//! record in the record store.
//!
//! # Module Structure
//!
//! - `model`: The decoded result of a load (`LoadedSession`)
//! - `codec`: Text encoding of transcripts and graphs

pub mod codec;
mod model;

pub use model::LoadedSession;
