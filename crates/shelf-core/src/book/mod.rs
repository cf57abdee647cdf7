//! Book domain module.
//!
//! # Module Structure
//!
//! - `model`: Book entities and the record-store views of them
//! - `repository`: Repository trait for book persistence

mod model;
mod repository;

pub use model::{
    Book, BookPatch, BookRecord, BookStatus, DEFAULT_AUTHOR, DEFAULT_CATEGORY, NewBook,
    UNCATEGORIZED,
};
pub use repository::BookRepository;
