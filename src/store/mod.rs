pub mod json_store;
pub mod library;
pub mod schema;

pub use library::{Library, LibraryStore, ResultSink};
pub use schema::SourceText;
