//! Cursor based pagination over a fully fetched upstream collection.
//!
//! The upstream API returns whole collections, so every page is computed by sorting the complete
//! result set and slicing it at the offset carried by the cursor. This costs O(n log n) per page,
//! which is fine for the collection sizes the upstream serves but would need an incremental
//! strategy for large ones.

mod cursor;
mod paginate;
mod sort;

pub use cursor::GraphqlCursor;
pub use paginate::{paginate, Page, PageArgs, DEFAULT_LIMIT};
pub use sort::{SortDirection, SortSpec};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    #[error("invalid cursor: {0}")]
    InvalidCursor(String),
}
