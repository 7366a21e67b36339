//! Content loaders for reading character data from files.
//!
//! Loaders return [`LoadResult`] so callers get the offending path and the
//! parser's line/column in one error chain.

pub mod catalog;
pub mod roster;

pub use catalog::CharacterCatalog;
pub use roster::{RosterFormat, RosterLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
