//! Repository contract for the append-only action log.

use super::{ActionLogEntry, Result};

/// Append-only store for resolved actions.
///
/// Owned by exactly one battle worker, so implementations only need `Send`.
pub trait ActionRepository: Send {
    /// Append an entry and return its position in the log.
    ///
    /// The position is a byte offset for file logs and an index for
    /// in-memory logs.
    fn append(&mut self, entry: &ActionLogEntry) -> Result<u64>;

    /// Every entry in append order.
    fn read_all(&mut self) -> Result<Vec<ActionLogEntry>>;

    /// Flush buffered writes.
    fn flush(&mut self) -> Result<()>;

    /// Short label for logging, usually a filename.
    fn session_id(&self) -> &str;
}

impl<R: ActionRepository + ?Sized> ActionRepository for Box<R> {
    fn append(&mut self, entry: &ActionLogEntry) -> Result<u64> {
        (**self).append(entry)
    }

    fn read_all(&mut self) -> Result<Vec<ActionLogEntry>> {
        (**self).read_all()
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn session_id(&self) -> &str {
        (**self).session_id()
    }
}
