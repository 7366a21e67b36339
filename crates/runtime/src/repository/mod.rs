//! Persistence for resolved actions.
//!
//! The battle worker appends every resolved [`battle_core::Action`] to an
//! [`ActionRepository`] before publishing it, so the log on disk (or in memory)
//! is never behind what subscribers have seen.

mod error;
mod file;
mod memory;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use file::FileRepository;
pub use memory::InMemoryActionLog;
pub use traits::ActionRepository;
pub use types::ActionLogEntry;

/// File-backed action log.
pub type FileActionLog = FileRepository<ActionLogEntry>;
