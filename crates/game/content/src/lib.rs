//! Data-driven character content and loaders.
//!
//! This crate turns RON/TOML files into the [`RawCharacter`] lists the battle
//! engine starts from:
//! - Roster files (one team, or a pool of characters)
//! - Character catalogs keyed by id, with team lookup
//! - A built-in starter catalog embedded at compile time
//!
//! Content is consumed when a battle starts and never appears in battle state
//! beyond the copies the engine makes.

#[cfg(feature = "loaders")]
pub mod loaders;

pub use battle_core::RawCharacter;

#[cfg(feature = "loaders")]
pub use loaders::{CharacterCatalog, LoadResult, RosterFormat, RosterLoader};
