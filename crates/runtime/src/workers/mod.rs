//! Worker tasks that back the runtime orchestration.
//!
//! Each battle runs on its own worker, which owns the authoritative
//! [`battle_core::Battle`] and serializes every command sent to it.

mod battle;

pub use battle::{BattleWorker, Command};
