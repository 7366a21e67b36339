use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use battle_core::Action;

/// One resolved action as stored in the action log.
///
/// Stored with a length prefix:
/// ```text
/// [u32 length][bincode serialized ActionLogEntry]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionLogEntry {
    pub battle_id: String,
    /// Copied from `action.turn` so readers can index without decoding actions.
    pub turn: u32,
    pub action: Action,
    /// Wall-clock time the entry was written. Not part of any digest.
    pub recorded_at: DateTime<Utc>,
}

impl ActionLogEntry {
    pub fn new(battle_id: impl Into<String>, action: Action) -> Self {
        Self {
            battle_id: battle_id.into(),
            turn: action.turn,
            action,
            recorded_at: Utc::now(),
        }
    }
}
