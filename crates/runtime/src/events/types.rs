//! Event types for different topics.

use serde::{Deserialize, Serialize};

use battle_core::{Action, BattleSnapshot, BattleSummary, CombatantId, PendingCast};

/// Battle lifecycle events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BattleEvent {
    /// The worker is up and the initial state is available.
    Started { snapshot: Box<BattleSnapshot> },

    /// A winner (or a draw) was decided. Published once per battle.
    Ended { summary: Box<BattleSummary> },
}

/// One event per resolved action, in turn order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TurnEvent {
    Resolved {
        action: Box<Action>,
        /// State right after the action was applied.
        snapshot: Box<BattleSnapshot>,
    },
}

/// Player target-selection events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TargetEvent {
    /// A player-controlled caster waits for a target.
    Requested {
        battle_id: String,
        pending: PendingCast,
        timeout_ms: u64,
    },

    /// The choice that was forwarded to the engine.
    Selected {
        battle_id: String,
        caster: CombatantId,
        target: Option<CombatantId>,
        /// True when the player did not answer in time.
        timed_out: bool,
    },
}
