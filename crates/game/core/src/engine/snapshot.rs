//! Read-only views handed to collaborators.

use crate::action::{Action, CombatantSnapshot};
use crate::state::{Ability, CombatantId, Rosters, TurnPhase, TurnPointer, Winner};

/// Full battle state, safe to serialize and ship to a remote renderer.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleSnapshot {
    pub battle_id: String,
    pub rosters: Rosters,
    pub turn_pointer: TurnPointer,
    pub phase: TurnPhase,
    /// Number of turns resolved so far.
    pub turns_resolved: u32,
    pub is_complete: bool,
    pub winner: Option<Winner>,
    pub last_action: Option<Action>,
    pub pending_cast: Option<PendingCast>,
}

/// Battle-end notification.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleSummary {
    pub battle_id: String,
    pub winner: Winner,
    pub turns: u32,
    pub final_state: Rosters,
}

/// An ability that was selected and now waits for a player's target choice.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingCast {
    /// Caster as it was when the ability was selected.
    pub caster: CombatantSnapshot,
    pub ability: Ability,
    /// Alive enemies the player may pick from.
    pub candidates: Vec<CombatantId>,
}

impl PendingCast {
    pub fn caster_id(&self) -> &CombatantId {
        &self.caster.instance_id
    }

    pub fn is_candidate(&self, id: &str) -> bool {
        self.candidates.iter().any(|candidate| *candidate == *id)
    }
}

/// Outcome of [`crate::Battle::begin_turn`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnStart {
    /// The turn finished without needing input.
    Resolved(Action),
    /// A player may choose the target; finish with
    /// [`crate::Battle::complete_turn`].
    AwaitingTarget(PendingCast),
}
