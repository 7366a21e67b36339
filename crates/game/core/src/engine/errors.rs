//! Error types for turn resolution.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{TeamTag, Winner};

/// Errors surfaced while driving a battle forward.
///
/// Malformed input never ends up here; the engine degrades it to defaults.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnError {
    /// The battle already has a winner; the action log is final.
    #[error("battle already ended (winner: {winner})")]
    BattleComplete { winner: Winner },

    #[error("no cast is waiting for a target choice")]
    NoPendingCast,

    /// The acting team had nobody left alive. The battle is ended as a side
    /// effect of detecting this.
    #[error("{team} has no combatant able to act")]
    NoActingCombatant { team: TeamTag },
}

impl GameError for TurnError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NoPendingCast => ErrorSeverity::Validation,
            Self::BattleComplete { .. } | Self::NoActingCombatant { .. } => {
                ErrorSeverity::Terminal
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::BattleComplete { .. } => "TURN_BATTLE_COMPLETE",
            Self::NoPendingCast => "TURN_NO_PENDING_CAST",
            Self::NoActingCombatant { .. } => "TURN_NO_ACTING_COMBATANT",
        }
    }
}
