//! Action log record types.
//!
//! One [`Action`] is appended per resolved turn. Records are immutable once
//! logged; together they form the complete audit trail of a battle and are
//! what renderers replay.

use crate::state::{Ability, Combatant, CombatantId, Status, TeamTag};

use super::effect::Effect;

// ============================================================================
// Action Kind
// ============================================================================

/// What happened in a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum ActionKind {
    /// The acting combatant used an ability.
    AbilityUsed,
    /// The acting combatant lost its turn.
    SkipTurn,
}

/// Why a turn was skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum SkipReason {
    Frozen,
}

// ============================================================================
// Snapshots
// ============================================================================

/// Point-in-time copy of the mutable parts of a combatant.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantSnapshot {
    pub instance_id: CombatantId,
    pub name: String,
    pub team: TeamTag,
    pub max_health: u32,
    pub current_health: u32,
    pub is_alive: bool,
    pub shields: u32,
    pub status: Status,
}

impl From<&Combatant> for CombatantSnapshot {
    fn from(combatant: &Combatant) -> Self {
        Self {
            instance_id: combatant.instance_id.clone(),
            name: combatant.name.clone(),
            team: combatant.team,
            max_health: combatant.max_health,
            current_health: combatant.current_health,
            is_alive: combatant.is_alive,
            shields: combatant.shields,
            status: combatant.status,
        }
    }
}

// ============================================================================
// Action
// ============================================================================

/// One resolved turn.
///
/// The caster snapshot is taken when the ability is cast; target snapshots are
/// taken after every effect of the turn has been applied.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Action {
    /// 1-based turn number; gapless across the log.
    pub turn: u32,
    pub kind: ActionKind,
    pub caster: CombatantSnapshot,
    /// `None` for skipped turns.
    pub ability: Option<Ability>,
    pub targets: Vec<CombatantSnapshot>,
    pub effects: Vec<Effect>,
    pub skip_reason: Option<SkipReason>,
    /// Milliseconds since the Unix epoch. Excluded from the log digest.
    pub timestamp_ms: u64,
}

impl Action {
    /// Builds the record of a skipped turn.
    pub fn skipped(
        turn: u32,
        caster: CombatantSnapshot,
        reason: SkipReason,
        timestamp_ms: u64,
    ) -> Self {
        Self {
            turn,
            kind: ActionKind::SkipTurn,
            caster,
            ability: None,
            targets: Vec::new(),
            effects: Vec::new(),
            skip_reason: Some(reason),
            timestamp_ms,
        }
    }

    /// Returns the caster's team.
    pub fn team(&self) -> TeamTag {
        self.caster.team
    }

    /// Total damage dealt by this action before shield absorption.
    pub fn total_damage(&self) -> u32 {
        self.effects
            .iter()
            .filter(|effect| effect.kind == super::EffectType::Damage)
            .map(|effect| effect.amount)
            .sum()
    }
}
