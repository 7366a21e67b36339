use super::types::TeamTag;

/// Whose combatant acts next.
///
/// Each team keeps its own monotonically increasing turn index. The index is
/// never reset when the team shrinks; the acting combatant is picked as
/// `alive[index % alive.len()]`, so dead members drop out of the rotation
/// without reshuffling the survivors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnPointer {
    pub team: TeamTag,
    pub turn_indices: [u32; 2],
}

impl TurnPointer {
    /// Turn index of the given team.
    pub fn index_of(&self, team: TeamTag) -> u32 {
        self.turn_indices[team.index()]
    }

    /// Advances past the current team's turn and hands the turn to the other side.
    pub fn advance(&mut self) {
        let slot = &mut self.turn_indices[self.team.index()];
        *slot = slot.wrapping_add(1);
        self.team = self.team.opponent();
    }
}

/// Turn controller state.
///
/// `ResolvingCast`, `ResolvingEffects` and `TurnComplete` are transient within a
/// single call; between calls a battle rests in `AwaitingTurn`,
/// `AwaitingTarget` or `BattleEnded`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum TurnPhase {
    #[default]
    AwaitingTurn,
    ResolvingCast,
    /// An ability was selected and waits for a player's target choice.
    AwaitingTarget,
    ResolvingEffects,
    TurnComplete,
    BattleEnded,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_bumps_acting_team_and_flips() {
        let mut pointer = TurnPointer::default();
        pointer.advance();
        assert_eq!(pointer.team, TeamTag::Team2);
        assert_eq!(pointer.turn_indices, [1, 0]);

        pointer.advance();
        assert_eq!(pointer.team, TeamTag::Team1);
        assert_eq!(pointer.turn_indices, [1, 1]);
    }
}
