//! Authoritative battle state representation.
//!
//! This module owns the rosters, the turn pointer and the supporting types.
//! Collaborators read this state through snapshots; only the engine mutates it.
pub mod roster;
pub mod turn;
pub mod types;

pub use roster::{RawCharacter, initialize_team};
pub use turn::{TurnPhase, TurnPointer};
pub use types::{
    Ability, Combatant, CombatantId, EffectKind, Status, StatusFlags, TeamTag, Winner,
};

/// Both team rosters of one battle.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rosters {
    pub team1: Vec<Combatant>,
    pub team2: Vec<Combatant>,
}

impl Rosters {
    pub fn new(team1: Vec<Combatant>, team2: Vec<Combatant>) -> Self {
        Self { team1, team2 }
    }

    pub fn team(&self, tag: TeamTag) -> &[Combatant] {
        match tag {
            TeamTag::Team1 => &self.team1,
            TeamTag::Team2 => &self.team2,
        }
    }

    pub fn team_mut(&mut self, tag: TeamTag) -> &mut Vec<Combatant> {
        match tag {
            TeamTag::Team1 => &mut self.team1,
            TeamTag::Team2 => &mut self.team2,
        }
    }

    /// Iterates over every combatant of both teams, team 1 first.
    pub fn iter(&self) -> impl Iterator<Item = &Combatant> {
        self.team1.iter().chain(self.team2.iter())
    }

    pub fn find(&self, id: &str) -> Option<&Combatant> {
        self.iter().find(|c| c.instance_id == *id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Combatant> {
        self.team1
            .iter_mut()
            .chain(self.team2.iter_mut())
            .find(|c| c.instance_id == *id)
    }

    pub fn alive_count(&self, tag: TeamTag) -> usize {
        self.team(tag).iter().filter(|c| c.is_alive).count()
    }
}
