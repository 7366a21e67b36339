use std::fmt;

/// Stable identity of one combatant for the duration of a battle.
///
/// Derived from the team tag, the base character id and the roster slot, so two
/// copies of the same character on one team still get distinct identities.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CombatantId(String);

impl CombatantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Builds the instance id for roster slot `slot` of `team`.
    pub fn for_slot(team: TeamTag, base_id: &str, slot: usize) -> Self {
        Self(format!("{team}-{base_id}-{slot}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CombatantId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl PartialEq<str> for CombatantId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// One of the two sides of a battle.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TeamTag {
    #[default]
    Team1,
    Team2,
}

impl TeamTag {
    pub const ALL: [TeamTag; 2] = [TeamTag::Team1, TeamTag::Team2];

    /// Returns the other side.
    pub const fn opponent(self) -> Self {
        match self {
            Self::Team1 => Self::Team2,
            Self::Team2 => Self::Team1,
        }
    }

    /// Slot of this team in per-team arrays.
    pub const fn index(self) -> usize {
        match self {
            Self::Team1 => 0,
            Self::Team2 => 1,
        }
    }
}

/// Final result of a battle.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Winner {
    Team1,
    Team2,
    /// Both sides were wiped out by the same turn.
    Draw,
}

impl From<TeamTag> for Winner {
    fn from(team: TeamTag) -> Self {
        match team {
            TeamTag::Team1 => Self::Team1,
            TeamTag::Team2 => Self::Team2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_ids_embed_team_base_and_slot() {
        let id = CombatantId::for_slot(TeamTag::Team2, "robo", 3);
        assert_eq!(id.as_str(), "team2-robo-3");
    }

    #[test]
    fn team_tags_round_trip_through_strings() {
        assert_eq!("TEAM1".parse::<TeamTag>().unwrap(), TeamTag::Team1);
        assert_eq!(TeamTag::Team2.as_ref(), "team2");
        assert_eq!(TeamTag::Team1.opponent(), TeamTag::Team2);
    }
}
