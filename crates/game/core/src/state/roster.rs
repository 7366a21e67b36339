//! Conversion of caller-supplied character data into battle-ready combatants.

use crate::config::BattleConfig;

use super::types::{Ability, Combatant, CombatantId, Status, TeamTag};

/// Character definition as supplied by matchmaking or content files.
///
/// No validation happens here beyond defaulting. Malformed ability lists are
/// tolerated and degrade at selection time.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RawCharacter {
    pub id: String,
    pub name: String,
    /// Defaults to [`BattleConfig::DEFAULT_MAX_HEALTH`] when absent.
    pub max_health: Option<u32>,
    pub emoji: Option<String>,
    pub color: Option<String>,
    pub image: Option<String>,
    pub abilities: Vec<Ability>,
}

/// Builds the roster for one team.
///
/// Every combatant starts at full health, alive, unshielded and with no
/// status conditions.
pub fn initialize_team(raw_team: &[RawCharacter], team: TeamTag) -> Vec<Combatant> {
    raw_team
        .iter()
        .enumerate()
        .map(|(slot, raw)| {
            let max_health = raw
                .max_health
                .filter(|health| *health > 0)
                .unwrap_or(BattleConfig::DEFAULT_MAX_HEALTH);
            Combatant {
                instance_id: CombatantId::for_slot(team, &raw.id, slot),
                base_id: raw.id.clone(),
                name: raw.name.clone(),
                emoji: raw.emoji.clone(),
                color: raw.color.clone(),
                image: raw.image.clone(),
                team,
                max_health,
                current_health: max_health,
                is_alive: true,
                shields: 0,
                status: Status::default(),
                abilities: raw.abilities.clone(),
            }
        })
        .collect()
}
