//! Mutable per-battle character state.

use super::{Ability, CombatantId, Status, TeamTag};

/// One character instance within a battle.
///
/// # Invariants
///
/// - `current_health <= max_health`
/// - `is_alive == (current_health > 0)` at every observation point
///
/// Dead combatants stay in their roster with `is_alive == false`; they are
/// skipped by turn rotation and by every enemy-targeting rule.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub instance_id: CombatantId,
    pub base_id: String,
    pub name: String,

    // Display metadata passed through untouched for renderers.
    pub emoji: Option<String>,
    pub color: Option<String>,
    pub image: Option<String>,

    pub team: TeamTag,
    pub max_health: u32,
    pub current_health: u32,
    pub is_alive: bool,
    /// Absorption pool depleted before health.
    pub shields: u32,
    pub status: Status,
    pub abilities: Vec<Ability>,
}

impl Combatant {
    /// Current health as a fraction of maximum health.
    pub fn health_ratio(&self) -> f64 {
        if self.max_health == 0 {
            return 0.0;
        }
        f64::from(self.current_health) / f64::from(self.max_health)
    }

    /// Sets health (clamped to `[0, max_health]`) and syncs the alive flag.
    pub fn set_health(&mut self, health: u32) {
        self.current_health = health.min(self.max_health);
        self.is_alive = self.current_health > 0;
    }
}
