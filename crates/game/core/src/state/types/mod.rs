pub mod ability;
pub mod combatant;
pub mod common;
pub mod status;

pub use ability::{Ability, EffectKind};
pub use combatant::Combatant;
pub use common::{CombatantId, TeamTag, Winner};
pub use status::{Status, StatusFlags};
