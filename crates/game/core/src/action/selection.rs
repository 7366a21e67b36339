//! Weighted ability selection.

use crate::env::RandomSource;
use crate::state::{Ability, Combatant};

/// Picks the ability a combatant uses this turn.
///
/// Draws one unit value `r` and walks the ability list in order, accumulating
/// `chance`; the first ability with `r < cumulative` wins. When the weights sum
/// to less than `r` (rounding slack or a malformed list) the last ability is
/// used. An empty list yields [`Ability::basic_attack`] without drawing.
///
/// Always returns a detached copy.
pub fn select_ability(combatant: &Combatant, rng: &mut impl RandomSource) -> Ability {
    let Some(last) = combatant.abilities.last() else {
        return Ability::basic_attack();
    };

    let roll = rng.next_unit();
    let mut cumulative = 0.0;
    for ability in &combatant.abilities {
        cumulative += ability.chance;
        if roll < cumulative {
            return ability.clone();
        }
    }

    last.clone()
}
