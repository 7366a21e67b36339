//! In-place mutation of a combatant by one computed effect.

use crate::config::BattleConfig;
use crate::state::Combatant;

use super::effect::{Debuff, Effect, EffectType};

/// Applies `effect` to `target`.
///
/// Effects that do not fit the target's current state (healing the dead,
/// reviving the living, hitting a corpse) leave it untouched. There is no
/// rollback; callers apply a turn's effects one by one in list order.
pub fn apply_effect(effect: &Effect, target: &mut Combatant) {
    match effect.kind {
        EffectType::Damage => {
            if !target.is_alive {
                return;
            }
            absorb_damage(target, effect.amount);
            if effect.freeze {
                target.status.freeze();
            }
            if effect.burn {
                target.status.burn();
            }
            if effect.debuff == Some(Debuff::Accuracy) {
                target.status.accuracy_debuff = BattleConfig::ACCURACY_DEBUFF_TURNS;
            }
        }
        EffectType::Heal => {
            if target.is_alive {
                target.set_health(target.current_health.saturating_add(effect.amount));
            }
        }
        // Shields are not health-gated.
        EffectType::Shield => target.shields = target.shields.saturating_add(effect.amount),
        EffectType::Revive => {
            if !target.is_alive {
                target.set_health(effect.amount.max(1));
            }
        }
        EffectType::Freeze => {
            if target.is_alive {
                target.status.freeze();
            }
        }
    }
}

/// Shields soak damage first; the remainder comes off health.
fn absorb_damage(target: &mut Combatant, amount: u32) {
    if target.shields >= amount {
        target.shields -= amount;
        return;
    }
    let remainder = amount - target.shields;
    target.shields = 0;
    target.set_health(target.current_health.saturating_sub(remainder));
}
