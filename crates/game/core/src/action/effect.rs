//! Numeric effect computation.
//!
//! Effects are computed for the whole target list before any of them is
//! applied, so every roll of a turn happens against the state at cast time.

use crate::config::BattleConfig;
use crate::env::RandomSource;
use crate::state::{Ability, Combatant, CombatantId, EffectKind};

/// Primary outcome of one effect record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum EffectType {
    Damage,
    Heal,
    Shield,
    /// Freeze without any accompanying payload.
    Freeze,
    Revive,
}

/// Debuff carried by a damage effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum Debuff {
    Accuracy,
}

/// Computed outcome for one target entry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Effect {
    pub target_id: CombatantId,
    pub kind: EffectType,
    pub amount: u32,
    pub is_critical: bool,
    pub freeze: bool,
    pub burn: bool,
    pub debuff: Option<Debuff>,
}

impl Effect {
    fn new(target_id: CombatantId, kind: EffectType, amount: u32) -> Self {
        Self {
            target_id,
            kind,
            amount,
            is_critical: false,
            freeze: false,
            burn: false,
            debuff: None,
        }
    }
}

/// Computes one effect per target entry, in target order.
///
/// Dead targets produce nothing unless the ability revives. Duplicate entries
/// (multi-hit) roll independently.
pub fn compute_effects(
    ability: &Ability,
    caster: &Combatant,
    targets: &[&Combatant],
    rng: &mut impl RandomSource,
) -> Vec<Effect> {
    targets
        .iter()
        .enumerate()
        .filter_map(|(index, target)| compute_one(ability, caster, target, index, rng))
        .collect()
}

fn compute_one(
    ability: &Ability,
    caster: &Combatant,
    target: &Combatant,
    index: usize,
    rng: &mut impl RandomSource,
) -> Option<Effect> {
    let revives = ability.effect == EffectKind::HealReviveAll;
    if !target.is_alive && !revives {
        return None;
    }

    let id = target.instance_id.clone();
    let mut effect = match ability.effect {
        EffectKind::Apocalypse if target.instance_id == caster.instance_id => Some(Effect::new(
            id,
            EffectType::Heal,
            ability
                .heal_amount()
                .unwrap_or(BattleConfig::APOCALYPSE_DEFAULT_HEAL),
        )),
        EffectKind::Apocalypse => Some(Effect::new(
            id,
            EffectType::Damage,
            ability
                .damage_amount()
                .unwrap_or(BattleConfig::APOCALYPSE_DEFAULT_DAMAGE),
        )),
        EffectKind::DamageChain => {
            let base = ability
                .damage_amount()
                .unwrap_or(BattleConfig::CHAIN_DEFAULT_DAMAGE);
            let multiplier = if index == 0 {
                1.0
            } else {
                BattleConfig::CHAIN_SECONDARY_MULTIPLIER
            };
            Some(rolled_damage(id, base, multiplier, rng))
        }
        EffectKind::DebuffAccuracy => {
            let mut effect = Effect::new(
                id,
                EffectType::Damage,
                BattleConfig::ACCURACY_DEBUFF_DAMAGE,
            );
            effect.debuff = Some(Debuff::Accuracy);
            Some(effect)
        }
        EffectKind::HealReviveAll if !target.is_alive => {
            return Some(Effect::new(id, EffectType::Revive, revive_amount(target)));
        }
        EffectKind::Damage
        | EffectKind::DamageBurn
        | EffectKind::MultiDamage
        | EffectKind::DamageAll
        | EffectKind::FreezeAll
        | EffectKind::Heal
        | EffectKind::Shield
        | EffectKind::HealAll
        | EffectKind::HealReviveAll
        | EffectKind::Unknown => payload(ability, id, rng),
    };

    if ability.applies_freeze() {
        match effect.as_mut() {
            Some(effect) => effect.freeze = true,
            None => {
                let mut freeze = Effect::new(target.instance_id.clone(), EffectType::Freeze, 0);
                freeze.freeze = true;
                effect = Some(freeze);
            }
        }
    }
    if ability.applies_burn() {
        if let Some(effect) = effect.as_mut() {
            effect.burn = true;
        }
    }

    effect
}

/// Generic payload: damage, else heal, else shield.
fn payload(ability: &Ability, id: CombatantId, rng: &mut impl RandomSource) -> Option<Effect> {
    if let Some(damage) = ability.damage_amount() {
        return Some(rolled_damage(id, damage, 1.0, rng));
    }
    if let Some(heal) = ability.heal_amount() {
        return Some(Effect::new(id, EffectType::Heal, heal));
    }
    ability
        .shield_amount()
        .map(|shield| Effect::new(id, EffectType::Shield, shield))
}

/// Damage with variance and a critical roll, in that draw order.
fn rolled_damage(
    id: CombatantId,
    base: u32,
    multiplier: f64,
    rng: &mut impl RandomSource,
) -> Effect {
    let variance = rng.range(-BattleConfig::DAMAGE_VARIANCE, BattleConfig::DAMAGE_VARIANCE);
    let critical = rng.next_unit() < BattleConfig::CRIT_CHANCE;

    let raw = (f64::from(base) + f64::from(variance)) * multiplier;
    let mut amount = raw.floor().max(0.0);
    if critical {
        amount = (amount * BattleConfig::CRIT_MULTIPLIER).floor();
    }

    let mut effect = Effect::new(id, EffectType::Damage, amount as u32);
    effect.is_critical = critical;
    effect
}

/// Half of max health, never zero so the revived combatant counts as alive.
fn revive_amount(target: &Combatant) -> u32 {
    let half = (f64::from(target.max_health) * BattleConfig::REVIVE_HEALTH_FRACTION).floor() as u32;
    half.clamp(1, target.max_health.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ScriptedRng;
    use crate::state::{RawCharacter, TeamTag, initialize_team};

    // 0.5 maps the variance roll to 0 and misses the critical roll.
    const NEUTRAL: f64 = 0.5;

    fn combatants(count: usize, tag: TeamTag) -> Vec<Combatant> {
        let raw: Vec<_> = (0..count)
            .map(|i| RawCharacter {
                id: format!("c{i}"),
                name: format!("C{i}"),
                ..RawCharacter::default()
            })
            .collect();
        initialize_team(&raw, tag)
    }

    fn ability(effect: EffectKind) -> Ability {
        Ability {
            effect,
            chance: 1.0,
            ..Ability::default()
        }
    }

    #[test]
    fn generic_damage_applies_variance_then_critical() {
        let caster = &combatants(1, TeamTag::Team1)[0];
        let target = &combatants(1, TeamTag::Team2)[0];
        let mut attack = ability(EffectKind::Damage);
        attack.damage = Some(20);

        // variance: floor(0.99 * 11) - 5 = 5; critical: 0.1 < 0.15
        let mut rng = ScriptedRng::new([0.99, 0.1]);
        let effects = compute_effects(&attack, caster, &[target], &mut rng);

        assert_eq!(effects.len(), 1);
        assert_eq!(effects[0].kind, EffectType::Damage);
        assert_eq!(effects[0].amount, 37);
        assert!(effects[0].is_critical);
    }

    #[test]
    fn low_damage_with_negative_variance_clamps_to_zero() {
        let caster = &combatants(1, TeamTag::Team1)[0];
        let target = &combatants(1, TeamTag::Team2)[0];
        let mut attack = ability(EffectKind::Damage);
        attack.damage = Some(2);

        let mut rng = ScriptedRng::new([0.0, 0.9]);
        let effects = compute_effects(&attack, caster, &[target], &mut rng);

        assert_eq!(effects[0].amount, 0);
    }

    #[test]
    fn chain_secondaries_take_half_damage() {
        let caster = &combatants(1, TeamTag::Team1)[0];
        let enemies = combatants(3, TeamTag::Team2);
        let targets: Vec<_> = enemies.iter().collect();
        let mut rng = ScriptedRng::constant(NEUTRAL);

        let effects =
            compute_effects(&ability(EffectKind::DamageChain), caster, &targets, &mut rng);

        let amounts: Vec<_> = effects.iter().map(|e| e.amount).collect();
        assert_eq!(amounts, [30, 15, 15]);
    }

    #[test]
    fn apocalypse_heals_caster_and_nukes_enemies_without_rolls() {
        let allies = combatants(1, TeamTag::Team1);
        let enemies = combatants(2, TeamTag::Team2);
        let targets = [&enemies[0], &enemies[1], &allies[0]];
        let mut rng = ScriptedRng::constant(NEUTRAL);

        let effects = compute_effects(
            &ability(EffectKind::Apocalypse),
            &allies[0],
            &targets,
            &mut rng,
        );

        let summary: Vec<_> = effects.iter().map(|e| (e.kind, e.amount)).collect();
        assert_eq!(
            summary,
            [
                (EffectType::Damage, 200),
                (EffectType::Damage, 200),
                (EffectType::Heal, 150)
            ]
        );
        assert!(effects.iter().all(|e| !e.is_critical));
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn accuracy_debuff_is_fixed_damage() {
        let caster = &combatants(1, TeamTag::Team1)[0];
        let target = &combatants(1, TeamTag::Team2)[0];
        let mut debuff = ability(EffectKind::DebuffAccuracy);
        debuff.damage = Some(99);
        let mut rng = ScriptedRng::constant(0.0);

        let effects = compute_effects(&debuff, caster, &[target], &mut rng);

        assert_eq!(effects[0].amount, 10);
        assert_eq!(effects[0].debuff, Some(Debuff::Accuracy));
        assert!(!effects[0].is_critical);
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn freeze_all_without_payload_emits_standalone_freeze() {
        let caster = &combatants(1, TeamTag::Team1)[0];
        let target = &combatants(1, TeamTag::Team2)[0];
        let mut rng = ScriptedRng::constant(NEUTRAL);

        let effects = compute_effects(&ability(EffectKind::FreezeAll), caster, &[target], &mut rng);

        assert_eq!(effects[0].kind, EffectType::Freeze);
        assert!(effects[0].freeze);
    }

    #[test]
    fn burn_flag_rides_on_damage() {
        let caster = &combatants(1, TeamTag::Team1)[0];
        let target = &combatants(1, TeamTag::Team2)[0];
        let mut burn = ability(EffectKind::DamageBurn);
        burn.damage = Some(15);
        let mut rng = ScriptedRng::constant(NEUTRAL);

        let effects = compute_effects(&burn, caster, &[target], &mut rng);

        assert_eq!(effects[0].kind, EffectType::Damage);
        assert_eq!(effects[0].amount, 15);
        assert!(effects[0].burn);
    }

    #[test]
    fn dead_targets_are_skipped_except_for_revive() {
        let caster = &combatants(1, TeamTag::Team1)[0];
        let mut allies = combatants(2, TeamTag::Team1);
        allies[1].set_health(0);
        let targets = [&allies[0], &allies[1]];
        let mut rng = ScriptedRng::constant(NEUTRAL);

        let mut heal = ability(EffectKind::HealAll);
        heal.heal = Some(25);
        let effects = compute_effects(&heal, caster, &targets, &mut rng);
        assert_eq!(effects.len(), 1);

        heal.effect = EffectKind::HealReviveAll;
        let effects = compute_effects(&heal, caster, &targets, &mut rng);
        let summary: Vec<_> = effects.iter().map(|e| (e.kind, e.amount)).collect();
        assert_eq!(summary, [(EffectType::Heal, 25), (EffectType::Revive, 50)]);
    }

    #[test]
    fn no_payload_and_no_freeze_emits_nothing() {
        let caster = &combatants(1, TeamTag::Team1)[0];
        let target = &combatants(1, TeamTag::Team2)[0];
        let mut rng = ScriptedRng::constant(NEUTRAL);

        let effects = compute_effects(&ability(EffectKind::Unknown), caster, &[target], &mut rng);

        assert!(effects.is_empty());
    }

    #[test]
    fn shield_ability_grants_flat_shield() {
        let caster = &combatants(1, TeamTag::Team1)[0];
        let mut shield = ability(EffectKind::Shield);
        shield.shield = Some(40);
        let mut rng = ScriptedRng::constant(NEUTRAL);

        let effects = compute_effects(&shield, caster, &[caster], &mut rng);

        assert_eq!((effects[0].kind, effects[0].amount), (EffectType::Shield, 40));
        assert_eq!(rng.draws(), 0);
    }
}
