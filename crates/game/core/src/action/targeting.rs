//! Target resolution keyed on the ability's effect category.
//!
//! The resolver returns references into the rosters. Order matters: the
//! calculator treats index 0 of a chain as the primary target and every list
//! entry of a multi-hit as one independent hit.

use crate::config::BattleConfig;
use crate::env::RandomSource;
use crate::state::{Ability, Combatant, CombatantId, EffectKind};

/// Both sides as seen from the caster.
#[derive(Clone, Copy, Debug)]
pub struct Sides<'a> {
    pub enemies: &'a [Combatant],
    /// The caster's own team, caster included.
    pub allies: &'a [Combatant],
}

impl<'a> Sides<'a> {
    pub fn new(enemies: &'a [Combatant], allies: &'a [Combatant]) -> Self {
        Self { enemies, allies }
    }

    fn find(&self, id: &str) -> Option<&'a Combatant> {
        self.enemies
            .iter()
            .chain(self.allies.iter())
            .find(|combatant| combatant.instance_id == *id)
    }

    fn alive_enemies(&self) -> Vec<&'a Combatant> {
        self.enemies.iter().filter(|c| c.is_alive).collect()
    }
}

/// Resolves the targets of `ability` cast by `caster`.
///
/// An explicit target id that names a combatant on either side replaces
/// automatic selection with that single combatant; an id that resolves to
/// nobody is ignored. An empty result means there was nothing eligible to hit
/// and the turn becomes a no-op.
pub fn resolve_targets<'a>(
    ability: &Ability,
    caster: &'a Combatant,
    sides: Sides<'a>,
    explicit_target: Option<&str>,
    rng: &mut impl RandomSource,
) -> Vec<&'a Combatant> {
    if let Some(target) = explicit_target.and_then(|id| sides.find(id)) {
        return vec![target];
    }

    match ability.effect {
        EffectKind::Damage
        | EffectKind::DamageBurn
        | EffectKind::DebuffAccuracy
        | EffectKind::Unknown => random_alive_enemy(sides, rng).into_iter().collect(),
        EffectKind::DamageChain => chain_targets(sides, rng),
        EffectKind::MultiDamage => match random_alive_enemy(sides, rng) {
            Some(target) => vec![target; ability.hit_count() as usize],
            None => Vec::new(),
        },
        EffectKind::Apocalypse => {
            let mut targets = sides.alive_enemies();
            targets.push(caster);
            targets
        }
        EffectKind::DamageAll | EffectKind::FreezeAll => sides.alive_enemies(),
        EffectKind::Heal | EffectKind::Shield => most_wounded_ally(sides).into_iter().collect(),
        EffectKind::HealAll | EffectKind::HealReviveAll => sides.allies.iter().collect(),
    }
}

/// Ids a player may choose from when `ability` needs a target choice.
///
/// Empty for categories that always resolve automatically.
pub fn candidate_targets(ability: &Ability, sides: Sides<'_>) -> Vec<CombatantId> {
    if !ability.effect.requires_target_choice() {
        return Vec::new();
    }
    sides
        .alive_enemies()
        .into_iter()
        .map(|combatant| combatant.instance_id.clone())
        .collect()
}

fn random_alive_enemy<'a>(sides: Sides<'a>, rng: &mut impl RandomSource) -> Option<&'a Combatant> {
    let alive = sides.alive_enemies();
    if alive.is_empty() {
        return None;
    }
    Some(alive[rng.pick_index(alive.len())])
}

/// Primary target first, then one or two distinct extras drawn without
/// replacement.
///
/// The extra count is always rolled, even when fewer enemies remain, so the
/// draw sequence depends only on the roster shape.
fn chain_targets<'a>(sides: Sides<'a>, rng: &mut impl RandomSource) -> Vec<&'a Combatant> {
    let mut remaining = sides.alive_enemies();
    if remaining.is_empty() {
        return Vec::new();
    }

    let primary = remaining.remove(rng.pick_index(remaining.len()));
    let extra = rng.range(
        BattleConfig::CHAIN_MIN_EXTRA_TARGETS,
        BattleConfig::CHAIN_MAX_EXTRA_TARGETS,
    );
    let extra = usize::try_from(extra).unwrap_or_default().min(remaining.len());

    let mut targets = Vec::with_capacity(extra + 1);
    targets.push(primary);
    for _ in 0..extra {
        targets.push(remaining.remove(rng.pick_index(remaining.len())));
    }
    targets
}

/// Lowest health ratio among alive allies; ties keep roster order.
fn most_wounded_ally<'a>(sides: Sides<'a>) -> Option<&'a Combatant> {
    let mut best: Option<&'a Combatant> = None;
    for ally in sides.allies.iter().filter(|c| c.is_alive) {
        match best {
            Some(current) if current.health_ratio() <= ally.health_ratio() => {}
            _ => best = Some(ally),
        }
    }
    best
}
