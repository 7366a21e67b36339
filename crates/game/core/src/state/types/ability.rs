//! Static ability definitions.
//!
//! Abilities are read-only for the whole battle. The engine works on detached
//! copies so a stored definition is never mutated by a turn.

use crate::config::BattleConfig;

/// Effect category of an ability.
///
/// The category drives both target resolution and effect computation. Tags
/// that are not recognized deserialize to [`EffectKind::Unknown`], which
/// behaves like a plain single-target attack.
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
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EffectKind {
    /// One random alive enemy.
    #[default]
    Damage,
    /// One random alive enemy, marked as burned.
    DamageBurn,
    /// One random alive enemy, fixed damage plus an accuracy debuff.
    DebuffAccuracy,
    /// Primary enemy at full damage plus one or two chained enemies at half.
    DamageChain,
    /// One random alive enemy hit `hits` times.
    MultiDamage,
    /// Every alive enemy takes heavy damage while the caster heals.
    Apocalypse,
    /// Every alive enemy.
    DamageAll,
    /// Every alive enemy, frozen.
    FreezeAll,
    /// Most wounded alive ally.
    Heal,
    /// Most wounded alive ally.
    Shield,
    /// Every ally.
    HealAll,
    /// Every ally; dead allies are revived at half health.
    HealReviveAll,
    /// Unrecognized tag.
    #[cfg_attr(feature = "serde", serde(other))]
    Unknown,
}

impl EffectKind {
    /// Parses a category tag, mapping unrecognized tags to [`EffectKind::Unknown`].
    pub fn from_tag(tag: &str) -> Self {
        tag.parse().unwrap_or(Self::Unknown)
    }

    /// Returns true when a human player may pick the target of this ability.
    ///
    /// Only categories that resolve to a single enemy are player-targetable;
    /// area and ally-support categories always resolve automatically.
    pub const fn requires_target_choice(self) -> bool {
        matches!(
            self,
            Self::Damage
                | Self::DamageBurn
                | Self::DebuffAccuracy
                | Self::DamageChain
                | Self::MultiDamage
                | Self::Unknown
        )
    }

    /// Returns true for categories that target the caster's own team.
    pub const fn targets_allies(self) -> bool {
        matches!(
            self,
            Self::Heal | Self::Shield | Self::HealAll | Self::HealReviveAll
        )
    }
}

/// One weighted, randomly selectable move owned by a character.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Ability {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Animation tag for renderers. Opaque to the engine.
    pub animation: Option<String>,

    /// Selection weight in `(0, 1]`. Weights of one list need not sum to 1.
    pub chance: f64,
    pub effect: EffectKind,

    pub damage: Option<u32>,
    pub heal: Option<u32>,
    pub shield: Option<u32>,
    /// Hit count for [`EffectKind::MultiDamage`].
    pub hits: Option<u32>,
    pub freeze: bool,
    pub burn: bool,
    /// Cosmetic flag for renderers; no mechanical effect.
    pub is_ultimate: bool,
}

impl Ability {
    /// Synthetic ability used by characters with an empty ability list.
    pub fn basic_attack() -> Self {
        Self {
            id: "basic_attack".to_owned(),
            name: BattleConfig::BASIC_ATTACK_NAME.to_owned(),
            chance: 1.0,
            effect: EffectKind::Damage,
            damage: Some(BattleConfig::BASIC_ATTACK_DAMAGE),
            ..Self::default()
        }
    }

    // Zero-valued payload fields count as absent so category defaults apply.

    pub fn damage_amount(&self) -> Option<u32> {
        self.damage.filter(|value| *value > 0)
    }

    pub fn heal_amount(&self) -> Option<u32> {
        self.heal.filter(|value| *value > 0)
    }

    pub fn shield_amount(&self) -> Option<u32> {
        self.shield.filter(|value| *value > 0)
    }

    pub fn hit_count(&self) -> u32 {
        self.hits
            .filter(|value| *value > 0)
            .unwrap_or(BattleConfig::DEFAULT_HITS)
            .min(BattleConfig::MAX_HITS)
    }

    /// Freeze applies for `freeze_all` or an explicit freeze flag.
    pub fn applies_freeze(&self) -> bool {
        self.freeze || self.effect == EffectKind::FreezeAll
    }

    /// Burn applies for `damage_burn` or an explicit burn flag.
    pub fn applies_burn(&self) -> bool {
        self.burn || self.effect == EffectKind::DamageBurn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tags_fall_back_to_unknown() {
        assert_eq!(EffectKind::from_tag("damage_chain"), EffectKind::DamageChain);
        assert_eq!(EffectKind::from_tag("summon_minions"), EffectKind::Unknown);
    }

    #[test]
    fn zero_payloads_count_as_absent() {
        let ability = Ability {
            damage: Some(0),
            hits: Some(0),
            ..Ability::default()
        };
        assert_eq!(ability.damage_amount(), None);
        assert_eq!(ability.hit_count(), BattleConfig::DEFAULT_HITS);
    }

    #[test]
    fn hit_count_is_capped() {
        let ability = Ability {
            hits: Some(u32::MAX),
            ..Ability::default()
        };
        assert_eq!(ability.hit_count(), BattleConfig::MAX_HITS);
    }

    #[test]
    fn basic_attack_is_a_plain_certain_hit() {
        let basic = Ability::basic_attack();
        assert_eq!(basic.name, "Basic Attack");
        assert_eq!(basic.damage, Some(20));
        assert_eq!(basic.effect, EffectKind::Damage);
        assert_eq!(basic.chance, 1.0);
    }

    #[test]
    fn only_single_enemy_categories_need_a_player_choice() {
        assert!(EffectKind::MultiDamage.requires_target_choice());
        assert!(!EffectKind::DamageAll.requires_target_choice());
        assert!(!EffectKind::Heal.requires_target_choice());
        assert!(EffectKind::HealReviveAll.targets_allies());
    }
}
