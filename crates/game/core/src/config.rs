/// Battle balance constants shared by every simulator of a battle.
///
/// These values are part of the determinism contract: two parties resolving
/// the same battle must agree on all of them, so they are compile-time
/// constants rather than runtime-tunable settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BattleConfig;

impl BattleConfig {
    // ===== roster =====
    /// Health assigned when a raw character omits `max_health`.
    pub const DEFAULT_MAX_HEALTH: u32 = 100;

    // ===== fallback ability =====
    pub const BASIC_ATTACK_NAME: &'static str = "Basic Attack";
    pub const BASIC_ATTACK_DAMAGE: u32 = 20;

    // ===== damage rolls =====
    /// Inclusive bound of the symmetric damage variance roll.
    pub const DAMAGE_VARIANCE: i32 = 5;
    pub const CRIT_CHANCE: f64 = 0.15;
    pub const CRIT_MULTIPLIER: f64 = 1.5;

    // ===== chain lightning =====
    pub const CHAIN_DEFAULT_DAMAGE: u32 = 30;
    pub const CHAIN_SECONDARY_MULTIPLIER: f64 = 0.5;
    pub const CHAIN_MIN_EXTRA_TARGETS: i32 = 1;
    pub const CHAIN_MAX_EXTRA_TARGETS: i32 = 2;

    // ===== multi-hit =====
    pub const DEFAULT_HITS: u32 = 2;
    /// Upper bound on `hits`, whatever the content file says.
    pub const MAX_HITS: u32 = 16;

    // ===== apocalypse =====
    pub const APOCALYPSE_DEFAULT_DAMAGE: u32 = 200;
    pub const APOCALYPSE_DEFAULT_HEAL: u32 = 150;

    // ===== debuffs =====
    pub const ACCURACY_DEBUFF_DAMAGE: u32 = 10;
    /// Turns an accuracy debuff lasts. Counted down outside the engine.
    pub const ACCURACY_DEBUFF_TURNS: u8 = 2;

    // ===== revive =====
    pub const REVIVE_HEALTH_FRACTION: f64 = 0.5;
}
