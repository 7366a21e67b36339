//! Deterministic turn-resolution engine for two-team battles.
//!
//! `battle-core` holds the canonical battle rules (ability selection, target
//! resolution, damage formulas, win detection) as pure, synchronous APIs. It
//! performs no I/O; randomness and time are injected through [`env`]. All state
//! mutation flows through [`engine::Battle`], and the runtime and tools depend
//! on the types re-exported here.
pub mod action;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod state;

pub use action::{
    Action, ActionKind, CombatantSnapshot, Debuff, Effect, EffectType, SkipReason,
};
pub use config::BattleConfig;
pub use engine::{Battle, BattleSnapshot, BattleSummary, PendingCast, TurnError, TurnStart};
pub use env::{Clock, FixedClock, LcgRng, RandomSource, ScriptedRng, SystemClock};
pub use error::{ErrorSeverity, GameError};
pub use state::{
    Ability, Combatant, CombatantId, EffectKind, RawCharacter, Rosters, Status, StatusFlags,
    TeamTag, TurnPhase, TurnPointer, Winner,
};
