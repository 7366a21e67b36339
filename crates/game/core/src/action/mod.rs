//! One turn's worth of rules: pick an ability, find targets, compute effects,
//! apply them, and record the result.
//!
//! # Module Structure
//!
//! - `selection`: weighted ability choice
//! - `targeting`: target lists keyed on the effect category
//! - `effect`: numeric effect computation (variance, criticals, defaults)
//! - `apply`: in-place mutation of a combatant by one effect
//! - `types`: the [`Action`] log record and combatant snapshots
//! - `root`: digest over an action log (requires `serde`)
//!
//! Every function here is pure apart from the random source it is handed, so
//! the engine can run them in a fixed order and stay reproducible.

pub mod apply;
pub mod effect;
pub mod root;
pub mod selection;
pub mod targeting;
pub mod types;

pub use apply::apply_effect;
pub use effect::{Debuff, Effect, EffectType, compute_effects};
#[cfg(feature = "serde")]
pub use root::compute_log_digest;
pub use selection::select_ability;
pub use targeting::{Sides, candidate_targets, resolve_targets};
pub use types::{Action, ActionKind, CombatantSnapshot, SkipReason};
