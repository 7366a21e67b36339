//! Injectable sources of nondeterminism.
//!
//! The engine never reaches for ambient randomness or time. Both are passed in
//! through the traits defined here so a battle can be replayed exactly.
mod clock;
mod rng;
mod scripted;

pub use clock::{Clock, FixedClock, SystemClock};
pub use rng::{LcgRng, RandomSource, seed_from_battle_id};
pub use scripted::ScriptedRng;
