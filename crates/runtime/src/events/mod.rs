//! Topic-based event bus for battle events.
//!
//! Events are published to specific topics and consumers subscribe only to
//! the topics they need. Delivery is best-effort: a topic with no subscribers
//! drops its events.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{BattleEvent, TargetEvent, TurnEvent};
