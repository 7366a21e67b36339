//! Async orchestration for deterministic battles.
//!
//! This crate wires the pure `battle-core` engine into a Tokio runtime. Each
//! battle runs on its own worker task that owns the authoritative
//! [`battle_core::Battle`]; clients drive it through a cloneable
//! [`BattleHandle`] and observe it through the topic-based [`EventBus`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`repository`] persists resolved actions
//! - [`registry`] and [`matchmaking`] support hosting many battles at once
//! - [`workers`] keeps background tasks internal to the crate
pub mod api;
pub mod config;
pub mod events;
pub mod matchmaking;
pub mod registry;
pub mod repository;
pub mod runtime;

mod workers;

pub use api::{
    AutoTargetProvider, BattleHandle, PlayerTargetProvider, Result, RuntimeError, TargetChoice,
    TargetProvider, TargetSelectionSender,
};
pub use config::RuntimeConfig;
pub use events::{BattleEvent, Event, EventBus, TargetEvent, Topic, TurnEvent};
pub use matchmaking::{MatchPairing, Matchmaker, MatchmakingError, QueuedPlayer};
pub use registry::BattleRegistry;
pub use repository::{
    ActionLogEntry, ActionRepository, FileActionLog, FileRepository, InMemoryActionLog,
    RepositoryError,
};
pub use runtime::{BattleRuntime, BattleRuntimeBuilder};
