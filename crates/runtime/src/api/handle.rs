//! Cloneable façade for issuing commands to a battle worker.
//!
//! [`BattleHandle`] hides channel plumbing and offers async helpers for
//! driving turns or streaming events from specific topics.
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot};

use battle_core::{Action, BattleSnapshot, BattleSummary, CombatantId, TurnStart};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to one running battle
#[derive(Clone)]
pub struct BattleHandle {
    battle_id: Arc<str>,
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl BattleHandle {
    pub(crate) fn new(
        battle_id: impl Into<Arc<str>>,
        command_tx: mpsc::Sender<Command>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            battle_id: battle_id.into(),
            command_tx,
            event_bus,
        }
    }

    pub fn battle_id(&self) -> &str {
        &self.battle_id
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Start the next turn.
    ///
    /// Either resolves it outright or returns the cast that waits for a
    /// target. A pending cast is returned again, unchanged, until completed.
    pub async fn begin_turn(&self) -> Result<TurnStart> {
        self.request(|reply| Command::BeginTurn { reply }).await?
    }

    /// Finish a pending cast. `None` or a stale target lets the engine pick.
    pub async fn complete_turn(&self, target: Option<CombatantId>) -> Result<Action> {
        self.request(|reply| Command::CompleteTurn { target, reply })
            .await?
    }

    /// Resolve one whole turn, optionally steering the primary target.
    pub async fn resolve_turn(&self, target: Option<CombatantId>) -> Result<Action> {
        self.request(|reply| Command::ResolveTurn { target, reply })
            .await?
    }

    /// Query the current battle state (read-only snapshot)
    pub async fn query_state(&self) -> Result<BattleSnapshot> {
        self.request(|reply| Command::QueryState { reply }).await
    }

    /// Final summary, once the battle has ended.
    pub async fn summary(&self) -> Result<Option<BattleSummary>> {
        self.request(|reply| Command::QuerySummary { reply }).await
    }

    /// Digest over the action log so far, timestamps excluded.
    pub async fn log_digest(&self) -> Result<[u8; 32]> {
        self.request(|reply| Command::LogDigest { reply }).await
    }

    /// Full action log so far.
    pub async fn action_log(&self) -> Result<Vec<Action>> {
        self.request(|reply| Command::QueryLog { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Battle` - battle started and ended
    /// - `Topic::Turn` - one event per resolved action
    /// - `Topic::Target` - player target requests and choices
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let mut turns = handle.subscribe(Topic::Turn);
    /// while let Ok(Event::Turn(TurnEvent::Resolved { action, .. })) = turns.recv().await {
    ///     println!("turn {}", action.turn);
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Whether the worker behind this handle has stopped.
    pub fn is_closed(&self) -> bool {
        self.command_tx.is_closed()
    }

    pub(crate) async fn shutdown(&self) -> Result<()> {
        self.request(|reply| Command::Shutdown { reply }).await
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}

impl std::fmt::Debug for BattleHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BattleHandle")
            .field("battle_id", &self.battle_id)
            .field("closed", &self.is_closed())
            .finish()
    }
}
