//! Asynchronous abstraction for sourcing target choices.
//!
//! Runtime users plug in [`TargetProvider`] implementations per team so a
//! battle can run with human input, scripted fixtures, or fully automatic
//! targeting.
use std::time::Duration;

use async_trait::async_trait;
use rand::seq::IndexedRandom;
use tokio::sync::{Mutex, mpsc};
use tokio::time::Instant;

use battle_core::{BattleSnapshot, CombatantId, PendingCast};

use super::errors::{Result, RuntimeError};

/// Target picked for a pending cast.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TargetChoice {
    /// `None` lets the engine choose.
    pub target: Option<CombatantId>,
    /// The provider gave up waiting and chose on the player's behalf.
    pub timed_out: bool,
}

impl TargetChoice {
    pub fn engine() -> Self {
        Self::default()
    }

    pub fn explicit(target: CombatantId) -> Self {
        Self {
            target: Some(target),
            timed_out: false,
        }
    }
}

/// Trait for choosing the primary target of a pending cast.
///
/// Different implementations can handle:
/// - Player input (from UI/CLI or a socket)
/// - Automatic choice by the engine
/// - Scripted choices in tests
#[async_trait]
pub trait TargetProvider: Send + Sync {
    /// Pick a target for `pending`, given the battle state at the time the
    /// ability was selected.
    async fn choose_target(
        &self,
        pending: &PendingCast,
        snapshot: &BattleSnapshot,
    ) -> Result<TargetChoice>;
}

/// Always defers to the engine's random targeting.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoTargetProvider;

#[async_trait]
impl TargetProvider for AutoTargetProvider {
    async fn choose_target(
        &self,
        _pending: &PendingCast,
        _snapshot: &BattleSnapshot,
    ) -> Result<TargetChoice> {
        Ok(TargetChoice::engine())
    }
}

/// Waits for a player's choice on a channel, with a deadline.
///
/// Only ids listed in the pending cast's candidates are accepted; anything else
/// is dropped and the wait continues. When the deadline passes, or every
/// [`TargetSelectionSender`] is dropped, a random candidate is chosen on the
/// player's behalf. Answers that arrive after a deadline are discarded before
/// the next prompt.
pub struct PlayerTargetProvider {
    inbox: Mutex<SelectionInbox>,
    timeout: Duration,
}

struct SelectionInbox {
    rx: mpsc::Receiver<CombatantId>,
    /// The previous prompt expired; anything queued since belongs to it.
    expired: bool,
}

impl SelectionInbox {
    fn discard_stale(&mut self) -> usize {
        let mut discarded = 0;
        while self.rx.try_recv().is_ok() {
            discarded += 1;
        }
        self.expired = false;
        discarded
    }
}

/// Sending half handed to whatever collects player input.
#[derive(Clone, Debug)]
pub struct TargetSelectionSender {
    tx: mpsc::Sender<CombatantId>,
}

impl PlayerTargetProvider {
    pub fn channel(timeout: Duration) -> (Self, TargetSelectionSender) {
        let (tx, rx) = mpsc::channel(8);
        let provider = Self {
            inbox: Mutex::new(SelectionInbox { rx, expired: false }),
            timeout,
        };
        (provider, TargetSelectionSender { tx })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl TargetProvider for PlayerTargetProvider {
    async fn choose_target(
        &self,
        pending: &PendingCast,
        _snapshot: &BattleSnapshot,
    ) -> Result<TargetChoice> {
        let mut inbox = self.inbox.lock().await;

        if inbox.expired {
            let discarded = inbox.discard_stale();
            if discarded > 0 {
                tracing::debug!(
                    target: "runtime::providers",
                    caster = %pending.caster_id(),
                    discarded,
                    "dropped selections that arrived after the last deadline"
                );
            }
        }

        let deadline = Instant::now() + self.timeout;
        loop {
            match tokio::time::timeout_at(deadline, inbox.rx.recv()).await {
                Ok(Some(target)) if pending.is_candidate(target.as_str()) => {
                    tracing::debug!(
                        target: "runtime::providers",
                        caster = %pending.caster_id(),
                        %target,
                        "player selected target"
                    );
                    return Ok(TargetChoice::explicit(target));
                }
                Ok(Some(target)) => tracing::warn!(
                    target: "runtime::providers",
                    caster = %pending.caster_id(),
                    %target,
                    "ignoring selection that is not a candidate"
                ),
                Ok(None) => {
                    tracing::warn!(
                        target: "runtime::providers",
                        caster = %pending.caster_id(),
                        "target selection channel closed, choosing for the player"
                    );
                    break;
                }
                Err(_) => {
                    tracing::info!(
                        target: "runtime::providers",
                        caster = %pending.caster_id(),
                        timeout_ms = self.timeout.as_millis() as u64,
                        "target selection timed out, choosing for the player"
                    );
                    inbox.expired = true;
                    break;
                }
            }
        }

        let target = pending.candidates.choose(&mut rand::rng()).cloned();
        Ok(TargetChoice {
            target,
            timed_out: true,
        })
    }
}

impl TargetSelectionSender {
    /// Forward a player's choice to the waiting provider.
    pub async fn provide_target_selection(&self, target: impl Into<CombatantId>) -> Result<()> {
        self.tx
            .send(target.into())
            .await
            .map_err(|_| RuntimeError::TargetChannelClosed)
    }
}
