//! Battle worker that owns the authoritative [`battle_core::Battle`].
//!
//! Receives commands from [`crate::BattleHandle`], drives the engine, records
//! every resolved action, and publishes events to the EventBus.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

use battle_core::{
    Action, Battle, BattleSnapshot, BattleSummary, CombatantId, RandomSource, TurnStart,
};

use crate::api::Result;
use crate::events::{BattleEvent, Event, EventBus, TargetEvent, TurnEvent};
use crate::repository::{ActionLogEntry, ActionRepository};

/// Commands that can be sent to the battle worker
pub enum Command {
    /// Start the next turn, stopping before target resolution when a player
    /// may choose.
    BeginTurn {
        reply: oneshot::Sender<Result<TurnStart>>,
    },
    /// Finish the pending cast.
    CompleteTurn {
        target: Option<CombatantId>,
        reply: oneshot::Sender<Result<Action>>,
    },
    /// Resolve a whole turn in one step.
    ResolveTurn {
        target: Option<CombatantId>,
        reply: oneshot::Sender<Result<Action>>,
    },
    QueryState {
        reply: oneshot::Sender<BattleSnapshot>,
    },
    QuerySummary {
        reply: oneshot::Sender<Option<BattleSummary>>,
    },
    QueryLog {
        reply: oneshot::Sender<Vec<Action>>,
    },
    LogDigest {
        reply: oneshot::Sender<[u8; 32]>,
    },
    /// Flush the action log and stop the worker.
    Shutdown { reply: oneshot::Sender<()> },
}

/// Background task that processes battle commands.
///
/// The worker does not talk to players. Target choices are gathered by
/// [`crate::BattleRuntime`] and arrive here as plain commands.
pub struct BattleWorker<R: RandomSource> {
    battle: Battle<R>,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    repository: Option<Box<dyn ActionRepository>>,
    target_timeout_ms: u64,
    ended_published: bool,
}

impl<R> BattleWorker<R>
where
    R: RandomSource + Send + 'static,
{
    pub fn new(
        battle: Battle<R>,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        repository: Option<Box<dyn ActionRepository>>,
        target_timeout_ms: u64,
    ) -> Self {
        info!(
            target: "runtime::worker",
            battle_id = battle.battle_id(),
            team1 = battle.rosters().team1.len(),
            team2 = battle.rosters().team2.len(),
            persisted = repository.is_some(),
            "battle worker initialized"
        );

        Self {
            battle,
            command_rx,
            event_bus,
            repository,
            target_timeout_ms,
            ended_published: false,
        }
    }

    /// Main worker loop. Exits on [`Command::Shutdown`] or when every handle
    /// is dropped.
    pub async fn run(mut self) {
        self.event_bus.publish(Event::Battle(BattleEvent::Started {
            snapshot: Box::new(self.battle.snapshot()),
        }));
        // A battle with an empty side is decided before its first turn.
        self.publish_end_if_complete();

        let mut shutdown_reply = None;
        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                Command::Shutdown { reply } => {
                    shutdown_reply = Some(reply);
                    break;
                }
                cmd => self.handle_command(cmd),
            }
        }

        self.flush_repository();
        if let Some(reply) = shutdown_reply
            && reply.send(()).is_err()
        {
            debug!(target: "runtime::worker", "Shutdown reply channel closed (caller dropped)");
        }
        debug!(
            target: "runtime::worker",
            battle_id = self.battle.battle_id(),
            "battle worker stopped"
        );
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::BeginTurn { reply } => {
                let result = self.handle_begin_turn();
                if reply.send(result).is_err() {
                    debug!(
                        target: "runtime::worker",
                        "BeginTurn reply channel closed (caller dropped)"
                    );
                }
            }
            Command::CompleteTurn { target, reply } => {
                let result = self
                    .battle
                    .complete_turn(target.as_ref().map(CombatantId::as_str))
                    .map_err(Into::into)
                    .and_then(|action| self.record(action));
                if reply.send(result).is_err() {
                    debug!(
                        target: "runtime::worker",
                        "CompleteTurn reply channel closed (caller dropped)"
                    );
                }
            }
            Command::ResolveTurn { target, reply } => {
                let result = self
                    .battle
                    .resolve_turn(target.as_ref().map(CombatantId::as_str))
                    .map_err(Into::into)
                    .and_then(|action| self.record(action));
                if reply.send(result).is_err() {
                    debug!(
                        target: "runtime::worker",
                        "ResolveTurn reply channel closed (caller dropped)"
                    );
                }
            }
            Command::QueryState { reply } => {
                if reply.send(self.battle.snapshot()).is_err() {
                    debug!(
                        target: "runtime::worker",
                        "QueryState reply channel closed (caller dropped)"
                    );
                }
            }
            Command::QuerySummary { reply } => {
                if reply.send(self.battle.summary()).is_err() {
                    debug!(
                        target: "runtime::worker",
                        "QuerySummary reply channel closed (caller dropped)"
                    );
                }
            }
            Command::QueryLog { reply } => {
                if reply.send(self.battle.log().to_vec()).is_err() {
                    debug!(
                        target: "runtime::worker",
                        "QueryLog reply channel closed (caller dropped)"
                    );
                }
            }
            Command::LogDigest { reply } => {
                if reply.send(self.battle.log_digest()).is_err() {
                    debug!(
                        target: "runtime::worker",
                        "LogDigest reply channel closed (caller dropped)"
                    );
                }
            }
            Command::Shutdown { reply } => {
                // `run` intercepts shutdown before dispatching.
                let _ = reply.send(());
            }
        }
    }

    fn handle_begin_turn(&mut self) -> Result<TurnStart> {
        let already_pending = self.battle.pending_cast().is_some();
        let start = self.battle.begin_turn()?;

        match &start {
            TurnStart::Resolved(action) => {
                self.record(action.clone())?;
            }
            TurnStart::AwaitingTarget(pending) if !already_pending => {
                debug!(
                    target: "runtime::worker",
                    caster = %pending.caster_id(),
                    ability = %pending.ability.name,
                    candidates = pending.candidates.len(),
                    "awaiting target selection"
                );
                self.event_bus.publish(Event::Target(TargetEvent::Requested {
                    battle_id: self.battle.battle_id().to_owned(),
                    pending: pending.clone(),
                    timeout_ms: self.target_timeout_ms,
                }));
            }
            TurnStart::AwaitingTarget(_) => {}
        }

        Ok(start)
    }

    /// Persists and publishes a freshly resolved action.
    ///
    /// The action is appended to the repository before any subscriber sees it.
    /// A repository failure is reported to the caller, but the battle itself
    /// has already advanced.
    fn record(&mut self, action: Action) -> Result<Action> {
        if let Some(repository) = self.repository.as_mut() {
            let entry = ActionLogEntry::new(self.battle.battle_id(), action.clone());
            if let Err(err) = repository.append(&entry) {
                error!(
                    target: "runtime::worker",
                    battle_id = self.battle.battle_id(),
                    turn = action.turn,
                    error = %err,
                    "failed to persist action"
                );
                return Err(err.into());
            }
        }

        debug!(
            target: "runtime::worker",
            battle_id = self.battle.battle_id(),
            turn = action.turn,
            caster = %action.caster.instance_id,
            kind = ?action.kind,
            damage = action.total_damage(),
            "turn resolved"
        );

        self.event_bus.publish(Event::Turn(TurnEvent::Resolved {
            action: Box::new(action.clone()),
            snapshot: Box::new(self.battle.snapshot()),
        }));

        self.publish_end_if_complete();
        Ok(action)
    }

    fn publish_end_if_complete(&mut self) {
        if self.ended_published {
            return;
        }
        let Some(summary) = self.battle.summary() else {
            return;
        };
        self.ended_published = true;

        info!(
            target: "runtime::worker",
            battle_id = %summary.battle_id,
            winner = %summary.winner,
            turns = summary.turns,
            digest = %hex::encode(self.battle.log_digest()),
            "battle ended"
        );

        self.flush_repository();
        self.event_bus.publish(Event::Battle(BattleEvent::Ended {
            summary: Box::new(summary),
        }));
    }

    fn flush_repository(&mut self) {
        if let Some(repository) = self.repository.as_mut()
            && let Err(err) = repository.flush()
        {
            error!(
                target: "runtime::worker",
                log = repository.session_id(),
                error = %err,
                "failed to flush action log"
            );
        }
    }
}
