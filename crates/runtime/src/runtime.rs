//! High-level battle orchestrator.
//!
//! The runtime owns the battle worker, wires up command/event channels, and
//! exposes a builder-based API for clients to drive a battle to completion.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use battle_core::{Action, Battle, BattleSummary, LcgRng, RandomSource, TeamTag, TurnStart};

use crate::api::{AutoTargetProvider, BattleHandle, Result, RuntimeError, TargetProvider};
use crate::config::RuntimeConfig;
use crate::events::{Event, EventBus, TargetEvent};
use crate::repository::{ActionRepository, FileActionLog};
use crate::workers::{BattleWorker, Command};

/// Main runtime that orchestrates one battle
///
/// Design: the runtime owns the worker and the per-team target providers.
/// [`BattleHandle`] provides a cloneable façade for clients.
pub struct BattleRuntime {
    handle: BattleHandle,
    /// Indexed by [`TeamTag::index`].
    providers: [Box<dyn TargetProvider>; 2],
    worker: JoinHandle<()>,
}

impl BattleRuntime {
    /// Create a new runtime builder
    pub fn builder() -> BattleRuntimeBuilder {
        BattleRuntimeBuilder::new()
    }

    /// Get a cloneable handle to this battle
    pub fn handle(&self) -> BattleHandle {
        self.handle.clone()
    }

    pub fn battle_id(&self) -> &str {
        self.handle.battle_id()
    }

    /// Resolve one turn, asking the acting team's provider for a target when
    /// the selected ability allows a choice.
    pub async fn step(&mut self) -> Result<Action> {
        let pending = match self.handle.begin_turn().await? {
            TurnStart::Resolved(action) => return Ok(action),
            TurnStart::AwaitingTarget(pending) => pending,
        };

        let snapshot = self.handle.query_state().await?;
        let provider = &self.providers[pending.caster.team.index()];
        let choice = provider.choose_target(&pending, &snapshot).await?;

        self.handle
            .event_bus()
            .publish(Event::Target(TargetEvent::Selected {
                battle_id: self.handle.battle_id().to_owned(),
                caster: pending.caster_id().clone(),
                target: choice.target.clone(),
                timed_out: choice.timed_out,
            }));

        self.handle.complete_turn(choice.target).await
    }

    /// Run turns until a winner is decided.
    pub async fn run(&mut self) -> Result<BattleSummary> {
        loop {
            if let Some(summary) = self.handle.summary().await? {
                return Ok(summary);
            }
            self.step().await?;
        }
    }

    /// Replace the target provider of one team
    pub fn set_team_provider(&mut self, team: TeamTag, provider: impl TargetProvider + 'static) {
        self.providers[team.index()] = Box::new(provider);
    }

    /// Flush the action log, stop the worker and wait for it to exit.
    ///
    /// Other clones of the handle stop working once this returns.
    pub async fn shutdown(self) -> Result<()> {
        match self.handle.shutdown().await {
            Ok(())
            | Err(RuntimeError::CommandChannelClosed)
            | Err(RuntimeError::ReplyChannelClosed(_)) => {}
            Err(err) => return Err(err),
        }

        self.worker.await.map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`BattleRuntime`] with flexible configuration.
pub struct BattleRuntimeBuilder<R: RandomSource = LcgRng> {
    config: RuntimeConfig,
    battle: Option<Battle<R>>,
    providers: [Option<Box<dyn TargetProvider>>; 2],
    repository: Option<Box<dyn ActionRepository>>,
    event_bus: Option<EventBus>,
}

impl BattleRuntimeBuilder<LcgRng> {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            battle: None,
            providers: [None, None],
            repository: None,
            event_bus: None,
        }
    }
}

impl<R> BattleRuntimeBuilder<R>
where
    R: RandomSource + Send + 'static,
{
    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the battle to run (required)
    pub fn battle<R2>(self, battle: Battle<R2>) -> BattleRuntimeBuilder<R2>
    where
        R2: RandomSource + Send + 'static,
    {
        BattleRuntimeBuilder {
            config: self.config,
            battle: Some(battle),
            providers: self.providers,
            repository: self.repository,
            event_bus: self.event_bus,
        }
    }

    /// Set the target provider of one team. Defaults to [`AutoTargetProvider`].
    pub fn team_provider(mut self, team: TeamTag, provider: impl TargetProvider + 'static) -> Self {
        self.providers[team.index()] = Some(Box::new(provider));
        self
    }

    /// Record actions into `repository`.
    ///
    /// Takes precedence over `config.log_dir`.
    pub fn repository(mut self, repository: impl ActionRepository + 'static) -> Self {
        self.repository = Some(Box::new(repository));
        self
    }

    /// Publish into an existing bus, e.g. one a caller already subscribed to
    /// so it does not miss the start event.
    pub fn event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    /// Build the runtime and spawn its worker.
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn build(self) -> Result<BattleRuntime> {
        let battle = self.battle.ok_or(RuntimeError::MissingBattle)?;
        let battle_id = battle.battle_id().to_owned();

        let repository = match (self.repository, &self.config.log_dir) {
            (Some(repository), _) => Some(repository),
            (None, Some(dir)) => {
                let log = FileActionLog::open_or_create(dir, log_filename(&battle_id))?;
                Some(Box::new(log) as Box<dyn ActionRepository>)
            }
            (None, None) => None,
        };

        let event_bus = self
            .event_bus
            .unwrap_or_else(|| EventBus::with_capacity(self.config.event_buffer_size));
        let (command_tx, command_rx) =
            mpsc::channel::<Command>(self.config.command_buffer_size.max(1));

        let handle = BattleHandle::new(battle_id.as_str(), command_tx, event_bus.clone());

        let worker = BattleWorker::new(
            battle,
            command_rx,
            event_bus,
            repository,
            self.config.target_selection_timeout.as_millis() as u64,
        );
        let worker = tokio::spawn(worker.run());

        let providers = self.providers.map(|provider| {
            provider.unwrap_or_else(|| Box::new(AutoTargetProvider) as Box<dyn TargetProvider>)
        });

        tracing::info!(target: "runtime", battle_id = %battle_id, "battle runtime started");

        Ok(BattleRuntime {
            handle,
            providers,
            worker,
        })
    }
}

/// Filesystem-safe log name for a battle id.
pub(crate) fn log_filename(battle_id: &str) -> String {
    let stem: String = battle_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{stem}.actions.log")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_filename_replaces_separators() {
        assert_eq!(log_filename("battle_1"), "battle_1.actions.log");
        assert_eq!(log_filename("a/b c"), "a_b_c.actions.log");
    }
}
