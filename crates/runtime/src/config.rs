//! Runtime configuration and environment loading.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Capacity of each event topic channel.
    pub event_buffer_size: usize,
    /// Capacity of the worker command channel.
    pub command_buffer_size: usize,
    /// How long a player gets to pick a target before one is picked for them.
    pub target_selection_timeout: Duration,
    /// Directory for persisted action logs. `None` keeps logs in memory only.
    pub log_dir: Option<PathBuf>,
}

impl RuntimeConfig {
    pub const DEFAULT_EVENT_BUFFER: usize = 100;
    pub const DEFAULT_COMMAND_BUFFER: usize = 32;
    pub const DEFAULT_TARGET_TIMEOUT_MS: u64 = 10_000;

    /// Construct configuration from process environment variables.
    ///
    /// - `BATTLE_EVENT_BUFFER`
    /// - `BATTLE_COMMAND_BUFFER`
    /// - `TARGET_SELECTION_TIMEOUT_MS`
    /// - `BATTLE_LOG_DIR`
    ///
    /// Unset or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(capacity) = read_env::<usize>("BATTLE_EVENT_BUFFER") {
            config.event_buffer_size = capacity.max(1);
        }

        if let Some(capacity) = read_env::<usize>("BATTLE_COMMAND_BUFFER") {
            config.command_buffer_size = capacity.max(1);
        }

        if let Some(millis) = read_env::<u64>("TARGET_SELECTION_TIMEOUT_MS") {
            config.target_selection_timeout = Duration::from_millis(millis);
        }

        if let Some(dir) = env::var_os("BATTLE_LOG_DIR").filter(|dir| !dir.is_empty()) {
            config.log_dir = Some(PathBuf::from(dir));
        }

        config
    }

    pub fn with_target_selection_timeout(mut self, timeout: Duration) -> Self {
        self.target_selection_timeout = timeout;
        self
    }

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    /// Platform data directory for battle logs, e.g.
    /// `~/.local/share/toy-battle/battles` on Linux.
    pub fn default_log_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "toy-battle")
            .map(|dirs| dirs.data_dir().join("battles"))
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: Self::DEFAULT_EVENT_BUFFER,
            command_buffer_size: Self::DEFAULT_COMMAND_BUFFER,
            target_selection_timeout: Duration::from_millis(Self::DEFAULT_TARGET_TIMEOUT_MS),
            log_dir: None,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
