//! Environment-driven configuration for the battle CLI.
use std::env;
use std::path::PathBuf;

use battle_runtime::RuntimeConfig;

/// Where one team's roster comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TeamSource {
    /// Character ids looked up in the catalog.
    Catalog(Vec<String>),
    /// A RON or TOML roster file.
    File(PathBuf),
}

/// What gets printed once the battle ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Summary, digest and the full action log.
    #[default]
    Full,
    /// Summary and digest only.
    Summary,
}

#[derive(Clone, Debug)]
pub struct CliConfig {
    /// Seeds the battle. Generated from the current time when unset.
    pub battle_id: Option<String>,
    /// Catalog file; the built-in catalog is used when unset.
    pub catalog: Option<PathBuf>,
    pub team1: TeamSource,
    pub team2: TeamSource,
    pub output: OutputMode,
    /// Directory for the CLI's own tracing output.
    pub log_dir: Option<PathBuf>,
    pub runtime: RuntimeConfig,
}

impl CliConfig {
    pub const DEFAULT_TEAM1: [&'static str; 2] = ["teddy", "robot"];
    pub const DEFAULT_TEAM2: [&'static str; 2] = ["duck", "dragon"];

    /// Construct configuration from process environment variables.
    ///
    /// - `BATTLE_ID`
    /// - `BATTLE_CATALOG`
    /// - `BATTLE_TEAM1` / `BATTLE_TEAM2` (comma-separated catalog ids)
    /// - `BATTLE_TEAM1_FILE` / `BATTLE_TEAM2_FILE` (take precedence over ids)
    /// - `BATTLE_OUTPUT` (`full` or `summary`)
    /// - `BATTLE_CLI_LOG_DIR`
    ///
    /// Runtime settings come from [`RuntimeConfig::from_env`].
    pub fn from_env() -> Self {
        let mut config = Self {
            runtime: RuntimeConfig::from_env(),
            ..Self::default()
        };

        config.battle_id = read_env::<String>("BATTLE_ID").filter(|id| !id.trim().is_empty());
        config.catalog = read_path("BATTLE_CATALOG");
        config.log_dir = read_path("BATTLE_CLI_LOG_DIR");

        if let Some(source) = team_source("BATTLE_TEAM1") {
            config.team1 = source;
        }
        if let Some(source) = team_source("BATTLE_TEAM2") {
            config.team2 = source;
        }

        if let Some(output) = read_env::<String>("BATTLE_OUTPUT") {
            config.output = parse_output(&output).unwrap_or_default();
        }

        config
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            battle_id: None,
            catalog: None,
            team1: TeamSource::Catalog(Self::DEFAULT_TEAM1.map(String::from).to_vec()),
            team2: TeamSource::Catalog(Self::DEFAULT_TEAM2.map(String::from).to_vec()),
            output: OutputMode::default(),
            log_dir: None,
            runtime: RuntimeConfig::default(),
        }
    }
}

fn team_source(prefix: &str) -> Option<TeamSource> {
    if let Some(path) = read_path(&format!("{prefix}_FILE")) {
        return Some(TeamSource::File(path));
    }
    let ids = parse_ids(&read_env::<String>(prefix)?);
    (!ids.is_empty()).then_some(TeamSource::Catalog(ids))
}

pub(crate) fn parse_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_owned)
        .collect()
}

pub(crate) fn parse_output(raw: &str) -> Option<OutputMode> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "full" | "log" => Some(OutputMode::Full),
        "summary" => Some(OutputMode::Summary),
        _ => None,
    }
}

fn read_path(key: &str) -> Option<PathBuf> {
    env::var_os(key)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
