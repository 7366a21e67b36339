//! Command-line battle runner.
//!
//! Loads two rosters, drives one battle to completion with automatic
//! targeting and prints a JSON report on stdout. Tracing output goes to a
//! per-battle log file so stdout stays machine-readable.
mod config;
mod report;

use std::path::PathBuf;

use anyhow::{Context, Result};
use battle_content::{CharacterCatalog, RawCharacter, RosterLoader};
use battle_core::Battle;
use battle_runtime::BattleRuntime;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use config::{CliConfig, TeamSource};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = CliConfig::from_env();
    let battle_id = config
        .battle_id
        .clone()
        .unwrap_or_else(|| format!("battle_{}", chrono::Utc::now().timestamp_millis()));

    let _guard = setup_logging(config.log_dir.clone(), &battle_id)?;

    let (team1, team2) = load_teams(&config)?;
    tracing::info!(
        %battle_id,
        team1 = team1.len(),
        team2 = team2.len(),
        "starting battle"
    );

    let mut runtime = BattleRuntime::builder()
        .config(config.runtime.clone())
        .battle(Battle::start(battle_id.as_str(), &team1, &team2))
        .build()
        .await?;

    let summary = runtime.run().await?;
    let handle = runtime.handle();
    let log = handle.action_log().await?;
    let digest = handle.log_digest().await?;
    runtime.shutdown().await?;

    let report = report::render(&summary, &log, &digest, config.output);
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

fn load_teams(config: &CliConfig) -> Result<(Vec<RawCharacter>, Vec<RawCharacter>)> {
    let needs_catalog = matches!(config.team1, TeamSource::Catalog(_))
        || matches!(config.team2, TeamSource::Catalog(_));

    let catalog = if !needs_catalog {
        None
    } else if let Some(path) = &config.catalog {
        Some(CharacterCatalog::load(path)?)
    } else {
        Some(CharacterCatalog::builtin()?)
    };

    let team1 = load_team(&config.team1, catalog.as_ref()).context("Failed to load team 1")?;
    let team2 = load_team(&config.team2, catalog.as_ref()).context("Failed to load team 2")?;
    Ok((team1, team2))
}

fn load_team(source: &TeamSource, catalog: Option<&CharacterCatalog>) -> Result<Vec<RawCharacter>> {
    match (source, catalog) {
        (TeamSource::File(path), _) => RosterLoader::load(path),
        (TeamSource::Catalog(ids), Some(catalog)) => catalog.team(ids.as_slice()),
        (TeamSource::Catalog(_), None) => anyhow::bail!("No catalog loaded"),
    }
}

/// Setup logging to a file under a per-battle directory.
///
/// The returned guard flushes the file writer when dropped.
fn setup_logging(log_dir: Option<PathBuf>, battle_id: &str) -> Result<WorkerGuard> {
    let battle_log_dir = log_dir.unwrap_or_else(default_log_directory).join(battle_id);
    std::fs::create_dir_all(&battle_log_dir)
        .with_context(|| format!("Failed to create log directory {}", battle_log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&battle_log_dir, "battle.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    tracing::info!("Logging initialized: battle={}", battle_id);
    tracing::info!("Log file: {}/battle.log", battle_log_dir.display());

    Ok(guard)
}

/// Platform cache directory for CLI logs, e.g. `~/.cache/toy-battle/logs`.
fn default_log_directory() -> PathBuf {
    directories::ProjectDirs::from("", "", "toy-battle")
        .map(|dirs| dirs.cache_dir().join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("toy-battle").join("logs"))
}
