//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, repositories, and target providers
//! so clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use battle_core::{ErrorSeverity, GameError, TurnError};

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Turn(#[from] TurnError),

    #[error("battle worker command channel closed")]
    CommandChannelClosed,

    #[error("battle worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("battle worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("target selection channel closed")]
    TargetChannelClosed,

    #[error("runtime requires a battle to be configured before building")]
    MissingBattle,

    #[error("battle {battle_id} is already registered")]
    DuplicateBattle { battle_id: String },
}

impl RuntimeError {
    /// Whether the caller may retry the request against the same battle.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RuntimeError::Turn(err) => err.severity(),
            RuntimeError::DuplicateBattle { .. } | RuntimeError::MissingBattle => {
                ErrorSeverity::Validation
            }
            _ => ErrorSeverity::Terminal,
        }
    }
}
