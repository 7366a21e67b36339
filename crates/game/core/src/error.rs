//! Common error infrastructure for battle-core.
//!
//! Domain-specific errors (e.g. [`crate::engine::TurnError`]) live next to the
//! code that raises them. This module only defines the classification shared by
//! all of them so the runtime can pick a logging level and recovery strategy
//! without matching on every variant.
//!
//! Note that most malformed input never becomes an error at all: missing
//! numeric fields fall back to defaults, invalid explicit targets fall back to
//! automatic targeting, and empty target lists are legal no-op turns.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Invalid request for the current battle phase. The battle itself is
    /// intact; the caller should not retry the same request.
    ///
    /// Examples: completing a turn that was never begun.
    Validation,

    /// The battle has reached a terminal state and can no longer advance.
    ///
    /// Examples: resolving a turn after the winner has been decided.
    Terminal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Terminal => "terminal",
        }
    }

    /// Returns true if the battle can still progress after this error.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Validation)
    }
}

/// Common trait for all battle-core errors.
///
/// - Use `#[derive(thiserror::Error)]` for the Display/Error impl
/// - Classify severity by whether the battle can continue, not by impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for metrics labels and test assertions.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
