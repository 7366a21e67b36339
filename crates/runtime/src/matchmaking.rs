//! First-come, first-served pairing of queued players.
//!
//! The matchmaker only pairs players and mints battle ids. Starting the
//! battle is left to the caller, usually through [`crate::BattleRuntime`].

use std::collections::VecDeque;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

use battle_core::RawCharacter;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatchmakingError {
    #[error("player {player_id} is already queued")]
    AlreadyQueued { player_id: String },

    #[error("player {player_id} has an empty roster")]
    EmptyRoster { player_id: String },
}

/// A player waiting for an opponent.
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedPlayer {
    pub player_id: String,
    pub roster: Vec<RawCharacter>,
    pub enqueued_at: DateTime<Utc>,
}

/// Two players matched into a new battle.
///
/// The player who queued first plays team 1 and therefore acts first.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchPairing {
    pub battle_id: String,
    pub team1: QueuedPlayer,
    pub team2: QueuedPlayer,
}

#[derive(Debug, Default)]
pub struct Matchmaker {
    queue: VecDeque<QueuedPlayer>,
    matches_made: u64,
}

impl Matchmaker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a player, pairing them with the longest-waiting player if any.
    pub fn enqueue(
        &mut self,
        player_id: impl Into<String>,
        roster: Vec<RawCharacter>,
    ) -> Result<Option<MatchPairing>, MatchmakingError> {
        self.enqueue_at(player_id, roster, Utc::now())
    }

    /// [`Self::enqueue`] with an explicit timestamp.
    pub fn enqueue_at(
        &mut self,
        player_id: impl Into<String>,
        roster: Vec<RawCharacter>,
        now: DateTime<Utc>,
    ) -> Result<Option<MatchPairing>, MatchmakingError> {
        let player_id = player_id.into();
        if roster.is_empty() {
            return Err(MatchmakingError::EmptyRoster { player_id });
        }
        if self.is_queued(&player_id) {
            return Err(MatchmakingError::AlreadyQueued { player_id });
        }

        let player = QueuedPlayer {
            player_id,
            roster,
            enqueued_at: now,
        };

        let Some(opponent) = self.queue.pop_front() else {
            tracing::debug!(
                target: "runtime::matchmaking",
                player_id = %player.player_id,
                "player queued"
            );
            self.queue.push_back(player);
            return Ok(None);
        };

        self.matches_made += 1;
        let battle_id = format!("battle_{}_{}", now.timestamp_millis(), self.matches_made);

        tracing::info!(
            target: "runtime::matchmaking",
            %battle_id,
            team1 = %opponent.player_id,
            team2 = %player.player_id,
            "players matched"
        );

        Ok(Some(MatchPairing {
            battle_id,
            team1: opponent,
            team2: player,
        }))
    }

    /// Remove a player from the queue. Returns whether they were queued.
    pub fn cancel(&mut self, player_id: &str) -> bool {
        let before = self.queue.len();
        self.queue.retain(|queued| queued.player_id != player_id);
        self.queue.len() != before
    }

    /// Remove and return players who waited longer than `max_wait`.
    pub fn expire(&mut self, max_wait: Duration, now: DateTime<Utc>) -> Vec<QueuedPlayer> {
        let Ok(max_wait) = chrono::Duration::from_std(max_wait) else {
            return Vec::new();
        };

        let (expired, waiting): (Vec<_>, Vec<_>) = self
            .queue
            .drain(..)
            .partition(|queued| now - queued.enqueued_at > max_wait);
        self.queue = waiting.into();
        expired
    }

    pub fn is_queued(&self, player_id: &str) -> bool {
        self.queue.iter().any(|queued| queued.player_id == player_id)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
