use std::sync::{Arc, Mutex};

use super::{ActionLogEntry, ActionRepository, RepositoryError, Result};

/// In-memory action log.
///
/// Clones share the same storage, so a caller can keep one clone to inspect
/// what a worker wrote.
#[derive(Clone, Debug, Default)]
pub struct InMemoryActionLog {
    entries: Arc<Mutex<Vec<ActionLogEntry>>>,
}

impl InMemoryActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Result<Vec<ActionLogEntry>> {
        let guard = self
            .entries
            .lock()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(guard.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ActionRepository for InMemoryActionLog {
    fn append(&mut self, entry: &ActionLogEntry) -> Result<u64> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        guard.push(entry.clone());
        Ok((guard.len() - 1) as u64)
    }

    fn read_all(&mut self) -> Result<Vec<ActionLogEntry>> {
        self.entries()
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn session_id(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{Action, CombatantId, CombatantSnapshot, SkipReason, Status, TeamTag};

    fn skipped(turn: u32) -> Action {
        let caster = CombatantSnapshot {
            instance_id: CombatantId::new("team1-duck-0"),
            name: "Duck".into(),
            team: TeamTag::Team1,
            max_health: 100,
            current_health: 100,
            is_alive: true,
            shields: 0,
            status: Status::default(),
        };
        Action::skipped(turn, caster, SkipReason::Frozen, 0)
    }

    #[test]
    fn clones_share_storage() {
        let log = InMemoryActionLog::new();
        let mut writer = log.clone();

        assert_eq!(writer.append(&ActionLogEntry::new("b", skipped(1))).unwrap(), 0);
        assert_eq!(writer.append(&ActionLogEntry::new("b", skipped(2))).unwrap(), 1);

        let turns: Vec<u32> = log.entries().unwrap().iter().map(|e| e.turn).collect();
        assert_eq!(turns, vec![1, 2]);
        assert_eq!(log.len(), 2);
    }
}
