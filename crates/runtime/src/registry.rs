//! Index of live battles by id.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::api::{BattleHandle, Result, RuntimeError};

/// Shared map from battle id to the handle of its worker.
///
/// Clones share the same map.
#[derive(Clone, Default, Debug)]
pub struct BattleRegistry {
    battles: Arc<RwLock<HashMap<String, BattleHandle>>>,
}

impl BattleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a battle.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::DuplicateBattle`] if a battle with the same id is
    /// already tracked.
    pub async fn register(&self, handle: BattleHandle) -> Result<()> {
        let mut battles = self.battles.write().await;
        let battle_id = handle.battle_id().to_owned();
        if battles.contains_key(&battle_id) {
            return Err(RuntimeError::DuplicateBattle { battle_id });
        }
        tracing::debug!(target: "runtime::registry", %battle_id, "battle registered");
        battles.insert(battle_id, handle);
        Ok(())
    }

    pub async fn get(&self, battle_id: &str) -> Option<BattleHandle> {
        self.battles.read().await.get(battle_id).cloned()
    }

    pub async fn remove(&self, battle_id: &str) -> Option<BattleHandle> {
        self.battles.write().await.remove(battle_id)
    }

    pub async fn len(&self) -> usize {
        self.battles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.battles.read().await.is_empty()
    }

    /// Tracked ids in sorted order.
    pub async fn battle_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.battles.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Drop battles that have ended or whose worker is gone.
    ///
    /// Returns the removed ids in sorted order.
    pub async fn prune_completed(&self) -> Vec<String> {
        let handles: Vec<BattleHandle> = self.battles.read().await.values().cloned().collect();

        let mut finished = Vec::new();
        for handle in handles {
            let done = handle.is_closed() || !matches!(handle.summary().await, Ok(None));
            if done {
                finished.push(handle.battle_id().to_owned());
            }
        }

        if !finished.is_empty() {
            let mut battles = self.battles.write().await;
            for battle_id in &finished {
                battles.remove(battle_id);
            }
        }

        finished.sort();
        finished
    }
}
