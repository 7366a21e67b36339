//! Character catalog keyed by character id.

use std::collections::BTreeMap;
use std::path::Path;

use battle_core::RawCharacter;

use crate::loaders::{LoadResult, RosterLoader};

/// Starter characters shipped with the crate.
const BUILTIN_CATALOG: &str = include_str!("../../data/starter_catalog.ron");

/// Pool of characters that teams are assembled from.
#[derive(Clone, Debug, Default)]
pub struct CharacterCatalog {
    characters: BTreeMap<String, RawCharacter>,
}

impl CharacterCatalog {
    /// Builds a catalog, rejecting duplicate or empty ids.
    pub fn from_characters(characters: Vec<RawCharacter>) -> LoadResult<Self> {
        let mut map = BTreeMap::new();
        for character in characters {
            if character.id.is_empty() {
                anyhow::bail!("Character '{}' has an empty id", character.name);
            }
            let id = character.id.clone();
            if map.insert(id.clone(), character).is_some() {
                anyhow::bail!("Duplicate character id '{}' in catalog", id);
            }
        }
        Ok(Self { characters: map })
    }

    /// Load a catalog from a RON or TOML roster file.
    pub fn load(path: &Path) -> LoadResult<Self> {
        let characters = RosterLoader::load(path)?;
        Self::from_characters(characters)
            .map_err(|e| anyhow::anyhow!("Invalid catalog {}: {}", path.display(), e))
    }

    /// The embedded starter catalog.
    pub fn builtin() -> LoadResult<Self> {
        let characters = RosterLoader::from_ron_str(BUILTIN_CATALOG)?;
        Self::from_characters(characters)
    }

    pub fn get(&self, id: &str) -> Option<&RawCharacter> {
        self.characters.get(id)
    }

    /// Character ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.characters.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Resolves a team from character ids, in the given order.
    ///
    /// The same id may appear more than once; the engine gives every copy its
    /// own instance id.
    pub fn team<S: AsRef<str>>(&self, ids: &[S]) -> LoadResult<Vec<RawCharacter>> {
        ids.iter()
            .map(|id| {
                let id = id.as_ref();
                self.get(id)
                    .cloned()
                    .ok_or_else(|| anyhow::anyhow!("Unknown character id '{}'", id))
            })
            .collect()
    }
}
