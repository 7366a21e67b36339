//! Roster loader.
//!
//! Loads lists of [`RawCharacter`] from RON or TOML files.

use std::path::Path;

use battle_core::RawCharacter;
use ron::extensions::Extensions;
use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};

/// File formats understood by [`RosterLoader`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RosterFormat {
    /// A top-level list of characters. `Option` fields may be written bare.
    Ron,
    /// A `[[characters]]` array of tables.
    Toml,
}

impl RosterFormat {
    /// Picks the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> LoadResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("ron") => Ok(Self::Ron),
            Some("toml") => Ok(Self::Toml),
            _ => Err(anyhow::anyhow!(
                "Unsupported roster file {}: expected a .ron or .toml extension",
                path.display()
            )),
        }
    }
}

#[derive(Deserialize)]
struct TomlRoster {
    #[serde(default)]
    characters: Vec<RawCharacter>,
}

/// Loader for character rosters.
pub struct RosterLoader;

impl RosterLoader {
    /// Load a roster, picking the format from the file extension.
    ///
    /// # Returns
    ///
    /// Returns the characters in file order.
    pub fn load(path: &Path) -> LoadResult<Vec<RawCharacter>> {
        let format = RosterFormat::from_path(path)?;
        let content = read_file(path)?;
        Self::parse(&content, format)
            .map_err(|e| anyhow::anyhow!("Failed to load roster {}: {}", path.display(), e))
    }

    /// Parse roster text in the given format.
    pub fn parse(content: &str, format: RosterFormat) -> LoadResult<Vec<RawCharacter>> {
        match format {
            RosterFormat::Ron => Self::from_ron_str(content),
            RosterFormat::Toml => Self::from_toml_str(content),
        }
    }

    /// RON format: `[(id: "teddy", name: "Teddy", abilities: [...]), ...]`
    pub fn from_ron_str(content: &str) -> LoadResult<Vec<RawCharacter>> {
        ron::Options::default()
            .with_default_extension(Extensions::IMPLICIT_SOME)
            .from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse roster RON: {}", e))
    }

    /// TOML format: one `[[characters]]` table per character, abilities as
    /// `[[characters.abilities]]`.
    pub fn from_toml_str(content: &str) -> LoadResult<Vec<RawCharacter>> {
        let roster: TomlRoster = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse roster TOML: {}", e))?;
        Ok(roster.characters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::EffectKind;

    #[test]
    fn ron_roster_accepts_bare_optional_values() {
        let content = r#"[
            (
                id: "robot",
                name: "Robot",
                max_health: 140,
                abilities: [
                    (id: "zap", name: "Zap", chance: 0.7, effect: damage_chain, damage: 25),
                    (id: "oil", name: "Oil Up", chance: 0.3, effect: shield, shield: 30),
                ],
            ),
        ]"#;

        let roster = RosterLoader::from_ron_str(content).unwrap();

        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].max_health, Some(140));
        assert_eq!(roster[0].abilities[0].effect, EffectKind::DamageChain);
        assert_eq!(roster[0].abilities[1].shield, Some(30));
        assert_eq!(roster[0].emoji, None);
    }

    #[test]
    fn toml_roster_reads_character_tables() {
        let content = r#"
            [[characters]]
            id = "duck"
            name = "Rubber Duck"

            [[characters.abilities]]
            id = "quack"
            name = "Quack"
            chance = 1.0
            effect = "freeze_all"
        "#;

        let roster = RosterLoader::from_toml_str(content).unwrap();

        assert_eq!(roster[0].max_health, None);
        assert_eq!(roster[0].abilities[0].effect, EffectKind::FreezeAll);
        assert!(roster[0].abilities[0].applies_freeze());
    }

    #[test]
    fn unknown_effect_tags_survive_loading() {
        let content = r#"
            [[characters]]
            id = "ghost"
            name = "Ghost"

            [[characters.abilities]]
            id = "boo"
            name = "Boo"
            chance = 1.0
            effect = "haunt"
            damage = 12
        "#;

        let roster = RosterLoader::from_toml_str(content).unwrap();

        assert_eq!(roster[0].abilities[0].effect, EffectKind::Unknown);
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(RosterFormat::from_path(Path::new("team.RON")).unwrap(), RosterFormat::Ron);
        assert_eq!(RosterFormat::from_path(Path::new("a/b.toml")).unwrap(), RosterFormat::Toml);
        assert!(RosterFormat::from_path(Path::new("team.json")).is_err());
        assert!(RosterFormat::from_path(Path::new("team")).is_err());
    }
}
