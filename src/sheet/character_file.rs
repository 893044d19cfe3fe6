//! TOML character files
//!
//! A character file carries everything a player enters in the form: scores,
//! acquired skills, name, faction and an optional portrait path resolved
//! relative to the file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::InputError;

use super::model::{AttributeGroup, Faction, Score, Scores, SheetRequest, Skill, SkillFlags};

/// Portraits above this size are not loaded
pub const MAX_PORTRAIT_BYTES: u64 = 10 * 1024 * 1024;

/// TOML structure for deserializing character files
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlCharacter {
    name: Option<String>,
    faction: Option<String>,
    portrait: Option<PathBuf>,
    #[serde(default)]
    scores: HashMap<String, ScoreInput>,
    skills: Option<TomlSkills>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlSkills {
    #[serde(default)]
    acquired: Vec<String>,
}

/// Scores may be written as numbers or as the raw form text
#[derive(Deserialize)]
#[serde(untagged)]
enum ScoreInput {
    Number(u32),
    Text(String),
}

/// A parsed character file; the portrait is still a path
#[derive(Debug, Clone, Default)]
pub struct CharacterFile {
    pub request: SheetRequest,
    pub portrait_path: Option<PathBuf>,
}

impl CharacterFile {
    /// Load a character file and the portrait it references.
    ///
    /// An unreadable or oversized portrait is skipped with a warning.
    pub fn from_file(path: &Path) -> Result<Self, InputError> {
        let content = std::fs::read_to_string(path)?;
        let mut file = Self::from_str(&content)?;

        if let Some(portrait) = &file.portrait_path {
            let resolved = match path.parent() {
                Some(dir) if portrait.is_relative() => dir.join(portrait),
                _ => portrait.clone(),
            };
            file.request.portrait = read_portrait(&resolved);
            file.portrait_path = Some(resolved);
        }

        Ok(file)
    }

    /// Parse a character file from a TOML string without touching the portrait
    pub fn from_str(content: &str) -> Result<Self, InputError> {
        let parsed: TomlCharacter = toml::from_str(content)?;

        let mut scores = Scores::default();
        for (key, input) in &parsed.scores {
            let group = AttributeGroup::ALL
                .iter()
                .copied()
                .find(|g| g.name() == key.to_ascii_lowercase())
                .ok_or_else(|| InputError::UnknownGroup(key.clone()))?;
            let score = match input {
                ScoreInput::Number(n) => Score::new(*n),
                ScoreInput::Text(text) => Score::parse(group, text)?,
            };
            scores.set(group, score);
        }

        let skills = match &parsed.skills {
            Some(s) => s
                .acquired
                .iter()
                .map(|name| name.parse::<Skill>())
                .collect::<Result<SkillFlags, _>>()?,
            None => SkillFlags::default(),
        };

        let faction = match &parsed.faction {
            Some(f) => f.parse::<Faction>()?,
            None => Faction::default(),
        };

        Ok(CharacterFile {
            request: SheetRequest {
                scores,
                skills,
                name: parsed.name.unwrap_or_default(),
                faction,
                portrait: None,
            },
            portrait_path: parsed.portrait,
        })
    }
}

/// Read portrait bytes, degrading to `None` on any problem
pub fn read_portrait(path: &Path) -> Option<Vec<u8>> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.len() > MAX_PORTRAIT_BYTES => {
            log::warn!(
                "portrait '{}' is {:.1} MiB, over the 10 MiB limit; skipping",
                path.display(),
                meta.len() as f64 / (1024.0 * 1024.0)
            );
            return None;
        }
        Ok(_) => {}
        Err(e) => {
            log::warn!("portrait '{}' unavailable: {}; skipping", path.display(), e);
            return None;
        }
    }
    match std::fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            log::warn!("failed to read portrait '{}': {}; skipping", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_character() {
        let toml_str = r#"
name = "Kiri"
faction = "tsukumogami"
portrait = "kiri.png"

[scores]
body = 3
technique = "2"
spirit = ""

[skills]
acquired = ["melee", "stealth", "容姿"]
"#;
        let file = CharacterFile::from_str(toml_str).expect("Should parse");
        let request = &file.request;
        assert_eq!(request.name, "Kiri");
        assert_eq!(request.faction, Faction::Tsukumogami);
        assert_eq!(request.scores.get(AttributeGroup::Body), Score::new(3));
        assert_eq!(request.scores.get(AttributeGroup::Technique), Score::new(2));
        assert!(request.scores.get(AttributeGroup::Spirit).is_blank());
        assert!(request.scores.get(AttributeGroup::Social).is_blank());
        assert!(request.skills.is_acquired(Skill::Melee));
        assert!(request.skills.is_acquired(Skill::Stealth));
        assert!(request.skills.is_acquired(Skill::Appearance));
        assert_eq!(request.skill_value(Skill::Stealth), 3);
        assert_eq!(file.portrait_path, Some(PathBuf::from("kiri.png")));
        assert!(request.portrait.is_none());
    }

    #[test]
    fn test_parse_empty_character_uses_defaults() {
        let file = CharacterFile::from_str("").expect("Should parse");
        assert_eq!(file.request.display_name(), "No Name");
        assert_eq!(file.request.faction, Faction::Fugeki);
        assert_eq!(file.request.skills.acquired().count(), 0);
    }

    #[test]
    fn test_invalid_score_text_is_rejected() {
        let result = CharacterFile::from_str("[scores]\nbody = \"3x\"\n");
        assert!(matches!(result, Err(InputError::InvalidScore { .. })));
    }

    #[test]
    fn test_unknown_group_is_rejected() {
        let result = CharacterFile::from_str("[scores]\nluck = 2\n");
        assert!(matches!(result, Err(InputError::UnknownGroup(_))));
    }

    #[test]
    fn test_unknown_skill_is_rejected() {
        let result = CharacterFile::from_str("[skills]\nacquired = [\"lasers\"]\n");
        assert!(matches!(result, Err(InputError::UnknownSkill { .. })));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let result = CharacterFile::from_str("nickname = \"x\"\n");
        assert!(matches!(result, Err(InputError::ParseError(_))));
    }

    #[test]
    fn test_missing_portrait_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kiri.toml");
        std::fs::write(&path, "name = \"Kiri\"\nportrait = \"missing.png\"\n").unwrap();

        let file = CharacterFile::from_file(&path).expect("Should load");
        assert!(file.request.portrait.is_none());
        assert_eq!(file.portrait_path, Some(dir.path().join("missing.png")));
    }

    #[test]
    fn test_relative_portrait_is_read() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("p.png"), b"not really a png").unwrap();
        let path = dir.path().join("c.toml");
        std::fs::write(&path, "portrait = \"p.png\"\n").unwrap();

        let file = CharacterFile::from_file(&path).expect("Should load");
        assert_eq!(file.request.portrait.as_deref(), Some(&b"not really a png"[..]));
    }
}
