//! Core types describing a character sheet

use std::fmt;
use std::str::FromStr;

use crate::error::InputError;

/// One of the four stat categories, each aggregating five skills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttributeGroup {
    Body,
    Technique,
    Spirit,
    Social,
}

impl AttributeGroup {
    /// Groups in sheet display order
    pub const ALL: [AttributeGroup; 4] = [
        AttributeGroup::Body,
        AttributeGroup::Technique,
        AttributeGroup::Spirit,
        AttributeGroup::Social,
    ];

    /// Identifier used in character files and on the command line
    pub fn name(self) -> &'static str {
        match self {
            AttributeGroup::Body => "body",
            AttributeGroup::Technique => "technique",
            AttributeGroup::Spirit => "spirit",
            AttributeGroup::Social => "social",
        }
    }

    /// Label painted on the sheet
    pub fn label(self) -> &'static str {
        match self {
            AttributeGroup::Body => "身体",
            AttributeGroup::Technique => "技量",
            AttributeGroup::Spirit => "心魂",
            AttributeGroup::Social => "社会",
        }
    }

    /// The five skills of this group, signature skill first
    pub fn skills(self) -> [Skill; 5] {
        let start = self.index() * 5;
        [
            Skill::ALL[start],
            Skill::ALL[start + 1],
            Skill::ALL[start + 2],
            Skill::ALL[start + 3],
            Skill::ALL[start + 4],
        ]
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for AttributeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single skill; belongs to exactly one [`AttributeGroup`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Skill {
    // Body
    Melee,
    Athletics,
    Endurance,
    Piloting,
    Perception,
    // Technique
    Shooting,
    Medicine,
    Stealth,
    Crafting,
    Investigation,
    // Spirit
    Sorcery,
    Willpower,
    Insight,
    Performance,
    Lore,
    // Social
    Scheming,
    Culture,
    Negotiation,
    Cyber,
    Appearance,
}

impl Skill {
    /// All skills, grouped in display order
    pub const ALL: [Skill; 20] = [
        Skill::Melee,
        Skill::Athletics,
        Skill::Endurance,
        Skill::Piloting,
        Skill::Perception,
        Skill::Shooting,
        Skill::Medicine,
        Skill::Stealth,
        Skill::Crafting,
        Skill::Investigation,
        Skill::Sorcery,
        Skill::Willpower,
        Skill::Insight,
        Skill::Performance,
        Skill::Lore,
        Skill::Scheming,
        Skill::Culture,
        Skill::Negotiation,
        Skill::Cyber,
        Skill::Appearance,
    ];

    pub fn group(self) -> AttributeGroup {
        AttributeGroup::ALL[self.index() / 5]
    }

    /// The first skill of every group is its signature skill
    pub fn is_signature(self) -> bool {
        self.index() % 5 == 0
    }

    /// Identifier used in character files and on the command line
    pub fn name(self) -> &'static str {
        match self {
            Skill::Melee => "melee",
            Skill::Athletics => "athletics",
            Skill::Endurance => "endurance",
            Skill::Piloting => "piloting",
            Skill::Perception => "perception",
            Skill::Shooting => "shooting",
            Skill::Medicine => "medicine",
            Skill::Stealth => "stealth",
            Skill::Crafting => "crafting",
            Skill::Investigation => "investigation",
            Skill::Sorcery => "sorcery",
            Skill::Willpower => "willpower",
            Skill::Insight => "insight",
            Skill::Performance => "performance",
            Skill::Lore => "lore",
            Skill::Scheming => "scheming",
            Skill::Culture => "culture",
            Skill::Negotiation => "negotiation",
            Skill::Cyber => "cyber",
            Skill::Appearance => "appearance",
        }
    }

    /// Label painted on the sheet; signature skills carry a leading star
    pub fn label(self) -> &'static str {
        match self {
            Skill::Melee => "★白兵",
            Skill::Athletics => "運動",
            Skill::Endurance => "頑健",
            Skill::Piloting => "操縦",
            Skill::Perception => "知覚",
            Skill::Shooting => "★射撃",
            Skill::Medicine => "医療",
            Skill::Stealth => "隠密",
            Skill::Crafting => "工作",
            Skill::Investigation => "捜査",
            Skill::Sorcery => "★呪法",
            Skill::Willpower => "意志",
            Skill::Insight => "看破",
            Skill::Performance => "芸能",
            Skill::Lore => "伝承",
            Skill::Scheming => "★策謀",
            Skill::Culture => "教養",
            Skill::Negotiation => "交渉",
            Skill::Cyber => "電脳",
            Skill::Appearance => "容姿",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Skill {
    type Err = InputError;

    /// Accepts the identifier (case-insensitive) or the sheet label with or
    /// without its star
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        let lowered = wanted.to_ascii_lowercase();
        let unstarred = wanted.trim_start_matches('★');
        Skill::ALL
            .iter()
            .copied()
            .find(|skill| {
                skill.name() == lowered || skill.label().trim_start_matches('★') == unstarred
            })
            .ok_or_else(|| {
                let names = Skill::ALL.iter().map(|s| s.name());
                InputError::unknown_skill(wanted, super::find_similar(names, &lowered, 2))
            })
    }
}

/// Returns true when the input consists of ASCII digits only.
///
/// The empty string is accepted; it stands for a score not yet entered.
pub fn is_numeric_input(input: &str) -> bool {
    input.bytes().all(|b| b.is_ascii_digit())
}

/// A group base score. `None` is a blank entry, which is shown blank but
/// counts as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score(Option<u32>);

impl Score {
    pub fn new(value: u32) -> Self {
        Self(Some(value))
    }

    pub fn blank() -> Self {
        Self(None)
    }

    /// Parse raw form input for `group`; only `[0-9]*` is accepted
    pub fn parse(group: AttributeGroup, input: &str) -> Result<Self, InputError> {
        if !is_numeric_input(input) {
            return Err(InputError::InvalidScore {
                group,
                value: input.to_string(),
            });
        }
        if input.is_empty() {
            return Ok(Self::blank());
        }
        input
            .parse::<u32>()
            .map(Self::new)
            .map_err(|_| InputError::ScoreOutOfRange {
                group,
                value: input.to_string(),
            })
    }

    pub fn is_blank(self) -> bool {
        self.0.is_none()
    }

    /// Numeric value; blank counts as zero
    pub fn value(self) -> u32 {
        self.0.unwrap_or(0)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{}", v),
            None => Ok(()),
        }
    }
}

/// Base scores of all four groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Scores([Score; 4]);

impl Scores {
    pub fn get(&self, group: AttributeGroup) -> Score {
        self.0[group.index()]
    }

    pub fn set(&mut self, group: AttributeGroup, score: Score) {
        self.0[group.index()] = score;
    }

    /// Set a score and return self, for building literals
    pub fn with(mut self, group: AttributeGroup, score: u32) -> Self {
        self.set(group, Score::new(score));
        self
    }
}

/// Acquisition flags for all twenty skills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SkillFlags([bool; 20]);

impl SkillFlags {
    pub fn is_acquired(&self, skill: Skill) -> bool {
        self.0[skill.index()]
    }

    pub fn set(&mut self, skill: Skill, acquired: bool) {
        self.0[skill.index()] = acquired;
    }

    /// Mark a skill acquired and return self
    pub fn with(mut self, skill: Skill) -> Self {
        self.set(skill, true);
        self
    }

    pub fn acquired(&self) -> impl Iterator<Item = Skill> + '_ {
        Skill::ALL.iter().copied().filter(|s| self.is_acquired(*s))
    }
}

impl FromIterator<Skill> for SkillFlags {
    fn from_iter<I: IntoIterator<Item = Skill>>(iter: I) -> Self {
        let mut flags = SkillFlags::default();
        for skill in iter {
            flags.set(skill, true);
        }
        flags
    }
}

/// The displayed value of a skill: group base plus one when acquired.
///
/// Skill values are never stored; this is the only place they come from.
///
/// Widened to `u64` so an acquired skill in a group scored `u32::MAX` still
/// shows one more than the score.
pub fn skill_value(scores: &Scores, flags: &SkillFlags, skill: Skill) -> u64 {
    u64::from(scores.get(skill.group()).value()) + u64::from(flags.is_acquired(skill))
}

/// The two character archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Faction {
    /// Faction A
    #[default]
    Fugeki,
    /// Faction B
    Tsukumogami,
}

impl Faction {
    pub fn label(self) -> &'static str {
        match self {
            Faction::Fugeki => "巫覡",
            Faction::Tsukumogami => "付喪神",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Faction::Fugeki => "fugeki",
            Faction::Tsukumogami => "tsukumogami",
        }
    }
}

impl FromStr for Faction {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" | "fugeki" | "巫覡" => Ok(Faction::Fugeki),
            "b" | "tsukumogami" | "付喪神" => Ok(Faction::Tsukumogami),
            _ => Err(InputError::UnknownFaction(s.to_string())),
        }
    }
}

/// Everything needed to compose one sheet, minus styling
#[derive(Debug, Clone, Default)]
pub struct SheetRequest {
    pub scores: Scores,
    pub skills: SkillFlags,
    /// Free-text character name; may be empty
    pub name: String,
    pub faction: Faction,
    /// Encoded portrait image (PNG or JPEG)
    pub portrait: Option<Vec<u8>>,
}

impl SheetRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scores(mut self, scores: Scores) -> Self {
        self.scores = scores;
        self
    }

    pub fn with_skills(mut self, skills: SkillFlags) -> Self {
        self.skills = skills;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_faction(mut self, faction: Faction) -> Self {
        self.faction = faction;
        self
    }

    pub fn with_portrait(mut self, bytes: Vec<u8>) -> Self {
        self.portrait = Some(bytes);
        self
    }

    /// Name painted on the sheet
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "No Name"
        } else {
            &self.name
        }
    }

    /// Suggested output file stem
    pub fn file_stem(&self) -> &str {
        if self.name.is_empty() {
            "output"
        } else {
            &self.name
        }
    }

    pub fn skill_value(&self, skill: Skill) -> u64 {
        skill_value(&self.scores, &self.skills, skill)
    }
}
