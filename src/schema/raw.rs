//! Raw story model: the unlinked output of parsing a twee script.

use serde::{Deserialize, Serialize};

/// Tag marking a passage whose incoming links disappear once it was visited.
pub const TAG_ONCE: &str = "once";
/// Tag marking a link that leaves the current branch.
pub const TAG_EXIT: &str = "exit";
/// Tag marking a link that returns to an earlier passage.
pub const TAG_BACK: &str = "back";

/// A parsed script, before link targets are resolved.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawStory {
    pub title: String,
    pub passages: Vec<RawPassage>,
}

/// A single `::` block of the script.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawPassage {
    pub title: String,
    /// Display header, set with `setTitle` in the macro block.
    #[serde(default)]
    pub header: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub macros: Vec<Macro>,
    #[serde(default)]
    pub links: Vec<RawLink>,
}

impl RawPassage {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// A run of passage text sharing one condition list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

/// A link whose target is still a passage title.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawLink {
    pub text: String,
    pub target: String,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// What a condition inspects in the runtime state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionKind {
    HasItem,
    HasMoney,
    Fact,
}

impl ConditionKind {
    /// Map a script keyword (`hasItem`, `hasMoney`, `fact`) to its kind.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "hasItem" => Some(Self::HasItem),
            "hasMoney" => Some(Self::HasMoney),
            "fact" => Some(Self::Fact),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Self::HasItem => "hasItem",
            Self::HasMoney => "hasMoney",
            Self::Fact => "fact",
        }
    }
}

/// A predicate over the runtime state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Condition {
    pub positive: bool,
    pub kind: ConditionKind,
    /// Item name, money threshold or fact name.
    pub value: String,
}

impl Condition {
    pub fn new(positive: bool, kind: ConditionKind, value: impl Into<String>) -> Self {
        Self {
            positive,
            kind,
            value: value.into(),
        }
    }

    /// The same condition with its polarity flipped.
    pub fn negate(&self) -> Self {
        Self {
            positive: !self.positive,
            kind: self.kind,
            value: self.value.clone(),
        }
    }
}

/// A state-mutating directive run when its passage is visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MacroKind {
    AddItem,
    TakeItem,
    AddFact,
    AddMoney,
    TakeMoney,
}

impl MacroKind {
    /// Map a macro keyword to its kind. `setFact` is an alias of `addFact`.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "addItem" => Some(Self::AddItem),
            "takeItem" => Some(Self::TakeItem),
            "addFact" | "setFact" => Some(Self::AddFact),
            "addMoney" => Some(Self::AddMoney),
            "takeMoney" => Some(Self::TakeMoney),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Self::AddItem => "addItem",
            Self::TakeItem => "takeItem",
            Self::AddFact => "addFact",
            Self::AddMoney => "addMoney",
            Self::TakeMoney => "takeMoney",
        }
    }

    /// Whether the value must be an integer amount.
    pub fn takes_amount(&self) -> bool {
        matches!(self, Self::AddMoney | Self::TakeMoney)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Macro {
    pub kind: MacroKind,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_keywords_round_trip() {
        for kind in [ConditionKind::HasItem, ConditionKind::HasMoney, ConditionKind::Fact] {
            assert_eq!(ConditionKind::from_keyword(kind.keyword()), Some(kind));
        }
        assert_eq!(ConditionKind::from_keyword("hasGold"), None);
    }

    #[test]
    fn set_fact_is_add_fact() {
        assert_eq!(MacroKind::from_keyword("setFact"), Some(MacroKind::AddFact));
        assert_eq!(MacroKind::from_keyword("addFact"), Some(MacroKind::AddFact));
        assert_eq!(MacroKind::from_keyword("playMusic"), None);
    }

    #[test]
    fn negate_flips_polarity_only() {
        let c = Condition::new(true, ConditionKind::Fact, "day2");
        let n = c.negate();
        assert!(!n.positive);
        assert_eq!(n.kind, ConditionKind::Fact);
        assert_eq!(n.value, "day2");
        assert_eq!(n.negate(), c);
    }

    #[test]
    fn raw_story_ron_round_trip() {
        let story = RawStory {
            title: "Secrets".to_string(),
            passages: vec![RawPassage {
                title: "Start".to_string(),
                tags: vec![TAG_ONCE.to_string()],
                segments: vec![Segment {
                    text: "Hello.\n".to_string(),
                    conditions: vec![Condition::new(false, ConditionKind::HasItem, "key")],
                }],
                macros: vec![Macro {
                    kind: MacroKind::AddMoney,
                    value: "10".to_string(),
                }],
                links: vec![RawLink {
                    text: "Go".to_string(),
                    target: "End".to_string(),
                    ..RawLink::default()
                }],
                ..RawPassage::default()
            }],
        };

        let serialized = ron::to_string(&story).unwrap();
        let deserialized: RawStory = ron::from_str(&serialized).unwrap();
        assert_eq!(deserialized, story);
        assert!(deserialized.passages[0].has_tag("once"));
    }
}
