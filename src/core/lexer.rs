//! Lexer and segmenter for twee scripts.
//!
//! A script is a sequence of `::` blocks. Each block has a header line and
//! a body; a passage body is an optional macro block followed by a `--`
//! line and the content block, which is cut into segments at conditional
//! directives (`[if ...]`, `[unless ...]`, `[else]`, `[continue]`).

use thiserror::Error;

use crate::schema::raw::{Condition, ConditionKind, Macro, MacroKind, Segment};

/// Delimiter between blocks.
pub const BLOCK_DELIMITER: &str = "::";
/// Separator line between the macro block and the content block.
pub const MACRO_SEPARATOR: &str = "--";
/// Header of the block holding the story title.
pub const STORY_TITLE_HEADER: &str = "StoryTitle";
/// Header of the authoring metadata block.
pub const STORY_DATA_HEADER: &str = "StoryData";
/// Macro-block directive that sets the passage header text.
pub const SET_TITLE_DIRECTIVE: &str = "setTitle";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("passage '{passage}': unknown macro kind '{keyword}'")]
    UnknownMacroKind { passage: String, keyword: String },
    #[error("passage '{passage}': malformed macro line '{line}', expected '<kind>: <value>'")]
    MalformedMacro { passage: String, line: String },
    #[error("passage '{passage}': {keyword} amount '{value}' is not an integer")]
    InvalidMoneyAmount {
        passage: String,
        keyword: String,
        value: String,
    },
    #[error("passage '{passage}': unknown condition kind '{kind}'")]
    UnknownConditionKind { passage: String, kind: String },
    #[error("passage '{passage}': expected 'if' or 'unless', found '{keyword}'")]
    InvalidConditionKeyword { passage: String, keyword: String },
    #[error("passage '{passage}': condition '{clause}' has no value")]
    MissingConditionValue { passage: String, clause: String },
    #[error("passage '{passage}': money threshold '{value}' is not an integer")]
    InvalidMoneyThreshold { passage: String, value: String },
    #[error("passage '{passage}': [else] outside of an [if] block")]
    ElseWithoutIf { passage: String },
    #[error("passage '{passage}': [else] has no condition to invert")]
    ElseWithoutCondition { passage: String },
    #[error("passage '{passage}': [continue] outside of an [if] block")]
    ContinueWithoutIf { passage: String },
}

/// One `::` chunk of the script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block<'a> {
    /// `StoryTitle` block; carries its trimmed second line.
    StoryTitle(Option<&'a str>),
    /// `StoryData` block; ignored by the interpreter.
    StoryData,
    Passage {
        header: PassageHeader,
        body: Vec<&'a str>,
    },
}

/// Title and tags of a passage header line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PassageHeader {
    pub title: String,
    pub tags: Vec<String>,
}

/// Split a whole script into blocks. Empty chunks are skipped.
pub fn split_blocks(source: &str) -> Vec<Block<'_>> {
    source
        .split(BLOCK_DELIMITER)
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| {
            let mut lines = chunk.lines();
            let header = lines.next().unwrap_or_default().trim();
            match header {
                STORY_TITLE_HEADER => {
                    Block::StoryTitle(lines.next().map(str::trim).filter(|t| !t.is_empty()))
                }
                STORY_DATA_HEADER => Block::StoryData,
                _ => Block::Passage {
                    header: parse_header(header),
                    body: lines.collect(),
                },
            }
        })
        .collect()
}

/// Parse a passage header: `Title [tag1 tag2] {metadata}`.
///
/// Tags come from the first `[...]` group. Every bracket and brace group is
/// removed from the title; metadata is discarded.
pub fn parse_header(line: &str) -> PassageHeader {
    let (without_tags, tag_groups) = strip_groups(line, '[', ']');
    let (title, _metadata) = strip_groups(&without_tags, '{', '}');

    let tags = tag_groups
        .first()
        .map(|group| group.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default();

    PassageHeader {
        title: title.trim().to_string(),
        tags,
    }
}

/// Remove every `open ... close` group from `line`, returning the remaining
/// text and the inner text of each group. An unclosed group is kept as text.
fn strip_groups(line: &str, open: char, close: char) -> (String, Vec<String>) {
    let mut rest = String::with_capacity(line.len());
    let mut groups = Vec::new();
    let mut remaining = line;

    while let Some(start) = remaining.find(open) {
        let after = &remaining[start + open.len_utf8()..];
        match after.find(close) {
            Some(end) => {
                rest.push_str(&remaining[..start]);
                groups.push(after[..end].to_string());
                remaining = &after[end + close.len_utf8()..];
            }
            None => break,
        }
    }
    rest.push_str(remaining);

    (rest, groups)
}

/// Split a passage body at the first `--` line into macro and content lines.
/// Without a separator the whole body is content.
pub fn split_body<'a>(body: &[&'a str]) -> (Vec<&'a str>, Vec<&'a str>) {
    match body.iter().position(|line| line.trim() == MACRO_SEPARATOR) {
        Some(index) => (body[..index].to_vec(), body[index + 1..].to_vec()),
        None => (Vec::new(), body.to_vec()),
    }
}

/// Macros of a passage plus the header text set by `setTitle`, if any.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MacroBlock {
    pub macros: Vec<Macro>,
    pub header: Option<String>,
}

/// Parse macro lines of the form `<kind>: <value>`. Blank lines are skipped.
pub fn parse_macro_block(passage: &str, lines: &[&str]) -> Result<MacroBlock, ParseError> {
    let mut block = MacroBlock::default();

    for line in lines.iter().map(|l| l.trim()).filter(|l| !l.is_empty()) {
        let (keyword, value) = line.split_once(':').ok_or_else(|| ParseError::MalformedMacro {
            passage: passage.to_string(),
            line: line.to_string(),
        })?;
        let keyword = keyword.trim();
        let value = value.trim();

        if keyword == SET_TITLE_DIRECTIVE {
            block.header = Some(value.to_string());
            continue;
        }

        let kind = MacroKind::from_keyword(keyword).ok_or_else(|| ParseError::UnknownMacroKind {
            passage: passage.to_string(),
            keyword: keyword.to_string(),
        })?;

        if kind.takes_amount() && value.parse::<i64>().is_err() {
            return Err(ParseError::InvalidMoneyAmount {
                passage: passage.to_string(),
                keyword: keyword.to_string(),
                value: value.to_string(),
            });
        }

        block.macros.push(Macro {
            kind,
            value: value.to_string(),
        });
    }

    Ok(block)
}

/// Cut content lines into segments at conditional directives.
///
/// Segment text keeps one `\n` per source line. Whitespace-only segments are
/// dropped; link markup is still inside the text at this point.
pub fn segment_content(passage: &str, lines: &[&str]) -> Result<Vec<Segment>, ParseError> {
    let mut segmenter = Segmenter::default();

    for line in lines {
        let trimmed = line.trim();
        if trimmed == "[else]" {
            segmenter.else_branch(passage)?;
        } else if trimmed == "[continue]" {
            segmenter.continue_block(passage)?;
        } else if trimmed.starts_with("[if") || trimmed.starts_with("[unless") {
            let conditions = parse_directive(passage, trimmed)?;
            segmenter.open_block(conditions);
        } else {
            segmenter.current.text.push_str(line);
            segmenter.current.text.push('\n');
        }
    }

    segmenter.flush();
    Ok(segmenter.segments)
}

#[derive(Debug, Default)]
struct Segmenter {
    segments: Vec<Segment>,
    current: Segment,
    /// Conditions of the open block that `[else]` inverts.
    active: Vec<Condition>,
    open: bool,
}

impl Segmenter {
    fn flush(&mut self) {
        let current = std::mem::take(&mut self.current);
        if !current.text.trim().is_empty() {
            self.segments.push(current);
        }
    }

    fn else_branch(&mut self, passage: &str) -> Result<(), ParseError> {
        if !self.open {
            return Err(ParseError::ElseWithoutIf {
                passage: passage.to_string(),
            });
        }
        if self.active.is_empty() {
            return Err(ParseError::ElseWithoutCondition {
                passage: passage.to_string(),
            });
        }

        self.flush();
        self.current.conditions = self.active.drain(..).map(|c| c.negate()).collect();
        Ok(())
    }

    fn continue_block(&mut self, passage: &str) -> Result<(), ParseError> {
        if !self.open {
            return Err(ParseError::ContinueWithoutIf {
                passage: passage.to_string(),
            });
        }

        self.flush();
        self.active.clear();
        self.open = false;
        Ok(())
    }

    /// A new `[if]` implicitly closes a block that is still open.
    fn open_block(&mut self, conditions: Vec<Condition>) {
        self.flush();
        self.current.conditions = conditions.clone();
        self.active = conditions;
        self.open = true;
    }
}

/// Parse `[if <clause> && ...]` or `[unless ...]` into conditions.
///
/// A clause is `[!]<kind> <value>`; `!` flips the polarity of that clause
/// relative to the directive.
pub fn parse_directive(passage: &str, line: &str) -> Result<Vec<Condition>, ParseError> {
    let inner = line.trim().trim_start_matches('[').trim_end_matches(']').trim();
    let (keyword, rest) = inner
        .split_once(char::is_whitespace)
        .unwrap_or((inner, ""));

    let positive = match keyword {
        "if" => true,
        "unless" => false,
        other => {
            return Err(ParseError::InvalidConditionKeyword {
                passage: passage.to_string(),
                keyword: other.to_string(),
            })
        }
    };

    rest.split("&&")
        .map(|clause| parse_clause(passage, clause.trim(), positive))
        .collect()
}

fn parse_clause(passage: &str, clause: &str, positive: bool) -> Result<Condition, ParseError> {
    let (kind, value) = clause
        .split_once(char::is_whitespace)
        .map(|(kind, value)| (kind, value.trim()))
        .filter(|(_, value)| !value.is_empty())
        .ok_or_else(|| ParseError::MissingConditionValue {
            passage: passage.to_string(),
            clause: clause.to_string(),
        })?;

    let (kind, positive) = match kind.strip_prefix('!') {
        Some(stripped) => (stripped, !positive),
        None => (kind, positive),
    };

    let kind = ConditionKind::from_keyword(kind).ok_or_else(|| ParseError::UnknownConditionKind {
        passage: passage.to_string(),
        kind: kind.to_string(),
    })?;

    if kind == ConditionKind::HasMoney && value.parse::<i64>().is_err() {
        return Err(ParseError::InvalidMoneyThreshold {
            passage: passage.to_string(),
            value: value.to_string(),
        });
    }

    Ok(Condition::new(positive, kind, value))
}
