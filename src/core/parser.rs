//! Raw model builder: script text to [`RawStory`].

use tracing::debug;

use crate::core::lexer::{self, Block, ParseError};
use crate::core::links::extract_links;
use crate::schema::raw::{RawPassage, RawStory};

/// Parse a complete twee script.
///
/// CRLF line endings are accepted. Passage order follows the script.
pub fn parse_story(source: &str) -> Result<RawStory, ParseError> {
    let source = source.replace("\r\n", "\n");
    let mut story = RawStory::default();

    for block in lexer::split_blocks(&source) {
        match block {
            Block::StoryTitle(title) => {
                if let Some(title) = title {
                    story.title = title.to_string();
                }
            }
            Block::StoryData => {}
            Block::Passage { header, body } => {
                let passage = parse_passage(header, &body)?;
                story.passages.push(passage);
            }
        }
    }

    debug!(
        title = %story.title,
        passages = story.passages.len(),
        "parsed story"
    );
    Ok(story)
}

fn parse_passage(header: lexer::PassageHeader, body: &[&str]) -> Result<RawPassage, ParseError> {
    let title = header.title;
    let (macro_lines, content_lines) = lexer::split_body(body);
    let macro_block = lexer::parse_macro_block(&title, &macro_lines)?;

    let mut segments = Vec::new();
    let mut links = Vec::new();
    for segment in lexer::segment_content(&title, &content_lines)? {
        let (segment, segment_links) = extract_links(segment);
        segments.extend(segment);
        links.extend(segment_links);
    }

    Ok(RawPassage {
        title,
        header: macro_block.header.unwrap_or_default(),
        tags: header.tags,
        segments,
        macros: macro_block.macros,
        links,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::raw::{Condition, ConditionKind, MacroKind, RawLink, Segment};

    const PASSAGE: &str = r#":: This is title [tag1 tag2]
addItem: key
takeMoney: 100
setTitle: Actual title
--
First line.

Second line.
And third line.

[if hasItem key]
Only if has key.
[continue]

This is always visible.

[if hasItem key]
Only if has key.
[else]
Only if no key.
[continue]

[if hasItem key && !hasMoney 100]
Only if has key and not 100 money.

[if !hasMoney 100]
> [[Poor man]]
[else]
> [[Rich man]]
[continue]

[if !hasMoney 200]
Only if not 200 money.
[continue]

[if hasItem key]
> {back} [[Leave Key->No Key]]
[continue]

> [[Exit]]
"#;

    fn has_key(positive: bool) -> Condition {
        Condition::new(positive, ConditionKind::HasItem, "key")
    }

    #[test]
    fn parses_full_passage() {
        let story = parse_story(PASSAGE).unwrap();
        assert_eq!(story.passages.len(), 1);
        let passage = &story.passages[0];

        assert_eq!(passage.title, "This is title");
        assert_eq!(passage.header, "Actual title");
        assert_eq!(passage.tags, vec!["tag1", "tag2"]);

        assert_eq!(passage.macros.len(), 2);
        assert_eq!(passage.macros[0].kind, MacroKind::AddItem);
        assert_eq!(passage.macros[1].kind, MacroKind::TakeMoney);
        assert_eq!(passage.macros[1].value, "100");

        let expected_segments = vec![
            Segment {
                text: "First line.\n\nSecond line.\nAnd third line.\n".to_string(),
                conditions: vec![],
            },
            Segment {
                text: "Only if has key.\n".to_string(),
                conditions: vec![has_key(true)],
            },
            Segment {
                text: "This is always visible.\n".to_string(),
                conditions: vec![],
            },
            Segment {
                text: "Only if has key.\n".to_string(),
                conditions: vec![has_key(true)],
            },
            Segment {
                text: "Only if no key.\n".to_string(),
                conditions: vec![has_key(false)],
            },
            Segment {
                text: "Only if has key and not 100 money.\n".to_string(),
                conditions: vec![
                    has_key(true),
                    Condition::new(false, ConditionKind::HasMoney, "100"),
                ],
            },
            Segment {
                text: "Only if not 200 money.\n".to_string(),
                conditions: vec![Condition::new(false, ConditionKind::HasMoney, "200")],
            },
        ];
        assert_eq!(passage.segments, expected_segments);

        let expected_links = vec![
            RawLink {
                text: "Poor man".to_string(),
                target: "Poor man".to_string(),
                conditions: vec![Condition::new(false, ConditionKind::HasMoney, "100")],
                tags: vec![],
            },
            RawLink {
                text: "Rich man".to_string(),
                target: "Rich man".to_string(),
                conditions: vec![Condition::new(true, ConditionKind::HasMoney, "100")],
                tags: vec![],
            },
            RawLink {
                text: "Leave Key".to_string(),
                target: "No Key".to_string(),
                conditions: vec![has_key(true)],
                tags: vec!["back".to_string()],
            },
            RawLink {
                text: "Exit".to_string(),
                target: "Exit".to_string(),
                conditions: vec![],
                tags: vec![],
            },
        ];
        assert_eq!(passage.links, expected_links);
    }

    #[test]
    fn story_title_and_data_blocks() {
        let story = parse_story(
            ":: StoryTitle\n  The Secrets  \n\n:: StoryData\n{\n \"ifid\": \"A1\"\n}\n\n:: Start\nHi.\n",
        )
        .unwrap();
        assert_eq!(story.title, "The Secrets");
        assert_eq!(story.passages.len(), 1);
        assert_eq!(story.passages[0].title, "Start");
    }

    #[test]
    fn crlf_scripts_parse_like_lf() {
        let lf = parse_story(":: A\naddItem: key\n--\nHello.\n[if hasItem key]\nKey.\n").unwrap();
        let crlf =
            parse_story(":: A\r\naddItem: key\r\n--\r\nHello.\r\n[if hasItem key]\r\nKey.\r\n")
                .unwrap();
        assert_eq!(lf, crlf);
    }

    #[test]
    fn macro_only_passage() {
        let story = parse_story(":: Pickup\naddItem: lamp\n--\n").unwrap();
        let passage = &story.passages[0];
        assert_eq!(passage.macros.len(), 1);
        assert!(passage.segments.is_empty());
        assert!(passage.links.is_empty());
    }

    #[test]
    fn errors_name_the_passage() {
        let err = parse_story(":: Cellar\n[else]\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::ElseWithoutIf {
                passage: "Cellar".to_string()
            }
        );
        assert!(err.to_string().contains("Cellar"));
    }
}
