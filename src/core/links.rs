//! Link extraction from segment text.
//!
//! Link markup sits at the start of a line:
//! `> {tag1 tag2} [reserved] [[Display text->Target]]`. The `>` marker, the
//! tag group and the reserved bracket groups are optional. Extracted links
//! inherit the conditions of their segment.

use crate::schema::raw::{RawLink, Segment};

const LINK_OPEN: &str = "[[";
const LINK_CLOSE: &str = "]]";
const TARGET_ARROW: &str = "->";

/// Link markup matched at the start of a line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LinkMarkup<'a> {
    tags: Option<&'a str>,
    body: &'a str,
}

/// Pull every link out of a segment.
///
/// Returns the segment with link markup removed and its text trimmed (ending
/// in a single newline), or `None` when no text is left, together with the
/// extracted links in authoring order.
pub fn extract_links(segment: Segment) -> (Option<Segment>, Vec<RawLink>) {
    let mut links = Vec::new();
    let mut kept_lines = Vec::new();

    for line in segment.text.lines() {
        let mut rest = line;
        let mut matched = false;

        while let Some((markup, after)) = match_link(rest) {
            links.push(build_link(&markup, &segment));
            rest = after;
            matched = true;
        }

        if !matched {
            kept_lines.push(line);
        } else if !rest.trim().is_empty() {
            kept_lines.push(rest);
        }
    }

    let text = kept_lines.join("\n");
    let text = text.trim();
    let segment = if text.is_empty() {
        None
    } else {
        Some(Segment {
            text: format!("{}\n", text),
            conditions: segment.conditions,
        })
    };

    (segment, links)
}

fn build_link(markup: &LinkMarkup<'_>, segment: &Segment) -> RawLink {
    let (text, target) = match markup.body.split_once(TARGET_ARROW) {
        Some((text, target)) => (text.trim(), target.trim()),
        None => (markup.body.trim(), markup.body.trim()),
    };

    RawLink {
        text: text.to_string(),
        target: target.to_string(),
        conditions: segment.conditions.clone(),
        tags: markup
            .tags
            .map(|tags| tags.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default(),
    }
}

/// Match link markup at the start of `line`, returning it and the text
/// following the closing `]]`.
fn match_link(line: &str) -> Option<(LinkMarkup<'_>, &str)> {
    let mut rest = line.trim_start();
    if let Some(stripped) = rest.strip_prefix('>') {
        rest = stripped.trim_start();
    }

    let mut tags = None;
    if let Some(stripped) = rest.strip_prefix('{') {
        let end = stripped.find('}')?;
        tags = Some(&stripped[..end]);
        rest = stripped[end + 1..].trim_start();
    }

    // Reserved `[...]` groups before the link body.
    while !rest.starts_with(LINK_OPEN) {
        let stripped = rest.strip_prefix('[')?;
        let end = stripped.find(']')?;
        rest = stripped[end + 1..].trim_start();
    }

    let body_start = &rest[LINK_OPEN.len()..];
    let end = body_start.find(LINK_CLOSE)?;
    let body = &body_start[..end];
    let after = &body_start[end + LINK_CLOSE.len()..];

    Some((LinkMarkup { tags, body }, after))
}
