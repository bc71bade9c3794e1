//! Static checks over a built story.
//!
//! Errors are content a player can never satisfy: conditions on items or
//! facts that no macro provides, and macros with an empty name. Warnings
//! are structural: unreachable passages, dead ends and orphaned `once`
//! passages.

use rustc_hash::FxHashSet;

use crate::core::story::{PassageId, Story};
use crate::schema::raw::{Condition, ConditionKind, MacroKind, TAG_ONCE};

/// Lint a story. Returns `(errors, warnings)`.
pub fn lint_story(story: &Story) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    check_requirements(story, &mut errors);
    check_structure(story, &mut warnings);

    (errors, warnings)
}

fn check_requirements(story: &Story, errors: &mut Vec<String>) {
    let mut items = FxHashSet::default();
    let mut facts = FxHashSet::default();

    for passage in story.passages() {
        for m in passage.macros() {
            let provided = match m.kind {
                MacroKind::AddItem => &mut items,
                MacroKind::AddFact => &mut facts,
                _ => continue,
            };
            if m.value.is_empty() {
                errors.push(format!(
                    "Passage '{}': {} with an empty name",
                    passage.title(),
                    m.kind.keyword()
                ));
            } else {
                provided.insert(m.value.as_str());
            }
        }
    }

    // Script order, first mention only.
    let mut seen = FxHashSet::default();
    for passage in story.passages() {
        let segment_conditions = passage.segments().iter().flat_map(|s| &s.conditions);
        let link_conditions = passage
            .all_links()
            .iter()
            .flat_map(|&id| story.link(id).conditions());

        for condition in segment_conditions.chain(link_conditions) {
            let provided = match condition.kind {
                ConditionKind::HasItem => &items,
                ConditionKind::Fact => &facts,
                ConditionKind::HasMoney => continue,
            };
            let name = condition.value.as_str();
            if provided.contains(name) || !seen.insert((condition.kind, name)) {
                continue;
            }
            errors.push(unprovided(passage.title(), condition));
        }
    }
}

fn unprovided(passage: &str, condition: &Condition) -> String {
    let (what, source) = match condition.kind {
        ConditionKind::HasItem => ("item", MacroKind::AddItem),
        _ => ("fact", MacroKind::AddFact),
    };
    format!(
        "Passage '{}': required {} '{}' is never provided by {}",
        passage,
        what,
        condition.value,
        source.keyword()
    )
}

fn check_structure(story: &Story, warnings: &mut Vec<String>) {
    // Reachability ignores conditions: any authored link counts.
    match story.start() {
        Some(start) => {
            let reachable = reachable_from(story, start);
            for passage in story.passages() {
                if !reachable.contains(&passage.id()) {
                    warnings.push(format!(
                        "Passage '{}' is not reachable from '{}'",
                        passage.title(),
                        story.passage(start).title()
                    ));
                }
            }
        }
        None => warnings.push("No start passage given; reachability not checked".to_string()),
    }

    let targets: FxHashSet<PassageId> = story.links_iter().map(|link| link.target()).collect();

    for passage in story.passages() {
        if passage.all_links().is_empty() {
            warnings.push(format!("Passage '{}' is a dead end (no links)", passage.title()));
        }
        if passage.is_one_time() && !targets.contains(&passage.id()) {
            warnings.push(format!(
                "Passage '{}' is tagged '{}' but nothing links to it",
                passage.title(),
                TAG_ONCE
            ));
        }
    }
}

fn reachable_from(story: &Story, start: PassageId) -> FxHashSet<PassageId> {
    let mut seen = FxHashSet::default();
    let mut stack = vec![start];
    while let Some(id) = stack.pop() {
        if !seen.insert(id) {
            continue;
        }
        for &link in story.passage(id).all_links() {
            stack.push(story.link(link).target());
        }
    }
    seen
}
