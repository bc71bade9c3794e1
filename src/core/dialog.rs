//! Option cursor for presenting a passage as a dialog.
//!
//! The dialog tracks which passage is shown and which option is selected.
//! Rendering and input belong to the host; it moves the selection and
//! confirms, and the dialog turns that into link visits.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::state::RuntimeError;
use crate::core::story::{LinkId, PassageId, Story};

/// One selectable option as the host renders it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogOption {
    pub link: LinkId,
    pub text: String,
    pub selected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialog {
    passage: PassageId,
    active: usize,
}

impl Dialog {
    pub fn new(passage: PassageId) -> Self {
        Self { passage, active: 0 }
    }

    /// Open a dialog on the story's start passage, visiting it first.
    pub fn start(story: &mut Story) -> Result<Option<Self>, RuntimeError> {
        let Some(start) = story.start() else {
            return Ok(None);
        };
        story.visit_passage(start)?;
        Ok(Some(Self::new(start)))
    }

    pub fn passage(&self) -> PassageId {
        self.passage
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn options(&self, story: &Story) -> Result<Vec<DialogOption>, RuntimeError> {
        Ok(story
            .links(self.passage)?
            .into_iter()
            .enumerate()
            .map(|(index, link)| DialogOption {
                link,
                text: story.link(link).text().to_string(),
                selected: index == self.active,
            })
            .collect())
    }

    /// No options left: the story ends here.
    pub fn is_finished(&self, story: &Story) -> Result<bool, RuntimeError> {
        Ok(story.links(self.passage)?.is_empty())
    }

    /// Move the selection down, wrapping to the first option.
    pub fn select_next(&mut self, story: &Story) -> Result<(), RuntimeError> {
        let count = story.links(self.passage)?.len();
        if count > 0 {
            self.active = (self.active.min(count - 1) + 1) % count;
        }
        Ok(())
    }

    /// Move the selection up, wrapping to the last option.
    pub fn select_previous(&mut self, story: &Story) -> Result<(), RuntimeError> {
        let count = story.links(self.passage)?.len();
        if count > 0 {
            let current = self.active.min(count - 1);
            self.active = if current == 0 { count - 1 } else { current - 1 };
        }
        Ok(())
    }

    /// Select an option directly. Out-of-range indexes wrap to the first option.
    pub fn select(&mut self, story: &Story, index: usize) -> Result<(), RuntimeError> {
        let count = story.links(self.passage)?.len();
        self.active = if index < count { index } else { 0 };
        Ok(())
    }

    /// Take the selected link and move to its target.
    ///
    /// Returns the new passage, or `None` when there was nothing to select.
    pub fn confirm(&mut self, story: &mut Story) -> Result<Option<PassageId>, RuntimeError> {
        let links = story.links(self.passage)?;
        let Some(&link) = links.get(self.active) else {
            return Ok(None);
        };

        let target = story.visit_link(link)?;
        debug!(
            from = %story.passage(self.passage).title(),
            to = %story.passage(target).title(),
            "dialog moved"
        );
        self.passage = target;
        self.active = 0;
        Ok(Some(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::parse_story;

    fn story() -> Story {
        let mut story = Story::from_raw(
            parse_story(
                ":: Street\n[[Shop]]\n[[Inn]]\n[[Dock]]\n:: Shop\naddItem: bread\n--\nFresh bread.\n[[Street]]\n:: Inn\nClosed.\n:: Dock\nFog.\n",
            )
            .unwrap(),
        )
        .unwrap();
        story.set_start("Street").unwrap();
        story
    }

    #[test]
    fn selection_wraps_both_ways() {
        let story = story();
        let mut dialog = Dialog::new(story.start().unwrap());

        dialog.select_previous(&story).unwrap();
        assert_eq!(dialog.active(), 2);
        dialog.select_next(&story).unwrap();
        assert_eq!(dialog.active(), 0);
        dialog.select_next(&story).unwrap();
        assert_eq!(dialog.active(), 1);

        dialog.select(&story, 7).unwrap();
        assert_eq!(dialog.active(), 0);
    }

    #[test]
    fn options_mark_selection() {
        let story = story();
        let mut dialog = Dialog::new(story.start().unwrap());
        dialog.select(&story, 1).unwrap();

        let options = dialog.options(&story).unwrap();
        let texts: Vec<_> = options.iter().map(|o| o.text.as_str()).collect();
        assert_eq!(texts, vec!["Shop", "Inn", "Dock"]);
        assert!(options[1].selected);
        assert!(!options[0].selected);
    }

    #[test]
    fn confirm_moves_and_runs_macros() {
        let mut story = story();
        let mut dialog = Dialog::start(&mut story).unwrap().unwrap();
        assert!(story.passage(dialog.passage()).visited());

        let shop = dialog.confirm(&mut story).unwrap().unwrap();
        assert_eq!(story.passage(shop).title(), "Shop");
        assert_eq!(dialog.active(), 0);
        assert!(story.state().has_item("bread"));
        assert!(!dialog.is_finished(&story).unwrap());
    }

    #[test]
    fn dead_end_is_finished() {
        let mut story = story();
        let mut dialog = Dialog::start(&mut story).unwrap().unwrap();
        dialog.select(&story, 1).unwrap();
        dialog.confirm(&mut story).unwrap();

        assert!(dialog.is_finished(&story).unwrap());
        assert_eq!(dialog.confirm(&mut story).unwrap(), None);
    }
}
